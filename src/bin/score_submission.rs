//! Scores a questionnaire submission offline, without touching the database.
//!
//! Usage: `score_submission [path/to/submission.json]` (reads stdin when no path is given).

use rust_lgpd_api::diagnostic::run_diagnostic;
use rust_lgpd_api::models::DiagnosticRequest;
use serde_json::json;
use std::io::Read;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let request: DiagnosticRequest = serde_json::from_str(&raw)?;
    let outcome = run_diagnostic(&request).map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!(
        "{} ({}, {}): score {}",
        request.empresa,
        request.sector(),
        request.headcount(),
        outcome.score
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "score": outcome.score,
            "status": outcome.status,
            "recomendacoes": outcome.recomendacoes,
        }))?
    );

    Ok(())
}
