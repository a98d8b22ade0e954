use std::env;
use uuid::Uuid;

use rust_lgpd_api::db_storage::DiagnosticStorage;
use rust_lgpd_api::diagnostic::run_diagnostic;
use rust_lgpd_api::models::DiagnosticRequest;
use sqlx::postgres::PgPoolOptions;

/// Integration smoke test for diagnostic storage against a real database.
/// Marked ignored to avoid running against production by accident; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn save_diagnostic_smoke_test() -> anyhow::Result<()> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let pool = PgPoolOptions::new().max_connections(2).connect(&db_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let storage = DiagnosticStorage::new(pool.clone());

    // Unique e-mail so repeated runs create a fresh lead first.
    let email = format!("smoke-{}@example.com", Uuid::new_v4());
    let request: DiagnosticRequest = serde_json::from_value(serde_json::json!({
        "nome": "Smoke Test",
        "email": email,
        "telefone": "11987654321",
        "empresa": "Smoke Test Ltda",
        "cargo": "QA",
        "setorEmpresa": "Tecnologia",
        "quantidadeFuncionarios": "Até 10 funcionários",
        "respostas": { "temPoliticaPrivacidade": "Não", "temDPO": "Sim" }
    }))?;
    let outcome = run_diagnostic(&request).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let first = storage
        .save_diagnostic(&request, &outcome)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(first.is_new_client);

    let second = storage
        .save_diagnostic(&request, &outcome)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(!second.is_new_client);
    assert_eq!(first.client_id, second.client_id);
    assert_ne!(first.diagnostico_id, second.diagnostico_id);

    let stored = storage
        .fetch_diagnostic(first.diagnostico_id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .ok_or_else(|| anyhow::anyhow!("diagnostic not found"))?;
    assert_eq!(stored.score, 45);
    assert_eq!(stored.status, "Preocupante");
    assert_eq!(stored.respostas.0["temDPO"], serde_json::json!("Sim"));

    Ok(())
}
