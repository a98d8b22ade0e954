//! Utility to inspect the tables used by the diagnostic service and print their columns.

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;

const TABLES: [&str; 3] = ["clients", "diagnosticos_lgpd", "notificacoes"];

/// Main entry point for the schema inspection utility.
///
/// Connects to the database and lists the columns of each table the service
/// reads or writes, flagging any that are missing.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("DB_URL"))
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = PgPoolOptions::new().connect(&database_url).await?;

    for table in TABLES {
        let columns: Vec<(String, String)> = sqlx::query_as(
            "SELECT column_name, data_type FROM information_schema.columns WHERE table_name = $1 ORDER BY ordinal_position"
        )
        .bind(table)
        .fetch_all(&pool)
        .await?;

        if columns.is_empty() {
            println!("- {} (missing)", table);
            continue;
        }

        println!("- {}", table);
        for (col, type_) in columns {
            println!("  - {}: {}", col, type_);
        }
        println!();
    }

    Ok(())
}
