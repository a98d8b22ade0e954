use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::Config;

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        if config.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations applied");
        }

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self { pool })
    }
}
