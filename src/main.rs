use moka::future::Cache;
use rust_lgpd_api::app::{build_router, RateLimit};
use rust_lgpd_api::config::Config;
use rust_lgpd_api::db::Database;
use rust_lgpd_api::handlers::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Database connection (and migrations when enabled).
/// - Diagnostic lookup cache.
/// - HTTP routes and middleware (CORS, body limit, rate limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_lgpd_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config).await?;
    tracing::info!("Database connection pool established");

    // Stored diagnostics are immutable (10 minute TTL, 10k max entries)
    let diagnostic_cache = Cache::builder()
        .time_to_live(Duration::from_secs(600))
        .max_capacity(10_000)
        .build();
    tracing::info!("Diagnostic cache initialized");

    let rate_limit = RateLimit {
        per_second: config.rate_limit_per_second,
        burst: config.rate_limit_burst,
    };
    let port = config.port;

    // Build application state
    let app_state = Arc::new(AppState {
        db: db.pool.clone(),
        diagnostic_cache,
    });

    let app = build_router(app_state, Some(rate_limit))?;

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Peer addresses are needed by the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
