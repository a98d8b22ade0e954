//! Router assembly and API documentation.

use crate::handlers::{self, AppState};
use crate::models::{
    DiagnosticRequest, DiagnosticResponse, ErrorBody, NotificationRequest, NotificationResponse,
    Recommendation, StoredDiagnostic,
};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// Request size limit for API routes: submissions are a few KiB at most.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(title = "LGPD Diagnostic API"),
    paths(
        handlers::submit_diagnostic,
        handlers::get_diagnostic,
        handlers::notify_commercial
    ),
    components(schemas(
        DiagnosticRequest,
        DiagnosticResponse,
        Recommendation,
        StoredDiagnostic,
        NotificationRequest,
        NotificationResponse,
        ErrorBody
    )),
    tags((name = "diagnosticos", description = "LGPD self-diagnostic questionnaire"))
)]
pub struct ApiDoc;

/// Per-IP rate limit applied to the API routes.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
}

/// Serves the generated OpenAPI document.
async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serves the Swagger UI HTML page.
///
/// This endpoint returns an HTML page that embeds the Swagger UI, configured to
/// load the OpenAPI document served by `serve_openapi_spec`.
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>LGPD Diagnostic API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Diagnostic endpoints, without state or middleware.
///
/// The questionnaire form posts to `/processar-diagnostico-lgpd`; it is kept as
/// an alias of `/api/v1/diagnosticos`.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/diagnosticos", post(handlers::submit_diagnostic))
        .route("/processar-diagnostico-lgpd", post(handlers::submit_diagnostic))
        .route("/api/v1/diagnosticos/:id", get(handlers::get_diagnostic))
        .route(
            "/api/v1/diagnosticos/:id/notificacao",
            post(handlers::notify_commercial),
        )
}

/// Builds the full application router.
///
/// Health and documentation bypass the rate limiter; `rate_limit = None`
/// disables it entirely (used by tests, which have no peer address).
pub fn build_router(
    state: Arc<AppState>,
    rate_limit: Option<RateLimit>,
) -> anyhow::Result<Router> {
    let mut protected_routes =
        api_routes().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    if let Some(limit) = rate_limit {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(limit.per_second)
                .burst_size(limit.burst)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration: {:?}", limit))?,
        );
        protected_routes = protected_routes.layer(ServiceBuilder::new().layer(GovernorLayer {
            config: governor_conf,
        }));
    }

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.json", get(serve_openapi_spec))
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_diagnostic_paths() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/v1/diagnosticos"));
        assert!(paths.contains_key("/api/v1/diagnosticos/{id}"));
        assert!(paths.contains_key("/api/v1/diagnosticos/{id}/notificacao"));
    }
}
