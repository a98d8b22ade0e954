use crate::db_storage::DiagnosticStorage;
use crate::diagnostic::run_diagnostic;
use crate::errors::AppError;
use crate::models::*;
use crate::notifications::CommercialNotification;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use moka::future::Cache;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Stored diagnostics never change, so lookups are cached by id.
    pub diagnostic_cache: Cache<Uuid, StoredDiagnostic>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-lgpd-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/diagnosticos
///
/// Scores a questionnaire submission, records the submitter as a lead and
/// stores the diagnostic.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - The questionnaire submission.
///
/// # Returns
///
/// * `Result<Json<DiagnosticResponse>, AppError>` - Score, status, recommendations and stored ids.
#[utoipa::path(
    post,
    path = "/api/v1/diagnosticos",
    request_body = DiagnosticRequest,
    responses(
        (status = 200, description = "Diagnostic processed", body = DiagnosticResponse),
        (status = 400, description = "Missing required fields", body = ErrorBody),
        (status = 500, description = "Could not store the diagnostic", body = ErrorBody)
    ),
    tag = "diagnosticos"
)]
pub async fn submit_diagnostic(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DiagnosticRequest>, JsonRejection>,
) -> Result<Json<DiagnosticResponse>, AppError> {
    let Json(request) = payload?;
    tracing::info!(
        "POST /diagnosticos - empresa: {}, setor: {}, porte: {}",
        request.empresa,
        request.sector(),
        request.headcount()
    );

    let outcome = run_diagnostic(&request)?;

    let storage = DiagnosticStorage::new(state.db.clone());
    let saved = storage.save_diagnostic(&request, &outcome).await?;

    tracing::info!(
        "Diagnostic {} processed: score {} ({})",
        saved.diagnostico_id,
        outcome.score,
        outcome.status
    );

    Ok(Json(DiagnosticResponse {
        score: outcome.score,
        status: outcome.status,
        recomendacoes: outcome.recomendacoes,
        diagnostico_id: saved.diagnostico_id,
        client_id: saved.client_id,
        is_new_client: saved.is_new_client,
    }))
}

/// GET /api/v1/diagnosticos/:id
///
/// Retrieves a stored diagnostic by its UUID.
#[utoipa::path(
    get,
    path = "/api/v1/diagnosticos/{id}",
    params(("id" = Uuid, Path, description = "Diagnostic id")),
    responses(
        (status = 200, description = "Stored diagnostic", body = StoredDiagnostic),
        (status = 404, description = "Unknown diagnostic", body = ErrorBody)
    ),
    tag = "diagnosticos"
)]
pub async fn get_diagnostic(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredDiagnostic>, AppError> {
    tracing::info!("GET /diagnosticos/{}", id);
    Ok(Json(load_diagnostic(&state, id).await?))
}

/// POST /api/v1/diagnosticos/:id/notificacao
///
/// Registers a notification for the commercial team about a stored
/// diagnostic. A failure to store the notification is logged and reported
/// with a null `notificationId`.
#[utoipa::path(
    post,
    path = "/api/v1/diagnosticos/{id}/notificacao",
    params(("id" = Uuid, Path, description = "Diagnostic id")),
    request_body(content = NotificationRequest, description = "Optional PDF link"),
    responses(
        (status = 200, description = "Notification registered", body = NotificationResponse),
        (status = 404, description = "Unknown diagnostic", body = ErrorBody)
    ),
    tag = "diagnosticos"
)]
pub async fn notify_commercial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Option<Json<NotificationRequest>>,
) -> Result<Json<NotificationResponse>, AppError> {
    tracing::info!("POST /diagnosticos/{}/notificacao", id);

    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let diagnostic = load_diagnostic(&state, id).await?;
    let notification = CommercialNotification::for_diagnostic(&diagnostic);

    let storage = DiagnosticStorage::new(state.db.clone());
    let notification_id = match storage
        .insert_notification(&diagnostic, &notification, request.pdf_url.as_deref())
        .await
    {
        Ok(notification_id) => Some(notification_id),
        Err(e) => {
            tracing::error!("Failed to register notification for {}: {}", id, e);
            None
        }
    };

    Ok(Json(NotificationResponse {
        success: true,
        message: "Consultores notificados com sucesso".to_string(),
        notification_id,
        status_color: notification.status_color.to_string(),
    }))
}

/// Cache-first lookup of a stored diagnostic.
async fn load_diagnostic(state: &AppState, id: Uuid) -> Result<StoredDiagnostic, AppError> {
    if let Some(cached) = state.diagnostic_cache.get(&id).await {
        tracing::debug!("Diagnostic cache HIT: {}", id);
        return Ok(cached);
    }

    let storage = DiagnosticStorage::new(state.db.clone());
    let diagnostic = storage
        .fetch_diagnostic(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Diagnóstico não encontrado.".to_string()))?;

    state.diagnostic_cache.insert(id, diagnostic.clone()).await;
    Ok(diagnostic)
}
