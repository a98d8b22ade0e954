use crate::diagnostic::DiagnosticOutcome;
use crate::errors::{AppError, ResultExt};
use crate::models::{DiagnosticRequest, StoredDiagnostic};
use crate::notifications::CommercialNotification;
use serde_json::json;
use sha2::{Digest, Sha256};
use sqlx::types::Json;
use sqlx::{Acquire, PgPool, Postgres, Transaction};
use uuid::Uuid;

pub const CLIENT_SAVE_ERROR: &str = "Erro ao salvar dados do cliente.";
pub const DIAGNOSTIC_SAVE_ERROR: &str = "Erro ao salvar diagnóstico.";
pub const DIAGNOSTIC_LOAD_ERROR: &str = "Erro ao buscar diagnóstico.";

pub const LEAD_STATUS: &str = "lead";
pub const LEAD_SOURCE: &str = "questionário lgpd";

/// Identifiers returned once a diagnostic has been stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedDiagnostic {
    pub diagnostico_id: Uuid,
    pub client_id: Uuid,
    pub is_new_client: bool,
}

/// Database storage for diagnostics and the CRM lead they create or update.
pub struct DiagnosticStorage {
    pool: PgPool,
}

impl DiagnosticStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a diagnostic, creating or updating the client it belongs to.
    ///
    /// Runs in one transaction. A transaction-scoped advisory lock on the
    /// submitter's e-mail serialises concurrent submissions for the same
    /// person, so a new lead is created at most once.
    pub async fn save_diagnostic(
        &self,
        request: &DiagnosticRequest,
        outcome: &DiagnosticOutcome,
    ) -> Result<SavedDiagnostic, AppError> {
        let mut tx = self.pool.begin().await.context(CLIENT_SAVE_ERROR)?;

        let lock_key = identity_lock_key(&request.email);
        tracing::debug!("Acquiring client lock {:016x}", lock_key);
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(lock_key)
            .execute(&mut *tx)
            .await
            .context(CLIENT_SAVE_ERROR)?;

        let (client_id, is_new_client) = match find_client(&mut tx, request).await? {
            Some(client_id) => {
                update_client(&mut tx, client_id, request, outcome).await?;
                (client_id, false)
            }
            None => (insert_client(&mut tx, request, outcome).await?, true),
        };

        let (diagnostico_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO diagnosticos_lgpd (
                client_id, nome_completo, email, telefone, empresa, cargo, cnpj,
                setor_empresa, quantidade_funcionarios, respostas, score, status, recomendacoes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(client_id)
        .bind(&request.nome)
        .bind(&request.email)
        .bind(&request.telefone)
        .bind(&request.empresa)
        .bind(&request.cargo)
        .bind(request.cnpj())
        .bind(&request.setor_empresa)
        .bind(&request.quantidade_funcionarios)
        .bind(answers_record(request))
        .bind(outcome.score)
        .bind(outcome.status.label())
        .bind(Json(&outcome.recomendacoes))
        .fetch_one(&mut *tx)
        .await
        .context(DIAGNOSTIC_SAVE_ERROR)?;

        tx.commit().await.context(DIAGNOSTIC_SAVE_ERROR)?;

        tracing::info!(
            "Diagnostic {} stored for client {} (new: {})",
            diagnostico_id,
            client_id,
            is_new_client
        );

        Ok(SavedDiagnostic {
            diagnostico_id,
            client_id,
            is_new_client,
        })
    }

    /// Load a stored diagnostic by id.
    pub async fn fetch_diagnostic(&self, id: Uuid) -> Result<Option<StoredDiagnostic>, AppError> {
        sqlx::query_as::<_, StoredDiagnostic>(
            r#"
            SELECT id, client_id, nome_completo, email, telefone, empresa, cargo, cnpj,
                   setor_empresa, quantidade_funcionarios, respostas, score, status,
                   recomendacoes, created_at
            FROM diagnosticos_lgpd
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context(DIAGNOSTIC_LOAD_ERROR)
    }

    /// Register a notification for the commercial team.
    pub async fn insert_notification(
        &self,
        diagnostic: &StoredDiagnostic,
        notification: &CommercialNotification,
        pdf_url: Option<&str>,
    ) -> Result<Uuid, AppError> {
        let related = json!({
            "diagnostico_id": diagnostic.id,
            "cliente_id": diagnostic.client_id,
            "pdf_url": pdf_url,
        });

        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO notificacoes (tipo, destinatarios, titulo, conteudo, data_envio, visualizada, dados_relacionados)
            VALUES ($1, $2, $3, $4, now(), false, $5)
            RETURNING id
            "#,
        )
        .bind(CommercialNotification::KIND)
        .bind(CommercialNotification::RECIPIENTS)
        .bind(&notification.titulo)
        .bind(&notification.conteudo)
        .bind(Json(related))
        .fetch_one(&self.pool)
        .await
        .context("Erro ao registrar notificação.")?;

        Ok(id)
    }
}

/// Client matching the submitter's e-mail, or the CNPJ when one was sent.
async fn find_client(
    tx: &mut Transaction<'_, Postgres>,
    request: &DiagnosticRequest,
) -> Result<Option<Uuid>, AppError> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id FROM clients
        WHERE legal_representative_email = $1
           OR ($2::text IS NOT NULL AND cnpj = $2)
        ORDER BY created_at ASC
        LIMIT 1
        "#,
    )
    .bind(&request.email)
    .bind(request.cnpj())
    .fetch_optional(&mut **tx)
    .await
    .context(CLIENT_SAVE_ERROR)?;

    Ok(row.map(|(id,)| id))
}

async fn insert_client(
    tx: &mut Transaction<'_, Postgres>,
    request: &DiagnosticRequest,
    outcome: &DiagnosticOutcome,
) -> Result<Uuid, AppError> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO clients (
            company_name, cnpj, company_type, legal_representative_name,
            legal_representative_email, legal_representative_phone, status, lead_source, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(&request.empresa)
    .bind(request.cnpj())
    .bind(&request.setor_empresa)
    .bind(&request.nome)
    .bind(&request.email)
    .bind(&request.telefone)
    .bind(LEAD_STATUS)
    .bind(LEAD_SOURCE)
    .bind(client_notes(request, outcome, None))
    .fetch_one(&mut **tx)
    .await
    .context(CLIENT_SAVE_ERROR)?;

    tracing::info!("New lead client {} created for {}", id, request.empresa);
    Ok(id)
}

/// Refresh sector, phone and notes on an existing client.
///
/// Runs under a savepoint: a failed update is logged and rolled back without
/// aborting the diagnostic.
async fn update_client(
    tx: &mut Transaction<'_, Postgres>,
    client_id: Uuid,
    request: &DiagnosticRequest,
    outcome: &DiagnosticOutcome,
) -> Result<(), AppError> {
    let mut savepoint = tx.begin().await.context(CLIENT_SAVE_ERROR)?;

    let updated_at = chrono::Utc::now();
    let result = sqlx::query(
        r#"
        UPDATE clients
        SET company_type = $2,
            legal_representative_phone = $3,
            notes = $4,
            updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(client_id)
    .bind(&request.setor_empresa)
    .bind(&request.telefone)
    .bind(client_notes(request, outcome, Some(updated_at)))
    .bind(updated_at)
    .execute(&mut *savepoint)
    .await;

    match result {
        Ok(_) => savepoint.commit().await.context(CLIENT_SAVE_ERROR)?,
        Err(e) => {
            tracing::error!("Failed to update client {}: {:?}", client_id, e);
            savepoint.rollback().await.context(CLIENT_SAVE_ERROR)?;
        }
    }

    Ok(())
}

/// Free-text notes stored on the client record.
pub fn client_notes(
    request: &DiagnosticRequest,
    outcome: &DiagnosticOutcome,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
) -> String {
    let mut notes = format!(
        "Cargo: {}\nScore LGPD: {}\nStatus: {}",
        request.cargo, outcome.score, outcome.status
    );
    if let Some(at) = updated_at {
        notes.push_str(&format!(
            "\nAtualizado via questionário em {}",
            at.format("%d/%m/%Y %H:%M:%S")
        ));
    }
    notes
}

/// The answers column holds `respostas` exactly as the form sent them.
pub fn answers_record(request: &DiagnosticRequest) -> Json<&serde_json::Value> {
    Json(&request.respostas)
}

/// Advisory-lock key for a submitter: the first 8 bytes of the SHA-256 of the
/// trimmed, lower-cased e-mail.
pub fn identity_lock_key(email: &str) -> i64 {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    tracing::trace!("Identity digest prefix {}", hex::encode(prefix));
    i64::from_be_bytes(prefix)
}
