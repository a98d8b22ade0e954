use crate::models::{ComplianceStatus, StoredDiagnostic};

/// Notification shown to consultants when a prospect completes a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommercialNotification {
    pub titulo: String,
    pub conteudo: String,
    pub status_color: &'static str,
}

impl CommercialNotification {
    pub const KIND: &'static str = "novo_diagnostico";
    pub const RECIPIENTS: &'static str = "consultores";

    /// Builds the notification text; the colour comes from the stored score.
    pub fn for_diagnostic(diagnostic: &StoredDiagnostic) -> Self {
        Self {
            titulo: format!("Novo Diagnóstico LGPD: {}", diagnostic.empresa),
            conteudo: format!(
                "O cliente {} completou o diagnóstico LGPD com score {} ({}).",
                diagnostic.empresa, diagnostic.score, diagnostic.status
            ),
            status_color: ComplianceStatus::from_score(diagnostic.score).color(),
        }
    }
}
