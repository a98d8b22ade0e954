use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

// ============ Questionnaire Answers ============

/// A single questionnaire answer.
///
/// The form sends `"Sim"`, `"Não"` or `"Não sei"`. Anything else (missing key,
/// `null`, a boolean, an unexpected string) is `Unanswered`. Both `NaoSei` and
/// `Unanswered` are neutral for scoring and never trigger a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Answer {
    Sim,
    Nao,
    NaoSei,
    #[default]
    Unanswered,
}

impl Answer {
    /// Parses the literal label sent by the questionnaire form.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Sim" => Answer::Sim,
            "Não" => Answer::Nao,
            "Não sei" => Answer::NaoSei,
            _ => Answer::Unanswered,
        }
    }

    /// Returns the wire label, or `None` when unanswered.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Answer::Sim => Some("Sim"),
            Answer::Nao => Some("Não"),
            Answer::NaoSei => Some("Não sei"),
            Answer::Unanswered => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Text(String),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<RawAnswer>::deserialize(deserializer)? {
            Some(RawAnswer::Text(label)) => Answer::from_label(&label),
            Some(RawAnswer::Other(_)) | None => Answer::Unanswered,
        })
    }
}

impl Serialize for Answer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.label() {
            Some(label) => serializer.serialize_str(label),
            None => serializer.serialize_none(),
        }
    }
}

/// The fixed questionnaire, in scoring and recommendation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Question {
    PrivacyPolicy,
    ConsentTerm,
    Dpo,
    SensitiveData,
    LeakIncident,
    ImpactAssessment,
    StaffTraining,
}

impl Question {
    pub const ALL: [Question; 7] = [
        Question::PrivacyPolicy,
        Question::ConsentTerm,
        Question::Dpo,
        Question::SensitiveData,
        Question::LeakIncident,
        Question::ImpactAssessment,
        Question::StaffTraining,
    ];

    /// JSON key used by the questionnaire form.
    pub fn key(&self) -> &'static str {
        match self {
            Question::PrivacyPolicy => "temPoliticaPrivacidade",
            Question::ConsentTerm => "temTermoConsentimento",
            Question::Dpo => "temDPO",
            Question::SensitiveData => "coleta_compartilha_dados_sensiveis",
            Question::LeakIncident => "teve_incidente_vazamento",
            Question::ImpactAssessment => "faz_avaliacao_impacto",
            Question::StaffTraining => "treinamento_equipe",
        }
    }
}

/// Typed questionnaire answers.
///
/// Keys the form sends beyond the seven known questions (such as a consent
/// checkbox) are kept in `extra` so they can be stored, but are never scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    #[serde(rename = "temPoliticaPrivacidade", default)]
    pub privacy_policy: Answer,
    #[serde(rename = "temTermoConsentimento", default)]
    pub consent_term: Answer,
    #[serde(rename = "temDPO", default)]
    pub dpo: Answer,
    #[serde(rename = "coleta_compartilha_dados_sensiveis", default)]
    pub sensitive_data: Answer,
    #[serde(rename = "teve_incidente_vazamento", default)]
    pub leak_incident: Answer,
    #[serde(rename = "faz_avaliacao_impacto", default)]
    pub impact_assessment: Answer,
    #[serde(rename = "treinamento_equipe", default)]
    pub staff_training: Answer,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Answers {
    pub fn get(&self, question: Question) -> Answer {
        match question {
            Question::PrivacyPolicy => self.privacy_policy,
            Question::ConsentTerm => self.consent_term,
            Question::Dpo => self.dpo,
            Question::SensitiveData => self.sensitive_data,
            Question::LeakIncident => self.leak_incident,
            Question::ImpactAssessment => self.impact_assessment,
            Question::StaffTraining => self.staff_training,
        }
    }

    /// Builds an answer set with every known question set to `answer`.
    pub fn uniform(answer: Answer) -> Self {
        Self {
            privacy_policy: answer,
            consent_term: answer,
            dpo: answer,
            sensitive_data: answer,
            leak_incident: answer,
            impact_assessment: answer,
            staff_training: answer,
            extra: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, question: Question, answer: Answer) {
        let slot = match question {
            Question::PrivacyPolicy => &mut self.privacy_policy,
            Question::ConsentTerm => &mut self.consent_term,
            Question::Dpo => &mut self.dpo,
            Question::SensitiveData => &mut self.sensitive_data,
            Question::LeakIncident => &mut self.leak_incident,
            Question::ImpactAssessment => &mut self.impact_assessment,
            Question::StaffTraining => &mut self.staff_training,
        };
        *slot = answer;
    }
}

// ============ Company Classification ============

/// Business sector selected on the form.
///
/// Matching is case-insensitive on the Portuguese label. Labels outside the
/// form's list are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sector {
    Saude,
    Educacao,
    Varejo,
    Tecnologia,
    Financeiro,
    Industria,
    Servicos,
    Agronegocio,
    Outro,
    Other(String),
}

impl Sector {
    pub fn parse(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "saúde" => Sector::Saude,
            "educação" => Sector::Educacao,
            "varejo" => Sector::Varejo,
            "tecnologia" => Sector::Tecnologia,
            "financeiro" => Sector::Financeiro,
            "indústria" => Sector::Industria,
            "serviços" => Sector::Servicos,
            "agronegócio" => Sector::Agronegocio,
            "outro" => Sector::Outro,
            _ => Sector::Other(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Sector::Saude => "Saúde",
            Sector::Educacao => "Educação",
            Sector::Varejo => "Varejo",
            Sector::Tecnologia => "Tecnologia",
            Sector::Financeiro => "Financeiro",
            Sector::Industria => "Indústria",
            Sector::Servicos => "Serviços",
            Sector::Agronegocio => "Agronegócio",
            Sector::Outro => "Outro",
            Sector::Other(label) => label,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Employee-count bracket selected on the form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Headcount {
    UpTo10,
    From11To50,
    From51To100,
    From101To500,
    Over500,
    Other(String),
}

impl Headcount {
    pub fn parse(label: &str) -> Self {
        match label {
            "Até 10 funcionários" => Headcount::UpTo10,
            "11-50 funcionários" => Headcount::From11To50,
            "51-100 funcionários" => Headcount::From51To100,
            "101-500 funcionários" => Headcount::From101To500,
            "Mais de 500 funcionários" => Headcount::Over500,
            other => Headcount::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Headcount::UpTo10 => "Até 10 funcionários",
            Headcount::From11To50 => "11-50 funcionários",
            Headcount::From51To100 => "51-100 funcionários",
            Headcount::From101To500 => "101-500 funcionários",
            Headcount::Over500 => "Mais de 500 funcionários",
            Headcount::Other(label) => label,
        }
    }
}

impl fmt::Display for Headcount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============ Diagnostic Results ============

/// Ordinal compliance label derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComplianceStatus {
    Critico,
    Preocupante,
    Medio,
    Satisfatorio,
    Excelente,
}

impl ComplianceStatus {
    /// Half-open buckets; a boundary score belongs to the upper bucket.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s < 30 => ComplianceStatus::Critico,
            s if s < 50 => ComplianceStatus::Preocupante,
            s if s < 70 => ComplianceStatus::Medio,
            s if s < 85 => ComplianceStatus::Satisfatorio,
            _ => ComplianceStatus::Excelente,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComplianceStatus::Critico => "Crítico",
            ComplianceStatus::Preocupante => "Preocupante",
            ComplianceStatus::Medio => "Médio",
            ComplianceStatus::Satisfatorio => "Satisfatório",
            ComplianceStatus::Excelente => "Excelente",
        }
    }

    /// Colour used when the status is shown to the commercial team.
    pub fn color(&self) -> &'static str {
        match self {
            ComplianceStatus::Critico => "#ef4444",
            ComplianceStatus::Preocupante => "#f97316",
            ComplianceStatus::Medio => "#eab308",
            ComplianceStatus::Satisfatorio => "#3b82f6",
            ComplianceStatus::Excelente => "#22c55e",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ComplianceStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// Recommendation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Alta,
    #[serde(rename = "Média")]
    Media,
    Baixa,
}

/// A structured recommendation returned with the diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Short title.
    pub titulo: String,
    /// What the company should put in place.
    pub descricao: String,
    /// Alta, Média or Baixa.
    #[schema(value_type = String)]
    pub prioridade: Priority,
    /// LGPD article backing the recommendation.
    pub base_juridica: String,
    /// Ordered action steps.
    pub acoes: Vec<String>,
}

// ============ API Request/Response Models ============

/// Questionnaire submission from the marketing site.
///
/// Every field defaults to empty so that a missing field is reported by the
/// validator with the form's message instead of a deserialization error.
/// `respostas` is kept exactly as submitted; it is what gets stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub nome: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub telefone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub empresa: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cargo: String,
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub cnpj: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub setor_empresa: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantidade_funcionarios: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub respostas: serde_json::Value,
}

impl DiagnosticRequest {
    pub fn sector(&self) -> Sector {
        Sector::parse(&self.setor_empresa)
    }

    pub fn headcount(&self) -> Headcount {
        Headcount::parse(&self.quantidade_funcionarios)
    }

    /// Tax identifier, treating an empty string as absent.
    pub fn cnpj(&self) -> Option<&str> {
        self.cnpj.as_deref().filter(|c| !c.is_empty())
    }

    /// Typed view of `respostas`; anything other than an object is all unanswered.
    pub fn answers(&self) -> Answers {
        Answers::deserialize(&self.respostas).unwrap_or_default()
    }
}

/// Text form of a scalar form value: `null` is empty, numbers and booleans
/// keep their JSON text, arrays and objects are empty.
fn scalar_text(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(scalar_text(value).unwrap_or_default())
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(scalar_text(value))
}

/// Response for a processed diagnostic.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResponse {
    /// Compliance score between 0 and 100.
    pub score: i32,
    /// Crítico, Preocupante, Médio, Satisfatório or Excelente.
    #[schema(value_type = String)]
    pub status: ComplianceStatus,
    pub recomendacoes: Vec<Recommendation>,
    pub diagnostico_id: Uuid,
    pub client_id: Uuid,
    pub is_new_client: bool,
}

/// Optional body for the commercial notification endpoint.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    /// Link to the generated PDF report, when there is one.
    pub pdf_url: Option<String>,
}

/// Result of registering a commercial notification.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
    /// `None` when the notification row could not be stored.
    pub notification_id: Option<Uuid>,
    pub status_color: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

// ============ Database Models ============

/// A stored diagnostic row from `diagnosticos_lgpd`.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredDiagnostic {
    pub id: Uuid,
    pub client_id: Uuid,
    pub nome_completo: String,
    pub email: String,
    pub telefone: String,
    pub empresa: String,
    pub cargo: String,
    pub cnpj: Option<String>,
    pub setor_empresa: String,
    pub quantidade_funcionarios: String,
    #[schema(value_type = Object)]
    pub respostas: Json<serde_json::Value>,
    pub score: i32,
    pub status: String,
    #[schema(value_type = Vec<Recommendation>)]
    pub recomendacoes: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answers_parse_form_labels() {
        let answers: Answers = serde_json::from_value(json!({
            "temPoliticaPrivacidade": "Sim",
            "temTermoConsentimento": "Não",
            "temDPO": "Não sei",
        }))
        .unwrap();

        assert_eq!(answers.privacy_policy, Answer::Sim);
        assert_eq!(answers.consent_term, Answer::Nao);
        assert_eq!(answers.dpo, Answer::NaoSei);
        assert_eq!(answers.staff_training, Answer::Unanswered);
        assert!(answers.extra.is_empty());
    }

    #[test]
    fn unexpected_answer_values_are_unanswered() {
        let answers: Answers = serde_json::from_value(json!({
            "temPoliticaPrivacidade": true,
            "temDPO": null,
            "treinamento_equipe": "sim",
            "faz_avaliacao_impacto": 3,
            "consentimento": true,
        }))
        .unwrap();

        assert_eq!(answers.privacy_policy, Answer::Unanswered);
        assert_eq!(answers.dpo, Answer::Unanswered);
        assert_eq!(answers.staff_training, Answer::Unanswered);
        assert_eq!(answers.impact_assessment, Answer::Unanswered);
        assert_eq!(answers.extra.get("consentimento"), Some(&json!(true)));
    }

    #[test]
    fn answers_serialize_back_to_form_keys() {
        let mut answers = Answers::default();
        answers.set(Question::Dpo, Answer::Nao);

        let value = serde_json::to_value(&answers).unwrap();
        assert_eq!(value["temDPO"], json!("Não"));
        assert_eq!(value["temPoliticaPrivacidade"], json!(null));
    }

    #[test]
    fn question_keys_match_answer_fields() {
        for question in Question::ALL {
            let answers: Answers =
                serde_json::from_value(json!({ question.key(): "Sim" })).unwrap();
            assert_eq!(answers.get(question), Answer::Sim, "{}", question.key());
        }
    }

    #[test]
    fn sector_parse_is_case_insensitive() {
        assert_eq!(Sector::parse("Saúde"), Sector::Saude);
        assert_eq!(Sector::parse("SAÚDE"), Sector::Saude);
        assert_eq!(Sector::parse("tecnologia"), Sector::Tecnologia);
        assert_eq!(Sector::parse("Outro"), Sector::Outro);
        assert_eq!(
            Sector::parse("unknown-sector-xyz"),
            Sector::Other("unknown-sector-xyz".to_string())
        );
        assert_eq!(Sector::parse("Agronegócio").label(), "Agronegócio");
    }

    #[test]
    fn headcount_keeps_unknown_labels() {
        assert_eq!(Headcount::parse("11-50 funcionários"), Headcount::From11To50);
        assert_eq!(Headcount::parse("").label(), "");
        assert_eq!(
            Headcount::parse("uns 30").to_string(),
            "uns 30".to_string()
        );
    }

    #[test]
    fn status_colors_follow_buckets() {
        assert_eq!(ComplianceStatus::from_score(10).color(), "#ef4444");
        assert_eq!(ComplianceStatus::from_score(40).color(), "#f97316");
        assert_eq!(ComplianceStatus::from_score(60).color(), "#eab308");
        assert_eq!(ComplianceStatus::from_score(80).color(), "#3b82f6");
        assert_eq!(ComplianceStatus::from_score(90).color(), "#22c55e");
    }

    #[test]
    fn priority_serializes_with_accent() {
        assert_eq!(serde_json::to_value(Priority::Media).unwrap(), json!("Média"));
        assert_eq!(serde_json::to_value(Priority::Alta).unwrap(), json!("Alta"));
    }

    #[test]
    fn empty_cnpj_is_absent() {
        let request = DiagnosticRequest {
            cnpj: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(request.cnpj(), None);
    }

    #[test]
    fn scalar_contact_fields_are_read_as_text() {
        let request: DiagnosticRequest = serde_json::from_value(json!({
            "nome": null,
            "telefone": 11987654321u64,
            "cargo": true,
            "cnpj": null,
            "empresa": ["not", "text"]
        }))
        .unwrap();

        assert_eq!(request.nome, "");
        assert_eq!(request.telefone, "11987654321");
        assert_eq!(request.cargo, "true");
        assert_eq!(request.empresa, "");
        assert_eq!(request.cnpj(), None);
    }

    #[test]
    fn respostas_are_kept_as_submitted() {
        let submitted = json!({
            "temDPO": true,
            "treinamento_equipe": "sim",
            "temPoliticaPrivacidade": "Não",
            "consentimento": true
        });
        let request: DiagnosticRequest =
            serde_json::from_value(json!({ "respostas": submitted.clone() })).unwrap();

        assert_eq!(request.respostas, submitted);
        let answers = request.answers();
        assert_eq!(answers.dpo, Answer::Unanswered);
        assert_eq!(answers.staff_training, Answer::Unanswered);
        assert_eq!(answers.privacy_policy, Answer::Nao);
    }

    #[test]
    fn non_object_respostas_are_unanswered() {
        let request: DiagnosticRequest =
            serde_json::from_value(json!({ "respostas": "Sim" })).unwrap();
        assert_eq!(request.answers(), Answers::default());
        assert_eq!(DiagnosticRequest::default().answers(), Answers::default());
    }
}
