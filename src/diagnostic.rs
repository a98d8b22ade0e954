//! LGPD diagnostic engine
//!
//! Pure pipeline run once per questionnaire submission:
//! 1. Validate required identity fields
//! 2. Score the answers
//! 3. Classify the score
//! 4. Generate recommendations
//!
//! Nothing here touches the database; persistence happens in `db_storage`.

use crate::errors::AppError;
use crate::models::{
    Answer, Answers, ComplianceStatus, DiagnosticRequest, Question, Recommendation, Sector,
};
use crate::recommendations::{gap_template, sector_template, PRIVACY_PROGRAM};

pub const BASE_SCORE: i32 = 50;
pub const MAX_RECOMMENDATIONS: usize = 8;

pub const INCOMPLETE_DATA_MESSAGE: &str =
    "Dados incompletos. Por favor, preencha todos os campos obrigatórios.";

/// Weight applied to one question.
///
/// `penalty` applies when the answer equals `gap_answer`; `bonus` applies on
/// `Sim` (zero for questions where `Sim` is the gap). Any other answer,
/// including `Não sei` and unanswered, is neutral.
#[derive(Debug, Clone, Copy)]
pub struct QuestionWeight {
    pub question: Question,
    pub gap_answer: Answer,
    pub penalty: i32,
    pub bonus: i32,
}

pub const WEIGHTS: [QuestionWeight; 7] = [
    QuestionWeight {
        question: Question::PrivacyPolicy,
        gap_answer: Answer::Nao,
        penalty: 15,
        bonus: 10,
    },
    QuestionWeight {
        question: Question::ConsentTerm,
        gap_answer: Answer::Nao,
        penalty: 10,
        bonus: 5,
    },
    QuestionWeight {
        question: Question::Dpo,
        gap_answer: Answer::Nao,
        penalty: 10,
        bonus: 10,
    },
    QuestionWeight {
        question: Question::SensitiveData,
        gap_answer: Answer::Sim,
        penalty: 10,
        bonus: 0,
    },
    QuestionWeight {
        question: Question::LeakIncident,
        gap_answer: Answer::Sim,
        penalty: 15,
        bonus: 0,
    },
    QuestionWeight {
        question: Question::ImpactAssessment,
        gap_answer: Answer::Nao,
        penalty: 5,
        bonus: 5,
    },
    QuestionWeight {
        question: Question::StaffTraining,
        gap_answer: Answer::Nao,
        penalty: 5,
        bonus: 5,
    },
];

impl QuestionWeight {
    fn contribution(&self, answer: Answer) -> i32 {
        if answer == self.gap_answer {
            -self.penalty
        } else if answer == Answer::Sim {
            self.bonus
        } else {
            0
        }
    }

    pub fn is_gap(&self, answers: &Answers) -> bool {
        answers.get(self.question) == self.gap_answer
    }
}

/// Output of a successful diagnostic run.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticOutcome {
    pub score: i32,
    pub status: ComplianceStatus,
    pub recomendacoes: Vec<Recommendation>,
}

/// Rejects submissions missing name, e-mail, company or sector.
///
/// Only presence is checked; e-mail, phone and CNPJ formats are accepted as sent.
pub fn validate(request: &DiagnosticRequest) -> Result<(), AppError> {
    let missing: Vec<&str> = [
        ("nome", &request.nome),
        ("email", &request.email),
        ("empresa", &request.empresa),
        ("setorEmpresa", &request.setor_empresa),
    ]
    .iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| *field)
    .collect();

    if !missing.is_empty() {
        tracing::warn!("Rejected diagnostic submission, missing fields: {:?}", missing);
        return Err(AppError::Validation(INCOMPLETE_DATA_MESSAGE.to_string()));
    }

    Ok(())
}

/// Computes the 0-100 compliance score.
pub fn calculate_score(answers: &Answers) -> i32 {
    let raw = WEIGHTS
        .iter()
        .fold(BASE_SCORE, |score, w| score + w.contribution(answers.get(w.question)));

    raw.clamp(0, 100)
}

pub fn classify(score: i32) -> ComplianceStatus {
    ComplianceStatus::from_score(score)
}

/// Builds the ordered recommendation list.
///
/// Order: the privacy-program entry, one entry per gap in question order,
/// then one sector entry. The list is cut to [`MAX_RECOMMENDATIONS`], so with
/// every gap present the sector entry is the one dropped.
pub fn generate_recommendations(answers: &Answers, sector: &Sector) -> Vec<Recommendation> {
    let gaps = WEIGHTS
        .iter()
        .filter(|w| w.is_gap(answers))
        .map(|w| gap_template(w.question));

    std::iter::once(&PRIVACY_PROGRAM)
        .chain(gaps)
        .chain(std::iter::once(sector_template(sector)))
        .take(MAX_RECOMMENDATIONS)
        .map(|t| t.to_recommendation())
        .collect()
}

/// Runs validation, scoring, classification and recommendation in order.
///
/// The scorer is never reached for an invalid submission.
pub fn run_diagnostic(request: &DiagnosticRequest) -> Result<DiagnosticOutcome, AppError> {
    validate(request)?;

    let answers = request.answers();
    let score = calculate_score(&answers);
    let status = classify(score);
    let recomendacoes = generate_recommendations(&answers, &request.sector());

    tracing::debug!(
        "Diagnostic computed: score={}, status={}, recommendations={}",
        score,
        status,
        recomendacoes.len()
    );

    Ok(DiagnosticOutcome {
        score,
        status,
        recomendacoes,
    })
}
