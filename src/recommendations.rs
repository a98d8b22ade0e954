//! Static recommendation catalog.
//!
//! Every entry is literal text. Lookups are keyed by [`Question`] for
//! compliance gaps and by [`Sector`] for the sector entry; nothing from the
//! submission is interpolated.

use crate::models::{Priority, Question, Recommendation, Sector};

/// A catalog entry, turned into an owned [`Recommendation`] per request.
#[derive(Debug)]
pub struct RecommendationTemplate {
    pub titulo: &'static str,
    pub descricao: &'static str,
    pub prioridade: Priority,
    pub base_juridica: &'static str,
    pub acoes: &'static [&'static str],
}

impl RecommendationTemplate {
    pub fn to_recommendation(&self) -> Recommendation {
        Recommendation {
            titulo: self.titulo.to_string(),
            descricao: self.descricao.to_string(),
            prioridade: self.prioridade,
            base_juridica: self.base_juridica.to_string(),
            acoes: self.acoes.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Emitted for every submission, always first.
pub static PRIVACY_PROGRAM: RecommendationTemplate = RecommendationTemplate {
    titulo: "Implementação de Programa Completo de Privacidade",
    descricao: "Desenvolver um programa estruturado de conformidade com a LGPD que englobe todos os aspectos da empresa, desde a coleta de dados até o descarte.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 50, §2º, I da LGPD - Boas práticas e governança",
    acoes: &[
        "Contratação de consultoria especializada em LGPD",
        "Implementação de sistema de governança de proteção de dados",
        "Definição de responsabilidades claras para todos os setores",
    ],
};

static PRIVACY_POLICY_GAP: RecommendationTemplate = RecommendationTemplate {
    titulo: "Criação de Política de Privacidade LGPD",
    descricao: "Desenvolver uma Política de Privacidade completa e aderente à LGPD, disponibilizando-a em todos os pontos de coleta de dados.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 9º da LGPD - Direito do titular a informações claras sobre o tratamento",
    acoes: &[
        "Mapear todos os dados coletados e seu tratamento",
        "Elaborar documento em linguagem clara e acessível",
        "Disponibilizar em todos os canais digitais e físicos",
    ],
};

static CONSENT_GAP: RecommendationTemplate = RecommendationTemplate {
    titulo: "Implementação de Sistema de Consentimento",
    descricao: "Desenvolver mecanismos para obtenção, registro e gestão de consentimento dos titulares de dados em todos os pontos de coleta.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 7º, I e Art. 8º da LGPD - Consentimento como base legal",
    acoes: &[
        "Criar formulários de consentimento específicos por finalidade",
        "Implementar sistema para armazenar provas de consentimento",
        "Garantir mecanismo para revogação do consentimento",
    ],
};

static DPO_GAP: RecommendationTemplate = RecommendationTemplate {
    titulo: "Designação de Encarregado de Proteção de Dados (DPO)",
    descricao: "Nomear oficialmente um Encarregado de Proteção de Dados (DPO) para cumprir com a obrigação legal e intermediar comunicações com titulares e ANPD.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 41 da LGPD - Obrigatoriedade de indicação de encarregado",
    acoes: &[
        "Designar profissional interno ou contratar serviço DPO as a Service",
        "Publicar contato do DPO nos canais oficiais",
        "Definir procedimentos para atendimento de requisições de titulares",
    ],
};

static SENSITIVE_DATA_GAP: RecommendationTemplate = RecommendationTemplate {
    titulo: "Proteção Especial para Dados Sensíveis",
    descricao: "Implementar medidas técnicas e administrativas adicionais para dados sensíveis, garantindo bases legais específicas e controles rigorosos.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 11 da LGPD - Tratamento de dados sensíveis",
    acoes: &[
        "Mapear todos os dados sensíveis tratados",
        "Implementar controles de acesso mais restritos",
        "Revisar bases legais específicas para cada tipo de dado sensível",
    ],
};

static INCIDENT_GAP: RecommendationTemplate = RecommendationTemplate {
    titulo: "Plano de Resposta a Incidentes",
    descricao: "Desenvolver protocolo estruturado para resposta a incidentes de segurança, incluindo procedimentos de comunicação à ANPD e titulares afetados.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 48 da LGPD - Comunicação de incidentes de segurança",
    acoes: &[
        "Criar equipe de resposta a incidentes",
        "Desenvolver procedimentos detalhados de notificação",
        "Implementar sistema de registro e análise de incidentes",
    ],
};

static IMPACT_ASSESSMENT_GAP: RecommendationTemplate = RecommendationTemplate {
    titulo: "Relatório de Impacto à Proteção de Dados (RIPD)",
    descricao: "Implementar metodologia para realização de RIPDs para operações de tratamento com potencial risco aos titulares.",
    prioridade: Priority::Media,
    base_juridica: "Art. 5º, XVII e Art. 38 da LGPD - Relatório de impacto",
    acoes: &[
        "Adotar metodologia para avaliação de impacto",
        "Documentar análises de risco em operações relevantes",
        "Revisar processos com base nos resultados das avaliações",
    ],
};

static TRAINING_GAP: RecommendationTemplate = RecommendationTemplate {
    titulo: "Programa de Conscientização em Privacidade",
    descricao: "Implementar programa contínuo de treinamento e conscientização sobre proteção de dados para todos os colaboradores.",
    prioridade: Priority::Media,
    base_juridica: "Art. 50, §2º, I da LGPD - Boas práticas e governança",
    acoes: &[
        "Desenvolver material de treinamento personalizado",
        "Estabelecer calendário de capacitações periódicas",
        "Implementar testes e certificações internas",
    ],
};

static HEALTH_SECTOR: RecommendationTemplate = RecommendationTemplate {
    titulo: "Proteção Específica para Dados de Saúde",
    descricao: "Implementar medidas adicionais para dados de saúde, incluindo controles de acesso específicos e avaliações de impacto detalhadas.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 11, II, f da LGPD - Tutela da saúde",
    acoes: &[
        "Revisar todos os fluxos de dados de saúde",
        "Implementar criptografia para dados de prontuários",
        "Estabelecer política específica para retenção de dados clínicos",
    ],
};

static EDUCATION_SECTOR: RecommendationTemplate = RecommendationTemplate {
    titulo: "Proteção de Dados de Crianças e Adolescentes",
    descricao: "Implementar controles específicos para o tratamento de dados de menores, incluindo consentimento específico dos responsáveis.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 14 da LGPD - Tratamento de dados de crianças e adolescentes",
    acoes: &[
        "Revisar formulários de matrícula e documentação escolar",
        "Implementar processo de consentimento parental verificável",
        "Estabelecer limites claros para uso de imagem de menores",
    ],
};

static RETAIL_SECTOR: RecommendationTemplate = RecommendationTemplate {
    titulo: "Proteção em Programas de Fidelidade",
    descricao: "Revisar programas de fidelidade e marketing para garantir transparência e bases legais adequadas para personalização.",
    prioridade: Priority::Media,
    base_juridica: "Art. 7º, IX da LGPD - Legítimo interesse",
    acoes: &[
        "Revisar políticas de programas de fidelidade",
        "Implementar opt-in específico para comunicações de marketing",
        "Garantir mecanismos fáceis para opt-out",
    ],
};

static TECHNOLOGY_SECTOR: RecommendationTemplate = RecommendationTemplate {
    titulo: "Privacy by Design & by Default",
    descricao: "Implementar princípios de privacidade desde a concepção e por padrão em todos os produtos e serviços tecnológicos.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 46, §2º da LGPD - Adoção de medidas de segurança desde a concepção",
    acoes: &[
        "Incluir requisitos de privacidade em todos os projetos",
        "Realizar avaliações de impacto antes do lançamento de produtos",
        "Implementar minimização de dados em todas as soluções",
    ],
};

static FINANCIAL_SECTOR: RecommendationTemplate = RecommendationTemplate {
    titulo: "Proteção para Dados Financeiros",
    descricao: "Implementar controles específicos para proteção de dados financeiros, incluindo segmentação, criptografia e auditorias regulares.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 46 da LGPD - Medidas de segurança",
    acoes: &[
        "Segmentar ambientes com dados financeiros sensíveis",
        "Implementar múltiplos níveis de criptografia",
        "Realizar auditorias de segurança trimestrais",
    ],
};

static DATA_MAPPING: RecommendationTemplate = RecommendationTemplate {
    titulo: "Mapeamento de Dados por Processos",
    descricao: "Realizar inventário completo de dados pessoais tratados, documentando fluxos, finalidades e bases legais específicas do seu setor.",
    prioridade: Priority::Alta,
    base_juridica: "Art. 37 da LGPD - Registro das operações",
    acoes: &[
        "Mapear todos os processos que tratam dados pessoais",
        "Documentar finalidades e bases legais por processo",
        "Estabelecer matriz de responsabilidades por tipo de dado",
    ],
};

/// Recommendation for a question whose answer revealed a compliance gap.
pub fn gap_template(question: Question) -> &'static RecommendationTemplate {
    match question {
        Question::PrivacyPolicy => &PRIVACY_POLICY_GAP,
        Question::ConsentTerm => &CONSENT_GAP,
        Question::Dpo => &DPO_GAP,
        Question::SensitiveData => &SENSITIVE_DATA_GAP,
        Question::LeakIncident => &INCIDENT_GAP,
        Question::ImpactAssessment => &IMPACT_ASSESSMENT_GAP,
        Question::StaffTraining => &TRAINING_GAP,
    }
}

/// Sector entry; sectors without a dedicated entry get the data-mapping one.
pub fn sector_template(sector: &Sector) -> &'static RecommendationTemplate {
    match sector {
        Sector::Saude => &HEALTH_SECTOR,
        Sector::Educacao => &EDUCATION_SECTOR,
        Sector::Varejo => &RETAIL_SECTOR,
        Sector::Tecnologia => &TECHNOLOGY_SECTOR,
        Sector::Financeiro => &FINANCIAL_SECTOR,
        _ => &DATA_MAPPING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_gap_has_distinct_entry() {
        let mut titles: Vec<&str> = Question::ALL
            .iter()
            .map(|q| gap_template(*q).titulo)
            .collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), Question::ALL.len());
    }

    #[test]
    fn every_entry_cites_lgpd() {
        let sectors = [
            Sector::Saude,
            Sector::Educacao,
            Sector::Varejo,
            Sector::Tecnologia,
            Sector::Financeiro,
            Sector::Outro,
        ];
        let templates = Question::ALL
            .iter()
            .map(|q| gap_template(*q))
            .chain(sectors.iter().map(sector_template))
            .chain(std::iter::once(&PRIVACY_PROGRAM));

        for template in templates {
            assert!(template.base_juridica.contains("LGPD"), "{}", template.titulo);
            assert_eq!(template.acoes.len(), 3, "{}", template.titulo);
        }
    }

    #[test]
    fn sectors_without_entry_fall_back_to_mapping() {
        for sector in [
            Sector::Industria,
            Sector::Servicos,
            Sector::Agronegocio,
            Sector::Outro,
            Sector::Other("unknown-sector-xyz".to_string()),
        ] {
            assert_eq!(
                sector_template(&sector).titulo,
                "Mapeamento de Dados por Processos"
            );
        }
        assert_eq!(
            sector_template(&Sector::Tecnologia).titulo,
            "Privacy by Design & by Default"
        );
    }
}
