/// Property-based tests using proptest
/// Tests invariants of the diagnostic engine that should hold for all answer sets
use proptest::prelude::*;
use rust_lgpd_api::diagnostic::{
    calculate_score, classify, generate_recommendations, MAX_RECOMMENDATIONS, WEIGHTS,
};
use rust_lgpd_api::models::{Answer, Answers, Question, Sector};
use rust_lgpd_api::recommendations::PRIVACY_PROGRAM;

fn answer() -> impl Strategy<Value = Answer> {
    prop_oneof![
        Just(Answer::Sim),
        Just(Answer::Nao),
        Just(Answer::NaoSei),
        Just(Answer::Unanswered),
    ]
}

fn answers() -> impl Strategy<Value = Answers> {
    prop::array::uniform7(answer()).prop_map(|values| {
        let mut answers = Answers::default();
        for (question, value) in Question::ALL.iter().zip(values) {
            answers.set(*question, value);
        }
        answers
    })
}

fn sector() -> impl Strategy<Value = Sector> {
    prop_oneof![
        prop::sample::select(vec![
            "Saúde",
            "Educação",
            "Varejo",
            "Tecnologia",
            "Financeiro",
            "Indústria",
            "Serviços",
            "Agronegócio",
            "Outro",
        ])
        .prop_map(Sector::parse),
        "\\PC{0,20}".prop_map(|s| Sector::parse(&s)),
    ]
}

// Property: score is always within bounds
proptest! {
    #[test]
    fn score_stays_within_bounds(answers in answers()) {
        let score = calculate_score(&answers);
        prop_assert!((0..=100).contains(&score));
        // 85 is the best attainable score
        prop_assert!(score <= 85);
    }

    #[test]
    fn neutral_answers_never_move_score(
        values in prop::array::uniform7(prop_oneof![Just(Answer::NaoSei), Just(Answer::Unanswered)])
    ) {
        let mut answers = Answers::default();
        for (question, value) in Question::ALL.iter().zip(values) {
            answers.set(*question, value);
        }
        prop_assert_eq!(calculate_score(&answers), 50);
    }

    #[test]
    fn scoring_is_idempotent(answers in answers(), sector in sector()) {
        let first = (
            calculate_score(&answers),
            generate_recommendations(&answers, &sector),
        );
        let second = (
            calculate_score(&answers),
            generate_recommendations(&answers, &sector),
        );
        prop_assert_eq!(
            serde_json::to_string(&first.1).unwrap(),
            serde_json::to_string(&second.1).unwrap()
        );
        prop_assert_eq!(first.0, second.0);
    }
}

// Property: classification is monotonic in the score
proptest! {
    #[test]
    fn classification_is_monotonic(a in 0i32..=100, b in 0i32..=100) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(low) <= classify(high));
    }
}

// Property: recommendation list shape
proptest! {
    #[test]
    fn recommendations_are_bounded_and_start_generic(answers in answers(), sector in sector()) {
        let recs = generate_recommendations(&answers, &sector);
        prop_assert!(!recs.is_empty());
        prop_assert!(recs.len() <= MAX_RECOMMENDATIONS);
        prop_assert_eq!(recs[0].titulo.as_str(), PRIVACY_PROGRAM.titulo);
    }

    #[test]
    fn one_entry_per_gap_plus_sector(answers in answers(), sector in sector()) {
        let gaps = WEIGHTS.iter().filter(|w| w.is_gap(&answers)).count();
        let recs = generate_recommendations(&answers, &sector);
        prop_assert_eq!(recs.len(), (gaps + 2).min(MAX_RECOMMENDATIONS));
    }
}
