//! # Property-Based Tests
//!
//! Verification tests using proptest.
//!
//! These tests ensure determinism and the scoring invariants: the dimension
//! score always equals the length of the leading run of in-calculation
//! levels, recomputation is idempotent, and evidence gating is unconditional.

use innova_core::{
    compute_dimension_score, validate_level, Answer, AnswerState, DimensionId, DimensionSchema,
    Evidence, EvidencePolicy, LevelRank, LevelResponse, LevelSchema, LevelStatus, QuestionAnswer,
    normalize_answer,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn dimension_with(count: usize) -> DimensionSchema {
    DimensionSchema {
        id: DimensionId::new("CRL"),
        name: "Customer readiness".into(),
        levels: (1..=count as u8)
            .map(|rank| LevelSchema {
                rank: LevelRank(rank),
                description: format!("level {rank}"),
                questions: vec![],
            })
            .collect(),
    }
}

fn response(in_calculation: bool) -> LevelResponse {
    let mut r = LevelResponse::single();
    r.in_calculation = in_calculation;
    r.status = if in_calculation {
        LevelStatus::Complete
    } else {
        LevelStatus::Incomplete
    };
    r
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The score equals the length of the leading run of in-calculation
    /// levels, never more, never less.
    #[test]
    fn score_is_leading_run_length(flags in vec(any::<bool>(), 0..12)) {
        let dim = dimension_with(flags.len());
        let mut responses = BTreeMap::new();
        for (i, flag) in flags.iter().enumerate() {
            responses.insert(LevelRank((i + 1) as u8), response(*flag));
        }

        let expected = flags.iter().take_while(|f| **f).count() as u8;
        prop_assert_eq!(compute_dimension_score(&dim, &responses), expected);
    }

    /// Recomputation with unchanged inputs returns the same value.
    #[test]
    fn score_recomputation_idempotent(flags in vec(any::<bool>(), 0..12)) {
        let dim = dimension_with(flags.len());
        let mut responses = BTreeMap::new();
        for (i, flag) in flags.iter().enumerate() {
            responses.insert(LevelRank((i + 1) as u8), response(*flag));
        }

        let first = compute_dimension_score(&dim, &responses);
        let second = compute_dimension_score(&dim, &responses);
        prop_assert_eq!(first, second);
    }

    /// Non-skip: if level n is in calculation but level n-1 is not, the
    /// score is strictly less than n.
    #[test]
    fn non_skip_property(flags in vec(any::<bool>(), 2..12), gap in 1usize..11) {
        prop_assume!(gap < flags.len());
        let mut flags = flags;
        flags[gap] = true;
        flags[gap - 1] = false;

        let dim = dimension_with(flags.len());
        let mut responses = BTreeMap::new();
        for (i, flag) in flags.iter().enumerate() {
            responses.insert(LevelRank((i + 1) as u8), response(*flag));
        }

        let score = compute_dimension_score(&dim, &responses);
        prop_assert!(usize::from(score) < gap + 1);
    }

    /// Evidence gating: a true answer with whitespace-only evidence is never
    /// in calculation, whatever the policy.
    #[test]
    fn blank_evidence_never_scores(
        spaces in vec(prop::sample::select(vec![' ', '\t', '\n']), 0..10),
        strict in any::<bool>(),
        min_chars in 0usize..100
    ) {
        let blank: String = spaces.into_iter().collect();
        let schema = LevelSchema {
            rank: LevelRank(1),
            description: String::new(),
            questions: vec![],
        };
        let mut resp = LevelResponse::single();
        resp.answers = AnswerState::Single(QuestionAnswer {
            answer: Some(Answer::True),
            evidence: Evidence::new(blank),
        });
        let policy = EvidencePolicy { strict, min_chars };

        let verdict = validate_level(&schema, &resp, &policy);
        prop_assert!(!verdict.in_calculation);
        prop_assert_eq!(verdict.status, LevelStatus::NeedsEvidence);
    }

    /// Validation is a total function over arbitrary single-answer states.
    #[test]
    fn validation_never_panics(
        answered in any::<Option<bool>>(),
        evidence in ".{0,64}",
        strict in any::<bool>()
    ) {
        let schema = LevelSchema {
            rank: LevelRank(1),
            description: String::new(),
            questions: vec![],
        };
        let mut resp = LevelResponse::single();
        resp.answers = AnswerState::Single(QuestionAnswer {
            answer: answered.map(|v| if v { Answer::True } else { Answer::False }),
            evidence: Evidence::new(evidence),
        });
        let policy = EvidencePolicy { strict, min_chars: 10 };

        let verdict = validate_level(&schema, &resp, &policy);
        // in_calculation implies a Complete status.
        if verdict.in_calculation {
            prop_assert_eq!(verdict.status, LevelStatus::Complete);
        }
    }

    /// Known spellings normalize regardless of casing and whitespace.
    #[test]
    fn normalization_survives_decoration(
        base in prop::sample::select(vec!["TRUE", "T", "1", "V", "VERDADERO"]),
        prefix in vec(prop::sample::select(vec![' ', '\t']), 0..4),
        suffix in vec(prop::sample::select(vec![' ', '\n', '\r']), 0..4),
        lowercase in any::<bool>()
    ) {
        let mut decorated: String = prefix.into_iter().collect();
        if lowercase {
            decorated.push_str(&base.to_lowercase());
        } else {
            decorated.push_str(base);
        }
        decorated.extend(suffix);

        prop_assert_eq!(normalize_answer(&decorated), Some(Answer::True));
    }

    /// Unknown alphabetic tokens are never coerced to an answer.
    #[test]
    fn normalization_rejects_unknown_words(word in "[a-z]{2,12}") {
        prop_assume!(!matches!(
            word.to_uppercase().as_str(),
            "TRUE" | "FALSE" | "VERDADERO" | "FALSO"
        ));
        prop_assert_eq!(normalize_answer(&word), None);
    }
}
