//! # Scoring Scenario Tests (T0-T3)
//!
//! End-to-end scenarios for the consecutive-level scoring rules.
//! If ANY tier fails, the engine is INVALID.
//!
//! ## Tiers
//! - T0: Evidence Gating
//! - T1: Consecutive-Level Scoring
//! - T2: Import Normalization
//! - T3: Session Lifecycle

use innova_core::{
    Answer, AssessmentSchema, ChecklistCatalog, DimensionId, DimensionSchema, Evidence,
    EvidencePolicy, EvaluationSession, LevelRank, LevelSchema, LevelStatus, ProjectId,
    QuestionIndex, ResponseRow,
};

/// A three-level, single-question-per-level dimension, as in the CRL
/// walkthrough scenario.
fn three_level_schema() -> AssessmentSchema {
    AssessmentSchema {
        dimensions: vec![DimensionSchema {
            id: DimensionId::new("CRL"),
            name: "Customer readiness".into(),
            levels: (1..=3u8)
                .map(|rank| LevelSchema {
                    rank: LevelRank(rank),
                    description: format!("level {rank}"),
                    questions: vec![],
                })
                .collect(),
        }],
    }
}

fn session_with(schema: AssessmentSchema) -> EvaluationSession {
    EvaluationSession::new(
        ProjectId(1),
        schema,
        ChecklistCatalog::builtin(),
        EvidencePolicy::default(),
    )
}

fn crl() -> DimensionId {
    DimensionId::new("CRL")
}

// =============================================================================
// TIER T0: EVIDENCE GATING
// =============================================================================

mod t0_evidence_gating {
    use super::*;

    /// T0.1: A true answer with evidence counts.
    #[test]
    fn true_with_evidence_counts() {
        let mut session = session_with(three_level_schema());
        let outcome = session
            .respond_level(
                &crl(),
                LevelRank(1),
                Some(Answer::True),
                Evidence::new("Interviewed 5 users"),
            )
            .expect("respond");
        assert!(outcome.in_calculation);
        assert_eq!(outcome.status, LevelStatus::Complete);
    }

    /// T0.2: A true answer with empty evidence never counts.
    #[test]
    fn true_with_empty_evidence_blocked() {
        let mut session = session_with(three_level_schema());
        let outcome = session
            .respond_level(&crl(), LevelRank(1), Some(Answer::True), Evidence::none())
            .expect("respond");
        assert!(!outcome.in_calculation);
        assert_eq!(outcome.status, LevelStatus::NeedsEvidence);
        assert_eq!(outcome.dimension_score, 0);
    }

    /// T0.3: Whitespace-only evidence is empty evidence.
    #[test]
    fn whitespace_evidence_blocked() {
        let mut session = session_with(three_level_schema());
        let outcome = session
            .respond_level(
                &crl(),
                LevelRank(1),
                Some(Answer::True),
                Evidence::new("  \t\n  "),
            )
            .expect("respond");
        assert!(!outcome.in_calculation);
        assert_eq!(outcome.status, LevelStatus::NeedsEvidence);
    }

    /// T0.4: A false answer needs no evidence and reports Incomplete.
    #[test]
    fn false_needs_no_evidence() {
        let mut session = session_with(three_level_schema());
        let outcome = session
            .respond_level(&crl(), LevelRank(1), Some(Answer::False), Evidence::none())
            .expect("respond");
        assert!(!outcome.in_calculation);
        assert_eq!(outcome.status, LevelStatus::Incomplete);
    }

    /// T0.5: Strict mode rejects evidence below the minimum length.
    #[test]
    fn strict_mode_minimum_length() {
        let mut session = EvaluationSession::new(
            ProjectId(1),
            three_level_schema(),
            ChecklistCatalog::builtin(),
            EvidencePolicy::strict(40),
        );
        let outcome = session
            .respond_level(
                &crl(),
                LevelRank(1),
                Some(Answer::True),
                Evidence::new("short note"),
            )
            .expect("respond");
        assert_eq!(outcome.status, LevelStatus::NeedsEvidence);

        let outcome = session
            .respond_level(
                &crl(),
                LevelRank(1),
                Some(Answer::True),
                Evidence::new(
                    "Interviewed five prospective customers and archived the recordings",
                ),
            )
            .expect("respond");
        assert!(outcome.in_calculation);
    }
}

// =============================================================================
// TIER T1: CONSECUTIVE-LEVEL SCORING
// =============================================================================

mod t1_consecutive_scoring {
    use super::*;

    /// T1.1: Walkthrough scenario — level 1 true with evidence, level 2 true
    /// without evidence, level 3 true with evidence. The score stops at 1;
    /// level 3 is not reached even though individually valid.
    #[test]
    fn gap_stops_at_needs_evidence() {
        let mut session = session_with(three_level_schema());
        session
            .respond_level(
                &crl(),
                LevelRank(1),
                Some(Answer::True),
                Evidence::new("Interviewed 5 users"),
            )
            .expect("respond");
        session
            .respond_level(&crl(), LevelRank(2), Some(Answer::True), Evidence::none())
            .expect("respond");
        let outcome = session
            .respond_level(
                &crl(),
                LevelRank(3),
                Some(Answer::True),
                Evidence::new("Pilot contract signed"),
            )
            .expect("respond");

        assert_eq!(outcome.dimension_score, 1);
        let level2 = session.response(&crl(), LevelRank(2)).expect("response");
        assert_eq!(level2.status, LevelStatus::NeedsEvidence);
        let level3 = session.response(&crl(), LevelRank(3)).expect("response");
        assert!(level3.in_calculation);
    }

    /// T1.2: All nine levels true with adequate evidence score 9.
    #[test]
    fn full_ladder_scores_nine() {
        let schema = AssessmentSchema::builtin();
        let mut session = EvaluationSession::new(
            ProjectId(1),
            schema.clone(),
            ChecklistCatalog::builtin(),
            EvidencePolicy::default(),
        );

        let trl = DimensionId::new("TRL");
        let dim = schema.dimension(&trl).expect("TRL");
        for level in &dim.levels {
            for idx in 1..=level.question_count().max(1) {
                if level.has_questions() {
                    session
                        .respond_question(
                            &trl,
                            level.rank,
                            QuestionIndex(idx as u8),
                            Some(Answer::True),
                            Evidence::new("Documented in the test campaign log"),
                        )
                        .expect("respond");
                } else {
                    session
                        .respond_level(
                            &trl,
                            level.rank,
                            Some(Answer::True),
                            Evidence::new("Documented in the test campaign log"),
                        )
                        .expect("respond");
                }
            }
        }
        assert_eq!(session.dimension_score(&trl), 9);
    }

    /// T1.3: Level 1 answered false scores 0 — the baseline is never reached.
    #[test]
    fn false_baseline_scores_zero() {
        let mut session = session_with(three_level_schema());
        session
            .respond_level(&crl(), LevelRank(1), Some(Answer::False), Evidence::none())
            .expect("respond");
        session
            .respond_level(
                &crl(),
                LevelRank(2),
                Some(Answer::True),
                Evidence::new("evidence"),
            )
            .expect("respond");
        assert_eq!(session.dimension_score(&crl()), 0);
    }

    /// T1.4: Fixing the gap retroactively extends the chain.
    #[test]
    fn closing_the_gap_rescores() {
        let mut session = session_with(three_level_schema());
        session
            .respond_level(
                &crl(),
                LevelRank(1),
                Some(Answer::True),
                Evidence::new("Interviewed 5 users"),
            )
            .expect("respond");
        session
            .respond_level(&crl(), LevelRank(2), Some(Answer::True), Evidence::none())
            .expect("respond");
        session
            .respond_level(
                &crl(),
                LevelRank(3),
                Some(Answer::True),
                Evidence::new("Pilot contract signed"),
            )
            .expect("respond");
        assert_eq!(session.dimension_score(&crl()), 1);

        // Supplying the missing evidence closes the gap; the whole chain
        // through level 3 now counts.
        let outcome = session
            .respond_level(
                &crl(),
                LevelRank(2),
                Some(Answer::True),
                Evidence::new("Segment interviews archived"),
            )
            .expect("respond");
        assert_eq!(outcome.dimension_score, 3);
    }
}

// =============================================================================
// TIER T2: IMPORT NORMALIZATION
// =============================================================================

mod t2_import {
    use super::*;

    fn row(dimension: &str, level: u8, answer: &str, evidence: &str) -> ResponseRow {
        ResponseRow {
            dimension: dimension.to_string(),
            level,
            question: None,
            prompt: None,
            answer: answer.to_string(),
            evidence: evidence.to_string(),
        }
    }

    /// T2.1: Spanish worksheet spellings normalize before validation.
    #[test]
    fn worksheet_spellings_normalize() {
        let mut session = session_with(three_level_schema());
        let rows = vec![
            row("CRL", 1, "VERDADERO", "Interviewed 5 users"),
            row("CRL", 2, "V", "Segment interviews archived"),
            row("CRL", 3, "FALSO", ""),
        ];
        let report = session.apply_rows(&rows).expect("import");
        assert!(report.is_clean());
        assert_eq!(session.dimension_score(&crl()), 2);
    }

    /// T2.2: An unsupported spelling ("Sí") is counted invalid and skipped,
    /// never silently treated as true or false.
    #[test]
    fn unsupported_spelling_skipped() {
        let mut session = session_with(three_level_schema());
        let rows = vec![row("CRL", 1, "Sí", "evidence")];
        let report = session.apply_rows(&rows).expect("import");

        assert_eq!(report.total, 1);
        assert_eq!(report.applied, 0);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].reason.contains("Sí"));
        // The level was never touched.
        assert!(session.response(&crl(), LevelRank(1)).is_none());
    }

    /// T2.3: Imported true answers without evidence do not score.
    #[test]
    fn imported_true_without_evidence_blocked() {
        let mut session = session_with(three_level_schema());
        let rows = vec![row("CRL", 1, "TRUE", "")];
        let report = session.apply_rows(&rows).expect("import");
        assert_eq!(report.applied, 1);

        assert_eq!(session.dimension_score(&crl()), 0);
        let level1 = session.response(&crl(), LevelRank(1)).expect("response");
        assert_eq!(level1.status, LevelStatus::NeedsEvidence);
    }

    /// T2.4: A bad row never aborts the batch.
    #[test]
    fn bad_rows_never_abort() {
        let mut session = session_with(three_level_schema());
        let rows = vec![
            row("CRL", 9, "TRUE", "no such level"),
            row("CRL", 1, "maybe", ""),
            row("", 1, "TRUE", ""),
            row("CRL", 1, "TRUE", "Interviewed 5 users"),
        ];
        let report = session.apply_rows(&rows).expect("import");

        assert_eq!(report.total, 4);
        assert_eq!(report.applied, 1);
        assert_eq!(report.blank, 1);
        assert_eq!(report.invalid, 2);
        assert_eq!(session.dimension_score(&crl()), 1);
    }
}

// =============================================================================
// TIER T3: SESSION LIFECYCLE
// =============================================================================

mod t3_lifecycle {
    use super::*;

    /// T3.1: The review flag overrides display status without touching the
    /// score.
    #[test]
    fn review_flag_is_display_only() {
        let mut session = session_with(three_level_schema());
        session
            .respond_level(
                &crl(),
                LevelRank(1),
                Some(Answer::True),
                Evidence::new("Interviewed 5 users"),
            )
            .expect("respond");

        session
            .set_under_review(&crl(), LevelRank(1), true)
            .expect("review");
        let response = session.response(&crl(), LevelRank(1)).expect("response");
        assert_eq!(response.display_status(), LevelStatus::UnderReview);
        assert_eq!(response.status, LevelStatus::Complete);
        assert_eq!(session.dimension_score(&crl()), 1);
    }

    /// T3.2: Clearing an answer returns the level to Pending.
    #[test]
    fn clearing_answer_restores_pending() {
        let mut session = session_with(three_level_schema());
        session
            .respond_level(
                &crl(),
                LevelRank(1),
                Some(Answer::True),
                Evidence::new("Interviewed 5 users"),
            )
            .expect("respond");
        assert_eq!(session.dimension_score(&crl()), 1);

        let outcome = session
            .respond_level(&crl(), LevelRank(1), None, Evidence::none())
            .expect("respond");
        assert_eq!(outcome.status, LevelStatus::Pending);
        assert_eq!(outcome.dimension_score, 0);
    }

    /// T3.3: The scorecard's overall score is the weakest dimension.
    #[test]
    fn scorecard_minimum_rule() {
        let schema = AssessmentSchema::builtin();
        let mut session = EvaluationSession::new(
            ProjectId(1),
            schema,
            ChecklistCatalog::builtin(),
            EvidencePolicy::default(),
        );
        let crl = DimensionId::new("CRL");
        session
            .respond_question(
                &crl,
                LevelRank(1),
                QuestionIndex(1),
                Some(Answer::True),
                Evidence::new("Interviewed 5 users"),
            )
            .expect("respond");

        let card = session.scorecard();
        assert_eq!(
            card.dimensions
                .iter()
                .find(|d| d.id == crl)
                .map(|d| d.score),
            Some(1)
        );
        // Five dimensions untouched: overall stays 0.
        assert_eq!(card.overall, 0);
    }

    /// T3.4: Export rows feed back through import to an identical score.
    #[test]
    fn export_reimport_fixed_point() {
        let mut session = session_with(three_level_schema());
        session
            .respond_level(
                &crl(),
                LevelRank(1),
                Some(Answer::True),
                Evidence::new("Interviewed 5 users"),
            )
            .expect("respond");
        session
            .respond_level(&crl(), LevelRank(2), Some(Answer::False), Evidence::none())
            .expect("respond");

        let rows = session.export_rows();
        let mut restored = session_with(three_level_schema());
        let report = restored.apply_rows(&rows).expect("import");
        assert_eq!(report.invalid, 0);

        assert_eq!(
            restored.dimension_score(&crl()),
            session.dimension_score(&crl())
        );
        assert_eq!(
            restored
                .response(&crl(), LevelRank(2))
                .map(|r| r.status),
            Some(LevelStatus::Incomplete)
        );
    }
}
