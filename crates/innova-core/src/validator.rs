//! # Response/Evidence Validator
//!
//! Decides, for a level's raw answer state, (a) whether the level counts as
//! "in calculation" for scoring and (b) what status to report.
//!
//! Rules:
//! - Every question needs an explicit answer before the level leaves `Pending`.
//! - An affirmative answer requires non-blank evidence (strict mode adds a
//!   minimum character count); otherwise the level is `NeedsEvidence` and is
//!   excluded from calculation regardless of the booleans.
//! - All answered and all affirmative with qualifying evidence -> `Complete`
//!   and in calculation. Any negative answer -> `Incomplete`, a legitimate
//!   terminal state, not an error.
//!
//! Validation never fails; it always returns a best-effort verdict.

use crate::primitives::DEFAULT_MIN_EVIDENCE_CHARS;
use crate::schema::LevelSchema;
use crate::types::{
    Answer, AnswerState, Evidence, LevelResponse, LevelStatus, QuestionAnswer, QuestionIndex,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// EVIDENCE POLICY
// =============================================================================

/// Evidence acceptance policy, uniform across all dimensions and levels.
///
/// The source system carried this per page, applied inconsistently; here it
/// is one configurable policy owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidencePolicy {
    /// When set, evidence must meet `min_chars` in addition to being non-blank.
    #[serde(default)]
    pub strict: bool,
    /// Minimum trimmed length required in strict mode.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_min_chars() -> usize {
    DEFAULT_MIN_EVIDENCE_CHARS
}

impl Default for EvidencePolicy {
    fn default() -> Self {
        Self {
            strict: false,
            min_chars: DEFAULT_MIN_EVIDENCE_CHARS,
        }
    }
}

impl EvidencePolicy {
    /// A strict policy with the given minimum length.
    #[must_use]
    pub fn strict(min_chars: usize) -> Self {
        Self {
            strict: true,
            min_chars,
        }
    }

    /// Whether the given evidence qualifies under this policy.
    #[must_use]
    pub fn qualifies(&self, evidence: &Evidence) -> bool {
        let trimmed = evidence.trimmed();
        if trimmed.is_empty() {
            return false;
        }
        if self.strict {
            return trimmed.chars().count() >= self.min_chars;
        }
        true
    }
}

// =============================================================================
// VERDICT
// =============================================================================

/// Outcome of validating one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the level counts toward the dimension score.
    pub in_calculation: bool,
    /// Derived status for display and reporting.
    pub status: LevelStatus,
}

impl Verdict {
    const fn new(in_calculation: bool, status: LevelStatus) -> Self {
        Self {
            in_calculation,
            status,
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Whether a single question is complete: a negative answer is complete on
/// its own; an affirmative answer is complete only with qualifying evidence.
#[must_use]
pub fn question_complete(qa: &QuestionAnswer, policy: &EvidencePolicy) -> bool {
    match qa.answer {
        Some(Answer::False) => true,
        Some(Answer::True) => policy.qualifies(&qa.evidence),
        None => false,
    }
}

/// Validate one level against its schema.
///
/// Total function: never fails, never mutates. The caller applies the
/// verdict to the stored [`LevelResponse`].
#[must_use]
pub fn validate_level(
    schema: &LevelSchema,
    response: &LevelResponse,
    policy: &EvidencePolicy,
) -> Verdict {
    match &response.answers {
        AnswerState::Single(qa) => validate_single(qa, policy),
        AnswerState::Questions(answers) => {
            validate_questions(schema.question_count(), answers, policy)
        }
    }
}

fn validate_single(qa: &QuestionAnswer, policy: &EvidencePolicy) -> Verdict {
    match qa.answer {
        None => Verdict::new(false, LevelStatus::Pending),
        Some(Answer::False) => Verdict::new(false, LevelStatus::Incomplete),
        Some(Answer::True) => {
            if policy.qualifies(&qa.evidence) {
                Verdict::new(true, LevelStatus::Complete)
            } else {
                Verdict::new(false, LevelStatus::NeedsEvidence)
            }
        }
    }
}

fn validate_questions(
    expected: usize,
    answers: &std::collections::BTreeMap<QuestionIndex, QuestionAnswer>,
    policy: &EvidencePolicy,
) -> Verdict {
    let mut all_true = true;
    let mut missing_evidence = false;

    for idx in 1..=expected {
        let Some(qa) = answers.get(&QuestionIndex(idx as u8)) else {
            return Verdict::new(false, LevelStatus::Pending);
        };
        match qa.answer {
            None => return Verdict::new(false, LevelStatus::Pending),
            Some(Answer::False) => all_true = false,
            Some(Answer::True) => {
                if !policy.qualifies(&qa.evidence) {
                    missing_evidence = true;
                }
            }
        }
    }

    if missing_evidence {
        return Verdict::new(false, LevelStatus::NeedsEvidence);
    }
    if all_true {
        // Degenerate schema with zero questions never self-completes.
        if expected == 0 {
            return Verdict::new(false, LevelStatus::Pending);
        }
        return Verdict::new(true, LevelStatus::Complete);
    }
    Verdict::new(false, LevelStatus::Incomplete)
}

// =============================================================================
// TESTS
// =============================================================================
