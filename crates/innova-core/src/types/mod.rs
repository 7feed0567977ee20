//! # Core Type Definitions
//!
//! This module contains all core types for the Innova assessment engine:
//! - Typed identifiers (`ProjectId`, `DimensionId`, `LevelRank`, `QuestionIndex`)
//! - Answer and evidence representation (`Answer`, `Evidence`, `QuestionAnswer`)
//! - Per-level response state (`LevelResponse`, `AnswerState`, `LevelStatus`)
//! - Error types (`InnovaError`)
//!
//! The source system keyed everything by string-concatenated session keys
//! (`resp_{dimension}_{level}_{question}`); here those become ordinary typed
//! keys in nested `BTreeMap`s.
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for counters to prevent overflow

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier for a project in the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub u64);

/// Identifier for one maturity dimension (e.g. "CRL", "TRL", "FRL").
///
/// Dimension codes are short, uppercase, and fixed by the assessment schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DimensionId(pub String);

impl DimensionId {
    /// Create a new dimension identifier from a code string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DimensionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric rank of a level within a dimension (1-9, sometimes fewer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LevelRank(pub u8);

impl LevelRank {
    /// Create a new level rank.
    #[must_use]
    pub const fn new(rank: u8) -> Self {
        Self(rank)
    }

    /// Get the raw rank value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// 1-based index of a question within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionIndex(pub u8);

impl QuestionIndex {
    /// Create a new question index.
    #[must_use]
    pub const fn new(idx: u8) -> Self {
        Self(idx)
    }

    /// Get the raw index value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

// =============================================================================
// ANSWERS & EVIDENCE
// =============================================================================

/// An explicit boolean answer to a level or question.
///
/// An unanswered question is `Option::<Answer>::None`, never a sentinel
/// string as in the source worksheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Answer {
    /// The criterion is satisfied (requires qualifying evidence to score).
    True,
    /// The criterion is not satisfied. A legitimate terminal answer.
    False,
}

impl Answer {
    /// Whether this is an affirmative answer.
    #[must_use]
    pub const fn is_true(self) -> bool {
        matches!(self, Answer::True)
    }

    /// Canonical text form used in tabular exports.
    #[must_use]
    pub const fn as_canonical_str(self) -> &'static str {
        match self {
            Answer::True => "TRUE",
            Answer::False => "FALSE",
        }
    }
}

/// Free-text justification attached to an affirmative answer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Evidence(pub String);

impl Evidence {
    /// Create new evidence text.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Empty evidence.
    #[must_use]
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Get the raw text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the text with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }

    /// Whether the evidence is empty after trimming whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

/// Answer plus evidence for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestionAnswer {
    /// The explicit answer, or `None` while unanswered.
    pub answer: Option<Answer>,
    /// Supporting evidence; only required when the answer is `True`.
    pub evidence: Evidence,
}

impl QuestionAnswer {
    /// Create an answered question with evidence.
    #[must_use]
    pub fn new(answer: Answer, evidence: Evidence) -> Self {
        Self {
            answer: Some(answer),
            evidence,
        }
    }

    /// An unanswered question.
    #[must_use]
    pub fn unanswered() -> Self {
        Self::default()
    }
}

// =============================================================================
// LEVEL RESPONSE
// =============================================================================

/// Raw answer state for one level.
///
/// Levels without sub-questions carry a single answer+evidence pair; levels
/// with sub-questions carry a map from question index to answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerState {
    /// The level is a single yes/no answer with its own evidence field.
    Single(QuestionAnswer),
    /// The level aggregates a set of per-question answers.
    Questions(BTreeMap<QuestionIndex, QuestionAnswer>),
}

impl AnswerState {
    /// Single-answer state, unanswered.
    #[must_use]
    pub fn single() -> Self {
        Self::Single(QuestionAnswer::unanswered())
    }

    /// Per-question state with no answers recorded yet.
    #[must_use]
    pub fn questions() -> Self {
        Self::Questions(BTreeMap::new())
    }
}

/// Display/derivation status of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    /// Not all questions have an explicit answer yet.
    Pending,
    /// Every question answered true with qualifying evidence; counts toward the score.
    Complete,
    /// Explicitly answered but not fully affirmative. Not an error.
    Incomplete,
    /// Affirmative answer present without qualifying evidence.
    NeedsEvidence,
    /// Flagged for review by explicit user action (display override only).
    UnderReview,
}

impl LevelStatus {
    /// Human-readable status name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            LevelStatus::Pending => "Pending",
            LevelStatus::Complete => "Complete",
            LevelStatus::Incomplete => "Incomplete",
            LevelStatus::NeedsEvidence => "Needs evidence",
            LevelStatus::UnderReview => "Under review",
        }
    }
}

impl std::fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate answer state for one Dimension x Level pair.
///
/// Created lazily on first interaction, mutated by the validator/evaluator,
/// destroyed only by explicit user reset. The `status` and `in_calculation`
/// fields are derived by the validator and rewritten on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResponse {
    /// The raw answers for this level.
    pub answers: AnswerState,
    /// Explicit user flag; overrides the displayed status only.
    pub under_review: bool,
    /// Derived status as computed by the validator.
    pub status: LevelStatus,
    /// Whether this level currently counts toward the dimension score.
    pub in_calculation: bool,
}

impl LevelResponse {
    /// Fresh response for a single-answer level.
    #[must_use]
    pub fn single() -> Self {
        Self {
            answers: AnswerState::single(),
            under_review: false,
            status: LevelStatus::Pending,
            in_calculation: false,
        }
    }

    /// Fresh response for a level with sub-questions.
    #[must_use]
    pub fn questions() -> Self {
        Self {
            answers: AnswerState::questions(),
            under_review: false,
            status: LevelStatus::Pending,
            in_calculation: false,
        }
    }

    /// Status to display: the review flag overrides the computed status,
    /// without affecting `in_calculation`.
    #[must_use]
    pub fn display_status(&self) -> LevelStatus {
        if self.under_review {
            LevelStatus::UnderReview
        } else {
            self.status
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Innova engine.
///
/// - No silent failures
/// - Use `Result<T, InnovaError>` for fallible operations
/// - The engine never panics; all errors are recoverable
///
/// Validation outcomes (pending answers, missing evidence) are NOT errors;
/// they are reported through [`LevelStatus`].
#[derive(Debug, Error)]
pub enum InnovaError {
    /// The assessment schema is structurally invalid.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// The requested dimension is not part of the schema.
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// The requested level does not exist within the dimension.
    #[error("Unknown level {rank} in dimension {dimension}")]
    UnknownLevel {
        /// Dimension code.
        dimension: String,
        /// Requested rank.
        rank: u8,
    },

    /// The requested question index does not exist within the level.
    #[error("Unknown question {index} in {dimension} level {rank}")]
    UnknownQuestion {
        /// Dimension code.
        dimension: String,
        /// Level rank.
        rank: u8,
        /// Requested question index.
        index: u8,
    },

    /// The requested project does not exist in the portfolio store.
    #[error("Unknown project: {0}")]
    UnknownProject(u64),

    /// The requested checklist characteristic does not exist.
    #[error("Unknown characteristic: {0}")]
    UnknownCharacteristic(u32),

    /// Caller supplied input the engine cannot accept.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
