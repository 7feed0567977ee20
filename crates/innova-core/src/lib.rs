//! # innova-core
//!
//! The deterministic assessment engine for Innova - THE LOGIC.
//!
//! This crate implements the maturity-assessment core for innovation
//! portfolios: consecutive-level IRL scoring with evidence gating, the EBCT
//! characteristic checklist, tabular import/export with boolean-spelling
//! normalization, and the redb-backed portfolio store.
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Is the ONLY place where evaluation state exists (stateful)
//! - Is closed: no external logic may be injected
//! - Is minimal: if a feature is not essential to assessment processing, it is removed
//! - Never initiates interaction; only reacts to explicit requests
//! - Has NO async, NO network dependencies (pure Rust)
//!
//! The reactive-rerun reconciliation of the system this replaces collapses
//! here into one synchronous cycle: submit a response, validate, rescore,
//! persist.

// =============================================================================
// MODULES
// =============================================================================

pub mod checklist;
pub mod evaluator;
pub mod formats;
pub mod import;
pub mod primitives;
pub mod schema;
pub mod session;
pub mod storage;
pub mod types;
pub mod validator;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Answer, AnswerState, DimensionId, Evidence, InnovaError, LevelRank, LevelResponse, LevelStatus,
    ProjectId, QuestionAnswer, QuestionIndex,
};

// =============================================================================
// RE-EXPORTS: Assessment Engine
// =============================================================================

pub use checklist::{
    CharacteristicId, ChecklistCatalog, ChecklistSummary, PhaseSummary, TrafficLight, TriState,
};
pub use evaluator::{
    build_scorecard, compute_dimension_score, DimensionSummary, ReadinessStage, Scorecard,
    StageAssessor, StageProgress, S1_THRESHOLD, S2_THRESHOLD, S3_THRESHOLD,
};
pub use import::{normalize_answer, ImportReport, ResponseRow, RowError};
pub use schema::{AssessmentSchema, DimensionSchema, LevelSchema};
pub use session::{EvaluationRecord, EvaluationSession, LevelOutcome, SessionState};
pub use validator::{validate_level, EvidencePolicy, Verdict};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{record_from_bytes, record_to_bytes, snapshot_checksum, PersistenceHeader};

#[cfg(feature = "crypto-hash")]
pub use formats::snapshot_hash;

// =============================================================================
// RE-EXPORTS: Storage
// =============================================================================

pub use storage::{MemoryStore, Portfolio, PortfolioBackend, ProjectMeta, RedbStore};
