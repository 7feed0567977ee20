//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Innova assessment engine.
//!
//! The engine starts with zero data but fixed rules. These primitives are
//! compiled into the binary and are immutable at runtime.

/// Magic bytes for the Innova canonical snapshot header.
///
/// - File Header = Magic Bytes ("INNV") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"INNV";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;

/// Default minimum evidence length (characters) enforced in strict mode.
///
/// Outside strict mode any non-blank evidence qualifies; strict mode
/// additionally requires at least this many characters after trimming.
pub const DEFAULT_MIN_EVIDENCE_CHARS: usize = 40;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for evidence strings.
///
/// Evidence longer than this is rejected at the API/import boundary.
/// This prevents memory exhaustion from malicious or malformed input.
pub const MAX_EVIDENCE_LENGTH: usize = 4096;

/// Maximum length for question prompt strings in a schema.
pub const MAX_QUESTION_LENGTH: usize = 512;

/// Maximum length for a dimension identifier code.
pub const MAX_DIMENSION_CODE_LENGTH: usize = 16;

/// Maximum length for project and dimension display names.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum number of dimensions in an assessment schema.
pub const MAX_DIMENSIONS: usize = 32;

/// Maximum number of levels per dimension.
pub const MAX_LEVELS_PER_DIMENSION: usize = 16;

/// Maximum number of questions per level.
pub const MAX_QUESTIONS_PER_LEVEL: usize = 16;

/// Maximum number of rows in a single tabular import.
///
/// Imports larger than this are rejected to prevent DoS.
pub const MAX_IMPORT_ROWS: usize = 10_000;

// =============================================================================
// SCORE CLASSIFICATION THRESHOLDS
// =============================================================================

/// Checklist centi-score at or above which a phase classifies Green.
pub const GREEN_THRESHOLD_CENTI: u32 = 90;

/// Checklist centi-score at or above which a phase classifies Amber.
/// Below this the phase classifies Red.
pub const AMBER_THRESHOLD_CENTI: u32 = 40;

/// Centi-score assigned to a characteristic answered "met".
pub const MET_CENTI: u32 = 100;

/// Centi-score assigned to a characteristic answered "in progress".
/// Unanswered characteristics also score this, per the intake worksheet.
pub const IN_PROGRESS_CENTI: u32 = 50;

/// Centi-score assigned to a characteristic answered "not met".
pub const NOT_MET_CENTI: u32 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(MAGIC_BYTES, b"INNV");
    }

    #[test]
    fn traffic_light_thresholds_ordered() {
        assert!(GREEN_THRESHOLD_CENTI > AMBER_THRESHOLD_CENTI);
        assert!(MET_CENTI > IN_PROGRESS_CENTI);
        assert!(IN_PROGRESS_CENTI > NOT_MET_CENTI);
    }
}
