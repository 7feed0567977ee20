//! # Tabular Import
//!
//! Applies spreadsheet-shaped response rows to an evaluation session.
//!
//! Rows arrive already split from their file container (xlsx parsing stays
//! outside the engine) with columns
//! `{Dimension, Level, QuestionIndex, Question, Answer, Evidence}`.
//! Answer cells are normalized from the spellings worksheets actually
//! contain (`VERDADERO`, `V`, `TRUE`, `T`, `1`, ...) to a canonical
//! [`Answer`] before the validator ever sees them. Unrecognized spellings
//! are counted as invalid and skipped with a per-row reason; a bad row
//! never aborts the import.

use crate::primitives::{MAX_EVIDENCE_LENGTH, MAX_IMPORT_ROWS};
use crate::session::EvaluationSession;
use crate::types::{Answer, DimensionId, Evidence, InnovaError, LevelRank, QuestionIndex};
use serde::{Deserialize, Serialize};

// =============================================================================
// ROW TYPES
// =============================================================================

/// One tabular response row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRow {
    /// Dimension code; the part before " - " in decorated worksheet cells.
    pub dimension: String,
    /// Level rank.
    pub level: u8,
    /// 1-based question index; `None` for single-answer levels.
    #[serde(default)]
    pub question: Option<u8>,
    /// Informational prompt text; ignored on import, filled on export.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Raw answer cell text.
    pub answer: String,
    /// Evidence cell text.
    #[serde(default)]
    pub evidence: String,
}

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based position of the row in the imported batch.
    pub row: usize,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of applying a batch of rows.
///
/// The import never aborts wholesale: every row is either applied or
/// accounted for here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ImportReport {
    /// Rows seen.
    pub total: usize,
    /// Rows applied to the session.
    pub applied: usize,
    /// Rows skipped because the dimension or answer cell was empty.
    pub blank: usize,
    /// Rows skipped because a value could not be normalized or resolved.
    pub invalid: usize,
    /// Per-row reasons for the invalid rows.
    pub errors: Vec<RowError>,
}

impl ImportReport {
    /// Whether every row was applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.applied == self.total
    }
}

// =============================================================================
// ANSWER NORMALIZATION
// =============================================================================

/// Normalize a raw answer cell to a canonical [`Answer`].
///
/// Whitespace (including interior spaces, tabs, CR/LF left by spreadsheet
/// round-trips) is stripped and the remainder is compared case-insensitively:
/// `TRUE`/`T`/`1`/`V`/`VERDADERO` map to true, `FALSE`/`F`/`0`/`FALSO` to
/// false. Everything else — including "Sí" — is `None` (invalid), never
/// silently coerced.
#[must_use]
pub fn normalize_answer(raw: &str) -> Option<Answer> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    match cleaned.as_str() {
        "TRUE" | "T" | "1" | "V" | "VERDADERO" => Some(Answer::True),
        "FALSE" | "F" | "0" | "FALSO" => Some(Answer::False),
        _ => None,
    }
}

// =============================================================================
// BATCH APPLICATION
// =============================================================================

/// Apply a batch of rows to a session.
///
/// Valid rows are written through the session (so the validator and the
/// score evaluator run for each touched level); invalid rows are counted
/// and reported. Evidence gating applies to imported data exactly as to
/// interactive input: an imported true answer without evidence lands as
/// `NeedsEvidence` and does not score.
///
/// # Errors
///
/// Only the batch size limit is a hard error; individual bad rows are
/// reported through the [`ImportReport`].
pub fn apply_rows(
    session: &mut EvaluationSession,
    rows: &[ResponseRow],
) -> Result<ImportReport, InnovaError> {
    if rows.len() > MAX_IMPORT_ROWS {
        return Err(InnovaError::InvalidInput(format!(
            "row count {} exceeds maximum {}",
            rows.len(),
            MAX_IMPORT_ROWS
        )));
    }

    let mut report = ImportReport::default();

    for (position, row) in rows.iter().enumerate() {
        let row_number = position.saturating_add(1);
        report.total = report.total.saturating_add(1);

        // Decorated cells carry "CODE - description"; keep the code.
        let code = row
            .dimension
            .split(" - ")
            .next()
            .unwrap_or(&row.dimension)
            .trim();
        if code.is_empty() {
            report.blank = report.blank.saturating_add(1);
            continue;
        }

        let answer_raw = row.answer.trim();
        if answer_raw.is_empty() {
            report.blank = report.blank.saturating_add(1);
            continue;
        }

        let Some(answer) = normalize_answer(answer_raw) else {
            report.invalid = report.invalid.saturating_add(1);
            report.errors.push(RowError {
                row: row_number,
                reason: format!("unrecognized answer '{answer_raw}'"),
            });
            continue;
        };

        if row.evidence.len() > MAX_EVIDENCE_LENGTH {
            report.invalid = report.invalid.saturating_add(1);
            report.errors.push(RowError {
                row: row_number,
                reason: format!(
                    "evidence length {} exceeds maximum {}",
                    row.evidence.len(),
                    MAX_EVIDENCE_LENGTH
                ),
            });
            continue;
        }

        let dimension = DimensionId::new(code);
        let rank = LevelRank(row.level);
        let evidence = Evidence::new(row.evidence.trim());

        let outcome = match row.question {
            Some(idx) => session.respond_question(
                &dimension,
                rank,
                QuestionIndex(idx),
                Some(answer),
                evidence,
            ),
            None => session.respond_level(&dimension, rank, Some(answer), evidence),
        };

        match outcome {
            Ok(_) => report.applied = report.applied.saturating_add(1),
            Err(e) => {
                report.invalid = report.invalid.saturating_add(1);
                report.errors.push(RowError {
                    row: row_number,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_known_spellings() {
        for raw in ["TRUE", "true", " t ", "1", "V", "VERDADERO", "verdadero\n"] {
            assert_eq!(normalize_answer(raw), Some(Answer::True), "raw={raw:?}");
        }
        for raw in ["FALSE", "false", "F", "0", "FALSO", " falso \t"] {
            assert_eq!(normalize_answer(raw), Some(Answer::False), "raw={raw:?}");
        }
    }

    #[test]
    fn normalize_strips_interior_whitespace() {
        assert_eq!(normalize_answer("V E R D A D E R O"), Some(Answer::True));
        assert_eq!(normalize_answer("FAL SO"), Some(Answer::False));
    }

    #[test]
    fn normalize_rejects_unknown_spellings() {
        for raw in ["Sí", "SI", "yes", "no", "2", "VERDAD", ""] {
            assert_eq!(normalize_answer(raw), None, "raw={raw:?}");
        }
    }

    #[test]
    fn dimension_code_split_keeps_prefix() {
        // Exercised through apply_rows in session tests; the split itself:
        let decorated = "CRL - Customer readiness";
        let code = decorated.split(" - ").next().unwrap_or(decorated).trim();
        assert_eq!(code, "CRL");
    }
}
