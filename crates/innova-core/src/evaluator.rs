//! # Maturity Score Evaluator
//!
//! Computes, for a dimension, the single highest level that is validly
//! achieved. Achievement requires an unbroken chain of in-calculation levels
//! starting from the dimension's lowest level: maturity is cumulative, so a
//! dimension cannot claim level 5 without having validly cleared 1-4 first,
//! even if level 5's questions were separately answered true.
//!
//! The evaluator is a pure function over the schema and the current
//! responses; the session caches the result per dimension and recomputes on
//! every response mutation.

use crate::schema::{AssessmentSchema, DimensionSchema};
use crate::types::{DimensionId, LevelRank, LevelResponse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// DIMENSION SCORE
// =============================================================================

/// Compute the score for one dimension.
///
/// Walks levels in ascending rank order from the baseline, advancing a
/// highest-achieved counter only while each level's rank is exactly one more
/// than the counter AND its response is in calculation. Scanning stops at
/// the first failure; later levels are not consulted. A dimension with no
/// levels scores 0 deterministically.
#[must_use]
pub fn compute_dimension_score(
    dimension: &DimensionSchema,
    responses: &BTreeMap<LevelRank, LevelResponse>,
) -> u8 {
    let Some(baseline) = dimension.baseline() else {
        return 0;
    };
    let baseline = baseline.value();
    let mut highest = baseline.saturating_sub(1);

    for level in &dimension.levels {
        let rank = level.rank.value();
        if rank != highest.saturating_add(1) {
            break;
        }
        let in_calculation = responses
            .get(&level.rank)
            .is_some_and(|r| r.in_calculation);
        if !in_calculation {
            break;
        }
        highest = rank;
    }

    if highest >= baseline { highest } else { 0 }
}

// =============================================================================
// SCORECARD
// =============================================================================

/// Per-dimension rollup for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSummary {
    /// Dimension code.
    pub id: DimensionId,
    /// Human-readable dimension name.
    pub name: String,
    /// Consecutive-level score (0 = baseline not reached).
    pub score: u8,
    /// Highest rank defined by the schema.
    pub top_rank: u8,
    /// Number of levels defined by the schema.
    pub total_levels: usize,
    /// Levels currently counting toward the score.
    pub in_calculation: usize,
    /// Levels still awaiting answers.
    pub pending: usize,
    /// Levels flagged for review.
    pub under_review: usize,
}

/// Full scorecard across all dimensions plus the portfolio readiness stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Per-dimension summaries in schema order.
    pub dimensions: Vec<DimensionSummary>,
    /// Minimum dimension score; the portfolio is only as mature as its
    /// weakest dimension.
    pub overall: u8,
    /// Readiness stage derived from the overall score.
    pub stage: StageProgress,
}

/// Build a scorecard from the schema, current responses, and the per-
/// dimension score cache.
#[must_use]
pub fn build_scorecard(
    schema: &AssessmentSchema,
    responses: &BTreeMap<DimensionId, BTreeMap<LevelRank, LevelResponse>>,
    scores: &BTreeMap<DimensionId, u8>,
) -> Scorecard {
    let mut dimensions = Vec::with_capacity(schema.dimensions.len());
    let mut overall: Option<u8> = None;

    for dim in &schema.dimensions {
        let score = scores.get(&dim.id).copied().unwrap_or(0);
        let dim_responses = responses.get(&dim.id);

        let mut in_calculation = 0usize;
        let mut under_review = 0usize;
        let mut answered = 0usize;
        if let Some(levels) = dim_responses {
            for response in levels.values() {
                if response.in_calculation {
                    in_calculation = in_calculation.saturating_add(1);
                }
                if response.under_review {
                    under_review = under_review.saturating_add(1);
                }
                if response.status != crate::types::LevelStatus::Pending {
                    answered = answered.saturating_add(1);
                }
            }
        }
        let total_levels = dim.levels.len();
        let pending = total_levels.saturating_sub(answered);

        overall = Some(match overall {
            Some(current) => current.min(score),
            None => score,
        });

        dimensions.push(DimensionSummary {
            id: dim.id.clone(),
            name: dim.name.clone(),
            score,
            top_rank: dim.top_rank(),
            total_levels,
            in_calculation,
            pending,
            under_review,
        });
    }

    let overall = overall.unwrap_or(0);
    let stage = StageAssessor::new().progress(overall);

    Scorecard {
        dimensions,
        overall,
        stage,
    }
}

// =============================================================================
// READINESS STAGES
// =============================================================================

/// Minimum overall score for S1: Validation.
pub const S1_THRESHOLD: u8 = 3;

/// Minimum overall score for S2: Transfer.
pub const S2_THRESHOLD: u8 = 6;

/// Minimum overall score for S3: Consolidation.
pub const S3_THRESHOLD: u8 = 8;

/// Portfolio readiness stages.
///
/// Stages are informational metrics only; they do not gate any operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReadinessStage {
    /// S0: Exploration
    S0,
    /// S1: Validation
    S1,
    /// S2: Transfer
    S2,
    /// S3: Consolidation
    S3,
}

impl ReadinessStage {
    /// Get the stage name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ReadinessStage::S0 => "Exploration",
            ReadinessStage::S1 => "Validation",
            ReadinessStage::S2 => "Transfer",
            ReadinessStage::S3 => "Consolidation",
        }
    }

    /// Get the minimum overall score for this stage.
    #[must_use]
    pub fn threshold(&self) -> u8 {
        match self {
            ReadinessStage::S0 => 0,
            ReadinessStage::S1 => S1_THRESHOLD,
            ReadinessStage::S2 => S2_THRESHOLD,
            ReadinessStage::S3 => S3_THRESHOLD,
        }
    }

    /// Get the next stage, if any.
    #[must_use]
    pub fn next(&self) -> Option<ReadinessStage> {
        match self {
            ReadinessStage::S0 => Some(ReadinessStage::S1),
            ReadinessStage::S1 => Some(ReadinessStage::S2),
            ReadinessStage::S2 => Some(ReadinessStage::S3),
            ReadinessStage::S3 => None,
        }
    }

    /// Check if this stage is terminal (S3).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReadinessStage::S3)
    }
}

impl std::fmt::Display for ReadinessStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self, self.name())
    }
}

/// Progress information toward the next stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    pub current: ReadinessStage,
    pub next: Option<ReadinessStage>,
    pub percent: u8,
    pub score_current: u8,
    pub score_needed: u8,
}

/// Stage Assessor - pure function from overall score to stage.
pub struct StageAssessor {
    s1_threshold: u8,
    s2_threshold: u8,
    s3_threshold: u8,
}

impl Default for StageAssessor {
    fn default() -> Self {
        Self::new()
    }
}

impl StageAssessor {
    /// Create a new assessor with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            s1_threshold: S1_THRESHOLD,
            s2_threshold: S2_THRESHOLD,
            s3_threshold: S3_THRESHOLD,
        }
    }

    /// Create an assessor with custom thresholds.
    #[must_use]
    pub fn with_thresholds(s1: u8, s2: u8, s3: u8) -> Self {
        Self {
            s1_threshold: s1,
            s2_threshold: s2,
            s3_threshold: s3,
        }
    }

    /// Assess the stage for an overall (minimum-dimension) score.
    #[must_use]
    pub fn assess(&self, overall: u8) -> ReadinessStage {
        if overall >= self.s3_threshold {
            ReadinessStage::S3
        } else if overall >= self.s2_threshold {
            ReadinessStage::S2
        } else if overall >= self.s1_threshold {
            ReadinessStage::S1
        } else {
            ReadinessStage::S0
        }
    }

    /// Get progress toward the next stage.
    #[must_use]
    pub fn progress(&self, overall: u8) -> StageProgress {
        let current = self.assess(overall);

        let (next, current_threshold, next_threshold) = match current {
            ReadinessStage::S0 => (ReadinessStage::S1, 0, self.s1_threshold),
            ReadinessStage::S1 => (ReadinessStage::S2, self.s1_threshold, self.s2_threshold),
            ReadinessStage::S2 => (ReadinessStage::S3, self.s2_threshold, self.s3_threshold),
            ReadinessStage::S3 => {
                return StageProgress {
                    current,
                    next: None,
                    percent: 100,
                    score_current: overall,
                    score_needed: overall,
                };
            }
        };

        let range = next_threshold.saturating_sub(current_threshold);
        let progress_in_range = overall.saturating_sub(current_threshold);

        let percent = if range > 0 {
            ((u32::from(progress_in_range).saturating_mul(100)) / u32::from(range)) as u8
        } else {
            100
        };

        StageProgress {
            current,
            next: Some(next),
            percent: percent.min(100),
            score_current: overall,
            score_needed: next_threshold,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
