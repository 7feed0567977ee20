//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use innova_core::{
    normalize_answer, Answer, DimensionId, Evidence, ImportReport, InnovaError, LevelOutcome,
    LevelRank, LevelStatus, ProjectMeta, QuestionIndex, ResponseRow, TriState,
    primitives::MAX_EVIDENCE_LENGTH,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Portfolio status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub project_count: usize,
    pub dimensions: usize,
    pub characteristics: usize,
    pub evidence_strict: bool,
    pub persistent: bool,
}

// =============================================================================
// PROJECT TYPES
// =============================================================================

/// Project JSON representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectJson {
    pub id: u64,
    pub name: String,
}

impl From<&ProjectMeta> for ProjectJson {
    fn from(meta: &ProjectMeta) -> Self {
        Self {
            id: meta.id.0,
            name: meta.name.clone(),
        }
    }
}

/// Project list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectJson>,
}

/// Project creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
}

/// Project creation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub project: Option<ProjectJson>,
    pub error: Option<String>,
}

impl ProjectResponse {
    pub fn success(meta: &ProjectMeta) -> Self {
        Self {
            success: true,
            project: Some(ProjectJson::from(meta)),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            project: None,
            error: Some(msg.into()),
        }
    }
}

/// Query parameter for project-scoped GET endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectQuery {
    pub project_id: u64,
}

// =============================================================================
// RESPONSE SUBMISSION
// =============================================================================

/// Level response submission.
///
/// `answer` carries any spelling the import normalizer accepts
/// ("TRUE"/"VERDADERO"/"1"/...); omit it or send an empty string to clear
/// the answer back to unanswered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRequest {
    pub project_id: u64,
    pub dimension: String,
    pub level: u8,
    #[serde(default)]
    pub question: Option<u8>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
}

/// Validated pieces of a [`ResponseRequest`].
pub struct ResponseParts {
    pub dimension: DimensionId,
    pub level: LevelRank,
    pub question: Option<QuestionIndex>,
    pub answer: Option<Answer>,
    pub evidence: Evidence,
}

impl ResponseRequest {
    /// Validate the request at the API boundary, before it reaches the core.
    ///
    /// Rejects oversized evidence and unrecognized answer spellings so the
    /// caller gets a 400 with a precise message rather than a silently
    /// skipped write.
    pub fn to_parts(&self) -> Result<ResponseParts, InnovaError> {
        if self.dimension.trim().is_empty() {
            return Err(InnovaError::InvalidInput("dimension is empty".into()));
        }

        let answer = match self.answer.as_deref() {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match normalize_answer(raw) {
                Some(answer) => Some(answer),
                None => {
                    return Err(InnovaError::InvalidInput(format!(
                        "unrecognized answer '{raw}'"
                    )));
                }
            },
        };

        let evidence = self.evidence.clone().unwrap_or_default();
        if evidence.len() > MAX_EVIDENCE_LENGTH {
            return Err(InnovaError::InvalidInput(format!(
                "evidence length {} exceeds maximum {} bytes",
                evidence.len(),
                MAX_EVIDENCE_LENGTH
            )));
        }

        Ok(ResponseParts {
            dimension: DimensionId::new(self.dimension.trim()),
            level: LevelRank(self.level),
            question: self.question.map(QuestionIndex),
            answer,
            evidence: Evidence::new(evidence),
        })
    }
}

/// Outcome of a level response submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseOutcome {
    pub success: bool,
    pub status: Option<LevelStatus>,
    pub in_calculation: bool,
    pub dimension_score: u8,
    pub error: Option<String>,
}

impl ResponseOutcome {
    pub fn success(outcome: LevelOutcome) -> Self {
        Self {
            success: true,
            status: Some(outcome.status),
            in_calculation: outcome.in_calculation,
            dimension_score: outcome.dimension_score,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            status: None,
            in_calculation: false,
            dimension_score: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// REVIEW & CHECKLIST
// =============================================================================

/// Review flag request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub project_id: u64,
    pub dimension: String,
    pub level: u8,
    pub under_review: bool,
}

/// Checklist answer request. `answer: null` clears the characteristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistRequest {
    pub project_id: u64,
    pub characteristic: u32,
    #[serde(default)]
    pub answer: Option<TriState>,
}

/// Generic success/error response carrying an optional level status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub status: Option<LevelStatus>,
    pub error: Option<String>,
}

impl SimpleResponse {
    pub fn success(status: Option<LevelStatus>) -> Self {
        Self {
            success: true,
            status,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            status: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// IMPORT
// =============================================================================

/// Row import request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub project_id: u64,
    pub rows: Vec<ResponseRow>,
}

/// Row import response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub report: Option<ImportReport>,
    pub error: Option<String>,
}

impl ImportResponse {
    pub fn success(report: ImportReport) -> Self {
        Self {
            success: true,
            report: Some(report),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            report: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// FINALIZE & HISTORY
// =============================================================================

/// Finalize request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeRequest {
    pub project_id: u64,
    #[serde(default)]
    pub label: Option<String>,
}

/// Finalize response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeResponse {
    pub success: bool,
    pub sequence: Option<u32>,
    pub overall: Option<u8>,
    #[serde(default)]
    pub scores: BTreeMap<String, u8>,
    pub error: Option<String>,
}

impl FinalizeResponse {
    pub fn success(sequence: u32, overall: u8, scores: &BTreeMap<DimensionId, u8>) -> Self {
        Self {
            success: true,
            sequence: Some(sequence),
            overall: Some(overall),
            scores: scores
                .iter()
                .map(|(id, score)| (id.as_str().to_string(), *score))
                .collect(),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            sequence: None,
            overall: None,
            scores: BTreeMap::new(),
            error: Some(msg.into()),
        }
    }
}

/// One history entry (rows elided; fetch the snapshot for full detail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntryJson {
    pub sequence: u32,
    pub label: String,
    pub overall: u8,
    pub scores: BTreeMap<String, u8>,
}

/// History response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub records: Vec<HistoryEntryJson>,
    pub error: Option<String>,
}

impl HistoryResponse {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            records: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// EXPORT RESPONSE
// =============================================================================

/// Export response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub data: Option<String>, // Base64 encoded snapshot
    pub checksum: Option<u64>,
    pub error: Option<String>,
}

impl ExportResponse {
    pub fn success(data: Vec<u8>, checksum: u64) -> Self {
        Self {
            success: true,
            data: Some(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                &data,
            )),
            checksum: Some(checksum),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            checksum: None,
            error: Some(msg.into()),
        }
    }
}
