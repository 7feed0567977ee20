//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every mutating handler runs the same synchronous cycle: load the
//! project's session, apply the submitted values, and save — the response
//! carries the validated status and the recomputed score, so clients never
//! juggle hidden form state.

use super::{
    AppState,
    types::{
        ChecklistRequest, CreateProjectRequest, ExportResponse, FinalizeRequest, FinalizeResponse,
        HealthResponse, HistoryEntryJson, HistoryResponse, ImportRequest, ImportResponse,
        ProjectJson, ProjectQuery, ProjectResponse, ProjectsResponse, ResponseOutcome,
        ResponseRequest, ReviewRequest, SimpleResponse, StatusResponse,
    },
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use innova_core::{
    record_to_bytes, snapshot_checksum, CharacteristicId, InnovaError, ProjectId,
    primitives::MAX_IMPORT_ROWS,
};

/// Map an engine error to an HTTP status.
fn error_status(error: &InnovaError) -> StatusCode {
    match error {
        InnovaError::UnknownProject(_)
        | InnovaError::UnknownDimension(_)
        | InnovaError::UnknownLevel { .. }
        | InnovaError::UnknownQuestion { .. }
        | InnovaError::UnknownCharacteristic(_) => StatusCode::NOT_FOUND,
        InnovaError::InvalidInput(_) | InnovaError::InvalidSchema(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get portfolio status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let portfolio = state.portfolio.read().await;
    let project_count = portfolio.project_count().unwrap_or(0);

    let response = StatusResponse {
        project_count,
        dimensions: portfolio.schema().dimensions.len(),
        characteristics: portfolio.catalog().total_characteristics(),
        evidence_strict: portfolio.policy().strict,
        persistent: portfolio.is_persistent(),
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// PROJECT HANDLERS
// =============================================================================

/// List projects.
pub async fn projects_handler(State(state): State<AppState>) -> impl IntoResponse {
    let portfolio = state.portfolio.read().await;
    match portfolio.projects() {
        Ok(projects) => (
            StatusCode::OK,
            Json(ProjectsResponse {
                projects: projects.iter().map(ProjectJson::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => (
            error_status(&e),
            Json(ProjectResponse::error(e.to_string())),
        )
            .into_response(),
    }
}

/// Create a project.
pub async fn create_project_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> impl IntoResponse {
    let mut portfolio = state.portfolio.write().await;
    match portfolio.create_project(&request.name) {
        Ok(meta) => (StatusCode::OK, Json(ProjectResponse::success(&meta))),
        Err(e) => (
            error_status(&e),
            Json(ProjectResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// RESPONSE HANDLER
// =============================================================================

/// Submit a level response: validate, rescore, persist, and report.
pub async fn response_handler(
    State(state): State<AppState>,
    Json(request): Json<ResponseRequest>,
) -> impl IntoResponse {
    let parts = match request.to_parts() {
        Ok(parts) => parts,
        Err(e) => {
            return (error_status(&e), Json(ResponseOutcome::error(e.to_string())));
        }
    };

    let mut portfolio = state.portfolio.write().await;
    let mut session = match portfolio.session(ProjectId(request.project_id)) {
        Ok(session) => session,
        Err(e) => {
            return (error_status(&e), Json(ResponseOutcome::error(e.to_string())));
        }
    };

    let submitted = match parts.question {
        Some(index) => session.respond_question(
            &parts.dimension,
            parts.level,
            index,
            parts.answer,
            parts.evidence,
        ),
        None => session.respond_level(&parts.dimension, parts.level, parts.answer, parts.evidence),
    };
    let outcome = match submitted {
        Ok(outcome) => outcome,
        Err(e) => {
            return (error_status(&e), Json(ResponseOutcome::error(e.to_string())));
        }
    };

    if let Err(e) = portfolio.save_session(&session) {
        return (error_status(&e), Json(ResponseOutcome::error(e.to_string())));
    }
    (StatusCode::OK, Json(ResponseOutcome::success(outcome)))
}

// =============================================================================
// REVIEW HANDLER
// =============================================================================

/// Flag or unflag a level for review.
pub async fn review_handler(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> impl IntoResponse {
    let mut portfolio = state.portfolio.write().await;
    let dimension = innova_core::DimensionId::new(request.dimension.trim());

    let mut session = match portfolio.session(ProjectId(request.project_id)) {
        Ok(session) => session,
        Err(e) => {
            return (error_status(&e), Json(SimpleResponse::error(e.to_string())));
        }
    };
    let status = match session.set_under_review(
        &dimension,
        innova_core::LevelRank(request.level),
        request.under_review,
    ) {
        Ok(status) => status,
        Err(e) => {
            return (error_status(&e), Json(SimpleResponse::error(e.to_string())));
        }
    };

    if let Err(e) = portfolio.save_session(&session) {
        return (error_status(&e), Json(SimpleResponse::error(e.to_string())));
    }
    (StatusCode::OK, Json(SimpleResponse::success(Some(status))))
}

// =============================================================================
// CHECKLIST HANDLERS
// =============================================================================

/// Answer (or clear) a checklist characteristic.
pub async fn checklist_handler(
    State(state): State<AppState>,
    Json(request): Json<ChecklistRequest>,
) -> impl IntoResponse {
    let mut portfolio = state.portfolio.write().await;
    let id = CharacteristicId(request.characteristic);

    let mut session = match portfolio.session(ProjectId(request.project_id)) {
        Ok(session) => session,
        Err(e) => {
            return (error_status(&e), Json(SimpleResponse::error(e.to_string())));
        }
    };
    let answered = match request.answer {
        Some(answer) => session.answer_characteristic(id, answer),
        None => session.clear_characteristic(id),
    };
    if let Err(e) = answered {
        return (error_status(&e), Json(SimpleResponse::error(e.to_string())));
    }

    if let Err(e) = portfolio.save_session(&session) {
        return (error_status(&e), Json(SimpleResponse::error(e.to_string())));
    }
    (StatusCode::OK, Json(SimpleResponse::success(None)))
}

/// Get the checklist summary for a project.
pub async fn checklist_summary_handler(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> impl IntoResponse {
    let portfolio = state.portfolio.read().await;
    match portfolio.session(ProjectId(query.project_id)) {
        Ok(session) => (StatusCode::OK, Json(session.checklist_summary())).into_response(),
        Err(e) => (error_status(&e), Json(SimpleResponse::error(e.to_string()))).into_response(),
    }
}

// =============================================================================
// SCORECARD HANDLER
// =============================================================================

/// Get the maturity scorecard for a project.
pub async fn scorecard_handler(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> impl IntoResponse {
    let portfolio = state.portfolio.read().await;
    match portfolio.session(ProjectId(query.project_id)) {
        Ok(session) => (StatusCode::OK, Json(session.scorecard())).into_response(),
        Err(e) => (error_status(&e), Json(SimpleResponse::error(e.to_string()))).into_response(),
    }
}

// =============================================================================
// IMPORT HANDLER
// =============================================================================

/// Import response rows for a project.
pub async fn import_handler(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> impl IntoResponse {
    if request.rows.len() > MAX_IMPORT_ROWS {
        return (
            StatusCode::BAD_REQUEST,
            Json(ImportResponse::error(format!(
                "row count {} exceeds maximum {}",
                request.rows.len(),
                MAX_IMPORT_ROWS
            ))),
        );
    }

    let mut portfolio = state.portfolio.write().await;
    let mut session = match portfolio.session(ProjectId(request.project_id)) {
        Ok(session) => session,
        Err(e) => {
            return (error_status(&e), Json(ImportResponse::error(e.to_string())));
        }
    };
    let report = match session.apply_rows(&request.rows) {
        Ok(report) => report,
        Err(e) => {
            return (error_status(&e), Json(ImportResponse::error(e.to_string())));
        }
    };

    if let Err(e) = portfolio.save_session(&session) {
        return (error_status(&e), Json(ImportResponse::error(e.to_string())));
    }
    (StatusCode::OK, Json(ImportResponse::success(report)))
}

// =============================================================================
// FINALIZE HANDLER
// =============================================================================

/// Finalize the project's current evaluation into history.
pub async fn finalize_handler(
    State(state): State<AppState>,
    Json(request): Json<FinalizeRequest>,
) -> impl IntoResponse {
    let mut portfolio = state.portfolio.write().await;
    let label = request.label.unwrap_or_default();

    match portfolio.finalize(ProjectId(request.project_id), &label) {
        Ok(record) => (
            StatusCode::OK,
            Json(FinalizeResponse::success(
                record.sequence,
                record.overall,
                &record.scores,
            )),
        ),
        Err(e) => (
            error_status(&e),
            Json(FinalizeResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// HISTORY HANDLER
// =============================================================================

/// Get a project's finalized evaluations, newest first.
pub async fn history_handler(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> impl IntoResponse {
    let portfolio = state.portfolio.read().await;
    match portfolio.history(ProjectId(query.project_id)) {
        Ok(records) => {
            let records = records
                .iter()
                .map(|r| HistoryEntryJson {
                    sequence: r.sequence,
                    label: r.label.clone(),
                    overall: r.overall,
                    scores: r
                        .scores
                        .iter()
                        .map(|(id, score)| (id.as_str().to_string(), *score))
                        .collect(),
                })
                .collect();
            (
                StatusCode::OK,
                Json(HistoryResponse {
                    success: true,
                    records,
                    error: None,
                }),
            )
        }
        Err(e) => (error_status(&e), Json(HistoryResponse::error(e.to_string()))),
    }
}

// =============================================================================
// EXPORT HANDLER
// =============================================================================

/// Export the project's current evaluation as a canonical snapshot.
pub async fn export_handler(
    State(state): State<AppState>,
    Json(query): Json<ProjectQuery>,
) -> impl IntoResponse {
    let portfolio = state.portfolio.read().await;

    let result = portfolio
        .session(ProjectId(query.project_id))
        .and_then(|session| {
            let record = session.finalize("export");
            record_to_bytes(&record)
        });

    match result {
        Ok(data) => {
            let checksum = snapshot_checksum(&data);
            (StatusCode::OK, Json(ExportResponse::success(data, checksum)))
        }
        Err(e) => (error_status(&e), Json(ExportResponse::error(e.to_string()))),
    }
}
