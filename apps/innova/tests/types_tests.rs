//! JSON shape tests for the Innova API types.
//!
//! These pin the wire format: field names, enum spellings, and the
//! boundary validation in `ResponseRequest::to_parts`.

#![allow(clippy::unwrap_used, clippy::panic)]

use innova::api::{
    ChecklistRequest, CreateProjectRequest, FinalizeRequest, HealthResponse, ImportRequest,
    ProjectQuery, ResponseOutcome, ResponseRequest, ReviewRequest,
};
use innova_core::{Answer, InnovaError, LevelOutcome, LevelStatus, TriState};
use serde_json::json;

// =============================================================================
// REQUEST PARSING
// =============================================================================

#[test]
fn response_request_minimal_fields() {
    let request: ResponseRequest = serde_json::from_value(json!({
        "project_id": 1,
        "dimension": "CRL",
        "level": 3
    }))
    .unwrap();

    assert_eq!(request.question, None);
    assert_eq!(request.answer, None);
    assert_eq!(request.evidence, None);

    let parts = request.to_parts().unwrap();
    assert_eq!(parts.dimension.as_str(), "CRL");
    assert_eq!(parts.level.value(), 3);
    assert_eq!(parts.answer, None);
    assert!(parts.evidence.is_blank());
}

#[test]
fn response_request_normalizes_spellings() {
    let request: ResponseRequest = serde_json::from_value(json!({
        "project_id": 1,
        "dimension": " CRL ",
        "level": 1,
        "question": 2,
        "answer": "verdadero",
        "evidence": "archived notes"
    }))
    .unwrap();

    let parts = request.to_parts().unwrap();
    assert_eq!(parts.dimension.as_str(), "CRL");
    assert_eq!(parts.answer, Some(Answer::True));
    assert_eq!(parts.question.map(|q| q.value()), Some(2));
}

#[test]
fn response_request_rejects_unknown_spelling() {
    let request: ResponseRequest = serde_json::from_value(json!({
        "project_id": 1,
        "dimension": "CRL",
        "level": 1,
        "answer": "Sí"
    }))
    .unwrap();

    assert!(matches!(
        request.to_parts(),
        Err(InnovaError::InvalidInput(_))
    ));
}

#[test]
fn response_request_empty_answer_clears() {
    let request: ResponseRequest = serde_json::from_value(json!({
        "project_id": 1,
        "dimension": "CRL",
        "level": 1,
        "answer": "  "
    }))
    .unwrap();

    let parts = request.to_parts().unwrap();
    assert_eq!(parts.answer, None);
}

#[test]
fn response_request_rejects_blank_dimension() {
    let request: ResponseRequest = serde_json::from_value(json!({
        "project_id": 1,
        "dimension": "  ",
        "level": 1
    }))
    .unwrap();

    assert!(request.to_parts().is_err());
}

#[test]
fn response_request_rejects_oversized_evidence() {
    let request: ResponseRequest = serde_json::from_value(json!({
        "project_id": 1,
        "dimension": "CRL",
        "level": 1,
        "answer": "TRUE",
        "evidence": "x".repeat(5000)
    }))
    .unwrap();

    assert!(matches!(
        request.to_parts(),
        Err(InnovaError::InvalidInput(_))
    ));
}

// =============================================================================
// ENUM SPELLINGS
// =============================================================================

#[test]
fn tristate_wire_spellings() {
    let request: ChecklistRequest = serde_json::from_value(json!({
        "project_id": 1,
        "characteristic": 9,
        "answer": "in_progress"
    }))
    .unwrap();
    assert_eq!(request.answer, Some(TriState::InProgress));

    // null clears the characteristic.
    let request: ChecklistRequest = serde_json::from_value(json!({
        "project_id": 1,
        "characteristic": 9,
        "answer": null
    }))
    .unwrap();
    assert_eq!(request.answer, None);
}

#[test]
fn level_status_wire_spellings() {
    assert_eq!(
        serde_json::to_value(LevelStatus::NeedsEvidence).unwrap(),
        json!("needs_evidence")
    );
    assert_eq!(
        serde_json::to_value(LevelStatus::UnderReview).unwrap(),
        json!("under_review")
    );
}

// =============================================================================
// RESPONSE SHAPES
// =============================================================================

#[test]
fn response_outcome_shape() {
    let outcome = ResponseOutcome::success(LevelOutcome {
        status: LevelStatus::Complete,
        in_calculation: true,
        dimension_score: 4,
    });
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["success"], json!(true));
    assert_eq!(value["status"], json!("complete"));
    assert_eq!(value["in_calculation"], json!(true));
    assert_eq!(value["dimension_score"], json!(4));
    assert_eq!(value["error"], json!(null));
}

#[test]
fn response_outcome_error_shape() {
    let outcome = ResponseOutcome::error("Unknown dimension: XRL");
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["success"], json!(false));
    assert_eq!(value["status"], json!(null));
    assert_eq!(value["error"], json!("Unknown dimension: XRL"));
}

#[test]
fn health_response_defaults() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// MISCELLANEOUS REQUESTS
// =============================================================================

#[test]
fn misc_requests_parse() {
    let request: CreateProjectRequest =
        serde_json::from_value(json!({ "name": "Solar membrane" })).unwrap();
    assert_eq!(request.name, "Solar membrane");

    let request: ReviewRequest = serde_json::from_value(json!({
        "project_id": 1,
        "dimension": "CRL",
        "level": 2,
        "under_review": true
    }))
    .unwrap();
    assert!(request.under_review);

    let request: FinalizeRequest =
        serde_json::from_value(json!({ "project_id": 1 })).unwrap();
    assert_eq!(request.label, None);

    let query: ProjectQuery = serde_json::from_value(json!({ "project_id": 7 })).unwrap();
    assert_eq!(query.project_id, 7);

    let request: ImportRequest = serde_json::from_value(json!({
        "project_id": 1,
        "rows": [
            { "dimension": "CRL", "level": 1, "answer": "TRUE", "evidence": "" }
        ]
    }))
    .unwrap();
    assert_eq!(request.rows.len(), 1);
    assert_eq!(request.rows[0].question, None);
}
