//! # Gated Feedback
//!
//! Feedback is accepted only from a member of a signing ring who can
//! prove a claim against the subject's current root. The log stores the
//! payload digest, never the payload.
//!
//! ## Endpoints
//!
//! - `POST /v1/feedback`: Submit feedback.
//! - `GET /v1/subjects/{subject}/feedback`: Page through the log.
//! - `GET /v1/subjects/{subject}/feedback/{index}`: One entry.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use certgate_core::{PayloadDigest, SubjectId};
use certgate_registry::ClaimSubmission;

use crate::error::AppError;
use crate::extractors::{extract_json, parse_subject};
use crate::state::AppState;

/// Page size when the caller gives none.
const DEFAULT_PAGE_LIMIT: usize = 50;
/// Largest page a caller may request.
const MAX_PAGE_LIMIT: usize = 500;

/// Response from `POST /v1/feedback`.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub subject: SubjectId,
    /// Position of the new entry in the subject's log.
    pub index: usize,
    pub digest: PayloadDigest,
}

/// Pagination parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: usize,
    pub limit: Option<usize>,
}

/// A page of a subject's feedback log.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackPage {
    pub subject: SubjectId,
    /// Total entries in the log.
    pub total: usize,
    pub offset: usize,
    pub entries: Vec<PayloadDigest>,
}

/// A single log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub index: usize,
    pub digest: PayloadDigest,
}

/// Build the feedback router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/feedback", post(add_feedback))
        .route("/v1/subjects/{subject}/feedback", get(list_feedback))
        .route("/v1/subjects/{subject}/feedback/{index}", get(feedback_at))
}

/// POST /v1/feedback: Verify the claim and ring signature, then log the digest.
async fn add_feedback(
    State(state): State<AppState>,
    body: Result<Json<ClaimSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    let submission = extract_json(body)?;
    let index = state.with_ledger(|ledger| ledger.add_feedback(&submission))?;
    Ok((
        StatusCode::CREATED,
        Json(FeedbackResponse {
            digest: submission.payload_digest(),
            subject: submission.subject,
            index,
        }),
    ))
}

/// GET /v1/subjects/{subject}/feedback: Page through the log.
async fn list_feedback(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<FeedbackPage>, AppError> {
    let subject = parse_subject(&subject)?;
    let limit = page.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit > MAX_PAGE_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must not exceed {MAX_PAGE_LIMIT}"
        )));
    }
    let (total, entries) = state.with_ledger(|ledger| {
        (
            ledger.feedback_count(&subject),
            ledger.feedbacks(&subject, page.offset, limit),
        )
    });
    Ok(Json(FeedbackPage {
        subject,
        total,
        offset: page.offset,
        entries,
    }))
}

/// GET /v1/subjects/{subject}/feedback/{index}: One entry.
async fn feedback_at(
    State(state): State<AppState>,
    Path((subject, index)): Path<(String, usize)>,
) -> Result<Json<FeedbackEntry>, AppError> {
    let subject = parse_subject(&subject)?;
    let digest = state
        .with_ledger(|ledger| ledger.feedback_at(&subject, index))
        .ok_or_else(|| AppError::NotFound(format!("no feedback {index} for {subject}")))?;
    Ok(Json(FeedbackEntry { index, digest }))
}
