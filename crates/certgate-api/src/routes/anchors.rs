//! # State Anchoring
//!
//! ## Endpoints
//!
//! - `POST /v1/anchors`: Anchor a batch of roots (privileged writer only).
//! - `GET /v1/subjects/{subject}/root`: Current root and its block.
//! - `GET /v1/subjects/{subject}/history`: Retained roots, oldest first.
//! - `GET /v1/subjects/{subject}/roots/{root}`: Block a retained root was anchored in.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use certgate_anchor::StateEntry;
use certgate_core::{ActorId, BlockNumber, FieldElement, SubjectId};

use crate::error::AppError;
use crate::extractors::{extract_json, parse_field, parse_subject};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/anchors`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnchorRequest {
    /// The transaction sender.
    pub caller: ActorId,
    /// Subjects to anchor under, paired by position with `roots`.
    pub subjects: Vec<SubjectId>,
    /// Roots to anchor.
    pub roots: Vec<FieldElement>,
}

/// Response from `POST /v1/anchors`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnchorResponse {
    /// Block the batch was anchored in.
    pub block: BlockNumber,
    /// Number of roots anchored.
    pub anchored: usize,
}

/// A subject's current root.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub subject: SubjectId,
    pub root: FieldElement,
    pub anchored_at_block: BlockNumber,
}

/// A subject's retained history.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub subject: SubjectId,
    pub entries: Vec<StateEntry>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the anchoring router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/anchors", post(append_state))
        .route("/v1/subjects/{subject}/root", get(last_root))
        .route("/v1/subjects/{subject}/history", get(history))
        .route("/v1/subjects/{subject}/roots/{root}", get(anchored_at))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/anchors: Anchor a batch of roots in one block.
async fn append_state(
    State(state): State<AppState>,
    body: Result<Json<AnchorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AnchorResponse>), AppError> {
    let req = extract_json(body)?;
    let block = state.with_ledger(|ledger| {
        ledger.append_state(&req.caller, &req.subjects, &req.roots)
    })?;
    Ok((
        StatusCode::CREATED,
        Json(AnchorResponse {
            block,
            anchored: req.roots.len(),
        }),
    ))
}

/// GET /v1/subjects/{subject}/root: Current root.
async fn last_root(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<RootResponse>, AppError> {
    let subject = parse_subject(&subject)?;
    let (root, anchored_at_block) = state.with_ledger(|ledger| {
        Ok::<_, AppError>((ledger.last_root(&subject)?, ledger.last_block(&subject)?))
    })?;
    Ok(Json(RootResponse {
        subject,
        root,
        anchored_at_block,
    }))
}

/// GET /v1/subjects/{subject}/history: Retained roots, oldest first.
///
/// A subject that was never anchored has an empty history, not a 404.
async fn history(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let subject = parse_subject(&subject)?;
    let entries = state.with_ledger(|ledger| ledger.history(&subject));
    Ok(Json(HistoryResponse { subject, entries }))
}

/// GET /v1/subjects/{subject}/roots/{root}: Block a retained root was anchored in.
async fn anchored_at(
    State(state): State<AppState>,
    Path((subject, root)): Path<(String, String)>,
) -> Result<Json<StateEntry>, AppError> {
    let subject = parse_subject(&subject)?;
    let root = parse_field(&root)?;
    let block = state
        .with_ledger(|ledger| ledger.anchored_at(&subject, &root))
        .ok_or_else(|| AppError::NotFound(format!("root {root} is not retained for {subject}")))?;
    Ok(Json(StateEntry {
        root,
        anchored_at_block: block,
    }))
}
