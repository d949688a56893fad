//! # Gated Credential Issuance
//!
//! The same gate as feedback, with a mint instead of a log append.
//!
//! ## Endpoints
//!
//! - `POST /v1/credentials`: Issue a credential.
//! - `GET /v1/subjects/{subject}/credentials/{token_id}`: A minted token.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use certgate_core::{PayloadDigest, SubjectId};
use certgate_registry::{ClaimSubmission, MintedToken, TokenId};

use crate::error::AppError;
use crate::extractors::{extract_json, parse_subject};
use crate::state::AppState;

/// Response from `POST /v1/credentials`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueResponse {
    pub subject: SubjectId,
    pub token_id: TokenId,
    pub payload_digest: PayloadDigest,
}

/// Build the credentials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/credentials", post(issue_credential))
        .route(
            "/v1/subjects/{subject}/credentials/{token_id}",
            get(get_credential),
        )
}

/// POST /v1/credentials: Verify the claim and ring signature, then mint.
async fn issue_credential(
    State(state): State<AppState>,
    body: Result<Json<ClaimSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<IssueResponse>), AppError> {
    let submission = extract_json(body)?;
    let token_id = state.with_ledger(|ledger| ledger.issue_credential(&submission))?;
    Ok((
        StatusCode::CREATED,
        Json(IssueResponse {
            payload_digest: submission.payload_digest(),
            subject: submission.subject,
            token_id,
        }),
    ))
}

/// GET /v1/subjects/{subject}/credentials/{token_id}: A minted token.
async fn get_credential(
    State(state): State<AppState>,
    Path((subject, token_id)): Path<(String, TokenId)>,
) -> Result<Json<MintedToken>, AppError> {
    let subject = parse_subject(&subject)?;
    state
        .with_ledger(|ledger| ledger.credential(&subject, token_id).cloned())
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no credential {token_id} for {subject}")))
}
