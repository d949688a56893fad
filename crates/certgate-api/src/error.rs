//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps anchor, claim and ledger errors to HTTP status codes and a JSON
//! body carrying a machine-readable code. Internal details are never
//! returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use certgate_anchor::AnchorError;
use certgate_registry::{ClaimError, LedgerError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. `"EMPTY_PROOF"`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body, path, or query could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Anchoring call refused.
    #[error(transparent)]
    Anchor(AnchorError),

    /// Gated submission refused.
    #[error(transparent)]
    Claim(ClaimError),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub(crate) fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Anchor(err) => match err {
                AnchorError::NotAuthorized { .. } => (StatusCode::FORBIDDEN, "NOT_AUTHORIZED"),
                AnchorError::LengthMismatch { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "LENGTH_MISMATCH")
                }
                AnchorError::EmptyQueue { .. } => (StatusCode::NOT_FOUND, "EMPTY_QUEUE"),
                AnchorError::ClockRegression { .. } => (StatusCode::CONFLICT, "CLOCK_REGRESSION"),
                AnchorError::InvalidCapacity(_) | AnchorError::InvalidSnapshot(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
            Self::Claim(err) => match err {
                ClaimError::NoAnchoredState { .. } => (StatusCode::NOT_FOUND, "NO_ANCHORED_STATE"),
                ClaimError::EmptyProof => (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_PROOF"),
                ClaimError::MalformedProof(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_PROOF")
                }
                ClaimError::InclusionFailed { .. } => (StatusCode::FORBIDDEN, "INCLUSION_FAILED"),
                ClaimError::MalformedSignature(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_SIGNATURE")
                }
                ClaimError::BadSignature => (StatusCode::FORBIDDEN, "BAD_SIGNATURE"),
                ClaimError::MintFailed(_) => (StatusCode::CONFLICT, "MINT_FAILED"),
                ClaimError::Anchor(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal server error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AnchorError> for AppError {
    fn from(err: AnchorError) -> Self {
        Self::Anchor(err)
    }
}

impl From<ClaimError> for AppError {
    fn from(err: ClaimError) -> Self {
        Self::Claim(err)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Anchor(e) => Self::Anchor(e),
            LedgerError::Claim(e) => Self::Claim(e),
            other => Self::Internal(other.to_string()),
        }
    }
}
