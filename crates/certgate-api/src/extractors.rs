//! # Extractors
//!
//! Helpers that turn rejected JSON bodies and unparsable path segments
//! into [`AppError::BadRequest`] instead of axum's plain-text rejections.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use certgate_core::{FieldElement, SubjectId};

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to
/// [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse a hex subject from a path segment.
pub fn parse_subject(raw: &str) -> Result<SubjectId, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("invalid subject {raw:?}: {e}")))
}

/// Parse a field element (hex or decimal) from a path segment.
pub fn parse_field(raw: &str) -> Result<FieldElement, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("invalid field element {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_parse_errors_are_bad_requests() {
        assert!(parse_subject("0x636f75727365").is_ok());
        assert!(matches!(parse_subject("zz"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_subject("0x"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn field_accepts_hex_and_decimal() {
        assert_eq!(parse_field("0x10").unwrap(), parse_field("16").unwrap());
        assert!(parse_field("0xnothex").is_err());
    }
}
