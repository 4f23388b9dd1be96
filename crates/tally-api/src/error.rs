//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error response body has the shape
//! `{"error": {"kind": ..., "message": ...}}` so clients can branch on the
//! machine-checkable kind without parsing messages.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use tally_core::ErrorKind;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing or malformed principal headers.
  #[error("unauthorized: {0}")]
  Unauthorized(&'static str),

  /// Malformed request outside the domain's own validation.
  #[error("bad request: {0}")]
  BadRequest(&'static str),

  /// A domain error; status and kind come from [`tally_core::Error::kind`].
  #[error(transparent)]
  Domain(#[from] tally_core::Error),
}

fn domain_status(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::Validation => StatusCode::BAD_REQUEST,
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::Conflict => StatusCode::CONFLICT,
    ErrorKind::Authorization => StatusCode::FORBIDDEN,
    ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, kind, message) = match &self {
      ApiError::Unauthorized(m) => {
        (StatusCode::UNAUTHORIZED, json!("unauthorized"), (*m).to_string())
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, json!(ErrorKind::Validation), (*m).to_string())
      }
      ApiError::Domain(e) => (domain_status(e.kind()), json!(e.kind()), e.to_string()),
    };
    (
      status,
      Json(json!({ "error": { "kind": kind, "message": message } })),
    )
      .into_response()
  }
}
