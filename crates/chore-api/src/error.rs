//! API error taxonomy and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error raised anywhere in the request pipeline.
///
/// All four kinds are terminal for the current request; none are retried.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The delegated token could not be validated or exchanged.
  #[error("identity resolution failed: {0}")]
  IdentityResolution(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A required field for the selected branch is missing, or the body is
  /// not usable at all.
  #[error("malformed request: {0}")]
  MalformedRequest(String),

  #[error("unsupported method: {0}")]
  UnsupportedMethod(String),

  /// Connection or statement failure in the store.
  #[error("store execution failed: {0}")]
  StoreExecution(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<chore_core::Error> for ApiError {
  fn from(e: chore_core::Error) -> Self {
    match e {
      chore_core::Error::MalformedRequest(m) => Self::MalformedRequest(m),
      chore_core::Error::UnsupportedMethod(m) => Self::UnsupportedMethod(m),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    // One generic failure status for every kind; the message carries the
    // distinction.
    (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(json!({ "error": self.to_string() })),
    )
      .into_response()
  }
}
