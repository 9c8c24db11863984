//! Error types for `chore-core`.

use thiserror::Error;

/// Failures raised while turning an inbound request into a [`Command`].
///
/// [`Command`]: crate::command::Command
#[derive(Debug, Error)]
pub enum Error {
  /// A required field for the selected branch is missing.
  #[error("malformed request: {0}")]
  MalformedRequest(String),

  /// The verb is not one of the four recognised methods.
  #[error("unsupported method: {0}")]
  UnsupportedMethod(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
