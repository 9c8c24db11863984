//! Error type for `chore-identity`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The inbound delegated token is required and non-empty; rejected
  /// locally before any network call.
  #[error("delegated token is empty")]
  EmptyToken,

  #[error("token endpoint request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The provider answered, but refused the exchange.
  #[error("identity provider rejected the exchange ({status}): {message}")]
  Provider { status: u16, message: String },

  #[error("malformed token: {0}")]
  MalformedToken(String),

  #[error("exchanged token carries no usable subject claim")]
  MissingSubjectClaim,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
