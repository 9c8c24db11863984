//! Subject identity: the resolved caller, and the exchange seam.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

/// The opaque, verified identity of the requesting user.
///
/// Guaranteed non-empty; owner-scoped statements bind this value as their
/// predicate, and an empty owner would silently match nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
  /// Returns `None` for an empty identifier.
  pub fn new(id: impl Into<String>) -> Option<Self> {
    let id = id.into();
    if id.is_empty() { None } else { Some(Self(id)) }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for SubjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<SubjectId> for String {
  fn from(id: SubjectId) -> Self {
    id.0
  }
}

/// Abstraction over the on-behalf-of token exchange.
///
/// Implemented by `chore-identity`; test code substitutes stubs. The
/// exchange must complete before any command is built, since the subject
/// id participates in owner-scoped statement construction.
pub trait IdentityExchange: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Trade a delegated token for the caller's subject identifier.
  ///
  /// Fails if the token cannot be validated or exchanged; no partial
  /// identity is ever returned.
  fn resolve<'a>(
    &'a self,
    delegated_token: &'a str,
  ) -> impl Future<Output = Result<SubjectId, Self::Error>> + Send + 'a;
}
