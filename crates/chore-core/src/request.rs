//! The inbound request boundary: verbs and the optional JSON body.

use serde::Deserialize;

use crate::{Error, Result};

/// The four recognised data-access verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Fetch,
  Update,
  Insert,
  Delete,
}

impl Method {
  /// Map an HTTP verb onto a data-access method.
  ///
  /// Anything outside `GET`/`PUT`/`POST`/`DELETE` is rejected.
  pub fn from_http(verb: &str) -> Result<Self> {
    match verb {
      "GET"    => Ok(Self::Fetch),
      "PUT"    => Ok(Self::Update),
      "POST"   => Ok(Self::Insert),
      "DELETE" => Ok(Self::Delete),
      other    => Err(Error::UnsupportedMethod(other.to_string())),
    }
  }
}

/// The optional JSON request body.
///
/// Every field is optional at the wire level; which ones are required
/// depends on the branch selected by [`Command::build`]. Unknown fields
/// are dropped, so a caller cannot smuggle in an owner of its own.
///
/// [`Command::build`]: crate::command::Command::build
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
  pub id:           Option<i64>,
  pub description:  Option<String>,
  pub is_completed: Option<bool>,
}
