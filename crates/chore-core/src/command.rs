//! The statement builder: (method, body, subject) → exactly one command.
//!
//! A command is a fully-built, ready-to-execute data-access operation.
//! Values travel as typed fields and are bound as statement parameters by
//! the executing store; nothing is ever spliced into statement text.

use crate::{
  Error, Result,
  identity::SubjectId,
  request::{Method, RequestBody},
};

/// One data-access operation. Built once per request, never reused.
///
/// A command carries either an id-scoped or an owner-scoped predicate,
/// never both; the branch is chosen by [`Command::build`] from the
/// presence of an explicit id in the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  FetchById { id: i64 },
  FetchByOwner { owner: SubjectId },
  UpdateDescription { id: i64, description: String },
  UpdateStatus { id: i64, completed: bool },
  Insert {
    owner:       SubjectId,
    description: String,
    completed:   bool,
  },
  DeleteById { id: i64 },
  DeleteByOwner { owner: SubjectId },
}

impl Command {
  /// Select exactly one command from the dispatch table.
  ///
  /// | Method | Body shape           | Command            |
  /// |--------|----------------------|--------------------|
  /// | fetch  | `id` present         | fetch-by-id        |
  /// | fetch  | `id` absent          | fetch-by-owner     |
  /// | update | `description` present | update-description |
  /// | update | `isCompleted` present | update-status      |
  /// | insert | `description` required | insert           |
  /// | delete | `id` present         | delete-by-id       |
  /// | delete | `id` absent          | delete-by-owner    |
  ///
  /// An empty `description` still selects the description branch: presence
  /// decides, not truthiness. The insert owner always comes from the
  /// resolved subject.
  pub fn build(
    method: Method,
    body: Option<&RequestBody>,
    subject: &SubjectId,
  ) -> Result<Self> {
    match method {
      Method::Fetch => Ok(match body.and_then(|b| b.id) {
        Some(id) => Self::FetchById { id },
        None => Self::FetchByOwner { owner: subject.clone() },
      }),

      Method::Update => {
        let body = body.ok_or_else(|| {
          Error::MalformedRequest("update requires a body".into())
        })?;
        let id = body.id.ok_or_else(|| {
          Error::MalformedRequest("update requires an item id".into())
        })?;
        match (&body.description, body.is_completed) {
          (Some(description), _) => Ok(Self::UpdateDescription {
            id,
            description: description.clone(),
          }),
          (None, Some(completed)) => Ok(Self::UpdateStatus { id, completed }),
          (None, None) => Err(Error::MalformedRequest(
            "update requires a description or isCompleted".into(),
          )),
        }
      }

      Method::Insert => {
        let body = body.ok_or_else(|| {
          Error::MalformedRequest("insert requires a body".into())
        })?;
        let description = body.description.clone().ok_or_else(|| {
          Error::MalformedRequest("insert requires a description".into())
        })?;
        Ok(Self::Insert {
          owner:       subject.clone(),
          description,
          completed:   body.is_completed.unwrap_or(false),
        })
      }

      Method::Delete => Ok(match body.and_then(|b| b.id) {
        Some(id) => Self::DeleteById { id },
        None => Self::DeleteByOwner { owner: subject.clone() },
      }),
    }
  }

  /// Short label for logging.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::FetchById { .. } => "fetch_by_id",
      Self::FetchByOwner { .. } => "fetch_by_owner",
      Self::UpdateDescription { .. } => "update_description",
      Self::UpdateStatus { .. } => "update_status",
      Self::Insert { .. } => "insert",
      Self::DeleteById { .. } => "delete_by_id",
      Self::DeleteByOwner { .. } => "delete_by_owner",
    }
  }

  /// Whether executing this command produces a result set.
  pub fn returns_rows(&self) -> bool {
    matches!(self, Self::FetchById { .. } | Self::FetchByOwner { .. })
  }
}
