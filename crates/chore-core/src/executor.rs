//! The `CommandExecutor` trait and the row shape it produces.

use std::future::Future;

use crate::command::Command;

/// One result row: a name-keyed map from column name to column value.
/// The store's native column order is not preserved.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Abstraction over a store that can run one [`Command`] to completion.
///
/// Implementations own the full connection lifecycle for each call: one
/// connection is opened, the statement runs at most once, and the
/// connection is released on every exit path. Execution is all-or-nothing;
/// a failure mid-stream discards any accumulated rows.
pub trait CommandExecutor: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run `command` and return its result rows (empty for statements with
  /// no result set).
  fn execute(
    &self,
    command: Command,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send + '_;
}
