//! Rendering a [`Command`] to parameterized SQL.
//!
//! Statement text is always a `&'static str`; request values and subject
//! identifiers travel exclusively through the parameter list.

use chore_core::command::Command;
use rusqlite::types::Value;

const FETCH_BY_ID: &str = "SELECT id, description, is_completed AS isCompleted, \
   owner_id AS ownerId FROM items WHERE id = ?1";
const FETCH_BY_OWNER: &str = "SELECT id, description, is_completed AS isCompleted, \
   owner_id AS ownerId FROM items WHERE owner_id = ?1";

/// Map a command to its statement text and bound parameters.
pub(crate) fn render(command: &Command) -> (&'static str, Vec<Value>) {
  match command {
    Command::FetchById { id } => (FETCH_BY_ID, vec![Value::Integer(*id)]),

    Command::FetchByOwner { owner } => {
      (FETCH_BY_OWNER, vec![Value::Text(owner.as_str().to_string())])
    }

    Command::UpdateDescription { id, description } => (
      "UPDATE items SET description = ?1 WHERE id = ?2",
      vec![Value::Text(description.clone()), Value::Integer(*id)],
    ),

    Command::UpdateStatus { id, completed } => (
      "UPDATE items SET is_completed = ?1 WHERE id = ?2",
      vec![Value::Integer(i64::from(*completed)), Value::Integer(*id)],
    ),

    Command::Insert { owner, description, completed } => (
      "INSERT INTO items (description, owner_id, is_completed) \
       VALUES (?1, ?2, ?3)",
      vec![
        Value::Text(description.clone()),
        Value::Text(owner.as_str().to_string()),
        Value::Integer(i64::from(*completed)),
      ],
    ),

    Command::DeleteById { id } => {
      ("DELETE FROM items WHERE id = ?1", vec![Value::Integer(*id)])
    }

    Command::DeleteByOwner { owner } => (
      "DELETE FROM items WHERE owner_id = ?1",
      vec![Value::Text(owner.as_str().to_string())],
    ),
  }
}
