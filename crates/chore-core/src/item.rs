//! The persisted to-do item.

use serde::{Deserialize, Deserializer, Serialize};

/// One row of the `items` table in its wire shape.
///
/// `is_completed` is stored as an INTEGER 0/1; deserialisation accepts the
/// store's native integers as well as JSON booleans so rows can be decoded
/// without a translation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
  /// Server-assigned, unique.
  pub id:           i64,
  pub description:  String,
  #[serde(deserialize_with = "bool_from_sql")]
  pub is_completed: bool,
  /// The subject identifier stamped at insert time.
  pub owner_id:     String,
}

fn bool_from_sql<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  struct SqlBool;

  impl serde::de::Visitor<'_> for SqlBool {
    type Value = bool;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
      f.write_str("a boolean or a 0/1 integer")
    }

    fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<bool, E> {
      Ok(v)
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<bool, E> {
      Ok(v != 0)
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<bool, E> {
      Ok(v != 0)
    }
  }

  deserializer.deserialize_any(SqlBool)
}
