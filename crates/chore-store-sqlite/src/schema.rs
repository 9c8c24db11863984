//! SQL schema for the chore items store.
//!
//! Executed once at store construction. Future migrations will be gated
//! on `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS items (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    description  TEXT    NOT NULL,
    is_completed INTEGER NOT NULL DEFAULT 0,   -- 0/1
    owner_id     TEXT    NOT NULL              -- subject identifier
);

CREATE INDEX IF NOT EXISTS items_owner_idx ON items(owner_id);

PRAGMA user_version = 1;
";
