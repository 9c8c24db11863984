//! [`SqliteStore`] — the SQLite implementation of [`CommandExecutor`].

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use chore_core::{
  command::Command,
  executor::{CommandExecutor, Row},
};
use tokio::time::timeout;

use crate::{Error, Result, schema::SCHEMA, statement};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A command executor backed by a single SQLite file.
///
/// Holds no live connection: each [`execute`](CommandExecutor::execute)
/// call opens a fresh single-use connection and releases it before
/// returning. Cloning is cheap.
#[derive(Clone)]
pub struct SqliteStore {
  path:              PathBuf,
  statement_timeout: Duration,
}

impl SqliteStore {
  /// Open (or create) the database at `path` and run schema
  /// initialisation, proving the path is usable before any request
  /// arrives.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self {
      path:              path.as_ref().to_path_buf(),
      statement_timeout: DEFAULT_TIMEOUT,
    };

    let conn = store.connect().await?;
    let result = conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::Database);
    store.release(conn).await;
    result?;

    Ok(store)
  }

  /// Override the bound applied to connection open and statement
  /// completion.
  pub fn with_statement_timeout(mut self, bound: Duration) -> Self {
    self.statement_timeout = bound;
    self
  }

  async fn connect(&self) -> Result<tokio_rusqlite::Connection> {
    let conn = timeout(
      self.statement_timeout,
      tokio_rusqlite::Connection::open(self.path.clone()),
    )
    .await
    .map_err(|_| Error::Timeout("opening connection"))?
    .map_err(Error::Database)?;

    tracing::debug!(path = %self.path.display(), "connection opened");
    Ok(conn)
  }

  /// Release a connection. A close failure cannot un-run anything that
  /// already happened; it is logged and otherwise ignored.
  async fn release(&self, conn: tokio_rusqlite::Connection) {
    match conn.close().await {
      Ok(()) => tracing::debug!("connection closed"),
      Err(e) => tracing::debug!(error = %e, "connection close failed"),
    }
  }
}

impl CommandExecutor for SqliteStore {
  type Error = Error;

  async fn execute(&self, command: Command) -> Result<Vec<Row>> {
    // Open failure means no connection ever existed; there is nothing to
    // release on that path.
    let conn = self.connect().await?;

    let result = timeout(self.statement_timeout, run_statement(&conn, command))
      .await
      .unwrap_or(Err(Error::Timeout("executing statement")));

    self.release(conn).await;
    result
  }
}

async fn run_statement(
  conn: &tokio_rusqlite::Connection,
  command: Command,
) -> Result<Vec<Row>> {
  let (sql, params) = statement::render(&command);
  let wants_rows = command.returns_rows();
  tracing::debug!(command = command.kind(), "executing statement");

  conn
    .call(move |conn| {
      if wants_rows {
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> =
          stmt.column_names().iter().map(|n| n.to_string()).collect();

        let mut rows = stmt.query(rusqlite::params_from_iter(params))?;
        let mut out = Vec::new();
        // All-or-nothing: an error here abandons everything accumulated.
        while let Some(row) = rows.next()? {
          let mut map = Row::new();
          for (i, name) in columns.iter().enumerate() {
            map.insert(name.clone(), column_value(row.get_ref(i)?));
          }
          out.push(map);
        }
        Ok(out)
      } else {
        conn.execute(sql, rusqlite::params_from_iter(params))?;
        Ok(Vec::new())
      }
    })
    .await
    .map_err(Error::Database)
}

fn column_value(value: rusqlite::types::ValueRef<'_>) -> serde_json::Value {
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use rusqlite::types::ValueRef;

  match value {
    ValueRef::Null => serde_json::Value::Null,
    ValueRef::Integer(i) => serde_json::Value::from(i),
    ValueRef::Real(f) => serde_json::Value::from(f),
    ValueRef::Text(t) => {
      serde_json::Value::from(String::from_utf8_lossy(t).into_owned())
    }
    ValueRef::Blob(b) => serde_json::Value::from(B64.encode(b)),
  }
}
