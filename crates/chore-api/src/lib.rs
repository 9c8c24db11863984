//! HTTP boundary for the chore to-do service.
//!
//! Exposes an axum [`Router`] with a single `/items` route backed by any
//! [`CommandExecutor`] and [`IdentityExchange`] pair. Transport and TLS
//! concerns are the caller's responsibility.

pub mod error;
pub mod items;
pub mod notify;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::any};
use chore_core::{executor::CommandExecutor, identity::IdentityExchange};
use chore_identity::IdentityConfig;
use serde::Deserialize;

use notify::WebhookNotifier;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  pub store_path:  PathBuf,
  /// Optional incoming-webhook URL notified on item creation.
  pub webhook_url: Option<String>,
  pub identity:    IdentityConfig,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the handler.
#[derive(Clone)]
pub struct AppState<S, I> {
  pub store:    Arc<S>,
  pub identity: Arc<I>,
  pub notifier: Arc<WebhookNotifier>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the service.
///
/// The route is registered with [`any`] and dispatched manually inside the
/// handler so that verbs outside the recognised four stay observable as
/// unsupported-method errors.
pub fn router<S, I>(state: AppState<S, I>) -> Router
where
  S: CommandExecutor + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: IdentityExchange + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/items", any(items::handler::<S, I>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chore_core::identity::SubjectId;
  use chore_store_sqlite::SqliteStore;
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  // ── Stub identity implementations ───────────────────────────────────────

  /// Resolves every token to one fixed subject.
  #[derive(Clone)]
  struct StaticIdentity(SubjectId);

  impl IdentityExchange for StaticIdentity {
    type Error = std::convert::Infallible;

    async fn resolve(
      &self,
      _delegated_token: &str,
    ) -> Result<SubjectId, Self::Error> {
      Ok(self.0.clone())
    }
  }

  #[derive(Debug, thiserror::Error)]
  #[error("token expired")]
  struct Expired;

  /// Rejects every token.
  #[derive(Clone)]
  struct FailingIdentity;

  impl IdentityExchange for FailingIdentity {
    type Error = Expired;

    async fn resolve(
      &self,
      _delegated_token: &str,
    ) -> Result<SubjectId, Self::Error> {
      Err(Expired)
    }
  }

  // ── Helpers ─────────────────────────────────────────────────────────────

  fn state_for<I: IdentityExchange>(
    store: SqliteStore,
    identity: I,
    webhook_url: Option<String>,
  ) -> AppState<SqliteStore, I> {
    AppState {
      store:    Arc::new(store),
      identity: Arc::new(identity),
      notifier: Arc::new(WebhookNotifier::new(webhook_url).unwrap()),
    }
  }

  async fn make_state(
    subject: &str,
  ) -> (TempDir, AppState<SqliteStore, StaticIdentity>) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("items.db")).await.unwrap();
    let state = state_for(
      store,
      StaticIdentity(SubjectId::new(subject).unwrap()),
      None,
    );
    (dir, state)
  }

  /// The same store seen through a different resolved subject.
  fn as_subject(
    state: &AppState<SqliteStore, StaticIdentity>,
    subject: &str,
  ) -> AppState<SqliteStore, StaticIdentity> {
    state_for(
      (*state.store).clone(),
      StaticIdentity(SubjectId::new(subject).unwrap()),
      None,
    )
  }

  async fn send<I>(
    state: AppState<SqliteStore, I>,
    method: &str,
    body: Option<serde_json::Value>,
    with_token: bool,
  ) -> axum::response::Response
  where
    I: IdentityExchange + Clone + Send + Sync + 'static,
  {
    let mut builder = Request::builder().method(method).uri("/items");
    if with_token {
      builder = builder.header(header::AUTHORIZATION, "Bearer test-token");
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn list(
    state: &AppState<SqliteStore, StaticIdentity>,
  ) -> Vec<serde_json::Value> {
    let resp = send(state.clone(), "GET", None, true).await;
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await.as_array().unwrap().clone()
  }

  // ── Fetch ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn fetch_with_id_returns_only_that_row() {
    let (_dir, state) = make_state("u1").await;
    send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "first"})),
      true,
    )
    .await;
    send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "second"})),
      true,
    )
    .await;

    let id = list(&state).await[0]["id"].as_i64().unwrap();
    let resp = send(
      state.clone(),
      "GET",
      Some(serde_json::json!({ "id": id })),
      true,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let items = json_body(resp).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], serde_json::json!(id));
  }

  #[tokio::test]
  async fn fetch_without_body_scopes_to_the_resolved_subject() {
    let (_dir, state) = make_state("u1").await;
    let other = as_subject(&state, "u2");

    send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "mine"})),
      true,
    )
    .await;
    send(
      other,
      "POST",
      Some(serde_json::json!({"description": "theirs"})),
      true,
    )
    .await;

    let items = list(&state).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["description"], serde_json::json!("mine"));
    assert_eq!(items[0]["ownerId"], serde_json::json!("u1"));
  }

  // ── Update ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_description_leaves_status_untouched() {
    let (_dir, state) = make_state("u1").await;
    send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "old", "isCompleted": true})),
      true,
    )
    .await;
    let id = list(&state).await[0]["id"].as_i64().unwrap();

    let resp = send(
      state.clone(),
      "PUT",
      Some(serde_json::json!({"id": id, "description": "buy milk"})),
      true,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    // Writes acknowledge with an empty row sequence.
    assert_eq!(json_body(resp).await, serde_json::json!([]));

    let items = list(&state).await;
    assert_eq!(items[0]["description"], serde_json::json!("buy milk"));
    assert_eq!(items[0]["isCompleted"], serde_json::json!(true));
  }

  #[tokio::test]
  async fn update_status_leaves_description_untouched() {
    let (_dir, state) = make_state("u1").await;
    send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "buy milk"})),
      true,
    )
    .await;
    let id = list(&state).await[0]["id"].as_i64().unwrap();

    let resp = send(
      state.clone(),
      "PUT",
      Some(serde_json::json!({"id": id, "isCompleted": true})),
      true,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let items = list(&state).await;
    assert_eq!(items[0]["description"], serde_json::json!("buy milk"));
    assert_eq!(items[0]["isCompleted"], serde_json::json!(true));
  }

  #[tokio::test]
  async fn update_with_neither_field_fails() {
    let (_dir, state) = make_state("u1").await;
    let resp = send(
      state,
      "PUT",
      Some(serde_json::json!({"id": 1})),
      true,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err = json_body(resp).await;
    assert!(
      err["error"].as_str().unwrap().contains("malformed request"),
      "error: {err}"
    );
  }

  // ── Insert ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn insert_stamps_owner_from_identity_not_the_client() {
    let (_dir, state) = make_state("u1").await;

    // A client-supplied owner field is dropped on the floor.
    let resp = send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "new task", "ownerId": "mallory"})),
      true,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let items = list(&state).await;
    assert_eq!(items[0]["ownerId"], serde_json::json!("u1"));
    assert_eq!(items[0]["isCompleted"], serde_json::json!(false));
  }

  #[tokio::test]
  async fn insert_without_description_fails() {
    let (_dir, state) = make_state("u1").await;
    let resp = send(
      state,
      "POST",
      Some(serde_json::json!({"isCompleted": true})),
      true,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[tokio::test]
  async fn unreachable_webhook_does_not_fail_the_insert() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("items.db")).await.unwrap();
    // Nothing listens here; delivery will fail after the response is sent.
    let state = state_for(
      store,
      StaticIdentity(SubjectId::new("u1").unwrap()),
      Some("http://127.0.0.1:9/webhook".to_string()),
    );

    let resp = send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "new task"})),
      true,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(state, "GET", None, true).await;
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);
  }

  // ── Delete ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_with_id_is_id_scoped_even_across_subjects() {
    let (_dir, state) = make_state("u1").await;
    send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "doomed"})),
      true,
    )
    .await;
    let id = list(&state).await[0]["id"].as_i64().unwrap();

    // A different resolved subject deletes by explicit id; the predicate
    // is id-based, not owner-based.
    let other = as_subject(&state, "u2");
    let resp =
      send(other, "DELETE", Some(serde_json::json!({ "id": id })), true).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(list(&state).await.is_empty());
  }

  #[tokio::test]
  async fn delete_without_body_scopes_to_the_resolved_subject() {
    let (_dir, state) = make_state("u1").await;
    let other = as_subject(&state, "u2");

    send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "a"})),
      true,
    )
    .await;
    send(
      state.clone(),
      "POST",
      Some(serde_json::json!({"description": "b"})),
      true,
    )
    .await;
    send(
      other.clone(),
      "POST",
      Some(serde_json::json!({"description": "theirs"})),
      true,
    )
    .await;

    let resp = send(state.clone(), "DELETE", None, true).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(list(&state).await.is_empty());
    assert_eq!(list(&other).await.len(), 1);
  }

  // ── Failure translation ─────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_token_is_rejected() {
    let (_dir, state) = make_state("u1").await;
    let resp = send(state, "GET", None, false).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err = json_body(resp).await;
    assert!(
      err["error"].as_str().unwrap().contains("bearer token"),
      "error: {err}"
    );
  }

  #[tokio::test]
  async fn identity_failure_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("items.db")).await.unwrap();
    let state = state_for(store, FailingIdentity, None);

    let resp = send(state, "GET", None, true).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err = json_body(resp).await;
    assert!(
      err["error"]
        .as_str()
        .unwrap()
        .contains("identity resolution failed"),
      "error: {err}"
    );
  }

  #[tokio::test]
  async fn unsupported_verb_is_rejected() {
    let (_dir, state) = make_state("u1").await;
    let resp = send(state, "PATCH", None, true).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err = json_body(resp).await;
    assert!(
      err["error"].as_str().unwrap().contains("unsupported method"),
      "error: {err}"
    );
  }

  #[tokio::test]
  async fn malformed_json_body_is_rejected() {
    let (_dir, state) = make_state("u1").await;
    let req = Request::builder()
      .method("GET")
      .uri("/items")
      .header(header::AUTHORIZATION, "Bearer test-token")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("not json"))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
