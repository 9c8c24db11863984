//! The `/items` pipeline: token → identity → command → execution → JSON.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Request, State},
  http::{HeaderMap, header},
  response::{IntoResponse, Response},
};
use chore_core::{
  command::Command,
  executor::CommandExecutor,
  identity::IdentityExchange,
  item::Item,
  request::{Method, RequestBody},
};

use crate::{AppState, error::ApiError};

/// Bodies are small JSON objects; anything past this is not a to-do item.
const BODY_LIMIT: usize = 64 * 1024;

/// `ANY /items` — dispatched manually so an unrecognised verb surfaces as
/// an unsupported-method error rather than a bare routing rejection.
pub async fn handler<S, I>(
  State(state): State<AppState<S, I>>,
  req: Request,
) -> Response
where
  S: CommandExecutor + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: IdentityExchange + Clone + Send + Sync + 'static,
{
  match run_pipeline(&state, req).await {
    Ok(resp) => resp,
    Err(e) => e.into_response(),
  }
}

async fn run_pipeline<S, I>(
  state: &AppState<S, I>,
  req: Request,
) -> Result<Response, ApiError>
where
  S: CommandExecutor,
  S::Error: std::error::Error + Send + Sync + 'static,
  I: IdentityExchange,
{
  let method = Method::from_http(req.method().as_str())?;
  let token = bearer_token(req.headers())?.to_string();
  let body = collect_body(req).await?;

  // Identity resolves before any command is built; the subject id
  // participates in owner-scoped statement construction.
  let subject = state
    .identity
    .resolve(&token)
    .await
    .map_err(|e| ApiError::IdentityResolution(Box::new(e)))?;

  let command = Command::build(method, body.as_ref(), &subject)?;
  tracing::debug!(command = command.kind(), subject = %subject, "dispatching");

  let created = match &command {
    Command::Insert { description, .. } => Some(description.clone()),
    _ => None,
  };

  let rows = state
    .store
    .execute(command)
    .await
    .map_err(|e| ApiError::StoreExecution(Box::new(e)))?;

  if let Some(description) = created {
    // Detached task: delivery is best-effort and never blocks the
    // response.
    let notifier = Arc::clone(&state.notifier);
    tokio::spawn(async move { notifier.item_created(&description).await });
  }

  let items = rows
    .into_iter()
    .map(|row| serde_json::from_value::<Item>(serde_json::Value::Object(row)))
    .collect::<Result<Vec<_>, _>>()
    .map_err(|e| ApiError::StoreExecution(Box::new(e)))?;

  Ok(Json(items).into_response())
}

/// The delegated token travels out-of-band in the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or_else(|| ApiError::MalformedRequest("missing bearer token".into()))
}

/// Read the optional JSON body. Fetch and delete legitimately arrive with
/// no body at all; an unreadable or oversized body is malformed.
async fn collect_body(req: Request) -> Result<Option<RequestBody>, ApiError> {
  let bytes = axum::body::to_bytes(req.into_body(), BODY_LIMIT)
    .await
    .map_err(|_| ApiError::MalformedRequest("request body too large".into()))?;

  if bytes.is_empty() {
    return Ok(None);
  }

  serde_json::from_slice(&bytes)
    .map(Some)
    .map_err(|e| ApiError::MalformedRequest(format!("invalid JSON body: {e}")))
}
