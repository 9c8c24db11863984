//! Best-effort incoming-webhook notifier for item creation.

use std::time::Duration;

use reqwest::Client;

/// Fires one POST per created item at the configured webhook URL.
///
/// Strictly fire-and-forget: delivery failure is logged and never reaches
/// the caller. With no URL configured every call is a no-op.
#[derive(Clone)]
pub struct WebhookNotifier {
  http: Client,
  url:  Option<String>,
}

impl WebhookNotifier {
  pub fn new(url: Option<String>) -> reqwest::Result<Self> {
    let http = Client::builder()
      .timeout(Duration::from_secs(10))
      .build()?;
    Ok(Self { http, url })
  }

  pub async fn item_created(&self, description: &str) {
    let Some(url) = &self.url else { return };

    let payload = serde_json::json!({
      "text": format!("New to-do item is created: {description}"),
    });

    match self.http.post(url).json(&payload).send().await {
      Ok(resp) if resp.status().is_success() => {}
      Ok(resp) => {
        tracing::warn!(status = %resp.status(), "webhook notification rejected");
      }
      Err(e) => tracing::warn!(error = %e, "webhook notification failed"),
    }
  }
}
