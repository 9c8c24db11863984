//! [`OnBehalfOfClient`] — the reqwest-backed token exchange.

use std::time::Duration;

use chore_core::identity::{IdentityExchange, SubjectId};
use reqwest::Client;
use serde::Deserialize;

use crate::{Error, Result, claims};

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Connection settings for the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
  /// Full URL of the provider's OAuth2 token endpoint.
  pub token_endpoint: String,
  pub client_id:      String,
  pub client_secret:  String,
  /// Scope requested for the exchanged credential.
  pub scope:          String,
}

/// On-behalf-of exchange client.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OnBehalfOfClient {
  http:   Client,
  config: IdentityConfig,
}

/// The provider's success payload. Only the exchanged token is read.
#[derive(Deserialize)]
struct TokenResponse {
  access_token: String,
}

/// The provider's error payload; both fields are optional in the wild.
#[derive(Deserialize)]
struct ProviderError {
  error:             Option<String>,
  error_description: Option<String>,
}

impl OnBehalfOfClient {
  pub fn new(config: IdentityConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { http, config })
  }
}

impl IdentityExchange for OnBehalfOfClient {
  type Error = Error;

  async fn resolve(&self, delegated_token: &str) -> Result<SubjectId> {
    if delegated_token.is_empty() {
      return Err(Error::EmptyToken);
    }

    let form = [
      ("grant_type", GRANT_TYPE),
      ("requested_token_use", "on_behalf_of"),
      ("client_id", self.config.client_id.as_str()),
      ("client_secret", self.config.client_secret.as_str()),
      ("scope", self.config.scope.as_str()),
      ("assertion", delegated_token),
    ];

    let resp = self
      .http
      .post(&self.config.token_endpoint)
      .form(&form)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let message = resp
        .json::<ProviderError>()
        .await
        .ok()
        .and_then(|e| e.error_description.or(e.error))
        .unwrap_or_else(|| "no error detail".to_string());
      return Err(Error::Provider { status: status.as_u16(), message });
    }

    let token: TokenResponse = resp.json().await?;
    let subject = claims::subject_claim(&token.access_token)?;
    tracing::debug!(subject = %subject, "resolved on-behalf-of identity");

    SubjectId::new(subject).ok_or(Error::MissingSubjectClaim)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client() -> OnBehalfOfClient {
    OnBehalfOfClient::new(IdentityConfig {
      token_endpoint: "http://127.0.0.1:9/oauth2/token".into(),
      client_id:      "client".into(),
      client_secret:  "secret".into(),
      scope:          "api://chore/.default".into(),
    })
    .unwrap()
  }

  #[tokio::test]
  async fn empty_token_is_rejected_before_any_network_call() {
    let err = client().resolve("").await.unwrap_err();
    assert!(matches!(err, Error::EmptyToken));
  }

  #[tokio::test]
  async fn unreachable_provider_surfaces_as_a_transport_error() {
    // Nothing listens on the discard port.
    let err = client().resolve("some-token").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
  }
}

