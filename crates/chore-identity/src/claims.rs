//! Subject-claim extraction from a compact JWT.
//!
//! Only the payload segment is read. Signature validation is the
//! provider's job during the exchange round trip; this token was just
//! issued by the provider over TLS and is not re-verified locally.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{Error, Result};

/// Extract the subject identifier from a compact JWT: the `oid` claim,
/// falling back to `sub`. Empty claims are rejected.
pub(crate) fn subject_claim(token: &str) -> Result<String> {
  let mut segments = token.split('.');
  let (Some(_header), Some(payload), Some(_signature), None) = (
    segments.next(),
    segments.next(),
    segments.next(),
    segments.next(),
  ) else {
    return Err(Error::MalformedToken(
      "expected three dot-separated segments".into(),
    ));
  };

  let bytes = URL_SAFE_NO_PAD
    .decode(payload)
    .map_err(|e| Error::MalformedToken(format!("payload is not base64url: {e}")))?;
  let claims: serde_json::Value = serde_json::from_slice(&bytes)
    .map_err(|e| Error::MalformedToken(format!("payload is not JSON: {e}")))?;

  let subject = claims
    .get("oid")
    .and_then(|v| v.as_str())
    .filter(|s| !s.is_empty())
    .or_else(|| claims.get("sub").and_then(|v| v.as_str()))
    .filter(|s| !s.is_empty());

  match subject {
    Some(s) => Ok(s.to_string()),
    None => Err(Error::MissingSubjectClaim),
  }
}
