// storefront/src/services/webhook_signature.rs

//! `Payment-Signature: t=<unix seconds>,v1=<hex hmac-sha256 of "<t>.<payload>">`

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "Payment-Signature";
/// Maximum accepted age of a signed payload.
pub const TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
  #[error("No signatures found matching the expected signature for payload")]
  Mismatch,
  #[error("Unable to extract timestamp and signatures from header")]
  Malformed,
  #[error("Timestamp outside the tolerance zone")]
  Expired,
  #[error("Invalid webhook secret")]
  Secret,
}

fn mac_for(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
  let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Secret)?;
  mac.update(timestamp.to_string().as_bytes());
  mac.update(b".");
  mac.update(payload);
  Ok(mac)
}

/// Builds a header value for `payload`.
pub fn sign(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, SignatureError> {
  let mac = mac_for(secret, timestamp, payload)?;
  Ok(format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes())))
}

/// Accepts the header when any `v1` signature matches and the timestamp is
/// within [`TOLERANCE_SECS`] of `now`.
pub fn verify(secret: &str, header: &str, payload: &[u8], now: i64) -> Result<(), SignatureError> {
  let mut timestamp = None;
  let mut signatures = Vec::new();
  for part in header.split(',') {
    match part.trim().split_once('=') {
      Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
      Some(("v1", value)) => signatures.push(value),
      _ => {}
    }
  }
  let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
  if signatures.is_empty() {
    return Err(SignatureError::Malformed);
  }
  let stale = now
    .checked_sub(timestamp)
    .and_then(i64::checked_abs)
    .map_or(true, |age| age > TOLERANCE_SECS);
  if stale {
    return Err(SignatureError::Expired);
  }

  let matched = signatures.iter().any(|candidate| {
    let Ok(bytes) = hex::decode(candidate) else {
      return false;
    };
    mac_for(secret, timestamp, payload)
      .map(|mac| mac.verify_slice(&bytes).is_ok())
      .unwrap_or(false)
  });
  if matched {
    Ok(())
  } else {
    Err(SignatureError::Mismatch)
  }
}
