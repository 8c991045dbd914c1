//! Inbound/outbound message gate.
//!
//! Decides whether an inbound message needs decryption and produces outbound
//! encrypted envelopes. A message is decrypted only when it is marked
//! `encrypted` AND a key is configured; in every other case it passes through
//! unchanged. In particular, an encrypted message received while no key is
//! configured comes back verbatim as the opaque envelope rather than as an
//! error. Callers that never set up encryption rely on that pass-through.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cipher;
use crate::derivation::SymmetricKey;
use crate::errors::CryptoError;
use crate::wire;

/// The envelope shape the service recognizes as encrypted.
///
/// The serialized form `{"encrypted":true,"ciphertext":"<base64>"}` is a
/// compatibility contract with the service and the other clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    pub encrypted: bool,
    pub ciphertext: String,
}

/// Encrypt a payload into an envelope value.
///
/// The payload is serialized to JSON text, encrypted, and wrapped. Each call
/// produces a distinct envelope (fresh nonce), even for identical payloads.
pub fn seal(payload: &Value, key: &SymmetricKey) -> Result<Value, CryptoError> {
    let plaintext = serde_json::to_string(payload)?;
    let blob = cipher::encrypt(&plaintext, key)?;
    let envelope = EncryptedEnvelope {
        encrypted: true,
        ciphertext: wire::to_transport(&blob),
    };
    Ok(serde_json::to_value(envelope)?)
}

/// Open an inbound message.
///
/// When the message's `encrypted` field is truthy and a key is present, the
/// `ciphertext` field is decoded, decrypted, and parsed as JSON. Otherwise
/// the message is returned unchanged.
pub fn extract(message: &Value, key: Option<&SymmetricKey>) -> Result<Value, CryptoError> {
    let marked = message.get("encrypted").is_some_and(is_truthy);
    let key = match (marked, key) {
        (true, Some(key)) => key,
        _ => return Ok(message.clone()),
    };

    let transport = message
        .get("ciphertext")
        .and_then(Value::as_str)
        .ok_or(CryptoError::MissingCiphertext)?;
    let blob = wire::from_transport(transport)?;
    let plaintext = cipher::decrypt(&blob, key)?;

    Ok(serde_json::from_str(&plaintext)?)
}

/// Truthiness of a JSON value, matching how the other clients test the
/// `encrypted` marker.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
