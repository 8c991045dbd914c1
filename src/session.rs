//! Client session state.
//!
//! The session owns the access token, the optional end-to-end key, and the
//! impersonated device, and it builds outbound payloads and opens inbound
//! ones. It is a pure state holder: all network I/O belongs to the caller,
//! and nothing here blocks or suspends.
//!
//! The key is read-only between `enable_encryption` calls, so concurrent
//! encrypt/decrypt reads need no synchronization. Re-deriving on a passphrase
//! change replaces the key as a whole value; the previous key is zeroized on
//! drop.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::derivation::{derive_key, SymmetricKey};
use crate::errors::CryptoError;
use crate::gate;

/// Android package of the Courier bridge app, carried in SMS reply payloads.
const SMS_PACKAGE_NAME: &str = "com.courier.android";

/// Caller precondition violations and wrapped crypto failures.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("An access token is required")]
    MissingToken,

    #[error("A device must be impersonated before sending a SMS")]
    NoImpersonatedDevice,

    #[error("The end-to-end encryption key is not configured")]
    KeyNotConfigured,

    #[error("Encryption was required but no end-to-end key is configured")]
    EncryptionRequired,

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Outbound SMS reply payload, pushed through the service to the bridge app
/// on the target device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsReply {
    pub conversation_iden: String,
    pub message: String,
    pub package_name: String,
    pub source_user_iden: String,
    pub target_device_iden: String,
    #[serde(rename = "type")]
    pub reply_type: String,
}

/// A client session bound to one access token.
pub struct Session {
    token: String,
    e2e_key: Option<SymmetricKey>,
    device_iden: Option<String>,
}

impl Session {
    /// Create a session for an access token.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::MissingToken);
        }
        Ok(Self {
            token,
            e2e_key: None,
            device_iden: None,
        })
    }

    /// The access token the transport layer presents to the service.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether an end-to-end key is currently configured.
    pub fn has_encryption(&self) -> bool {
        self.e2e_key.is_some()
    }

    /// Derive and store the end-to-end key.
    ///
    /// `identity` is the account's stable identity string; the caller fetches
    /// it from the account profile before enabling encryption.
    pub fn enable_encryption(
        &mut self,
        passphrase: &str,
        identity: &str,
    ) -> Result<(), SessionError> {
        self.e2e_key = Some(derive_key(passphrase, identity)?);
        Ok(())
    }

    /// Drop the end-to-end key. Subsequent messages are sent and returned
    /// unencrypted.
    pub fn disable_encryption(&mut self) {
        self.e2e_key = None;
    }

    /// Select the device SMS replies are sent from.
    pub fn impersonate(&mut self, device_iden: impl Into<String>) {
        self.device_iden = Some(device_iden.into());
    }

    /// Open an inbound message: decrypt when it is marked encrypted and a key
    /// is configured, otherwise return it unchanged.
    pub fn extract(&self, message: &Value) -> Result<Value, SessionError> {
        Ok(gate::extract(message, self.e2e_key.as_ref())?)
    }

    /// Encrypt an outbound payload into an envelope.
    pub fn seal(&self, payload: &Value) -> Result<Value, SessionError> {
        let key = self.e2e_key.as_ref().ok_or(SessionError::KeyNotConfigured)?;
        Ok(gate::seal(payload, key)?)
    }

    /// Build the push payload for a SMS reply.
    ///
    /// The reply is encrypted into an envelope when a key is configured and
    /// sent plain otherwise. `must_encrypt` refuses the plaintext fallback.
    pub fn sms_reply(
        &self,
        target_device_iden: &str,
        conversation_iden: &str,
        body: &str,
        must_encrypt: bool,
    ) -> Result<Value, SessionError> {
        if must_encrypt && self.e2e_key.is_none() {
            return Err(SessionError::EncryptionRequired);
        }
        let source = self
            .device_iden
            .as_ref()
            .ok_or(SessionError::NoImpersonatedDevice)?;

        let reply = SmsReply {
            conversation_iden: conversation_iden.to_string(),
            message: body.to_string(),
            package_name: SMS_PACKAGE_NAME.to_string(),
            source_user_iden: source.clone(),
            target_device_iden: target_device_iden.to_string(),
            reply_type: "messaging_extension_reply".to_string(),
        };
        let payload = serde_json::to_value(&reply).map_err(CryptoError::from)?;

        match &self.e2e_key {
            Some(key) => Ok(gate::seal(&payload, key)?),
            None => Ok(payload),
        }
    }
}
