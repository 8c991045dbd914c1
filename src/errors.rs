//! Error types for courier-core cryptographic operations.

use thiserror::Error;

/// Failures of the key derivation, cipher, codec, and message gate.
///
/// None of these are transient: the same inputs always fail the same way, so
/// nothing here is ever retried.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption passphrase must not be empty")]
    MissingPassphrase,

    #[error("Account identity must not be empty")]
    MissingIdentity,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Authentication tag mismatch. Deliberately carries no detail about
    /// which part of the blob failed verification.
    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Invalid transport encoding: {0}")]
    InvalidTransport(#[from] base64::DecodeError),

    #[error("Ciphertext blob too short: {0} bytes")]
    CiphertextTooShort(usize),

    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u8),

    #[error("Encrypted message has no ciphertext field")]
    MissingCiphertext,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
