//! # courier-core
//!
//! Shared end-to-end-encryption core for the Courier messaging clients.
//!
//! Derives a symmetric session key from the user's encryption passphrase and
//! the account identity, and authenticates-and-encrypts the JSON payloads
//! exchanged with the service:
//!
//! - **derivation**: PBKDF2-HMAC-SHA256 passphrase stretching, salted with
//!   the account identity
//! - **cipher**: AES-256-GCM producing versioned `tag + nonce + ciphertext`
//!   blobs
//! - **wire**: Base64 transport encoding so blobs embed in JSON string fields
//! - **gate**: encrypted-envelope detection with transparent pass-through for
//!   plain messages
//! - **session**: token, key, and device state for one client session
//!
//! ## Security Design
//!
//! - Key material is zeroized on drop and never serialized or logged
//! - Every encryption draws a fresh random nonce; nonces never repeat under a
//!   key
//! - The authentication tag is verified before any plaintext is released
//! - The derivation salt is the account identity, so a passphrase reused
//!   across accounts still yields unrelated keys

pub mod cipher;
pub mod derivation;
pub mod errors;
pub mod gate;
pub mod session;
pub mod wire;

// Re-export core types
pub use cipher::{decrypt, encrypt, encrypt_with_nonce};
pub use derivation::{derive_key, SymmetricKey};
pub use errors::CryptoError;
pub use gate::{extract, seal, EncryptedEnvelope};
pub use session::{Session, SessionError, SmsReply};
pub use wire::{from_transport, to_transport};
