//! Passphrase-based session key derivation.
//!
//! The session key is derived with PBKDF2-HMAC-SHA256 from the user's
//! encryption passphrase, salted with the account's identity string. Using the
//! identity as salt binds the key to one account: the same passphrase under a
//! different identity yields an unrelated key. The identity must therefore be
//! stable for the account across sessions, or previously encrypted data
//! becomes undecryptable.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::CryptoError;

/// PBKDF2 iteration count. Must match the counterpart client implementations
/// exactly to interoperate.
pub const PBKDF2_ITERATIONS: u32 = 30_000;

/// Derived key length in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// A 256-bit symmetric session key.
///
/// Zeroized on drop. Has no `Debug`, `Display`, or serde impls: key material
/// never reaches logs or wire payloads.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Wrap raw key bytes (key import, shared test vectors).
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Derive the session key from a passphrase and the account identity.
///
/// Recomputes the full iteration count on every call. The iteration cost is
/// the point of the KDF, so there is no internal caching: the session derives
/// once and reuses the result.
pub fn derive_key(passphrase: &str, identity: &str) -> Result<SymmetricKey, CryptoError> {
    if passphrase.is_empty() {
        return Err(CryptoError::MissingPassphrase);
    }
    if identity.is_empty() {
        return Err(CryptoError::MissingIdentity);
    }

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        passphrase.as_bytes(),
        identity.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key,
    );

    Ok(SymmetricKey(key))
}
