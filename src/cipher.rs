//! Authenticated encryption of message payloads.
//!
//! AES-256-GCM with a fresh random 96-bit nonce per call, a 128-bit tag, and
//! no associated data.
//!
//! Blob layout (a wire contract shared with the other clients, parsed in this
//! exact order):
//! - version: 1 byte, always 0x01
//! - tag: 16 bytes
//! - nonce: 12 bytes
//! - ciphertext: remainder
//!
//! The AEAD backend appends the tag to the ciphertext; blob assembly moves it
//! to the front per the contract. `encrypt` draws nonce bytes from the
//! platform CSPRNG; `encrypt_with_nonce` takes them from the caller so tests
//! can pin exact blobs. Nonce uniqueness under a key rests on the CSPRNG, so
//! production callers use `encrypt`.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};

use crate::derivation::SymmetricKey;
use crate::errors::CryptoError;

/// Blob format version. The only version currently written or accepted.
pub const VERSION: u8 = 1;

/// GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// Smallest valid blob: version + tag + nonce, with an empty ciphertext.
pub const MIN_BLOB_SIZE: usize = 1 + TAG_SIZE + NONCE_SIZE;

/// Encrypt a plaintext string into a versioned blob with a fresh random nonce.
pub fn encrypt(plaintext: &str, key: &SymmetricKey) -> Result<Vec<u8>, CryptoError> {
    let mut nonce = [0u8; NONCE_SIZE];
    getrandom::getrandom(&mut nonce).expect("getrandom failed");
    encrypt_with_nonce(plaintext, key, nonce)
}

/// Encrypt with caller-provided nonce bytes.
///
/// The caller MUST provide cryptographically secure random bytes in
/// production; a repeated nonce under the same key breaks the scheme.
pub fn encrypt_with_nonce(
    plaintext: &str,
    key: &SymmetricKey,
    nonce_bytes: [u8; NONCE_SIZE],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let nonce = Nonce::from_slice(&nonce_bytes);
    let sealed = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    // sealed = ciphertext + tag; the blob wants version + tag + nonce + ciphertext
    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_SIZE);

    let mut blob = Vec::with_capacity(MIN_BLOB_SIZE + ciphertext.len());
    blob.push(VERSION);
    blob.extend_from_slice(tag);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(ciphertext);

    Ok(blob)
}

/// Verify and decrypt a blob back to the plaintext string.
///
/// The tag is verified before any plaintext is released; a mismatch fails
/// with the generic `DecryptionFailed`, whatever the cause (wrong key,
/// corruption, tampering).
pub fn decrypt(blob: &[u8], key: &SymmetricKey) -> Result<String, CryptoError> {
    if blob.len() < MIN_BLOB_SIZE {
        return Err(CryptoError::CiphertextTooShort(blob.len()));
    }
    if blob[0] != VERSION {
        return Err(CryptoError::UnsupportedVersion(blob[0]));
    }

    let tag = &blob[1..1 + TAG_SIZE];
    let nonce = Nonce::from_slice(&blob[1 + TAG_SIZE..MIN_BLOB_SIZE]);
    let ciphertext = &blob[MIN_BLOB_SIZE..];

    // Reassemble ciphertext + tag for the AEAD backend
    let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_SIZE);
    sealed.extend_from_slice(ciphertext);
    sealed.extend_from_slice(tag);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let plaintext = cipher
        .decrypt(nonce, sealed.as_ref())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_key() -> SymmetricKey {
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = i as u8;
        }
        SymmetricKey::from_bytes(bytes)
    }

    #[test]
    fn roundtrip() {
        let key = test_key();
        let blob = encrypt("attack at dawn", &key).unwrap();
        assert_eq!(decrypt(&blob, &key).unwrap(), "attack at dawn");
    }

    #[test]
    fn roundtrip_empty_plaintext() {
        let key = test_key();
        let blob = encrypt("", &key).unwrap();
        assert_eq!(blob.len(), MIN_BLOB_SIZE);
        assert_eq!(decrypt(&blob, &key).unwrap(), "");
    }

    #[test]
    fn blob_layout() {
        let key = test_key();
        let blob = encrypt("hello", &key).unwrap();
        assert_eq!(blob[0], VERSION);
        assert_eq!(blob.len(), MIN_BLOB_SIZE + "hello".len());
    }

    #[test]
    fn fresh_nonce_per_call() {
        let key = test_key();
        let a = encrypt("same plaintext", &key).unwrap();
        let b = encrypt("same plaintext", &key).unwrap();
        assert_ne!(a, b);
        // the nonces themselves must differ
        assert_ne!(a[1 + TAG_SIZE..MIN_BLOB_SIZE], b[1 + TAG_SIZE..MIN_BLOB_SIZE]);
    }

    #[test]
    fn wrong_key_fails() {
        let key = test_key();
        let other = SymmetricKey::from_bytes([0xEE; 32]);
        let blob = encrypt("secret", &key).unwrap();
        assert!(matches!(
            decrypt(&blob, &other),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn any_bit_flip_in_tag_fails() {
        let key = test_key();
        let blob = encrypt("integrity", &key).unwrap();
        for i in 1..1 + TAG_SIZE {
            for bit in 0..8 {
                let mut tampered = blob.clone();
                tampered[i] ^= 1 << bit;
                assert!(matches!(
                    decrypt(&tampered, &key),
                    Err(CryptoError::DecryptionFailed)
                ));
            }
        }
    }

    #[test]
    fn any_bit_flip_in_ciphertext_fails() {
        let key = test_key();
        let blob = encrypt("integrity", &key).unwrap();
        for i in MIN_BLOB_SIZE..blob.len() {
            for bit in 0..8 {
                let mut tampered = blob.clone();
                tampered[i] ^= 1 << bit;
                assert!(matches!(
                    decrypt(&tampered, &key),
                    Err(CryptoError::DecryptionFailed)
                ));
            }
        }
    }

    #[test]
    fn nonce_flip_fails() {
        let key = test_key();
        let mut blob = encrypt("integrity", &key).unwrap();
        blob[1 + TAG_SIZE] ^= 0x01;
        assert!(decrypt(&blob, &key).is_err());
    }

    #[test]
    fn short_blob_rejected() {
        let key = test_key();
        assert!(matches!(
            decrypt(&[VERSION; 28], &key),
            Err(CryptoError::CiphertextTooShort(28))
        ));
    }

    #[test]
    fn unknown_version_rejected() {
        let key = test_key();
        let mut blob = encrypt("versioned", &key).unwrap();
        blob[0] = 2;
        assert!(matches!(
            decrypt(&blob, &key),
            Err(CryptoError::UnsupportedVersion(2))
        ));
    }

    proptest! {
        #[test]
        fn roundtrip_any_plaintext_any_key(
            plaintext in ".*",
            key_bytes in proptest::array::uniform32(any::<u8>()),
        ) {
            let key = SymmetricKey::from_bytes(key_bytes);
            let blob = encrypt(&plaintext, &key).unwrap();
            prop_assert_eq!(decrypt(&blob, &key).unwrap(), plaintext);
        }
    }
}
