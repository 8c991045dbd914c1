//! Transport encoding of cipher blobs.
//!
//! Base64 with the standard alphabet: encoding emits padding, decoding
//! tolerates its absence. This layer only makes binary blobs embeddable in
//! JSON string fields; it carries no cryptographic semantics.

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine};

use crate::cipher::MIN_BLOB_SIZE;
use crate::errors::CryptoError;

const TRANSPORT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode a cipher blob for embedding in a JSON string field.
pub fn to_transport(blob: &[u8]) -> String {
    TRANSPORT.encode(blob)
}

/// Decode a transport string back into a cipher blob.
///
/// Rejects malformed Base64 and blobs shorter than the fixed header, before
/// any cryptographic work happens.
pub fn from_transport(transport: &str) -> Result<Vec<u8>, CryptoError> {
    let blob = TRANSPORT.decode(transport)?;
    if blob.len() < MIN_BLOB_SIZE {
        return Err(CryptoError::CiphertextTooShort(blob.len()));
    }
    Ok(blob)
}
