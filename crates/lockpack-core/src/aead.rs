//! AES-256-GCM sealing and opening
//!
//! Seal output (binary):
//! ```text
//! [N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! The cipher appends the tag to its ciphertext natively, so callers treat
//! the pair as one opaque region. No associated data is used anywhere in
//! this format; the AAD field is fixed empty.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};

use crate::error::{CryptoError, CryptoResult};
use crate::kdf::DerivedKey;
use crate::NONCE_SIZE;

/// Encrypt `plaintext` under `key` and a fresh 96-bit nonce.
///
/// Returns `ciphertext || tag`, exactly `plaintext.len() + 16` bytes.
/// A zero-length plaintext is valid and produces a bare 16-byte tag.
pub fn seal(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)
}

/// Verify and decrypt `sealed` (`ciphertext || tag`) under `key` and `nonce`.
///
/// The tag is checked over the full ciphertext before any plaintext is
/// released; on mismatch nothing comes back but
/// [`CryptoError::DecryptionFailed`]. A wrong key, a wrong nonce, and
/// corrupted or tampered bytes all land on that same failure.
pub fn open(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    sealed: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::DecryptionFailed)
}
