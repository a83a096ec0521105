//! Typed errors for key derivation and container operations

use thiserror::Error;

use crate::container::MIN_CONTAINER_LEN;
use crate::SALT_SIZE;

pub type CryptoResult<T> = Result<T, CryptoError>;

/// Failures surfaced by the KDF and the container codec.
///
/// `DecryptionFailed` is a single catch-all by construction: a GCM tag
/// mismatch cannot tell a wrong passphrase apart from corrupted or tampered
/// bytes, and the codec never tries to.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("container too short: {0} bytes (minimum {min})", min = MIN_CONTAINER_LEN)]
    TooShort(usize),

    #[error("decryption failed: check the passphrase or the file may be corrupted")]
    DecryptionFailed,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("salt must be exactly {expected} bytes, got {0}", expected = SALT_SIZE)]
    InvalidSalt(usize),

    #[error("passphrase must not be empty")]
    EmptyPassphrase,

    #[error("secure random source unavailable")]
    RandomSourceUnavailable,
}
