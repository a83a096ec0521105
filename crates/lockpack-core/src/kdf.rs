//! Key derivation: PBKDF2-HMAC-SHA256 passphrase → container key

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::{CryptoError, CryptoResult};
use crate::{KEY_SIZE, SALT_SIZE};

/// PBKDF2 iteration count, identical for every container ever produced.
///
/// The work factor is a compile-time constant and is not recorded in the
/// container, so both ends of an exchange must agree on it out of band.
/// Changing it silently breaks decryption of existing containers.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// A 256-bit key derived from a passphrase via PBKDF2-HMAC-SHA256.
///
/// Zeroized on drop to prevent secrets lingering in memory.
#[derive(Clone)]
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 256-bit key from a passphrase and a 16-byte salt.
///
/// Deterministic: the same passphrase and salt always yield the same key.
/// The passphrase contributes its UTF-8 bytes. The salt travels unencrypted
/// in the container (it does not need to be secret, only fresh).
///
/// Fails with [`CryptoError::EmptyPassphrase`] for a zero-length passphrase
/// and [`CryptoError::InvalidSalt`] when `salt` is not exactly 16 bytes,
/// both before any derivation work.
pub fn derive_key(passphrase: &SecretString, salt: &[u8]) -> CryptoResult<DerivedKey> {
    if passphrase.expose_secret().is_empty() {
        return Err(CryptoError::EmptyPassphrase);
    }
    let salt: &[u8; SALT_SIZE] = salt
        .try_into()
        .map_err(|_| CryptoError::InvalidSalt(salt.len()))?;

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        passphrase.expose_secret().as_bytes(),
        salt,
        PBKDF2_ROUNDS,
        &mut key,
    );

    Ok(DerivedKey::from_bytes(key))
}
