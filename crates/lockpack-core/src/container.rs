//! Container codec: salt and nonce framing around the sealed payload
//!
//! Container format (binary):
//! ```text
//! [16 bytes: salt][12 bytes: nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! No magic number, version byte, or length prefix; every field sits at a
//! fixed offset and the sealed region is everything after byte 28. A
//! container is created whole by one `encrypt` call and consumed whole by
//! one `decrypt` call; in between it is an opaque blob.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use secrecy::SecretString;
use tracing::debug;

use crate::error::{CryptoError, CryptoResult};
use crate::{aead, kdf};
use crate::{NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// Smallest valid container: salt + nonce + tag around an empty plaintext.
pub const MIN_CONTAINER_LEN: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

/// Encrypt `plaintext` under `passphrase` into a self-contained container.
///
/// Each call draws a fresh salt and nonce from the operating system's
/// secure RNG, so encrypting the same input twice yields two different
/// containers that both decrypt under the same passphrase. Output length
/// is always `plaintext.len() + 44`.
pub fn encrypt(plaintext: &[u8], passphrase: &SecretString) -> CryptoResult<Vec<u8>> {
    encrypt_with_rng(plaintext, passphrase, &mut OsRng)
}

/// Encrypt with a caller-supplied random source.
///
/// [`encrypt`] passes [`OsRng`] here; tests substitute a seeded generator
/// to pin down the salt and nonce bytes. The `CryptoRng` bound keeps
/// non-cryptographic generators out. A failed draw surfaces as
/// [`CryptoError::RandomSourceUnavailable`] and is never retried.
pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    passphrase: &SecretString,
    rng: &mut R,
) -> CryptoResult<Vec<u8>> {
    let mut salt = [0u8; SALT_SIZE];
    rng.try_fill_bytes(&mut salt)
        .map_err(|_| CryptoError::RandomSourceUnavailable)?;

    let mut nonce = [0u8; NONCE_SIZE];
    rng.try_fill_bytes(&mut nonce)
        .map_err(|_| CryptoError::RandomSourceUnavailable)?;

    let key = kdf::derive_key(passphrase, &salt)?;
    let sealed = aead::seal(&key, &nonce, plaintext)?;

    let mut container = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + sealed.len());
    container.extend_from_slice(&salt);
    container.extend_from_slice(&nonce);
    container.extend_from_slice(&sealed);

    debug!(
        plaintext_len = plaintext.len(),
        container_len = container.len(),
        "container sealed"
    );
    Ok(container)
}

/// Decrypt a container produced by [`encrypt`].
///
/// Anything shorter than [`MIN_CONTAINER_LEN`] is rejected with
/// [`CryptoError::TooShort`] before any key derivation happens. Past that
/// check there is exactly one failure mode,
/// [`CryptoError::DecryptionFailed`], which does not say whether the
/// passphrase was wrong or the bytes were damaged. No partial plaintext is
/// ever returned.
pub fn decrypt(container: &[u8], passphrase: &SecretString) -> CryptoResult<Vec<u8>> {
    if container.len() < MIN_CONTAINER_LEN {
        return Err(CryptoError::TooShort(container.len()));
    }

    let (salt, rest) = container.split_at(SALT_SIZE);
    let (nonce_bytes, sealed) = rest.split_at(NONCE_SIZE);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(nonce_bytes);

    let key = kdf::derive_key(passphrase, salt)?;
    let plaintext = aead::open(&key, &nonce, sealed)?;

    debug!(
        container_len = container.len(),
        plaintext_len = plaintext.len(),
        "container opened"
    );
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// RNG whose fallible path always reports failure.
    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::from(
                std::io::ErrorKind::Unsupported,
            )))
        }
    }

    impl CryptoRng for FailingRng {}

    #[test]
    fn test_injected_rng_controls_salt_and_nonce() {
        let passphrase = SecretString::from("fixed-passphrase");

        // Draw the expected framing bytes with the same seed and the same
        // two-fill pattern the codec uses.
        let mut rng = StdRng::seed_from_u64(42);
        let mut expected_salt = [0u8; SALT_SIZE];
        let mut expected_nonce = [0u8; NONCE_SIZE];
        rng.fill_bytes(&mut expected_salt);
        rng.fill_bytes(&mut expected_nonce);

        let mut rng = StdRng::seed_from_u64(42);
        let container = encrypt_with_rng(b"payload", &passphrase, &mut rng).unwrap();

        assert_eq!(
            &container[..SALT_SIZE],
            &expected_salt[..],
            "salt must come straight from the injected rng"
        );
        assert_eq!(
            &container[SALT_SIZE..SALT_SIZE + NONCE_SIZE],
            &expected_nonce[..],
            "nonce must follow the salt"
        );
    }

    #[test]
    fn test_same_seed_same_container() {
        let passphrase = SecretString::from("fixed-passphrase");

        let mut rng = StdRng::seed_from_u64(7);
        let c1 = encrypt_with_rng(b"payload", &passphrase, &mut rng).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let c2 = encrypt_with_rng(b"payload", &passphrase, &mut rng).unwrap();

        assert_eq!(c1, c2, "everything downstream of the rng is deterministic");
    }

    #[test]
    fn test_rng_failure_is_fatal() {
        let passphrase = SecretString::from("pw");

        let result = encrypt_with_rng(b"payload", &passphrase, &mut FailingRng);
        assert!(matches!(result, Err(CryptoError::RandomSourceUnavailable)));
    }
}
