//! lockpack-core: passphrase-based authenticated file encryption
//!
//! One passphrase, one self-contained container. Encryption derives a
//! 256-bit key from the passphrase with PBKDF2-HMAC-SHA256 at a fixed
//! 100,000 iterations, then seals the plaintext with AES-256-GCM.
//!
//! Container format (binary):
//! ```text
//! [16 bytes: random salt][12 bytes: random nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! No magic number, version byte, or length prefix: both sides must agree
//! on the format and the KDF work factor out of band, and raising the work
//! factor breaks decryption of existing containers. A version field is the
//! natural hardening step if the format ever evolves.
//!
//! [`encrypt`] and [`decrypt`] are the supported interface; `kdf` and
//! `aead` stay public for callers that manage their own framing.

pub mod aead;
pub mod container;
pub mod error;
pub mod kdf;

pub use aead::{open, seal};
pub use container::{decrypt, encrypt, encrypt_with_rng, MIN_CONTAINER_LEN};
pub use error::{CryptoError, CryptoResult};
pub use kdf::{derive_key, DerivedKey, PBKDF2_ROUNDS};

/// Size of a derived key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the container salt
pub const SALT_SIZE: usize = 16;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;
