//! # Cryptographic Services
//!
//! The crate's cryptographic service layer:
//!
//! - **Randomness** ([`rng`]): CSPRNG byte strings, random UUIDs, and a
//!   seeded deterministic big-integer generator
//! - **Hashing** ([`hash`]): SHA-256, Argon2d in proof-of-work mode, and
//!   the proof-of-work search itself
//! - **Digital Signatures** ([`signing`]): ECDSA over secp256k1 and a
//!   Winternitz one-time signature scheme behind a single trait
//! - **Symmetric Encryption** ([`encryption`]): AES-128-CBC with a random
//!   hash prefix and an IV carried inside the ciphertext
//!
//! ## Security Considerations
//!
//! - Private key material is zeroized on drop
//! - The Argon2d helper uses a fixed zero salt: it is a deterministic
//!   one-way transform for proof-of-work, **not** a password hasher
//! - Winternitz keys are one-time keys; reuse destroys forgery resistance
//!   and enforcement of single use rests with the caller

use thiserror::Error;

/// Cryptographic error types
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed caller input (bad key encoding, bad key type)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Signing was requested on a public-only key pair
    #[error("no private key available for signing")]
    NoPrivateKey,

    /// A signature did not verify against the message and public key
    #[error("signature verification failed")]
    VerifyFailed,

    /// Ciphertext was rejected (bad length, bad padding, wrong key)
    #[error("ciphertext rejected")]
    DecryptFailed,

    /// A hashing primitive reported a failure
    #[error("hashing failed: {0}")]
    Hash(String),
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;

// Module declarations
pub mod encryption;
pub mod hash;
pub mod rng;
pub mod signing;

// Re-exports for convenience
pub use encryption::AesKey;
pub use hash::{leading_zeros, pow_hash, random_sha256, sha256_hex, PowHash};
pub use signing::{generate_keypair, public_only, KeyType, SigningKeyPair};
