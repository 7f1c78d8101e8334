//! Hashing and proof-of-work.
//!
//! SHA-256 in hex and raw-byte forms, the Argon2d transform used as the
//! memory-hard stage of proof-of-work, and the proof-of-work search loop
//! itself.

use argon2::{Algorithm, Argon2, Params, Version};
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::crypto::{rng, CryptoError, Result};
use crate::encoding;

/// Argon2d time cost (passes).
const ARGON2_T_COST: u32 = 2;
/// Argon2d memory cost in KiB (64 MiB).
const ARGON2_M_COST: u32 = 1 << 16;
/// Argon2d lanes.
const ARGON2_PARALLELISM: u32 = 1;
/// Argon2d digest length in bytes.
const ARGON2_DIGEST_LEN: usize = 32;

/// Compute the SHA-256 digest of `data` as raw bytes.
pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the SHA-256 digest of `data` as a lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256_bytes(data))
}

/// Compute the SHA-256 digest of `data` as an uppercase hex string.
pub fn sha256_hex_upper(data: &[u8]) -> String {
    hex::encode_upper(sha256_bytes(data))
}

/// Compute the Argon2d digest of `data`, URL-safe Base64 encoded.
///
/// Parameters are fixed (t=2, m=64 MiB, p=1) and the salt is sixteen zero
/// bytes, making this a deterministic one-way transform. It exists for
/// proof-of-work, where determinism is required; it must not be used for
/// stored password verification.
pub fn argon2d_base64(data: &[u8]) -> Result<String> {
    let params = Params::new(
        ARGON2_M_COST,
        ARGON2_T_COST,
        ARGON2_PARALLELISM,
        Some(ARGON2_DIGEST_LEN),
    )
    .map_err(|e| CryptoError::Hash(e.to_string()))?;
    let hasher = Argon2::new(Algorithm::Argon2d, Version::V0x13, params);

    let salt = [0u8; 16];
    let mut digest = [0u8; ARGON2_DIGEST_LEN];
    hasher
        .hash_password_into(data, &salt, &mut digest)
        .map_err(|e| CryptoError::Hash(e.to_string()))?;
    Ok(encoding::base64_encode(&digest, true))
}

/// Produce a random SHA-256 hex string.
///
/// Secure mode hashes 32 CSPRNG bytes; non-secure mode hashes a random
/// UUID string, which is cheaper and fine for fudge values and item ids.
pub fn random_sha256(secure: bool) -> String {
    if secure {
        sha256_hex(&rng::random_bytes(32))
    } else {
        sha256_hex(rng::random_uuid().as_bytes())
    }
}

/// Count the leading `'0'` characters of a hex hash string.
pub fn leading_zeros(hash: &str) -> usize {
    hash.bytes().take_while(|byte| *byte == b'0').count()
}

/// Interpret a hex hash string as a big unsigned integer.
pub fn big_uint_from_hex(hash: &str) -> Result<BigUint> {
    if hash.is_empty() {
        return Ok(BigUint::from(0u8));
    }
    BigUint::parse_bytes(hash.as_bytes(), 16)
        .ok_or_else(|| CryptoError::InvalidInput(format!("not a hex string: {}", hash)))
}

/// A successful proof-of-work search result.
#[derive(Debug, Clone)]
pub struct PowHash {
    /// The qualifying hash: `sha256(argon2d(init || fudge))`.
    pub hash: String,
    /// The fudge value that produced the qualifying hash.
    pub fudge: String,
}

/// Search for a proof-of-work hash with at least `difficulty` leading zero
/// hex digits.
///
/// Random fudge values are appended to `init` until the chained
/// `sha256(argon2d(..))` digest qualifies. `budget` caps the number of
/// attempts so callers can keep the spin search cooperative; `None` means
/// search until found. Returns `Ok(None)` when the budget runs out.
pub fn pow_hash(difficulty: usize, init: &str, budget: Option<u64>) -> Result<Option<PowHash>> {
    let mut attempts = 0u64;
    loop {
        if let Some(max_attempts) = budget {
            if attempts >= max_attempts {
                return Ok(None);
            }
        }
        attempts += 1;

        let fudge = random_sha256(false);
        let preimage = format!("{}{}", init, fudge);
        let digest = sha256_hex(argon2d_base64(preimage.as_bytes())?.as_bytes());
        if leading_zeros(&digest) >= difficulty {
            return Ok(Some(PowHash {
                hash: digest,
                fudge,
            }));
        }
    }
}
