//! Random number generation.
//!
//! Two flavors: operating-system CSPRNG output for key material and
//! nonces, and a seeded deterministic generator for reproducible draws
//! (the same seed always yields the same value).

use num_bigint::BigUint;
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use uuid::Uuid;

use crate::crypto::hash;

/// Generate `len` bytes from the operating-system CSPRNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; len];
    OsRng.fill_bytes(&mut buffer);
    buffer
}

/// Generate a random v4 UUID string.
pub fn random_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Deterministically derive a big unsigned integer from a seed string.
///
/// The SHA-256 of the seed keys the generator, so equal seeds produce
/// equal values across processes. A non-zero `bound` reduces the draw
/// modulo the bound.
pub fn seeded_big_uint(seed: &str, bound: &BigUint) -> BigUint {
    let mut generator = StdRng::from_seed(hash::sha256_bytes(seed.as_bytes()));
    let mut block = [0u8; 16];
    generator.fill_bytes(&mut block);
    let value = BigUint::from_bytes_be(&block);
    if bound.bits() > 0 {
        value % bound
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length_and_variation() {
        let first = random_bytes(32);
        let second = random_bytes(32);
        assert_eq!(first.len(), 32);
        assert_eq!(second.len(), 32);
        assert_ne!(first, second);
        assert!(random_bytes(0).is_empty());
    }

    #[test]
    fn test_random_uuid_unique() {
        assert_ne!(random_uuid(), random_uuid());
    }

    #[test]
    fn test_seeded_draws_are_deterministic() {
        let bound = BigUint::from(1_000_000_000u64);
        let a = seeded_big_uint("same seed", &bound);
        let b = seeded_big_uint("same seed", &bound);
        let c = seeded_big_uint("other seed", &bound);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < bound);
    }

    #[test]
    fn test_seeded_draw_without_bound() {
        let unbounded = seeded_big_uint("seed", &BigUint::from(0u8));
        assert_eq!(unbounded, seeded_big_uint("seed", &BigUint::from(0u8)));
    }
}
