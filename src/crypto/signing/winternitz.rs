//! Winternitz one-time signatures over SHA-256.
//!
//! The private key is 32 random SHA-256 hex strings; the public key is the
//! same set with each secret hash-iterated 256 times. Every hash in the
//! chain operates on the 64-character ASCII hex rendering of the previous
//! digest, so keys and signatures are fixed-width hex throughout. A key
//! must sign at most once; enforcing single use is the caller's burden.

use zeroize::Zeroize;

use crate::crypto::{hash, CryptoError, Result};

use super::{KeyType, SigningKeyPair};

/// Number of hash chunks in a key or signature.
const CHUNK_COUNT: usize = 32;
/// Hex length of one SHA-256 digest.
const CHUNK_HEX_LEN: usize = 64;
/// Hash-chain length per chunk.
const CHAIN_LEN: usize = 256;
/// Exact hex length of keys and signatures.
const KEY_HEX_LEN: usize = CHUNK_COUNT * CHUNK_HEX_LEN;

/// A Winternitz one-time key pair, possibly public-only.
pub struct WinternitzKeyPair {
    private_key: Option<String>,
    public_key: String,
}

impl WinternitzKeyPair {
    /// Generate a fresh one-time key pair.
    pub fn generate() -> Self {
        let mut secrets = Vec::with_capacity(CHUNK_COUNT);
        for _ in 0..CHUNK_COUNT {
            secrets.push(hash::random_sha256(true));
        }
        let private_key = secrets.concat();

        let mut chained = secrets;
        for chunk in &mut chained {
            for _ in 0..CHAIN_LEN {
                *chunk = hash::sha256_hex(chunk.as_bytes());
            }
        }
        let public_key = chained.concat();

        Self {
            private_key: Some(private_key),
            public_key,
        }
    }

    /// Build a public-only pair around a transported public key.
    pub fn from_public_key(public_key: &str) -> Self {
        Self {
            private_key: None,
            public_key: public_key.to_string(),
        }
    }

    /// Split a hashed message into the 32 per-chunk chain offsets.
    fn chain_offsets(message: &[u8]) -> Vec<usize> {
        let digest = hash::sha256_bytes(message);
        digest.iter().map(|byte| *byte as usize).collect()
    }
}

impl SigningKeyPair for WinternitzKeyPair {
    fn key_type(&self) -> KeyType {
        KeyType::Winternitz
    }

    fn public_key(&self) -> String {
        self.public_key.clone()
    }

    fn private_key(&self) -> Option<String> {
        self.private_key.clone()
    }

    fn sign(&self, message: &[u8]) -> Result<String> {
        let private_key = self.private_key.as_ref().ok_or(CryptoError::NoPrivateKey)?;

        let offsets = Self::chain_offsets(message);
        let mut signature = String::with_capacity(KEY_HEX_LEN);
        for (index, offset) in offsets.iter().enumerate() {
            let mut chunk = private_key[index * CHUNK_HEX_LEN..(index + 1) * CHUNK_HEX_LEN]
                .to_string();
            for _ in 0..(CHAIN_LEN - offset) {
                chunk = hash::sha256_hex(chunk.as_bytes());
            }
            signature.push_str(&chunk);
        }
        Ok(signature)
    }

    fn verify(&self, message: &[u8], signature: &str) -> bool {
        // Anything but an exact-width hex signature is rejected up front.
        if signature.len() != KEY_HEX_LEN || !signature.bytes().all(|b| b.is_ascii_hexdigit()) {
            return false;
        }

        let offsets = Self::chain_offsets(message);
        let mut rebuilt = String::with_capacity(KEY_HEX_LEN);
        for (index, offset) in offsets.iter().enumerate() {
            let mut chunk =
                signature[index * CHUNK_HEX_LEN..(index + 1) * CHUNK_HEX_LEN].to_string();
            for _ in 0..*offset {
                chunk = hash::sha256_hex(chunk.as_bytes());
            }
            rebuilt.push_str(&chunk);
        }
        rebuilt == self.public_key
    }
}

impl Drop for WinternitzKeyPair {
    fn drop(&mut self) {
        if let Some(private_key) = self.private_key.as_mut() {
            private_key.zeroize();
        }
    }
}
