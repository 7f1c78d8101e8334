//! Symmetric encryption: AES-128-CBC.
//!
//! Plaintext is Base64-encoded and prefixed with a random 64-character
//! SHA-256 hex string before encryption, so equal plaintexts never produce
//! related ciphertexts even under a reused key. A fresh 16-byte IV is drawn
//! per operation and prepended to the ciphertext inside the Base64 wrapper;
//! decryption consumes it from there. This layer provides confidentiality
//! only, with no integrity tag.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::crypto::{hash, CryptoError, Result};
use crate::encoding;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// AES key length in bytes.
pub const KEY_LEN: usize = 16;
/// CBC initialization-vector length in bytes.
pub const IV_LEN: usize = 16;
/// AES block length in bytes.
const BLOCK_LEN: usize = 16;
/// Length of the random hash prefix inside the plaintext envelope.
const PREFIX_LEN: usize = 64;

/// A 128-bit AES encryption key.
pub struct AesKey {
    key: [u8; KEY_LEN],
}

impl AesKey {
    /// Generate a fresh key from the operating-system CSPRNG.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Load a key from its hex rendering.
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let raw = encoding::hex_to_bytes(key_hex)
            .map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
        let key: [u8; KEY_LEN] = raw
            .try_into()
            .map_err(|_| CryptoError::InvalidInput("AES key must be 16 bytes".into()))?;
        Ok(Self { key })
    }

    /// The key's hex rendering, for storage alongside the data it guards.
    pub fn key_hex(&self) -> String {
        hex::encode(self.key)
    }

    /// Encrypt a plaintext, returning Base64 of `IV || ciphertext`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let mut envelope = hash::random_sha256(true).into_bytes();
        envelope.extend_from_slice(encoding::base64_encode(plaintext, false).as_bytes());

        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = Aes128CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(&envelope);

        let mut framed = iv.to_vec();
        framed.extend_from_slice(&ciphertext);
        Ok(encoding::base64_encode(&framed, false))
    }

    /// Decrypt a ciphertext produced by [`encrypt`](Self::encrypt).
    ///
    /// Any malformed input (bad Base64, short frame, broken padding, a
    /// mangled envelope) fails with [`CryptoError::DecryptFailed`].
    pub fn decrypt(&self, ciphertext: &str) -> Result<Vec<u8>> {
        let framed =
            encoding::base64_decode(ciphertext).map_err(|_| CryptoError::DecryptFailed)?;
        if framed.len() <= IV_LEN || (framed.len() - IV_LEN) % BLOCK_LEN != 0 {
            return Err(CryptoError::DecryptFailed);
        }

        let (iv, body) = framed.split_at(IV_LEN);
        let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| CryptoError::DecryptFailed)?;
        let envelope = Aes128CbcDec::new(&self.key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(body)
            .map_err(|_| CryptoError::DecryptFailed)?;

        if envelope.len() < PREFIX_LEN {
            return Err(CryptoError::DecryptFailed);
        }
        let inner = std::str::from_utf8(&envelope[PREFIX_LEN..])
            .map_err(|_| CryptoError::DecryptFailed)?;
        encoding::base64_decode(inner).map_err(|_| CryptoError::DecryptFailed)
    }
}

impl Drop for AesKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
