//! ECDSA over secp256k1 with SHA-256.
//!
//! Public keys travel as Base64 of the uncompressed SEC1 point, private
//! keys as Base64 of the 32-byte scalar. Signatures are produced
//! deterministically (RFC 6979), DER-encoded, then Base64-encoded; only
//! DER is accepted on the wire and the fixed-length form exists solely
//! between this module and the curve implementation.

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use crate::crypto::{CryptoError, Result};
use crate::encoding;

use super::{KeyType, SigningKeyPair};

/// An ECDSA key pair, possibly public-only.
pub struct EcdsaKeyPair {
    signing_key: Option<SigningKey>,
    public_key: String,
}

impl EcdsaKeyPair {
    /// Generate a fresh key pair from the operating-system CSPRNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let public_key = encode_public_key(signing_key.verifying_key());
        Self {
            signing_key: Some(signing_key),
            public_key,
        }
    }

    /// Rebuild a full key pair from a Base64 private-key scalar.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let raw = encoding::base64_decode(private_key)
            .map_err(|e| CryptoError::InvalidInput(e.to_string()))?;
        let signing_key = SigningKey::from_slice(&raw)
            .map_err(|e| CryptoError::InvalidInput(format!("bad private key: {}", e)))?;
        let public_key = encode_public_key(signing_key.verifying_key());
        Ok(Self {
            signing_key: Some(signing_key),
            public_key,
        })
    }

    /// Build a public-only pair around a Base64 SEC1 public key.
    ///
    /// The key is not validated here; an undecodable key simply fails
    /// every verification.
    pub fn from_public_key(public_key: &str) -> Self {
        Self {
            signing_key: None,
            public_key: public_key.to_string(),
        }
    }
}

impl SigningKeyPair for EcdsaKeyPair {
    fn key_type(&self) -> KeyType {
        KeyType::Ecdsa
    }

    fn public_key(&self) -> String {
        self.public_key.clone()
    }

    fn private_key(&self) -> Option<String> {
        self.signing_key
            .as_ref()
            .map(|key| encoding::base64_encode(key.to_bytes().as_slice(), false))
    }

    fn sign(&self, message: &[u8]) -> Result<String> {
        let signing_key = self.signing_key.as_ref().ok_or(CryptoError::NoPrivateKey)?;
        let signature: Signature = signing_key.sign(message);
        Ok(encoding::base64_encode(signature.to_der().as_bytes(), false))
    }

    fn verify(&self, message: &[u8], signature: &str) -> bool {
        let Ok(raw_key) = encoding::base64_decode(&self.public_key) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(&raw_key) else {
            return false;
        };
        let Ok(raw_signature) = encoding::base64_decode(signature) else {
            return false;
        };
        let Ok(parsed) = Signature::from_der(&raw_signature) else {
            return false;
        };
        verifying_key.verify(message, &parsed).is_ok()
    }
}

fn encode_public_key(verifying_key: &VerifyingKey) -> String {
    encoding::base64_encode(verifying_key.to_encoded_point(false).as_bytes(), false)
}
