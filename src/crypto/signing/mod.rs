//! Digital signatures.
//!
//! Two schemes behind one trait:
//!
//! - **ECDSA** over secp256k1 with SHA-256 ([`ecdsa`]): reusable keys,
//!   DER signatures carried as Base64
//! - **Winternitz** one-time signatures over SHA-256 ([`winternitz`]):
//!   hash-based, forgery-resistant only while each key signs at most once
//!
//! Key pairs are created through the factory functions; a key type of
//! [`KeyType::None`] yields no pair and callers must check for it.

use std::fmt;
use std::str::FromStr;

use super::Result;

pub mod ecdsa;
pub mod winternitz;

pub use ecdsa::EcdsaKeyPair;
pub use winternitz::WinternitzKeyPair;

/// Supported digital-signature key types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyType {
    /// No key type; the null-like state of an unsigned object.
    #[default]
    None,
    /// ECDSA over secp256k1 with SHA-256.
    Ecdsa,
    /// Winternitz one-time signatures over SHA-256.
    Winternitz,
}

impl KeyType {
    /// Stable string form used in stored records.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Ecdsa => "ECDSA",
            KeyType::Winternitz => "WINTERNITZ",
            KeyType::None => "NONE",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = ();

    /// Unknown names map to [`KeyType::None`] rather than failing; the
    /// factories turn that into an absent key pair.
    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match name {
            "ECDSA" => KeyType::Ecdsa,
            "WINTERNITZ" => KeyType::Winternitz,
            _ => KeyType::None,
        })
    }
}

/// A signing capability: some scheme's key pair, possibly public-only.
pub trait SigningKeyPair: Send + Sync {
    /// The scheme this pair belongs to.
    fn key_type(&self) -> KeyType;

    /// The public half, in the scheme's transport encoding.
    fn public_key(&self) -> String;

    /// The private half, if this pair can sign.
    fn private_key(&self) -> Option<String>;

    /// Sign a message, producing the scheme's transport-encoded signature.
    ///
    /// Fails with [`CryptoError::NoPrivateKey`](super::CryptoError) on a
    /// public-only pair.
    fn sign(&self, message: &[u8]) -> Result<String>;

    /// Verify a transport-encoded signature over a message.
    fn verify(&self, message: &[u8], signature: &str) -> bool;
}

/// Generate a fresh key pair of the requested type.
///
/// Returns `None` for [`KeyType::None`].
pub fn generate_keypair(kind: KeyType) -> Option<Box<dyn SigningKeyPair>> {
    match kind {
        KeyType::Ecdsa => Some(Box::new(EcdsaKeyPair::generate())),
        KeyType::Winternitz => Some(Box::new(WinternitzKeyPair::generate())),
        KeyType::None => None,
    }
}

/// Build a public-only key pair of the requested type.
///
/// The returned pair can verify but any attempt to sign fails. Returns
/// `None` for [`KeyType::None`].
pub fn public_only(kind: KeyType, public_key: &str) -> Option<Box<dyn SigningKeyPair>> {
    match kind {
        KeyType::Ecdsa => Some(Box::new(EcdsaKeyPair::from_public_key(public_key))),
        KeyType::Winternitz => Some(Box::new(WinternitzKeyPair::from_public_key(public_key))),
        KeyType::None => None,
    }
}
