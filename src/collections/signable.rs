//! Signable objects: canonical hash plus stored signature.
//!
//! [`Cacheable`] gives an object a canonical file-string and, from it, a
//! unique SHA-256 fingerprint. [`Signable`] composes that fingerprint
//! with the signing layer: signing stores the signer's key type and the
//! produced signature beside the object, and verification re-derives the
//! fingerprint and checks the stored signature with a public-only key
//! pair of the recorded type.

use crate::crypto::signing::{self, KeyType, SigningKeyPair};
use crate::crypto::{hash, Result as CryptoResult};
use crate::encoding::Result as CodecResult;

/// An object with a canonical byte representation.
pub trait Cacheable {
    /// The canonical file-string packing of the object's fields.
    fn file_string(&self) -> Vec<u8>;

    /// Rebuild the object's fields from a canonical file-string.
    fn apply_file_string(&mut self, raw: &[u8]) -> CodecResult<()>;

    /// The object's fingerprint: SHA-256 hex of its file-string.
    fn unique_hash(&self) -> String {
        hash::sha256_hex(&self.file_string())
    }
}

/// The signature material stored beside a signable object.
#[derive(Debug, Clone, Default)]
pub struct SignatureRecord {
    /// Which scheme produced the signature ([`KeyType::None`] while
    /// unsigned).
    pub key_type: KeyType,
    /// The transport-encoded signature over the object's unique hash.
    pub signature: String,
}

/// An object that can be signed and later verified.
pub trait Signable: Cacheable {
    /// The stored signature material.
    fn signature_record(&self) -> &SignatureRecord;

    /// Mutable access to the stored signature material.
    fn signature_record_mut(&mut self) -> &mut SignatureRecord;

    /// Sign the object's unique hash, recording key type and signature.
    fn sign_with(&mut self, keypair: &dyn SigningKeyPair) -> CryptoResult<()> {
        let signature = keypair.sign(self.unique_hash().as_bytes())?;
        let record = self.signature_record_mut();
        record.key_type = keypair.key_type();
        record.signature = signature;
        Ok(())
    }

    /// Verify the stored signature against the given public key.
    ///
    /// Returns `false` while unsigned, on an unknown key type, or when
    /// the signature does not match the re-derived unique hash.
    fn verify_with(&self, public_key: &str) -> bool {
        let record = self.signature_record();
        match signing::public_only(record.key_type, public_key) {
            Some(verifier) => verifier.verify(self.unique_hash().as_bytes(), &record.signature),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::packing::{pack, PackReader};

    /// A minimal signed record for exercising the trait plumbing.
    #[derive(Default)]
    struct Ledger {
        account: String,
        balance: u64,
        signature: SignatureRecord,
    }

    impl Cacheable for Ledger {
        fn file_string(&self) -> Vec<u8> {
            pack(&[self.account.as_bytes(), self.balance.to_string().as_bytes()])
        }

        fn apply_file_string(&mut self, raw: &[u8]) -> crate::encoding::Result<()> {
            let mut reader = PackReader::new(raw)?;
            self.account = reader.next_str()?;
            self.balance = reader.next_str()?.parse().map_err(|_| {
                crate::encoding::CodecError::Corruption("balance is not a number".into())
            })?;
            Ok(())
        }
    }

    impl Signable for Ledger {
        fn signature_record(&self) -> &SignatureRecord {
            &self.signature
        }

        fn signature_record_mut(&mut self) -> &mut SignatureRecord {
            &mut self.signature
        }
    }

    fn sample() -> Ledger {
        Ledger {
            account: "alice".into(),
            balance: 100,
            signature: SignatureRecord::default(),
        }
    }

    #[test]
    fn test_unique_hash_tracks_content() {
        let mut ledger = sample();
        let original = ledger.unique_hash();
        assert_eq!(original.len(), 64);
        assert_eq!(original, sample().unique_hash());

        ledger.balance = 101;
        assert_ne!(ledger.unique_hash(), original);
    }

    #[test]
    fn test_file_string_round_trip() {
        let ledger = sample();
        let mut rebuilt = Ledger::default();
        rebuilt.apply_file_string(&ledger.file_string()).unwrap();
        assert_eq!(rebuilt.account, "alice");
        assert_eq!(rebuilt.balance, 100);
        assert_eq!(rebuilt.unique_hash(), ledger.unique_hash());
    }

    #[test]
    fn test_sign_and_verify_with_each_scheme() {
        for kind in [KeyType::Ecdsa, KeyType::Winternitz] {
            let keypair = signing::generate_keypair(kind).unwrap();
            let mut ledger = sample();
            ledger.sign_with(keypair.as_ref()).unwrap();

            assert_eq!(ledger.signature_record().key_type, kind);
            assert!(!ledger.signature_record().signature.is_empty());
            assert!(ledger.verify_with(&keypair.public_key()));

            // Tampering breaks verification.
            ledger.balance = 999;
            assert!(!ledger.verify_with(&keypair.public_key()));
        }
    }

    #[test]
    fn test_unsigned_object_never_verifies() {
        let ledger = sample();
        let keypair = signing::generate_keypair(KeyType::Ecdsa).unwrap();
        assert!(!ledger.verify_with(&keypair.public_key()));
    }

    #[test]
    fn test_wrong_public_key_fails() {
        let keypair = signing::generate_keypair(KeyType::Ecdsa).unwrap();
        let other = signing::generate_keypair(KeyType::Ecdsa).unwrap();
        let mut ledger = sample();
        ledger.sign_with(keypair.as_ref()).unwrap();
        assert!(!ledger.verify_with(&other.public_key()));
    }
}
