//! End-to-end coverage of the cryptographic service layer: signatures
//! over both schemes, proof-of-work, symmetric encryption, and the
//! signable composition used for authenticated records.

use bedrock::collections::{Cacheable, Signable, SignatureRecord};
use bedrock::crypto::{generate_keypair, hash, public_only, AesKey, KeyType};
use bedrock::encoding::packing::{pack, PackReader};
use bedrock::encoding::{base64_decode, CodecError};

#[test]
fn ecdsa_hello_world_scenario() {
    let keypair = generate_keypair(KeyType::Ecdsa).expect("ECDSA keypair");

    let signature = keypair.sign(b"Hello World!").unwrap();
    assert_eq!(signature.len(), 96);
    assert!(keypair.verify(b"Hello World!", &signature));
    assert!(!keypair.verify(b"Hello World", &signature));

    // The wire form is valid Base64 over DER.
    let raw = base64_decode(&signature).unwrap();
    assert_eq!(raw[0], 0x30);
}

#[test]
fn ecdsa_public_only_interop() {
    let signer = generate_keypair(KeyType::Ecdsa).unwrap();
    let message = b"transferable record";
    let signature = signer.sign(message).unwrap();

    // A verifier reconstructed from nothing but the transported public
    // key accepts the signature; a different keypair's verifier does not.
    let verifier = public_only(KeyType::Ecdsa, &signer.public_key()).unwrap();
    assert!(verifier.verify(message, &signature));

    let stranger = generate_keypair(KeyType::Ecdsa).unwrap();
    let impostor = public_only(KeyType::Ecdsa, &stranger.public_key()).unwrap();
    assert!(!impostor.verify(message, &signature));
}

#[test]
fn winternitz_one_time_scenario() {
    let keypair = generate_keypair(KeyType::Winternitz).unwrap();
    let second = generate_keypair(KeyType::Winternitz).unwrap();

    let signature = keypair.sign(b"Hello World!").unwrap();
    let other = second.sign(b"Hello World!").unwrap();
    assert_eq!(signature.len(), 2048);
    assert_eq!(other.len(), 2048);
    assert_ne!(signature, other);

    assert!(keypair.verify(b"Hello World!", &signature));
    assert!(!keypair.verify(b"Hello World!", &other));
    assert!(second.verify(b"Hello World!", &other));

    let public = public_only(KeyType::Winternitz, &keypair.public_key()).unwrap();
    assert!(public.verify(b"Hello World!", &signature));
}

#[test]
fn pow_search_meets_difficulty() {
    let found = hash::pow_hash(1, "genesis", Some(2000))
        .unwrap()
        .expect("difficulty 1 within budget");
    assert!(hash::leading_zeros(&found.hash) >= 1);

    // Recompute the chain from the returned fudge value.
    let preimage = format!("genesis{}", found.fudge);
    let recomputed =
        hash::sha256_hex(hash::argon2d_base64(preimage.as_bytes()).unwrap().as_bytes());
    assert_eq!(recomputed, found.hash);
}

#[test]
fn aes_round_trip_and_rejection() {
    let key = AesKey::generate();
    let ciphertext = key.encrypt(b"the cargo lands at midnight").unwrap();
    assert_eq!(
        key.decrypt(&ciphertext).unwrap(),
        b"the cargo lands at midnight"
    );

    // Flipping one ciphertext byte must not yield plaintext.
    let mut raw = base64_decode(&ciphertext).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x01;
    let tampered = bedrock::encoding::base64_encode(&raw, false);
    assert!(key.decrypt(&tampered).is_err());
}

/// A signed, storable record: the end-to-end composition the toolkit
/// exists for.
#[derive(Default)]
struct Manifest {
    name: String,
    payload_hash: String,
    signature: SignatureRecord,
}

impl Cacheable for Manifest {
    fn file_string(&self) -> Vec<u8> {
        pack(&[self.name.as_bytes(), self.payload_hash.as_bytes()])
    }

    fn apply_file_string(&mut self, raw: &[u8]) -> Result<(), CodecError> {
        let mut reader = PackReader::new(raw)?;
        self.name = reader.next_str()?;
        self.payload_hash = reader.next_str()?;
        Ok(())
    }
}

impl Signable for Manifest {
    fn signature_record(&self) -> &SignatureRecord {
        &self.signature
    }

    fn signature_record_mut(&mut self) -> &mut SignatureRecord {
        &mut self.signature
    }
}

#[test]
fn signable_record_survives_serialization() {
    let keypair = generate_keypair(KeyType::Ecdsa).unwrap();

    let mut manifest = Manifest {
        name: "release-7".into(),
        payload_hash: hash::sha256_hex(b"payload bytes"),
        signature: SignatureRecord::default(),
    };
    manifest.sign_with(keypair.as_ref()).unwrap();
    assert!(manifest.verify_with(&keypair.public_key()));

    // Ship the fields and signature separately, rebuild, and re-verify.
    let wire_fields = manifest.file_string();
    let wire_signature = manifest.signature_record().clone();

    let mut restored = Manifest::default();
    restored.apply_file_string(&wire_fields).unwrap();
    *restored.signature_record_mut() = wire_signature;
    assert!(restored.verify_with(&keypair.public_key()));

    // A doctored field invalidates the stored signature.
    restored.name = "release-8".into();
    assert!(!restored.verify_with(&keypair.public_key()));
}
