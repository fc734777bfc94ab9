pub mod records;
pub mod signer;

pub use records::{FileRecordStore, RecordStore};
#[cfg(test)]
pub use records::MemoryRecordStore;
pub use signer::{KeySigner, TransactionSigner};

use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, ecdsa::Signature};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::error::WalletError;

pub const PRIVATE_KEY_FILE: &str = "private.key";
pub const PUBLIC_KEY_FILE: &str = "public.key";

/// A secp256k1 keypair used to sign applied transfers.
#[derive(Debug, Clone, Copy)]
pub struct KeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret, public) = secp.generate_keypair(&mut OsRng);
        Self { secret, public }
    }

    /// Write both halves as hex into `dir` (created if missing).
    pub fn persist(&self, dir: &Path) -> Result<(), WalletError> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(PRIVATE_KEY_FILE), hex::encode(self.secret.secret_bytes()))?;
        fs::write(dir.join(PUBLIC_KEY_FILE), hex::encode(self.public.serialize()))?;
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self, WalletError> {
        let bytes = hex::decode(fs::read_to_string(dir.join(PRIVATE_KEY_FILE))?.trim())?;
        let secret = SecretKey::from_slice(&bytes)?;
        let public = load_public_key(dir)?;
        Ok(Self { secret, public })
    }
}

/// Read the hex-encoded compressed public key stored in `dir`.
pub fn load_public_key(dir: &Path) -> Result<PublicKey, WalletError> {
    let bytes = hex::decode(fs::read_to_string(dir.join(PUBLIC_KEY_FILE))?.trim())?;
    Ok(PublicKey::from_slice(&bytes)?)
}

fn message_for(data: &[u8]) -> Message {
    let digest: [u8; 32] = Sha256::digest(data).into();
    Message::from_digest(digest)
}

/// DER-encoded ECDSA signature over SHA-256(`data`).
pub fn sign_bytes(secret: &SecretKey, data: &[u8]) -> Vec<u8> {
    let secp = Secp256k1::signing_only();
    secp.sign_ecdsa(&message_for(data), secret)
        .serialize_der()
        .to_vec()
}

/// Verify a DER signature over SHA-256(`data`). Malformed signatures do not verify.
pub fn verify_signature(public: &PublicKey, data: &[u8], signature: &[u8]) -> bool {
    let secp = Secp256k1::verification_only();
    match Signature::from_der(signature) {
        Ok(sig) => secp.verify_ecdsa(&message_for(data), &sig, public).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trips_with_matching_key() {
        let keys = KeyPair::generate();
        let sig = sign_bytes(&keys.secret, b"A sent 5 VC to B");
        assert!(verify_signature(&keys.public, b"A sent 5 VC to B", &sig));
        assert!(!verify_signature(&keys.public, b"A sent 6 VC to B", &sig));
    }

    #[test]
    fn other_key_does_not_verify() {
        let keys = KeyPair::generate();
        let other = KeyPair::generate();
        let sig = sign_bytes(&keys.secret, b"data");
        assert!(!verify_signature(&other.public, b"data", &sig));
        assert!(!verify_signature(&keys.public, b"data", b"not der"));
    }

    #[test]
    fn keys_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let keys = KeyPair::generate();
        keys.persist(dir.path()).unwrap();

        let loaded = KeyPair::load(dir.path()).unwrap();
        assert_eq!(loaded.secret.secret_bytes(), keys.secret.secret_bytes());
        assert_eq!(load_public_key(dir.path()).unwrap(), keys.public);
    }

    #[test]
    fn missing_key_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_public_key(dir.path()),
            Err(WalletError::Io(_))
        ));
    }
}
