use log::debug;
use secp256k1::SecretKey;
use std::sync::Arc;

use super::records::{RecordStore, SignedRecord};
use super::sign_bytes;
use crate::error::WalletError;

/// Signs applied transfers and persists the proof.
pub trait TransactionSigner: Send + Sync {
    fn sign_and_record(&self, transaction: &str) -> Result<(), WalletError>;
}

/// Signs with a secp256k1 secret key and appends to a record store.
pub struct KeySigner {
    secret: SecretKey,
    store: Arc<dyn RecordStore>,
}

impl KeySigner {
    pub fn new(secret: SecretKey, store: Arc<dyn RecordStore>) -> Self {
        Self { secret, store }
    }
}

impl TransactionSigner for KeySigner {
    fn sign_and_record(&self, transaction: &str) -> Result<(), WalletError> {
        let data = transaction.as_bytes().to_vec();
        let signature = sign_bytes(&self.secret, &data);
        debug!("signed {transaction:?} ({} byte signature)", signature.len());
        self.store.append(SignedRecord { data, signature })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{KeyPair, MemoryRecordStore, verify_signature};

    #[test]
    fn records_verifiable_signature() {
        let keys = KeyPair::generate();
        let store = Arc::new(MemoryRecordStore::new());
        let signer = KeySigner::new(keys.secret, store.clone());

        signer.sign_and_record("A sent 50 VC to B").unwrap();

        let rec = store.first().unwrap().unwrap();
        assert_eq!(rec.data, b"A sent 50 VC to B");
        assert!(verify_signature(&keys.public, &rec.data, &rec.signature));
    }
}
