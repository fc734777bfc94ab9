use log::warn;
use secp256k1::PublicKey;
use serde::Serialize;
use std::collections::HashSet;

use super::Block;
use crate::wallet::{RecordStore, verify_signature};

/// Result of every chain check, kept separate so failures can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub hashes_unique: bool,
    pub links_intact: bool,
    pub ids_sequential: bool,
    pub signature_verified: bool,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.hashes_unique && self.links_intact && self.ids_sequential && self.signature_verified
    }

    /// Names of the checks that did not pass.
    pub fn failed_checks(&self) -> Vec<&'static str> {
        [
            (self.hashes_unique, "hashes_unique"),
            (self.links_intact, "links_intact"),
            (self.ids_sequential, "ids_sequential"),
            (self.signature_verified, "signature_verified"),
        ]
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, name)| name)
        .collect()
    }
}

/// No two blocks share a hash.
pub fn hashes_unique(chain: &[Block]) -> bool {
    let mut seen = HashSet::with_capacity(chain.len());
    chain.iter().all(|b| seen.insert(b.hash.as_str()))
}

/// Every block after the first points at its predecessor's hash.
pub fn links_intact(chain: &[Block]) -> bool {
    chain.windows(2).all(|w| w[1].previous_hash == w[0].hash)
}

/// Block ids increase by exactly one.
pub fn ids_sequential(chain: &[Block]) -> bool {
    chain.windows(2).all(|w| w[0].id + 1 == w[1].id)
}

/// The first signed record verifies against `public_key`. A missing or
/// unreadable record fails the check.
pub fn first_record_verifies(records: &dyn RecordStore, public_key: &PublicKey) -> bool {
    match records.first() {
        Ok(Some(record)) => verify_signature(public_key, &record.data, &record.signature),
        Ok(None) => {
            warn!("no signed record to verify");
            false
        }
        Err(e) => {
            warn!("could not read signed records: {e}");
            false
        }
    }
}

/// Validate a finished chain and the first signed transfer record.
pub fn validate_chain(
    chain: &[Block],
    records: &dyn RecordStore,
    public_key: &PublicKey,
) -> ValidationReport {
    let report = ValidationReport {
        hashes_unique: hashes_unique(chain),
        links_intact: links_intact(chain),
        ids_sequential: ids_sequential(chain),
        signature_verified: first_record_verifies(records, public_key),
    };
    if !report.is_valid() {
        warn!("chain failed validation: {:?}", report.failed_checks());
    }
    report
}
