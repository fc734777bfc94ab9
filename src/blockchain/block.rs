use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::pow::{ProofOfWork, Solution, meets_difficulty, stop_after};
use crate::error::MiningError;

/// A single block in the chain holding the transfers applied while it was mined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: u64,
    pub miner_id: u32,
    pub timestamp: i64, // ms since epoch, fixed at construction
    pub nonce: u64,     // Proof-of-Work search variable
    pub previous_hash: String,
    pub hash: String,
    pub payload: Vec<String>,
    /// Difficulty the block was mined at.
    pub difficulty: u32,
    pub mining_duration_ms: u64,
    pub difficulty_note: String,
}

impl Block {
    /// Create an empty candidate block. Link, payload and hash are filled in
    /// once the candidate wins its round.
    pub fn candidate() -> Self {
        Self {
            timestamp: Utc::now().timestamp_millis(),
            ..Self::default()
        }
    }

    /// Canonical hash preimage for this block with the given nonce.
    fn preimage(&self, nonce: u64) -> String {
        let payload = serde_json::to_string(&self.payload).expect("serialize payload");
        format!(
            "Miner: {}\nId: {}\nTimestamp: {}\nNonce: {}\nPrevious hash: {}\nPayload: {}",
            self.miner_id, self.id, self.timestamp, nonce, self.previous_hash, payload
        )
    }

    /// SHA-256 of the block's fields as if mined with `nonce`.
    pub fn hash_with_nonce(&self, nonce: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.preimage(nonce).as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Compute the hash of this block using its current nonce
    /// (excluding the `hash` field itself).
    pub fn compute_hash(&self) -> String {
        self.hash_with_nonce(self.nonce)
    }

    /// Perform Proof-of-Work over the block's current contents, giving up
    /// after `max_attempts` nonces when a cap is set.
    pub fn mine(&mut self, pow: &ProofOfWork, max_attempts: Option<u64>) -> Result<(), MiningError> {
        let solution = pow.search(
            |nonce| Some(self.hash_with_nonce(nonce)),
            stop_after(max_attempts),
        )?;
        debug!(
            "block #{} solved at difficulty {} after {} attempts",
            self.id,
            pow.difficulty(),
            solution.attempts
        );
        self.difficulty = pow.difficulty();
        self.apply_solution(solution);
        Ok(())
    }

    /// Record the outcome of a nonce search on this block.
    pub fn apply_solution(&mut self, solution: Solution) {
        self.nonce = solution.nonce;
        self.hash = solution.hash;
        self.mining_duration_ms = solution.duration_ms;
    }

    /// The stored hash matches the contents and satisfies the difficulty the
    /// block was mined at. Does not check linkage.
    pub fn is_valid(&self) -> bool {
        self.hash == self.compute_hash() && meets_difficulty(&self.hash, self.difficulty)
    }

    pub fn mining_duration_secs(&self) -> u64 {
        self.mining_duration_ms / 1000
    }
}
