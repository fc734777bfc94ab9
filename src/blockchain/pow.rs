use rand::Rng;
use std::time::Instant;

use super::{HASH_HEX_LEN, NONCE_BOUND};
use crate::error::MiningError;

/// A nonce accepted by the search, with its hash and cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub nonce: u64,
    pub hash: String,
    pub attempts: u64,
    pub duration_ms: u64,
}

/// Random-nonce Proof-of-Work search at a fixed difficulty.
///
/// Holds no mutable state, so one instance may be shared by any number of
/// concurrent searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: u32,
}

impl ProofOfWork {
    /// Fails fast when the difficulty can never be met by a SHA-256 hex digest.
    pub fn new(difficulty: u32) -> Result<Self, MiningError> {
        if difficulty > HASH_HEX_LEN {
            return Err(MiningError::DifficultyTooHigh {
                difficulty,
                max: HASH_HEX_LEN,
            });
        }
        Ok(Self { difficulty })
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Draw uniformly random nonces until `hash_for(nonce)` yields a hash with
    /// `difficulty` leading zeros.
    ///
    /// `hash_for` may return `None` when the hashed inputs are not final yet;
    /// such attempts are never accepted. `should_stop` is consulted with the
    /// number of attempts made so far before every draw.
    pub fn search<H, S>(&self, mut hash_for: H, mut should_stop: S) -> Result<Solution, MiningError>
    where
        H: FnMut(u64) -> Option<String>,
        S: FnMut(u64) -> bool,
    {
        let started = Instant::now();
        let mut rng = rand::thread_rng();
        let mut attempts: u64 = 0;

        loop {
            if should_stop(attempts) {
                return Err(MiningError::SearchExhausted { attempts });
            }
            let nonce = rng.gen_range(0..NONCE_BOUND);
            attempts += 1;

            let Some(hash) = hash_for(nonce) else {
                continue;
            };
            if meets_difficulty(&hash, self.difficulty) {
                return Ok(Solution {
                    nonce,
                    hash,
                    attempts,
                    duration_ms: started.elapsed().as_millis() as u64,
                });
            }
        }
    }
}

/// Whether the first `difficulty` hex characters of `hash` are all `'0'`.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}

/// Stopping predicate for an optional attempt cap.
pub fn stop_after(max_attempts: Option<u64>) -> impl FnMut(u64) -> bool {
    move |attempts| max_attempts.is_some_and(|max| attempts >= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    #[test]
    fn difficulty_beyond_digest_length_is_rejected() {
        assert!(ProofOfWork::new(HASH_HEX_LEN).is_ok());
        assert!(matches!(
            ProofOfWork::new(HASH_HEX_LEN + 1),
            Err(MiningError::DifficultyTooHigh { difficulty: 65, .. })
        ));
    }

    #[test]
    fn difficulty_zero_accepts_first_attempt() {
        let pow = ProofOfWork::new(0).unwrap();
        let solution = pow.search(|n| Some(format!("{n:x}")), |_| false).unwrap();
        assert_eq!(solution.attempts, 1);
        assert!(solution.nonce < NONCE_BOUND);
    }

    #[test]
    fn accepted_hash_meets_difficulty() {
        let pow = ProofOfWork::new(1).unwrap();
        let solution = pow
            .search(
                |n| Some(hex::encode(Sha256::digest(n.to_le_bytes()))),
                |_| false,
            )
            .unwrap();
        assert!(solution.hash.starts_with('0'));
    }

    #[test]
    fn pending_inputs_are_never_accepted() {
        let pow = ProofOfWork::new(0).unwrap();
        let mut calls = 0;
        let solution = pow
            .search(
                |_| {
                    calls += 1;
                    (calls > 3).then(|| "abc".to_string())
                },
                |_| false,
            )
            .unwrap();
        assert_eq!(solution.attempts, 4);
    }

    #[test]
    fn stopping_predicate_bounds_the_search() {
        let pow = ProofOfWork::new(HASH_HEX_LEN).unwrap();
        let err = pow
            .search(|_| Some("f".repeat(64)), stop_after(Some(5)))
            .unwrap_err();
        assert!(matches!(err, MiningError::SearchExhausted { attempts: 5 }));
    }

    #[test]
    fn prefix_predicate() {
        assert!(meets_difficulty("00ab", 2));
        assert!(!meets_difficulty("0a0b", 2));
        assert!(meets_difficulty("anything", 0));
        assert!(!meets_difficulty("00", 3));
    }
}
