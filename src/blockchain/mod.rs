pub mod block;
pub mod difficulty;
pub mod model;
pub mod pow;
pub mod validation;

pub use block::Block;
pub use difficulty::adjust_difficulty;
pub use model::Blockchain;
pub use pow::ProofOfWork;
pub use validation::{ValidationReport, validate_chain};

/// `previous_hash` of the first block in the chain.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Length of a hex-encoded SHA-256 digest; the highest usable difficulty.
pub const HASH_HEX_LEN: u32 = 64;

/// Nonces are drawn uniformly from `0..NONCE_BOUND`.
pub const NONCE_BOUND: u64 = 100_000_000;

/// A block mined faster than this raises the difficulty.
pub const FAST_BLOCK_MS: u64 = 100;

/// A block mined slower than this lowers the difficulty.
pub const SLOW_BLOCK_MS: u64 = 1_000;
