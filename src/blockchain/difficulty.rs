use std::fmt;

use super::{FAST_BLOCK_MS, HASH_HEX_LEN, SLOW_BLOCK_MS};

/// Outcome of one difficulty decision, carrying the difficulty for the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyChange {
    Increased(u32),
    Decreased(u32),
    Unchanged(u32),
}

impl DifficultyChange {
    pub fn difficulty(self) -> u32 {
        match self {
            Self::Increased(d) | Self::Decreased(d) | Self::Unchanged(d) => d,
        }
    }
}

impl fmt::Display for DifficultyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increased(d) => write!(f, "difficulty increased to {d}"),
            Self::Decreased(_) => write!(f, "difficulty decreased by 1"),
            Self::Unchanged(_) => write!(f, "difficulty unchanged"),
        }
    }
}

/// Step the difficulty by one based on how long the last block took to mine.
///
/// Under `FAST_BLOCK_MS` raises it, over `SLOW_BLOCK_MS` lowers it. The result
/// stays within `0..=HASH_HEX_LEN`; a step that would leave that range is
/// reported as unchanged.
pub fn adjust_difficulty(current: u32, mining_duration_ms: u64) -> DifficultyChange {
    if mining_duration_ms < FAST_BLOCK_MS {
        if current < HASH_HEX_LEN {
            return DifficultyChange::Increased(current + 1);
        }
    } else if mining_duration_ms > SLOW_BLOCK_MS && current > 0 {
        return DifficultyChange::Decreased(current - 1);
    }
    DifficultyChange::Unchanged(current)
}
