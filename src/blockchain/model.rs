use super::Block;

/// Append-only in-memory chain plus the difficulty the next block will be mined at.
#[derive(Debug, Clone)]
pub struct Blockchain {
    chain: Vec<Block>,
    difficulty: u32,
}

impl Blockchain {
    /// Start an empty chain; the first mined block links to the genesis sentinel.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: Vec::new(),
            difficulty,
        }
    }

    /// Return the last block in the chain, if any has been mined.
    pub fn last_block(&self) -> Option<&Block> {
        self.chain.last()
    }

    /// Append a finished block. Blocks are never modified once appended.
    pub fn push(&mut self, block: Block) {
        self.chain.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: u32) {
        // NOTE: Changing difficulty affects future blocks only.
        self.difficulty = difficulty;
    }

    /// Mean nonce-search time across the chain.
    pub fn average_mining_ms(&self) -> Option<f64> {
        if self.chain.is_empty() {
            return None;
        }
        let total: u64 = self.chain.iter().map(|b| b.mining_duration_ms).sum();
        Some(total as f64 / self.chain.len() as f64)
    }
}
