pub mod assembly;
pub mod orchestrator;

pub use assembly::SelectionBudget;
pub use orchestrator::MiningOrchestrator;

/// Parameters of one mining run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningSettings {
    pub rounds: usize,
    /// Candidate-producing workers raced each round.
    pub miners: usize,
    /// Size of the shared worker pool.
    pub worker_threads: usize,
    pub initial_difficulty: u32,
    pub selection: SelectionBudget,
    /// Optional cap on nonce attempts per block.
    pub pow_max_attempts: Option<u64>,
}

impl Default for MiningSettings {
    fn default() -> Self {
        Self {
            rounds: 15,
            miners: 3,
            worker_threads: 5,
            initial_difficulty: 0,
            selection: SelectionBudget::default(),
            pow_max_attempts: None,
        }
    }
}
