use log::{debug, info};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock};
use std::time::Instant;
use tokio::runtime::{Builder, Runtime};
use tokio::task::{self, JoinSet};

use super::MiningSettings;
use super::assembly::select_transactions;
use crate::blockchain::{
    Block, Blockchain, GENESIS_PREVIOUS_HASH, ProofOfWork, adjust_difficulty,
};
use crate::error::MiningError;
use crate::transaction::{Ledger, TxPool};
use crate::wallet::TransactionSigner;

/// The winning block of a round while assembly fills in its link and payload.
/// The nonce search waits on `sealed` before reading it.
#[derive(Default)]
struct Draft {
    block: RwLock<Block>,
    sealed: Mutex<bool>,
    ready: Condvar,
}

impl Draft {
    fn new(block: Block) -> Self {
        Self {
            block: RwLock::new(block),
            ..Self::default()
        }
    }

    fn seal(&self) {
        *self.sealed.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.ready.notify_all();
    }

    /// Block until assembly is done and return the final contents.
    fn wait_sealed(&self) -> Block {
        let mut sealed = self.sealed.lock().unwrap_or_else(PoisonError::into_inner);
        while !*sealed {
            sealed = self
                .ready
                .wait(sealed)
                .unwrap_or_else(PoisonError::into_inner);
        }
        drop(sealed);
        self.block
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Seals the draft when dropped, so the nonce search can never wait on an
/// assembly task that panicked.
struct SealOnDrop(Arc<Draft>);

impl Drop for SealOnDrop {
    fn drop(&mut self) {
        self.0.seal();
    }
}

/// Runs the mining race round by round and owns the ledger and pool it
/// draws transfers from.
pub struct MiningOrchestrator {
    settings: MiningSettings,
    ledger: Arc<Ledger>,
    pool: Arc<TxPool>,
    signer: Arc<dyn TransactionSigner>,
}

impl MiningOrchestrator {
    pub fn new(
        settings: MiningSettings,
        ledger: Arc<Ledger>,
        pool: Arc<TxPool>,
        signer: Arc<dyn TransactionSigner>,
    ) -> Self {
        Self {
            settings,
            ledger,
            pool,
            signer,
        }
    }

    fn worker_pool(&self) -> Result<Runtime, MiningError> {
        let threads = self.settings.worker_threads.max(self.settings.miners + 2);
        Ok(Builder::new_multi_thread()
            .worker_threads(threads)
            .max_blocking_threads(threads)
            .thread_name("miner")
            .enable_all()
            .build()?)
    }

    /// Mine `settings.rounds` blocks and return the finished chain.
    ///
    /// Blocks the calling thread; must not be called from inside an async runtime.
    pub fn run(&self) -> Result<Blockchain, MiningError> {
        ProofOfWork::new(self.settings.initial_difficulty)?;
        let runtime = self.worker_pool()?;
        runtime.block_on(async {
            let mut chain = Blockchain::new(self.settings.initial_difficulty);
            for round in 0..self.settings.rounds {
                let mut block = self.mine_round(round, &chain).await?;
                debug_assert!(block.is_valid());
                let change = adjust_difficulty(chain.difficulty(), block.mining_duration_ms);
                block.difficulty_note = change.to_string();
                info!(
                    "block #{} by miner {} hash={} txs={} {}ms, {}",
                    block.id,
                    block.miner_id,
                    block.hash,
                    block.payload.len(),
                    block.mining_duration_ms,
                    block.difficulty_note
                );
                chain.set_difficulty(change.difficulty());
                chain.push(block);
            }
            Ok::<_, MiningError>(chain)
        })
    }

    /// Race the miners for the round and return the winner's index and candidate.
    async fn race(&self) -> Result<(usize, Block), MiningError> {
        let mut race = JoinSet::new();
        for worker in 0..self.settings.miners {
            race.spawn(async move { (worker, Block::candidate()) });
        }
        let winner = race.join_next().await.ok_or(MiningError::NoCandidate)??;
        // losers finish in the background and are discarded
        race.detach_all();
        Ok(winner)
    }

    /// Produce one finished block on top of `chain`, without its difficulty note.
    ///
    /// Assembly and the nonce search are launched together. The search parks
    /// until assembly seals the draft, then mines its final contents; its
    /// timer and attempt count start only at that point.
    async fn mine_round(&self, round: usize, chain: &Blockchain) -> Result<Block, MiningError> {
        let round_started = Instant::now();
        let pow = ProofOfWork::new(chain.difficulty())?;

        let (worker, mut block) = self.race().await?;
        debug!("round {round}: miner {} won the race", worker + 1);

        block.id = round as u64 + 1;
        block.miner_id = worker as u32 + 1;
        let draft = Arc::new(Draft::new(block));

        let previous_hash = chain
            .last_block()
            .map_or_else(|| GENESIS_PREVIOUS_HASH.to_string(), |b| b.hash.clone());
        let first_round = chain.is_empty();

        let assembly = {
            let guard = SealOnDrop(draft.clone());
            let ledger = self.ledger.clone();
            let pool = self.pool.clone();
            let signer = self.signer.clone();
            let budget = self.settings.selection;
            task::spawn_blocking(move || {
                guard.0.block.write().expect("draft lock poisoned").previous_hash = previous_hash;
                if first_round {
                    return;
                }
                let attempts = budget.attempts_for(round_started.elapsed());
                let payload = select_transactions(&pool, &ledger, signer.as_ref(), attempts);
                guard.0.block.write().expect("draft lock poisoned").payload = payload;
            })
        };

        let search = {
            let draft = draft.clone();
            let max_attempts = self.settings.pow_max_attempts;
            task::spawn_blocking(move || {
                let mut block = draft.wait_sealed();
                block.mine(&pow, max_attempts).map(|()| block)
            })
        };

        let (assembled, mined) = tokio::join!(assembly, search);
        assembled?;
        mined?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{HASH_HEX_LEN, validate_chain};
    use crate::error::WalletError;
    use crate::mining::SelectionBudget;
    use crate::wallet::{KeyPair, KeySigner, MemoryRecordStore};
    use std::time::Duration;

    struct SlowSigner(Duration);

    impl TransactionSigner for SlowSigner {
        fn sign_and_record(&self, _transaction: &str) -> Result<(), WalletError> {
            std::thread::sleep(self.0);
            Ok(())
        }
    }

    /// A chain with one block already on it, so the next round assembles transfers.
    fn chain_at(difficulty: u32) -> Blockchain {
        let mut chain = Blockchain::new(difficulty);
        let mut first = Block::candidate();
        first.id = 1;
        first.previous_hash = GENESIS_PREVIOUS_HASH.to_string();
        first.hash = first.compute_hash();
        chain.push(first);
        chain
    }

    fn orchestrator(
        settings: MiningSettings,
        transactions: &[&str],
    ) -> (MiningOrchestrator, KeyPair, Arc<MemoryRecordStore>) {
        let keys = KeyPair::generate();
        let store = Arc::new(MemoryRecordStore::new());
        let pool = Arc::new(TxPool::new(transactions.iter().copied()));
        let ledger = Arc::new(Ledger::seeded_from(pool.snapshot(), 100));
        let signer = Arc::new(KeySigner::new(keys.secret, store.clone()));
        (
            MiningOrchestrator::new(settings, ledger, pool, signer),
            keys,
            store,
        )
    }

    fn settings(rounds: usize, initial_difficulty: u32) -> MiningSettings {
        MiningSettings {
            rounds,
            initial_difficulty,
            ..MiningSettings::default()
        }
    }

    #[test]
    fn chain_links_and_ids_are_sequential() {
        let (miner, _, _) = orchestrator(settings(5, 0), &["A sent 1 VC to B"]);
        let chain = miner.run().unwrap();

        assert_eq!(chain.len(), 5);
        assert_eq!(chain.blocks()[0].previous_hash, GENESIS_PREVIOUS_HASH);
        assert!(chain.blocks()[0].payload.is_empty());
        for (i, block) in chain.blocks().iter().enumerate() {
            assert_eq!(block.id, i as u64 + 1);
            assert!((1..=3).contains(&block.miner_id));
            assert_eq!(block.hash, block.compute_hash());
            assert!(block.is_valid());
            assert!(!block.difficulty_note.is_empty());
            if i > 0 {
                assert_eq!(block.previous_hash, chain.blocks()[i - 1].hash);
            }
        }
    }

    #[test]
    fn single_transfer_round_updates_ledger_and_pool() {
        let (miner, keys, store) = orchestrator(settings(2, 0), &["A sent 50 VC to B"]);
        let chain = miner.run().unwrap();

        assert!(chain.blocks()[0].payload.is_empty());
        let second = &chain.blocks()[1];
        assert_eq!(second.payload, vec!["A sent 50 VC to B"]);
        assert_eq!(second.previous_hash, chain.blocks()[0].hash);
        assert_eq!(miner.pool.len(), 0);
        assert_eq!(miner.ledger.balance("A"), Some(50));
        assert_eq!(miner.ledger.balance("B"), Some(150));

        let report = validate_chain(chain.blocks(), store.as_ref(), &keys.public);
        assert!(report.is_valid(), "{report:?}");
    }

    #[test]
    fn difficulty_one_blocks_start_with_zero() {
        let (miner, _, _) = orchestrator(settings(3, 1), &[]);
        let chain = miner.run().unwrap();
        for block in chain.blocks() {
            assert!(block.difficulty >= 1);
            assert!(block.hash.starts_with(&"0".repeat(block.difficulty as usize)));
        }
    }

    #[test]
    fn difficulty_follows_controller_between_rounds() {
        let (miner, _, _) = orchestrator(settings(4, 0), &[]);
        let chain = miner.run().unwrap();
        for pair in chain.blocks().windows(2) {
            let change = adjust_difficulty(pair[0].difficulty, pair[0].mining_duration_ms);
            assert_eq!(pair[1].difficulty, change.difficulty());
            assert_eq!(pair[0].difficulty_note, change.to_string());
        }
    }

    #[test]
    fn ledger_total_is_conserved_across_run() {
        let txs = crate::transaction::DEMO_TRANSACTIONS;
        let (miner, _, store) = orchestrator(
            MiningSettings {
                selection: SelectionBudget {
                    step_ms: 1,
                    max_attempts: 20,
                },
                ..settings(5, 0)
            },
            &txs,
        );
        let before = miner.ledger.total();
        let chain = miner.run().unwrap();

        assert_eq!(miner.ledger.total(), before);
        let applied: usize = chain.blocks().iter().map(|b| b.payload.len()).sum();
        assert_eq!(store.len(), applied);
        assert_eq!(miner.pool.len(), txs.len() - applied);
        assert!(miner.ledger.snapshot().values().all(|b| *b > 0));
    }

    #[test]
    fn impossible_difficulty_fails_fast() {
        let (miner, _, _) = orchestrator(settings(1, HASH_HEX_LEN + 1), &[]);
        assert!(matches!(
            miner.run(),
            Err(MiningError::DifficultyTooHigh { .. })
        ));
    }

    #[test]
    fn exhausted_search_is_reported() {
        let (miner, _, _) = orchestrator(
            MiningSettings {
                pow_max_attempts: Some(1),
                ..settings(1, HASH_HEX_LEN)
            },
            &[],
        );
        assert!(matches!(
            miner.run(),
            Err(MiningError::SearchExhausted { .. })
        ));
    }

    #[test]
    fn single_attempt_cap_suffices_at_difficulty_zero() {
        let (miner, _, _) = orchestrator(
            MiningSettings {
                pow_max_attempts: Some(1),
                ..settings(1, 0)
            },
            &crate::transaction::DEMO_TRANSACTIONS,
        );
        let runtime = miner.worker_pool().unwrap();
        let chain = chain_at(0);

        for _ in 0..50 {
            let block = runtime.block_on(miner.mine_round(1, &chain)).unwrap();
            assert_eq!(block.previous_hash, chain.blocks()[0].hash);
            assert_eq!(block.hash, block.compute_hash());
        }
    }

    #[test]
    fn mining_duration_excludes_assembly_time() {
        let pool = Arc::new(TxPool::new(["A sent 5 VC to B"]));
        let ledger = Arc::new(Ledger::seeded_from(pool.snapshot(), 100));
        let miner = MiningOrchestrator::new(
            settings(1, 0),
            ledger,
            pool,
            Arc::new(SlowSigner(Duration::from_millis(300))),
        );
        let runtime = miner.worker_pool().unwrap();

        let started = Instant::now();
        let block = runtime.block_on(miner.mine_round(1, &chain_at(0))).unwrap();

        assert_eq!(block.payload, vec!["A sent 5 VC to B"]);
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(block.mining_duration_ms < 300, "{}ms", block.mining_duration_ms);
    }
}
