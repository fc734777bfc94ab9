use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Ordered queue of transfers waiting to be packed into a block.
#[derive(Debug, Default)]
pub struct TxPool {
    pending: Mutex<VecDeque<String>>,
}

impl TxPool {
    pub fn new<I, S>(transactions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: Mutex::new(transactions.into_iter().map(Into::into).collect()),
        }
    }

    /// Copy of the entry at a uniformly random position.
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> Option<String> {
        let pending = self.pending.lock().expect("mutex poisoned");
        if pending.is_empty() {
            return None;
        }
        pending.get(rng.gen_range(0..pending.len())).cloned()
    }

    /// Remove and return the head of the queue.
    pub fn pop_front(&self) -> Option<String> {
        let mut pending = self.pending.lock().expect("mutex poisoned");
        pending.pop_front()
    }

    pub fn snapshot(&self) -> Vec<String> {
        let pending = self.pending.lock().expect("mutex poisoned");
        pending.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().expect("mutex poisoned").len()
    }
}
