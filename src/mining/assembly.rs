use log::{debug, warn};
use std::time::Duration;

use crate::transaction::{Ledger, Transfer, TxPool};
use crate::wallet::TransactionSigner;

/// How many selection attempts a round gets: one, plus one per `step_ms`
/// already spent in the round, capped at `max_attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBudget {
    pub step_ms: u64,
    pub max_attempts: usize,
}

impl Default for SelectionBudget {
    fn default() -> Self {
        Self {
            step_ms: 10,
            max_attempts: 10,
        }
    }
}

impl SelectionBudget {
    pub fn attempts_for(&self, elapsed: Duration) -> usize {
        let extra = elapsed.as_millis() / u128::from(self.step_ms.max(1));
        let wanted = usize::try_from(extra).unwrap_or(usize::MAX).saturating_add(1);
        wanted.min(self.max_attempts)
    }
}

/// Fill a block payload from the pending pool.
///
/// Each attempt picks a random pending transfer and applies it to the ledger
/// when the sender can afford it. An applied transfer is appended to the
/// payload, the pool's head entry is dropped, and the transfer is handed to
/// `signer`. Skipped and malformed picks still use up their attempt. Signing
/// failures are logged; the ledger change stands.
pub fn select_transactions(
    pool: &TxPool,
    ledger: &Ledger,
    signer: &dyn TransactionSigner,
    attempts: usize,
) -> Vec<String> {
    let mut payload = Vec::new();
    let mut rng = rand::thread_rng();

    for attempt in 0..attempts {
        let Some(tx) = pool.pick_random(&mut rng) else {
            debug!("pool drained after {attempt} attempts");
            break;
        };
        let transfer: Transfer = match tx.parse() {
            Ok(t) => t,
            Err(e) => {
                debug!("skipping unparseable pending entry: {e}");
                continue;
            }
        };
        if !ledger.apply(&transfer) {
            debug!(
                "skipping {tx:?}: {} cannot afford {}",
                transfer.sender, transfer.amount
            );
            continue;
        }

        payload.push(tx.clone());
        pool.pop_front();
        if let Err(e) = signer.sign_and_record(&tx) {
            warn!("failed to sign and persist {tx:?}: {e}");
        }
    }

    payload
}
