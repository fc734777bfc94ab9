use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::Transfer;

/// Participant balances. Every update goes through one lock, so a transfer's
/// check, debit and credit are applied atomically.
#[derive(Debug, Default)]
pub struct Ledger {
    balances: Mutex<HashMap<String, i64>>,
}

impl Ledger {
    /// Seed every distinct participant named in `transactions` (first and last
    /// word of each entry) with `starting_balance`.
    pub fn seeded_from<I, S>(transactions: I, starting_balance: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut balances = HashMap::new();
        for tx in transactions {
            let words: Vec<&str> = tx.as_ref().split_whitespace().collect();
            if let (Some(first), Some(last)) = (words.first(), words.last()) {
                balances.entry(first.to_string()).or_insert(starting_balance);
                balances.entry(last.to_string()).or_insert(starting_balance);
            }
        }
        Self {
            balances: Mutex::new(balances),
        }
    }

    /// Set a participant's balance, adding them if unknown.
    #[cfg(test)]
    pub fn insert(&self, participant: &str, balance: i64) {
        let mut balances = self.balances.lock().expect("mutex poisoned");
        balances.insert(participant.to_string(), balance);
    }

    pub fn balance(&self, participant: &str) -> Option<i64> {
        let balances = self.balances.lock().expect("mutex poisoned");
        balances.get(participant).copied()
    }

    /// Move `amount` from sender to receiver if the sender keeps a strictly
    /// positive balance. Returns whether the transfer was applied. Unknown
    /// senders hold nothing; unknown receivers are added.
    pub fn apply(&self, transfer: &Transfer) -> bool {
        let amount = i64::from(transfer.amount);
        let mut balances = self.balances.lock().expect("mutex poisoned");

        let sender_balance = balances.get(&transfer.sender).copied().unwrap_or(0);
        if sender_balance - amount <= 0 {
            return false;
        }
        balances.insert(transfer.sender.clone(), sender_balance - amount);
        *balances.entry(transfer.receiver.clone()).or_insert(0) += amount;
        true
    }

    /// Sorted copy of all balances.
    pub fn snapshot(&self) -> BTreeMap<String, i64> {
        let balances = self.balances.lock().expect("mutex poisoned");
        balances.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    #[cfg(test)]
    pub fn total(&self) -> i64 {
        let balances = self.balances.lock().expect("mutex poisoned");
        balances.values().sum()
    }

    pub fn len(&self) -> usize {
        self.balances.lock().expect("mutex poisoned").len()
    }
}
