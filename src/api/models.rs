use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::blockchain::{Block, Blockchain, ValidationReport};
use crate::transaction::{Ledger, TxPool};

/// Finished mining run shared with the HTTP handlers.
pub struct AppState {
    pub blockchain: Blockchain,
    pub ledger: Arc<Ledger>,
    pub pool: Arc<TxPool>,
    pub validation: ValidationReport,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub difficulty: u32,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    #[serde(flatten)]
    pub checks: ValidationReport,
}

/* ---------- Ledger API Models ---------- */

#[derive(Serialize)]
pub struct LedgerResponse {
    pub participants: usize,
    pub total: i64,
    pub balances: BTreeMap<String, i64>,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub participant: String,
    pub balance: i64,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub height: usize,
    pub difficulty: u32,
    pub avg_mining_ms: Option<f64>,
    pub applied_transactions: usize,
    pub pending_transactions: usize,
    pub participants: usize,
}
