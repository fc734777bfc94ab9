use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::blockchain::HASH_HEX_LEN;
use crate::error::ConfigError;
use crate::mining::{MiningSettings, SelectionBudget};
use crate::transaction::STARTING_BALANCE;

/// Process-level parameters, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rounds: usize,
    pub miners: usize,
    pub initial_difficulty: u32,
    pub worker_threads: usize,
    pub starting_balance: i64,
    pub tx_budget_step_ms: u64,
    pub tx_budget_max: usize,
    pub pow_max_attempts: Option<u64>,
    pub key_dir: PathBuf,
    pub record_path: PathBuf,
    pub serve_api: bool,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build from any variable source, falling back to defaults for unset vars.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let miners: usize = parse_or(&lookup, "MINERS", 3)?;
        let config = Self {
            rounds: parse_or(&lookup, "ROUNDS", 15)?,
            miners,
            initial_difficulty: parse_or(&lookup, "INITIAL_DIFFICULTY", 0)?,
            worker_threads: parse_or(&lookup, "WORKER_THREADS", miners + 2)?,
            starting_balance: parse_or(&lookup, "STARTING_BALANCE", STARTING_BALANCE)?,
            tx_budget_step_ms: parse_or(&lookup, "TX_BUDGET_STEP_MS", 10)?,
            tx_budget_max: parse_or(&lookup, "TX_BUDGET_MAX", 10)?,
            pow_max_attempts: parse_opt(&lookup, "POW_MAX_ATTEMPTS")?,
            key_dir: lookup("KEY_DIR").unwrap_or_else(|| "keys".into()).into(),
            record_path: lookup("RECORD_PATH")
                .unwrap_or_else(|| "data/signed_records.jsonl".into())
                .into(),
            serve_api: parse_or(&lookup, "SERVE_API", false)?,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds == 0 {
            return Err(ConfigError::Invalid("ROUNDS must be at least 1".into()));
        }
        if self.miners == 0 {
            return Err(ConfigError::Invalid("MINERS must be at least 1".into()));
        }
        if self.worker_threads < self.miners + 2 {
            return Err(ConfigError::Invalid(format!(
                "WORKER_THREADS must be at least MINERS + 2 ({})",
                self.miners + 2
            )));
        }
        if self.initial_difficulty > HASH_HEX_LEN {
            return Err(ConfigError::Invalid(format!(
                "INITIAL_DIFFICULTY must not exceed {HASH_HEX_LEN}"
            )));
        }
        if self.tx_budget_step_ms == 0 {
            return Err(ConfigError::Invalid("TX_BUDGET_STEP_MS must be positive".into()));
        }
        Ok(())
    }

    pub fn mining_settings(&self) -> MiningSettings {
        MiningSettings {
            rounds: self.rounds,
            miners: self.miners,
            worker_threads: self.worker_threads,
            initial_difficulty: self.initial_difficulty,
            selection: SelectionBudget {
                step_ms: self.tx_budget_step_ms,
                max_attempts: self.tx_budget_max,
            },
            pow_max_attempts: self.pow_max_attempts,
        }
    }
}

fn parse_or<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, var)?.unwrap_or(default))
}

fn parse_opt<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
