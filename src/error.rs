use thiserror::Error;

/// Invalid process configuration (bad env values or parameters).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("{0}")]
    Invalid(String),
}

/// Fatal errors raised while producing blocks.
#[derive(Debug, Error)]
pub enum MiningError {
    #[error("difficulty {difficulty} exceeds the {max}-character digest")]
    DifficultyTooHigh { difficulty: u32, max: u32 },
    #[error("nonce search stopped after {attempts} attempts without a solution")]
    SearchExhausted { attempts: u64 },
    #[error("worker pool unavailable: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("worker task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("no miner reported a candidate block")]
    NoCandidate,
}

/// Key management, signing and signed-record store failures.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("key file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("secp256k1: {0}")]
    Crypto(#[from] secp256k1::Error),
    #[error("record encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}
