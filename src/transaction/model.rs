use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// A pending transfer of the form `"<sender> sent <amount> VC to <receiver>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub sender: String,
    pub receiver: String,
    pub amount: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTransferError {
    #[error("expected \"<sender> sent <amount> VC to <receiver>\", got {0:?}")]
    Malformed(String),
    #[error("invalid amount: {0}")]
    Amount(#[from] ParseIntError),
}

impl FromStr for Transfer {
    type Err = ParseTransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            [sender, "sent", amount, "VC", "to", receiver] => Ok(Self {
                sender: sender.to_string(),
                receiver: receiver.to_string(),
                amount: amount.parse()?,
            }),
            _ => Err(ParseTransferError::Malformed(s.to_string())),
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sent {} VC to {}", self.sender, self.amount, self.receiver)
    }
}
