use std::fmt;

use crate::blockchain::{Block, ValidationReport};

/// Human-readable rendering of a finished block.
pub struct BlockReport<'a>(pub &'a Block);

impl fmt::Display for BlockReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        writeln!(f, "Block:")?;
        writeln!(f, "Created by: miner{}", b.miner_id)?;
        writeln!(f, "Id: {}", b.id)?;
        writeln!(f, "Timestamp: {}", b.timestamp)?;
        writeln!(f, "Nonce: {}", b.nonce)?;
        writeln!(f, "Hash of the previous block:\n{}", b.previous_hash)?;
        writeln!(f, "Hash of the block:\n{}", b.hash)?;
        if b.payload.is_empty() {
            writeln!(f, "Block data: No transactions")?;
        } else {
            writeln!(f, "Block data:")?;
            for tx in &b.payload {
                writeln!(f, "{tx}")?;
            }
        }
        writeln!(f, "Block was generating for {} seconds", b.mining_duration_secs())?;
        write!(f, "{}", b.difficulty_note)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "chain is valid")
        } else {
            write!(f, "chain is invalid: {}", self.failed_checks().join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Block {
        Block {
            id: 2,
            miner_id: 3,
            timestamp: 1_700_000_000_000,
            nonce: 42,
            previous_hash: "abc".into(),
            hash: "0def".into(),
            payload: vec![],
            difficulty: 1,
            mining_duration_ms: 2_500,
            difficulty_note: "difficulty unchanged".into(),
        }
    }

    #[test]
    fn empty_payload_reads_no_transactions() {
        let out = BlockReport(&block()).to_string();
        assert!(out.contains("Created by: miner3"));
        assert!(out.contains("Block data: No transactions"));
        assert!(out.contains("generating for 2 seconds"));
        assert!(out.ends_with("difficulty unchanged"));
    }

    #[test]
    fn header_goes_straight_from_creator_to_id() {
        let out = BlockReport(&block()).to_string();
        assert!(out.starts_with("Block:\nCreated by: miner3\nId: 2\nTimestamp: 1700000000000\n"));
        assert!(!out.contains(" gets "));
    }

    #[test]
    fn payload_is_listed_line_by_line() {
        let mut b = block();
        b.payload = vec!["A sent 1 VC to B".into(), "B sent 2 VC to C".into()];
        let out = BlockReport(&b).to_string();
        assert!(out.contains("Block data:\nA sent 1 VC to B\nB sent 2 VC to C\n"));
    }

    #[test]
    fn validation_summary_names_failures() {
        let report = ValidationReport {
            hashes_unique: true,
            links_intact: false,
            ids_sequential: true,
            signature_verified: false,
        };
        assert_eq!(
            report.to_string(),
            "chain is invalid: links_intact, signature_verified"
        );
    }
}
