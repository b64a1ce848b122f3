//! Chain integrity verification
//!
//! Re-derives every digest from stored fields and walks the chain from the
//! first block. Each block is checked in this order:
//! 1. its sequence number equals its 1-based position
//! 2. its previous-digest prefix equals the prefix of the predecessor's
//!    *recomputed* digest (the sentinel for the first block)
//! 3. its stored digest equals the recomputed one
//!
//! The first failure is reported; nothing is repaired.

use crate::block::Block;
use serde::Serialize;
use tally_crypto::link::{digest_prefix, GENESIS_PREFIX};

/// Outcome of a full-chain check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Validation {
    Valid { blocks: usize },
    Invalid(IntegrityViolation),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn violation(&self) -> Option<&IntegrityViolation> {
        match self {
            Self::Valid { .. } => None,
            Self::Invalid(violation) => Some(violation),
        }
    }
}

/// The earliest block at which the chain stops being consistent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityViolation {
    /// 1-based position of the offending block
    pub sequence_number: u64,
    pub reason: ViolationReason,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationReason {
    DigestMismatch,
    LinkMismatch,
    SequenceGap,
}

impl ViolationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DigestMismatch => "DIGEST_MISMATCH",
            Self::LinkMismatch => "LINK_MISMATCH",
            Self::SequenceGap => "SEQUENCE_GAP",
        }
    }
}

impl std::fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "block #{} {}: expected {}, got {}",
            self.sequence_number, self.reason, self.expected, self.actual
        )
    }
}

/// Verify a block sequence. An empty sequence is valid.
pub fn verify_chain(blocks: &[Block]) -> Validation {
    let mut expected_prev = GENESIS_PREFIX.to_string();

    for (index, block) in blocks.iter().enumerate() {
        let position = index as u64 + 1;

        if block.sequence_number != position {
            return violation(
                position,
                ViolationReason::SequenceGap,
                position.to_string(),
                block.sequence_number.to_string(),
            );
        }

        if block.previous_digest_prefix != expected_prev {
            return violation(
                position,
                ViolationReason::LinkMismatch,
                expected_prev,
                block.previous_digest_prefix.clone(),
            );
        }

        let recomputed = block.recompute_digest();
        if recomputed != block.digest {
            return violation(
                position,
                ViolationReason::DigestMismatch,
                recomputed,
                block.digest.clone(),
            );
        }

        tracing::debug!(sequence_number = position, "block verified");
        expected_prev = digest_prefix(&recomputed).to_string();
    }

    Validation::Valid {
        blocks: blocks.len(),
    }
}

fn violation(
    sequence_number: u64,
    reason: ViolationReason,
    expected: String,
    actual: String,
) -> Validation {
    tracing::error!(
        sequence_number,
        reason = reason.as_str(),
        expected = %expected,
        actual = %actual,
        "Chain integrity violation"
    );
    Validation::Invalid(IntegrityViolation {
        sequence_number,
        reason,
        expected,
        actual,
    })
}
