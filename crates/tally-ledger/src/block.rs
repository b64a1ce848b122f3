//! Block and transaction types

use serde::Serialize;
use tally_core::ValidationError;
use tally_crypto::link::compute_block_digest;

/// A normalized transaction, ready to be appended.
///
/// Sender, receiver and amount are trimmed. Construction fails when either
/// party is blank or the amount is not a finite number. Sign and zero are
/// not restricted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    sender: String,
    receiver: String,
    amount: String,
}

impl Transaction {
    pub fn new(sender: &str, receiver: &str, amount: &str) -> Result<Self, ValidationError> {
        let sender = sender.trim();
        let receiver = receiver.trim();
        let amount = amount.trim();

        if sender.is_empty() {
            return Err(ValidationError::EmptySender);
        }
        if receiver.is_empty() {
            return Err(ValidationError::EmptyReceiver);
        }
        parse_amount(amount)?;

        Ok(Self {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount: amount.to_string(),
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// Amount exactly as entered (after trimming). This text is what gets hashed.
    pub fn amount(&self) -> &str {
        &self.amount
    }
}

/// Parse an amount, accepting any finite number
pub fn parse_amount(amount: &str) -> Result<f64, ValidationError> {
    if amount.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }

    let value: f64 = amount.parse().map_err(|_| ValidationError::InvalidAmount {
        input: amount.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ValidationError::NonFiniteAmount {
            input: amount.to_string(),
        });
    }

    Ok(value)
}

/// One immutable ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    #[serde(rename = "blockNumber")]
    pub(crate) sequence_number: u64,
    pub(crate) sender: String,
    pub(crate) receiver: String,
    pub(crate) amount: String,
    pub(crate) timestamp: String,
    #[serde(rename = "previousHash")]
    pub(crate) previous_digest_prefix: String,
    #[serde(rename = "hash")]
    pub(crate) digest: String,
}

/// All stored fields of a block, with no consistency guarantees.
///
/// Used to reassemble chains received from elsewhere so they can be verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockParts {
    pub sequence_number: u64,
    pub sender: String,
    pub receiver: String,
    pub amount: String,
    pub timestamp: String,
    pub previous_digest_prefix: String,
    pub digest: String,
}

impl Block {
    /// Reassemble a block from stored fields. The digest is taken as given.
    pub fn from_parts(parts: BlockParts) -> Self {
        Self {
            sequence_number: parts.sequence_number,
            sender: parts.sender,
            receiver: parts.receiver,
            amount: parts.amount,
            timestamp: parts.timestamp,
            previous_digest_prefix: parts.previous_digest_prefix,
            digest: parts.digest,
        }
    }

    pub fn into_parts(self) -> BlockParts {
        BlockParts {
            sequence_number: self.sequence_number,
            sender: self.sender,
            receiver: self.receiver,
            amount: self.amount,
            timestamp: self.timestamp,
            previous_digest_prefix: self.previous_digest_prefix,
            digest: self.digest,
        }
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn previous_digest_prefix(&self) -> &str {
        &self.previous_digest_prefix
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Digest of the block's current fields, computed independently of the stored one
    pub fn recompute_digest(&self) -> String {
        compute_block_digest(
            &self.sender,
            &self.receiver,
            &self.amount,
            &self.timestamp,
            &self.previous_digest_prefix,
        )
    }
}
