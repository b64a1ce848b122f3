//! The ledger: an exclusively owned, append-only block sequence

use crate::block::{Block, Transaction};
use crate::clock::{format_timestamp, Clock};
use crate::export::{self, HistoryRow};
use crate::verify::{self, Validation};
use tally_core::{DisplayConfig, ExportFormat, Result};
use tally_crypto::link::{compute_block_digest, digest_prefix, GENESIS_PREFIX};

/// Single-writer, in-memory ledger.
///
/// The only mutation is [`Ledger::append`]. Blocks handed out are clones or
/// shared borrows, never mutable references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    blocks: Vec<Block>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing block sequence as-is, without checking it.
    ///
    /// Call [`Ledger::validate`] before trusting the result.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Validate raw fields and append the next block
    pub fn append(
        &mut self,
        sender: &str,
        receiver: &str,
        amount_text: &str,
        clock: &dyn Clock,
    ) -> Result<Block> {
        let tx = Transaction::new(sender, receiver, amount_text).map_err(|e| {
            tracing::warn!(error = %e, "Rejected transaction");
            e
        })?;
        Ok(self.append_transaction(&tx, clock))
    }

    /// Append an already-validated transaction. Cannot fail.
    pub fn append_transaction(&mut self, tx: &Transaction, clock: &dyn Clock) -> Block {
        // 1. Link to the previous block (or the genesis sentinel)
        let previous_digest_prefix = match self.blocks.last() {
            Some(last) => digest_prefix(&last.digest).to_string(),
            None => GENESIS_PREFIX.to_string(),
        };

        // 2. Number and stamp
        let sequence_number = self.blocks.len() as u64 + 1;
        let timestamp = format_timestamp(clock.now());

        // 3. Commit to the fields
        let digest = compute_block_digest(
            tx.sender(),
            tx.receiver(),
            tx.amount(),
            &timestamp,
            &previous_digest_prefix,
        );

        let block = Block {
            sequence_number,
            sender: tx.sender().to_string(),
            receiver: tx.receiver().to_string(),
            amount: tx.amount().to_string(),
            timestamp,
            previous_digest_prefix,
            digest,
        };

        self.blocks.push(block.clone());
        tracing::info!(
            sequence_number,
            "Block #{} added | Hash: {:.8}...",
            sequence_number,
            block.digest
        );
        block
    }

    /// Recompute every digest and link; report the earliest inconsistency
    pub fn validate(&self) -> Validation {
        verify::verify_chain(&self.blocks)
    }

    /// Plain-text export
    pub fn export(&self) -> String {
        export::export_text(&self.blocks)
    }

    pub fn export_as(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Text => Ok(export::export_text(&self.blocks)),
            ExportFormat::Json => export::export_json(&self.blocks),
            ExportFormat::Csv => Ok(export::export_csv(&self.blocks)),
        }
    }

    pub fn history(&self, display: &DisplayConfig) -> Vec<HistoryRow> {
        export::history(&self.blocks, display)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Look up a block by its 1-based sequence number
    pub fn get(&self, sequence_number: u64) -> Option<&Block> {
        let index = usize::try_from(sequence_number.checked_sub(1)?).ok()?;
        self.blocks.get(index)
    }

    pub fn last(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Digest of the newest block. Keep it externally to detect truncation.
    pub fn head_digest(&self) -> Option<&str> {
        self.blocks.last().map(|b| b.digest.as_str())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}
