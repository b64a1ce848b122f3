//! Read-only renderings of a block sequence
//!
//! All renderers are deterministic: the same blocks always produce
//! byte-identical output.

use crate::block::Block;
use std::fmt::Write as _;
use tally_core::{DisplayConfig, Result};

const TEXT_HEADER: &str = "BLOCKCHAIN EXPORT\n=================\n\n";
const CSV_HEADER: &str = "blockNumber,sender,receiver,amount,timestamp,previousHash,hash";

/// Plain-text export, one paragraph per block
pub fn export_text(blocks: &[Block]) -> String {
    let mut out = String::from(TEXT_HEADER);
    for block in blocks {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "Block #{}\nSender: {}\nReceiver: {}\nAmount: {}\nTimestamp: {}\nPrevious Hash: {}\nHash: {}\n\n",
            block.sequence_number,
            block.sender,
            block.receiver,
            block.amount,
            block.timestamp,
            block.previous_digest_prefix,
            block.digest,
        );
    }
    out
}

/// Pretty-printed JSON array of blocks
pub fn export_json(blocks: &[Block]) -> Result<String> {
    Ok(serde_json::to_string_pretty(blocks)?)
}

/// CSV with a header row. Line endings are `\n`.
pub fn export_csv(blocks: &[Block]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for block in blocks {
        let row = [
            block.sequence_number.to_string(),
            csv_field(&block.sender),
            csv_field(&block.receiver),
            csv_field(&block.amount),
            csv_field(&block.timestamp),
            csv_field(&block.previous_digest_prefix),
            csv_field(&block.digest),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One entry of the history view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub sequence_number: u64,
    pub sender: String,
    pub receiver: String,
    /// Amount with currency symbol and two decimals
    pub amount: String,
    pub timestamp: String,
    /// Leading digest characters followed by `...`
    pub digest_preview: String,
}

impl HistoryRow {
    pub fn from_block(block: &Block, display: &DisplayConfig) -> Self {
        let amount = match block.amount.parse::<f64>() {
            Ok(value) if value.is_finite() => format!("{}{:.2}", display.currency_symbol, value),
            _ => format!("{}{}", display.currency_symbol, block.amount),
        };

        let preview: String = block.digest.chars().take(display.hash_preview_len).collect();

        Self {
            sequence_number: block.sequence_number,
            sender: block.sender.clone(),
            receiver: block.receiver.clone(),
            amount,
            timestamp: block.timestamp.clone(),
            digest_preview: format!("{}...", preview),
        }
    }
}

impl std::fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{:<4} {} -> {}  {}  [{}]  {}",
            self.sequence_number,
            self.sender,
            self.receiver,
            self.amount,
            self.timestamp,
            self.digest_preview
        )
    }
}

pub fn history(blocks: &[Block], display: &DisplayConfig) -> Vec<HistoryRow> {
    blocks
        .iter()
        .map(|block| HistoryRow::from_block(block, display))
        .collect()
}
