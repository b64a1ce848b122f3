//! Tally Ledger - Append-only, hash-linked transaction ledger
//!
//! Every block commits to its own fields and to the first 16 hex characters
//! of its predecessor's digest, so any edit, reordering or removal inside the
//! chain is caught by [`Ledger::validate`] at the earliest affected block.

pub mod block;
pub mod clock;
pub mod export;
pub mod ledger;
pub mod shared;
pub mod verify;

pub use block::{Block, BlockParts, Transaction};
pub use clock::{format_timestamp, Clock, FixedClock, SystemClock, TIMESTAMP_FORMAT};
pub use export::HistoryRow;
pub use ledger::Ledger;
pub use shared::SharedLedger;
pub use tally_core::ExportFormat;
pub use verify::{IntegrityViolation, Validation, ViolationReason};
