//! Batch ingestion: one `sender,receiver,amount` transaction per line

use std::io::{BufRead, Write};
use std::path::Path;
use tally_core::{ExportFormat, Result, TallyError};
use tally_ledger::{Clock, Ledger, Transaction, Validation};

/// Result of feeding a batch into a ledger
#[derive(Debug, Default)]
pub struct BatchReport {
    pub appended: usize,
    /// (line number, reason) for every skipped line
    pub rejected: Vec<(usize, String)>,
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Option<Result<Transaction>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 3 {
        return Some(Err(TallyError::InvalidFormat(format!(
            "expected sender,receiver,amount but found {} field(s)",
            fields.len()
        ))));
    }

    Some(Transaction::new(fields[0], fields[1], fields[2]).map_err(TallyError::from))
}

/// Append every valid line; rejected lines are logged and skipped
pub fn run_batch<R: BufRead>(reader: R, ledger: &mut Ledger, clock: &dyn Clock) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;

        match parse_line(&line) {
            None => continue,
            Some(Ok(tx)) => {
                ledger.append_transaction(&tx, clock);
                report.appended += 1;
            }
            Some(Err(e)) => {
                tracing::warn!(line = line_number, "Skipping line: {}", e);
                report.rejected.push((line_number, e.to_string()));
            }
        }
    }

    Ok(report)
}

/// Everything the `batch` command produces
#[derive(Debug)]
pub struct BatchOutcome {
    pub report: BatchReport,
    pub export: String,
    pub validation: Validation,
}

impl BatchOutcome {
    /// Process exit status: 0 when the chain verified, 2 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.validation.is_valid() {
            0
        } else {
            2
        }
    }
}

/// Ingest a batch into a fresh ledger, then export and verify it
pub fn process<R: BufRead>(reader: R, format: ExportFormat, clock: &dyn Clock) -> Result<BatchOutcome> {
    let mut ledger = Ledger::new();
    let report = run_batch(reader, &mut ledger, clock)?;
    finish(&ledger, report, format)
}

fn finish(ledger: &Ledger, report: BatchReport, format: ExportFormat) -> Result<BatchOutcome> {
    Ok(BatchOutcome {
        export: ledger.export_as(format)?,
        validation: ledger.validate(),
        report,
    })
}

/// Write an export to `output`, or to stdout when no path is given
pub fn write_export(output: Option<&Path>, exported: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, exported)?;
            tracing::info!("Export written to {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(exported.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_ledger::{Block, FixedClock, ViolationReason};

    #[test]
    fn test_parse_line_skips_blank_and_comments() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("# header").is_none());
    }

    #[test]
    fn test_parse_line_trims_fields() {
        let tx = parse_line(" Alice , Bob , 12.5 ").unwrap().unwrap();
        assert_eq!(tx.sender(), "Alice");
        assert_eq!(tx.amount(), "12.5");
    }

    #[test]
    fn test_parse_line_rejects_wrong_arity() {
        assert!(matches!(
            parse_line("Alice,Bob"),
            Some(Err(TallyError::InvalidFormat(_)))
        ));
        assert!(matches!(
            parse_line("Alice,Bob,1,2"),
            Some(Err(TallyError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_run_batch_reports_rejections() {
        let input = "# sender,receiver,amount\nAlice,Bob,100.0\n,Bob,5\nBob,Carol,abc\n\nBob,Carol,50\n";
        let clock = FixedClock::parse("2025-01-01 12:00:00").unwrap();
        let mut ledger = Ledger::new();

        let report = run_batch(input.as_bytes(), &mut ledger, &clock).unwrap();

        assert_eq!(report.appended, 2);
        assert_eq!(
            report.rejected.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(ledger.len(), 2);
        assert!(ledger.validate().is_valid());
    }

    #[test]
    fn test_process_exports_and_verifies() {
        let clock = FixedClock::parse("2025-01-01 12:00:00").unwrap();
        let input = "Alice Smith,Bob,100.0\nBob,Carol,oops\nBob,Carol,50\n";

        let outcome = process(input.as_bytes(), ExportFormat::Csv, &clock).unwrap();

        assert_eq!(outcome.report.appended, 2);
        assert_eq!(outcome.report.rejected.len(), 1);
        assert_eq!(outcome.validation, Validation::Valid { blocks: 2 });
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(outcome.export.lines().count(), 3);
        assert!(outcome.export.lines().nth(1).unwrap().starts_with("1,Alice Smith,Bob,100.0,"));
    }

    #[test]
    fn test_tampered_chain_exits_non_zero() {
        let clock = FixedClock::parse("2025-01-01 12:00:00").unwrap();
        let mut ledger = Ledger::new();
        run_batch("Alice,Bob,1\nBob,Carol,2\n".as_bytes(), &mut ledger, &clock).unwrap();

        let mut blocks = ledger.into_blocks();
        let mut parts = blocks[1].clone().into_parts();
        parts.amount = "2000".to_string();
        blocks[1] = Block::from_parts(parts);
        let tampered = Ledger::from_blocks(blocks);

        let outcome = finish(&tampered, BatchReport::default(), ExportFormat::Text).unwrap();
        let violation = outcome.validation.violation().unwrap();
        assert_eq!(violation.sequence_number, 2);
        assert_eq!(violation.reason, ViolationReason::DigestMismatch);
        assert_eq!(outcome.exit_code(), 2);
    }

    #[test]
    fn test_write_export_to_file() {
        let path = std::env::temp_dir().join(format!("tally-export-{}.txt", std::process::id()));
        let clock = FixedClock::parse("2025-01-01 12:00:00").unwrap();
        let outcome = process("Alice,Bob,1\n".as_bytes(), ExportFormat::Text, &clock).unwrap();

        write_export(Some(&path), &outcome.export).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, outcome.export);
        assert!(written.starts_with("BLOCKCHAIN EXPORT\n"));
    }

    #[test]
    fn test_write_export_to_missing_directory_fails() {
        let path = Path::new("/nonexistent-tally-dir/export.txt");
        assert!(matches!(write_export(Some(path), "x"), Err(TallyError::Io(_))));
    }
}
