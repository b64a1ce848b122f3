//! Interactive session: a line-oriented form for entering transactions

use crate::batch::parse_line;
use std::io::{BufRead, Write};
use tally_core::{ExportFormat, LedgerConfig, TallyError};
use tally_ledger::{Clock, Ledger, Validation};

const HELP: &str = "\
Commands:
  send <sender>,<receiver>,<amount>   append a transaction
  history                             list blocks
  validate                            verify chain integrity
  export [text|json|csv]              print the chain
  status                              show block count
  help                                show this message
  quit                                leave the session";

/// What the loop should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Quit,
}

pub struct Session<'a> {
    ledger: Ledger,
    config: &'a LedgerConfig,
    clock: &'a dyn Clock,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a LedgerConfig, clock: &'a dyn Clock) -> Self {
        Self {
            ledger: Ledger::new(),
            config,
            clock,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> std::io::Result<()> {
        writeln!(out, "tally session - type 'help' for commands")?;
        for line in input.lines() {
            match self.execute(&line?) {
                Outcome::Reply(reply) if reply.is_empty() => {}
                Outcome::Reply(reply) => writeln!(out, "{}", reply)?,
                Outcome::Quit => break,
            }
        }
        out.flush()
    }

    pub fn execute(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        if line.is_empty() {
            return Outcome::Reply(String::new());
        }
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();

        let reply = match command {
            "send" => self.send(rest),
            "history" => self.history(),
            "validate" => self.validate(),
            "export" => self.export(&args),
            "status" => format!("Total Blocks: {}", self.ledger.len()),
            "help" => HELP.to_string(),
            "quit" | "exit" => return Outcome::Quit,
            other => format!("Unknown command '{}'. Type 'help' for commands.", other),
        };
        Outcome::Reply(reply)
    }

    /// Party names may contain spaces; fields are comma-separated
    fn send(&mut self, fields: &str) -> String {
        let tx = match parse_line(fields) {
            None | Some(Err(TallyError::InvalidFormat(_))) => {
                return "Usage: send <sender>,<receiver>,<amount>".to_string();
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Rejected transaction");
                return format!("Error: {}", e);
            }
            Some(Ok(tx)) => tx,
        };

        let block = self.ledger.append_transaction(&tx, self.clock);
        format!("Block #{} added successfully", block.sequence_number())
    }

    fn history(&self) -> String {
        if self.ledger.is_empty() {
            return "No transactions yet. Create your first block!".to_string();
        }
        self.ledger
            .history(&self.config.display)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn validate(&self) -> String {
        match self.ledger.validate() {
            Validation::Valid { blocks } => format!("Chain valid: {} block(s) verified", blocks),
            Validation::Invalid(violation) => format!("Chain INVALID at {}", violation),
        }
    }

    fn export(&self, args: &[&str]) -> String {
        if self.ledger.is_empty() {
            return "No transactions to export.".to_string();
        }

        let format = match args.first() {
            Some(raw) => match raw.parse::<ExportFormat>() {
                Ok(format) => format,
                Err(e) => return format!("Error: {}", e),
            },
            None => self.config.export.format,
        };

        match self.ledger.export_as(format) {
            Ok(text) => text,
            Err(e) => format!("Error: {}", e),
        }
    }
}
