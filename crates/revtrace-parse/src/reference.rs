//! Spike reference trace.
//!
//! Lines are whitespace-tokenized; token 2 carries either the PC or an
//! exception tag:
//!
//! ```text
//! core   0: 0x0000000000010074 (0x00001141) c.addi  sp, -16
//! core   0: exception trap_load_page_fault, epc 0x0000000000010080
//! ```

use std::collections::VecDeque;
use std::io::BufRead;

use tracing::{debug, info, warn};

use crate::input::LineReader;
use crate::{ParseError, Result, parse_address};

/// Lines with fewer tokens carry no record.
const MIN_TOKENS: usize = 5;
const ADDRESS_TOKEN: usize = 2;
const EXCEPTION_TAG: &str = "exception";

/// What a reference record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Instruction { address: u64 },
    Exception,
}

/// One record of the reference trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    pub kind: ReferenceKind,
    /// Trimmed source line.
    pub raw: String,
}

impl ReferenceRecord {
    /// Parse a reference trace line.
    ///
    /// Returns `Ok(None)` for lines with fewer than five tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidAddress`] if token 2 is neither an
    /// exception tag nor a hex address.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < MIN_TOKENS {
            return Ok(None);
        }

        let field = tokens[ADDRESS_TOKEN];
        let kind = if field.contains(EXCEPTION_TAG) {
            ReferenceKind::Exception
        } else {
            let address = parse_address(field).ok_or_else(|| ParseError::InvalidAddress {
                token: field.to_string(),
            })?;
            ReferenceKind::Instruction { address }
        };

        Ok(Some(Self {
            kind,
            raw: line.trim().to_string(),
        }))
    }

    /// Program counter, or `None` for exception markers.
    #[must_use]
    pub const fn address(&self) -> Option<u64> {
        match self.kind {
            ReferenceKind::Instruction { address } => Some(address),
            ReferenceKind::Exception => None,
        }
    }

    #[must_use]
    pub const fn is_exception_marker(&self) -> bool {
        matches!(self.kind, ReferenceKind::Exception)
    }
}

/// Pop-only FIFO over the reference trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceQueue {
    records: VecDeque<ReferenceRecord>,
}

impl ReferenceQueue {
    /// Build a queue from already-parsed records, without fast-forwarding.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ReferenceRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Build a queue from trace lines.
    ///
    /// With a `start` address, everything before the first instruction record
    /// at `start` is dropped, exception markers included. Without one, all
    /// records are kept.
    #[must_use]
    pub fn from_lines<I, S>(lines: I, start: Option<u64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records = VecDeque::new();
        let mut started = start.is_none();
        let mut skipped = 0usize;

        for line in lines {
            let record = match ReferenceRecord::parse(line.as_ref()) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    debug!(error = %e, "skipping reference line");
                    skipped += 1;
                    continue;
                }
            };

            if !started {
                if record.address().is_some() && record.address() == start {
                    info!(
                        addr = format!("{:#x}", record.address().unwrap_or_default()),
                        "found start in reference trace"
                    );
                    started = true;
                } else {
                    continue;
                }
            }
            records.push_back(record);
        }

        if let Some(start) = start {
            if !started {
                warn!(
                    addr = format!("{start:#x}"),
                    "start address never reached in reference trace"
                );
            }
        }
        debug!(records = records.len(), skipped, "reference trace loaded");

        Self { records }
    }

    /// Build a queue from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from `reader` fails.
    pub fn from_reader<R: BufRead>(reader: R, start: Option<u64>) -> Result<Self> {
        let lines = LineReader::new(reader).collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self::from_lines(lines, start))
    }

    /// Record at the head of the queue.
    #[must_use]
    pub fn peek(&self) -> Option<&ReferenceRecord> {
        self.records.front()
    }

    /// Remove and return the head of the queue.
    pub fn pop(&mut self) -> Option<ReferenceRecord> {
        self.records.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
