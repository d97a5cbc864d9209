//! Disassembly listing index.
//!
//! Parses `objdump -dC -Mno-aliases` style output into an address-keyed
//! instruction index plus the function boundaries derived from symbol labels:
//!
//! ```text
//! 0000000000010074 <main>:
//!    10074:	1141                	addi	sp,sp,-16
//!    10076:	e406                	sd	ra,8(sp)
//! ```

use std::io::BufRead;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::input::{LineReader, open_input};
use crate::{Result, parse_address};

/// One instruction line of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionRecord {
    pub address: u64,
    /// Trimmed source line.
    pub text: String,
}

/// First instruction of a labelled function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBoundary {
    pub start_address: u64,
    pub label: String,
}

/// Last instruction before the next label, tagged with the function it closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionReturnBoundary {
    pub address: u64,
    pub enclosing_label: String,
}

/// Classification of a single listing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingLine<'a> {
    /// `<name>:` symbol label.
    Label(&'a str),
    /// `address: encoding mnemonic operands`.
    Instruction { address: u64, text: &'a str },
    /// Section headers, banners, blank lines, symbol-offset annotations.
    Noise,
}

impl<'a> ListingLine<'a> {
    /// Classify one line of a disassembly listing.
    #[must_use]
    pub fn classify(line: &'a str) -> Self {
        let text = line.trim();
        if text.is_empty() {
            return Self::Noise;
        }

        let label_pattern = LABEL_PATTERN.get_or_init(|| Regex::new(r"<(.+)>:$").unwrap());
        if let Some(caps) = label_pattern.captures(text) {
            if let Some(name) = caps.get(1) {
                return Self::Label(name.as_str());
            }
        }

        let Some((token, _)) = text.split_once(':') else {
            return Self::Noise;
        };
        if token.contains('<') {
            return Self::Noise;
        }
        match parse_address(token) {
            Some(address) => Self::Instruction { address, text },
            None => Self::Noise,
        }
    }
}

static LABEL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Scanner state while walking the listing.
#[derive(Debug)]
enum ScanState {
    /// No label seen yet.
    Outside,
    /// Label seen, waiting for its first instruction.
    BeforeFirstInstruction { label: String },
    /// Inside a function; `last` is its most recent instruction address.
    InFunction { label: String, last: u64 },
}

/// Address-keyed view of a disassembly listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisassemblyIndex {
    instructions: FxHashMap<u64, InstructionRecord>,
    function_starts: FxHashMap<u64, FunctionBoundary>,
    function_returns: FxHashMap<u64, FunctionReturnBoundary>,
    labels: FxHashMap<String, u64>,
}

impl DisassemblyIndex {
    /// Build an index from listing lines.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        let mut state = ScanState::Outside;

        for line in lines {
            match ListingLine::classify(line.as_ref()) {
                ListingLine::Label(name) => {
                    if let ScanState::InFunction { label, last } = state {
                        index.function_returns.insert(
                            last,
                            FunctionReturnBoundary {
                                address: last,
                                enclosing_label: label,
                            },
                        );
                    }
                    state = ScanState::BeforeFirstInstruction {
                        label: name.to_string(),
                    };
                }
                ListingLine::Instruction { address, text } => {
                    index.insert_instruction(address, text);
                    state = match state {
                        ScanState::Outside => ScanState::Outside,
                        ScanState::BeforeFirstInstruction { label } => {
                            index.insert_function_start(address, &label);
                            ScanState::InFunction {
                                label,
                                last: address,
                            }
                        }
                        ScanState::InFunction { label, .. } => ScanState::InFunction {
                            label,
                            last: address,
                        },
                    };
                }
                ListingLine::Noise => {}
            }
        }

        index
    }

    /// Build an index from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from `reader` fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let lines = LineReader::new(reader).collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self::from_lines(lines))
    }

    /// Build an index from a listing file (plain or `.zst`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::ParseError::Open`] if the file cannot be opened.
    pub fn from_path(path: &Path) -> Result<Self> {
        let index = Self::from_reader(open_input(path)?)?;
        debug!(
            path = %path.display(),
            instructions = index.len(),
            functions = index.function_count(),
            "indexed disassembly"
        );
        Ok(index)
    }

    fn insert_instruction(&mut self, address: u64, text: &str) {
        let previous = self.instructions.insert(
            address,
            InstructionRecord {
                address,
                text: text.to_string(),
            },
        );
        if previous.is_some() {
            debug!(addr = format!("{address:#x}"), "duplicate listing address");
        }
    }

    fn insert_function_start(&mut self, address: u64, label: &str) {
        self.function_starts.insert(
            address,
            FunctionBoundary {
                start_address: address,
                label: label.to_string(),
            },
        );
        self.labels.entry(label.to_string()).or_insert(address);
    }

    /// Look up the instruction at `address`.
    #[must_use]
    pub fn lookup(&self, address: u64) -> Option<&InstructionRecord> {
        self.instructions.get(&address)
    }

    /// Function that starts at `address`, if any.
    #[must_use]
    pub fn function_start(&self, address: u64) -> Option<&FunctionBoundary> {
        self.function_starts.get(&address)
    }

    /// Function whose last listed instruction is at `address`, if any.
    #[must_use]
    pub fn function_return(&self, address: u64) -> Option<&FunctionReturnBoundary> {
        self.function_returns.get(&address)
    }

    /// Start address of the function labelled `label`.
    #[must_use]
    pub fn entry_address(&self, label: &str) -> Option<u64> {
        self.labels.get(label).copied()
    }

    /// Number of indexed instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of function boundaries.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.function_starts.len()
    }
}

#[cfg(test)]
mod tests;
