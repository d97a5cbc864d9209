//! Parsers for the inputs of a trace cross-check.
//!
//! - [`disasm`]: objdump-style disassembly listings, indexed by address and
//!   function boundary.
//! - [`record`]: REV simulator log lines (deep-trace and render dialects).
//! - [`reference`]: Spike reference traces as a pop-only queue.
//! - [`fastprint`]: `<rev-print>` string extraction from simulator logs.
//! - [`input`]: file opening with transparent zstd decompression.

pub mod disasm;
pub mod fastprint;
pub mod input;
pub mod record;
pub mod reference;

pub use disasm::{
    DisassemblyIndex, FunctionBoundary, FunctionReturnBoundary, InstructionRecord, ListingLine,
};
pub use fastprint::FastPrintExtractor;
pub use input::{LineReader, open_input};
pub use record::{DeepTrace, Dialect, ExecutedRecord, RenderTick, TraceDialect};
pub use reference::{ReferenceKind, ReferenceQueue, ReferenceRecord};

use std::path::PathBuf;

use thiserror::Error;

/// Parsing and input errors.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot open file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{dialect} line is missing `{field}`")]
    MissingField {
        dialect: Dialect,
        field: &'static str,
    },
    #[error("invalid address `{token}`")]
    InvalidAddress { token: String },
    #[error("invalid clock tick `{token}`")]
    InvalidTick { token: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a hexadecimal address token.
///
/// Accepts an optional `0x`/`0X` prefix and either letter case. Returns `None`
/// for empty tokens or tokens with non-hex characters.
#[must_use]
pub fn parse_address(token: &str) -> Option<u64> {
    let token = token.trim();
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
