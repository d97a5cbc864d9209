//! revtrace - REV trace cross-validation
//!
//! Checks the instruction stream of the REV simulator against the static
//! disassembly of the program and, optionally, against a Spike reference
//! trace. Also reconstructs the call stack at a given clock tick from
//! function-label boundaries.
//!
//! # Example
//!
//! ```ignore
//! use revtrace::{CheckConfig, run_check};
//!
//! let config = CheckConfig::new("prog.asm", "sst.out").with_reference("spike.out");
//! let summary = run_check(&config, std::io::stdout().lock())?;
//! ```

// Re-export from sub-crates
pub use revtrace_parse::{
    DisassemblyIndex, Dialect, ExecutedRecord, FastPrintExtractor, FunctionBoundary,
    FunctionReturnBoundary, InstructionRecord, ParseError, ReferenceKind, ReferenceQueue,
    ReferenceRecord,
};

pub mod callstack;
pub mod correlate;
mod error;
pub mod report;
mod session;

pub use callstack::{CallFrame, CallStack, CallStackTracker, StackSnapshot};
pub use correlate::{Correlation, Correlator, MatchResult, Outcome, Resync};
pub use error::{Error, Result};
pub use report::{ReportOptions, Reporter, Summary};
pub use session::{CheckConfig, run_check, run_print};
