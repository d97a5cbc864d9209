//! Report rendering.
//!
//! The report is plain, line-oriented text: fixed-width left-justified
//! columns separated by `:::`. Warnings are first-class rows and are never
//! suppressed.

use std::io::{self, Write};

use crate::callstack::StackSnapshot;
use crate::correlate::{Correlation, MatchResult, Outcome, Resync};

/// Column separator.
pub const SEPARATOR: &str = ":::";

/// Column width for static-only rows.
const STATIC_WIDTH: usize = 60;
/// Column width for the listing and REV columns of golden rows.
const GOLDEN_WIDTH: usize = 70;
/// Column width for the Spike column of golden rows.
const REFERENCE_WIDTH: usize = 60;

/// Output switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Write per-instruction rows. Warnings and notices are always written.
    pub rows: bool,
    /// Echo render-dialect log lines before their rows.
    pub echo_render: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            rows: true,
            echo_render: true,
        }
    }
}

/// Counters for one check run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Executed records parsed from the simulator log.
    pub records: usize,
    /// Records resolved against the listing.
    pub rows: usize,
    pub matches: usize,
    pub mismatches: usize,
    /// Executed PCs absent from the listing.
    pub unindexed: usize,
    /// Exception markers after which the executed PC was found again.
    pub resyncs: usize,
    /// Exception markers after which the executed PC never reappeared.
    pub lost_sync: usize,
    /// Malformed simulator log lines.
    pub skipped_lines: usize,
    pub stack_reported: bool,
    /// Reference records left unconsumed at the end of the run.
    pub reference_remaining: usize,
}

/// Writes report lines to `W`.
pub struct Reporter<W: Write> {
    out: W,
    options: ReportOptions,
}

impl<W: Write> Reporter<W> {
    #[must_use]
    pub const fn new(out: W, options: ReportOptions) -> Self {
        Self { out, options }
    }

    /// Golden-mode column header.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn header(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "{:<9} {:<GOLDEN_WIDTH$} {:<3} {:<GOLDEN_WIDTH$} {:<3} {:<REFERENCE_WIDTH$}",
            "PC Match",
            "ASM Instruction",
            SEPARATOR,
            "Rev Instruction",
            SEPARATOR,
            "Spike Instruction"
        )
    }

    /// Write everything a correlation produced, updating `summary`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn correlation(
        &mut self,
        address: u64,
        executed_text: &str,
        correlation: &Correlation<'_>,
        summary: &mut Summary,
    ) -> io::Result<()> {
        if let Some(resync) = correlation.resync {
            if resync.found {
                summary.resyncs += 1;
            } else {
                summary.lost_sync += 1;
            }
            self.resynced(address, resync)?;
        }
        if correlation.reference_exhausted {
            self.reference_exhausted(address)?;
        }

        match &correlation.outcome {
            Outcome::Aligned { static_text } => {
                summary.rows += 1;
                self.aligned(static_text, executed_text)
            }
            Outcome::Compared {
                verdict,
                static_text,
                reference,
            } => {
                summary.rows += 1;
                if verdict.is_match() {
                    summary.matches += 1;
                } else {
                    summary.mismatches += 1;
                }
                let reference_text = reference.as_ref().map_or("", |r| r.raw.as_str());
                self.compared(*verdict, static_text, executed_text, reference_text)
            }
            Outcome::Unindexed => {
                summary.unindexed += 1;
                self.unindexed(address)
            }
        }
    }

    /// Static-only row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn aligned(&mut self, static_text: &str, executed_text: &str) -> io::Result<()> {
        if !self.options.rows {
            return Ok(());
        }
        writeln!(
            self.out,
            "{static_text:<STATIC_WIDTH$} {SEPARATOR:<3} {executed_text:<STATIC_WIDTH$}"
        )
    }

    /// Golden-mode row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn compared(
        &mut self,
        verdict: MatchResult,
        static_text: &str,
        executed_text: &str,
        reference_text: &str,
    ) -> io::Result<()> {
        if !self.options.rows {
            return Ok(());
        }
        writeln!(
            self.out,
            "{:<3} {static_text:<GOLDEN_WIDTH$} {SEPARATOR:<3} {executed_text:<GOLDEN_WIDTH$} {SEPARATOR:<3} {reference_text:<REFERENCE_WIDTH$}",
            verdict.indicator()
        )
    }

    /// Warning for a PC missing from the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn unindexed(&mut self, address: u64) -> io::Result<()> {
        writeln!(
            self.out,
            "WARNING: PC {address:x} not found in asm file, but was executed by Rev"
        )
    }

    /// Warning for the first record after the reference ran dry.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn reference_exhausted(&mut self, address: u64) -> io::Result<()> {
        writeln!(
            self.out,
            "WARNING: reference trace exhausted at PC {address:x}"
        )
    }

    /// Notice for an exception marker in the reference. Says where lockstep
    /// resumed, or that it was lost.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn resynced(&mut self, address: u64, resync: Resync) -> io::Result<()> {
        if resync.found {
            writeln!(
                self.out,
                "found exception: resynchronized at PC {address:x} after discarding {} reference records",
                resync.discarded
            )
        } else {
            writeln!(
                self.out,
                "found exception: PC {address:x} not found in reference after discarding {} reference records",
                resync.discarded
            )
        }
    }

    /// Echo a raw simulator log line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn echo(&mut self, line: &str) -> io::Result<()> {
        if !self.options.echo_render {
            return Ok(());
        }
        writeln!(self.out, "{line}")
    }

    /// Call stack dump, root frame first.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn call_stack(&mut self, snapshot: &StackSnapshot) -> io::Result<()> {
        writeln!(
            self.out,
            "Call Stack at time: {} and PC: {:x}",
            snapshot.tick, snapshot.address
        )?;
        for frame in &snapshot.frames {
            writeln!(self.out, "{frame}")?;
        }
        Ok(())
    }

    /// Flush the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}
