//! One end-to-end run over the inputs.

use std::io::Write;
use std::path::{Path, PathBuf};

use revtrace_parse::{
    Dialect, DisassemblyIndex, ExecutedRecord, FastPrintExtractor, LineReader, ReferenceQueue,
    open_input,
};
use tracing::{debug, info, info_span, warn};

use crate::callstack::CallStackTracker;
use crate::correlate::Correlator;
use crate::error::Result;
use crate::report::{ReportOptions, Reporter, Summary};

/// Symbol the call stack is rooted at and the reference is fast-forwarded to.
pub const DEFAULT_ENTRY_SYMBOL: &str = "main";

/// Inputs and switches for a check run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Disassembly listing.
    pub asm: PathBuf,
    /// REV simulator log.
    pub trace: PathBuf,
    /// Spike reference trace; enables golden-reference mode.
    pub reference: Option<PathBuf>,
    /// Clock tick at which to dump the call stack.
    pub call_stack_tick: Option<u64>,
    pub entry_symbol: String,
    /// Echo render-dialect lines into the report.
    pub echo_render: bool,
}

impl CheckConfig {
    #[must_use]
    pub fn new(asm: impl Into<PathBuf>, trace: impl Into<PathBuf>) -> Self {
        Self {
            asm: asm.into(),
            trace: trace.into(),
            reference: None,
            call_stack_tick: None,
            entry_symbol: DEFAULT_ENTRY_SYMBOL.to_string(),
            echo_render: true,
        }
    }

    #[must_use]
    pub fn with_reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_call_stack_tick(mut self, tick: u64) -> Self {
        self.call_stack_tick = Some(tick);
        self
    }

    #[must_use]
    pub fn with_entry_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.entry_symbol = symbol.into();
        self
    }

    #[must_use]
    pub const fn with_echo_render(mut self, echo: bool) -> Self {
        self.echo_render = echo;
        self
    }

    #[must_use]
    pub const fn is_golden(&self) -> bool {
        self.reference.is_some()
    }
}

/// Check a simulator log against the listing and optional reference,
/// writing the report to `out`.
///
/// All inputs are opened, trace first, before any output is written.
///
/// # Errors
///
/// Returns an error if an input cannot be opened or read, or if writing the
/// report fails. Malformed lines are skipped, not reported as errors.
pub fn run_check<W: Write>(config: &CheckConfig, out: W) -> Result<Summary> {
    let _span = info_span!("check", trace = %config.trace.display()).entered();

    let trace = open_input(&config.trace)?;
    let index = {
        let _span = info_span!("index_asm").entered();
        DisassemblyIndex::from_path(&config.asm)?
    };
    let reference = config.reference.as_deref().map(open_input).transpose()?;

    let entry = index.entry_address(&config.entry_symbol);
    match entry {
        Some(addr) => info!(
            symbol = %config.entry_symbol,
            addr = format!("{addr:#x}"),
            "found start in asm"
        ),
        None => warn!(
            symbol = %config.entry_symbol,
            "entry symbol not found in asm, reference will not be fast-forwarded"
        ),
    }

    let mut correlator = match reference {
        Some(reader) => {
            let _span = info_span!("load_reference").entered();
            Correlator::with_reference(&index, ReferenceQueue::from_reader(reader, entry)?)
        }
        None => Correlator::new(&index),
    };
    let mut tracker =
        CallStackTracker::new(&index, config.entry_symbol.as_str(), config.call_stack_tick);
    let mut reporter = Reporter::new(
        out,
        ReportOptions {
            rows: config.call_stack_tick.is_none(),
            echo_render: config.echo_render,
        },
    );
    let mut summary = Summary::default();

    if correlator.is_golden() {
        reporter.header()?;
    }

    for line in LineReader::new(trace) {
        let line = line?;
        let record = match ExecutedRecord::parse(&line) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                debug!(error = %e, "skipping malformed trace line");
                summary.skipped_lines += 1;
                continue;
            }
        };
        summary.records += 1;

        if record.dialect == Dialect::RenderTick {
            reporter.echo(&line)?;
        }

        let correlation = correlator.correlate(&record);
        reporter.correlation(record.address, &record.text, &correlation, &mut summary)?;

        if let Some(snapshot) = tracker.observe(&record) {
            reporter.call_stack(&snapshot)?;
            summary.stack_reported = true;
        }
    }
    reporter.flush()?;

    if let Some(tick) = config.call_stack_tick {
        if !tracker.answered() {
            warn!(tick, "call stack tick never reached");
        }
    }
    summary.reference_remaining = correlator.remaining_reference();
    info!(
        records = summary.records,
        unindexed = summary.unindexed,
        mismatches = summary.mismatches,
        "check complete"
    );

    Ok(summary)
}

/// Extract `<rev-print>` strings from a simulator log into `out`.
///
/// # Errors
///
/// Returns an error if the log cannot be opened or read, or if writing fails.
pub fn run_print<W: Write>(log: &Path, timestamps: bool, mut out: W) -> Result<()> {
    let _span = info_span!("print", log = %log.display()).entered();

    let mut extractor = FastPrintExtractor::new(timestamps);
    for line in LineReader::new(open_input(log)?) {
        extractor.feed(&line?, &mut out)?;
    }
    if extractor.in_string() {
        warn!("log ended inside an unterminated <rev-print> string");
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CheckConfig::new("prog.asm", "sst.out");
        assert_eq!(config.entry_symbol, "main");
        assert!(config.echo_render);
        assert!(!config.is_golden());
        assert_eq!(config.call_stack_tick, None);
    }

    #[test]
    fn test_config_builders() {
        let config = CheckConfig::new("prog.asm", "sst.out")
            .with_reference("spike.out")
            .with_call_stack_tick(42)
            .with_entry_symbol("_start")
            .with_echo_render(false);
        assert!(config.is_golden());
        assert_eq!(config.reference.as_deref(), Some(Path::new("spike.out")));
        assert_eq!(config.call_stack_tick, Some(42));
        assert_eq!(config.entry_symbol, "_start");
        assert!(!config.echo_render);
    }

    #[test]
    fn test_missing_listing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let trace = dir.path().join("sst.out");
        std::fs::write(&trace, "").unwrap();
        let config = CheckConfig::new(dir.path().join("missing.asm"), &trace);

        let err = run_check(&config, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("missing.asm"));
    }
}
