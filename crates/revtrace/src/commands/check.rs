//! Check command.

use std::io;
use std::path::Path;

use revtrace::{CheckConfig, Summary};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal;

/// Handle the `check` command.
pub fn cmd_check(
    asm_file: &Path,
    sst_out: &Path,
    spike_out: Option<&Path>,
    call_stk: Option<u64>,
    entry: &str,
    echo: bool,
    silent: bool,
) -> i32 {
    let mut config = CheckConfig::new(asm_file, sst_out)
        .with_entry_symbol(entry)
        .with_echo_render(echo);
    if let Some(path) = spike_out {
        config = config.with_reference(path);
    }
    if let Some(tick) = call_stk {
        config = config.with_call_stack_tick(tick);
    }

    let summary = match revtrace::run_check(&config, io::stdout().lock()) {
        Ok(summary) => summary,
        Err(e) => {
            terminal::error(&e.to_string());
            return EXIT_FAILURE;
        }
    };

    if !silent {
        print_summary(&config, &summary);
    }
    EXIT_SUCCESS
}

fn print_summary(config: &CheckConfig, summary: &Summary) {
    let headline = format!(
        "{} records checked, {} resolved",
        summary.records, summary.rows
    );
    if summary.unindexed == 0 && summary.mismatches == 0 {
        terminal::success(&headline);
    } else {
        terminal::warning(&headline);
    }

    if summary.unindexed > 0 {
        terminal::indent(&format!("{} PCs not found in asm file", summary.unindexed));
    }
    if config.is_golden() {
        terminal::indent(&format!(
            "{} matches, {} mismatches, {} resyncs, {} reference records left",
            summary.matches, summary.mismatches, summary.resyncs, summary.reference_remaining
        ));
        if summary.lost_sync > 0 {
            terminal::warning(&format!(
                "lockstep lost after {} exception markers",
                summary.lost_sync
            ));
        }
    }
    if summary.skipped_lines > 0 {
        terminal::dim(&format!("{} malformed trace lines skipped", summary.skipped_lines));
    }
    if let Some(tick) = config.call_stack_tick {
        if !summary.stack_reported {
            terminal::warning(&format!("clock tick {tick} never reached"));
        }
    }
}
