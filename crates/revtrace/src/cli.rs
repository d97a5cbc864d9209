//! CLI definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "revtrace")]
#[command(about = "REV trace checker - cross-validates simulator traces against disassembly and Spike")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default tracing directive for the selected verbosity.
    pub const fn log_directive(&self) -> &'static str {
        if self.verbose {
            "revtrace=debug"
        } else if self.silent {
            "revtrace=error"
        } else {
            "revtrace=info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a REV trace against the disassembly and, optionally, a Spike trace
    Check {
        /// Disassembly listing (objdump -dC -Mno-aliases)
        #[arg(short = 'a', long = "asmFile", value_name = "ASM")]
        asm_file: PathBuf,

        /// REV simulator log
        #[arg(short = 's', long = "sstOut", value_name = "LOG")]
        sst_out: PathBuf,

        /// Spike reference trace; enables golden-reference mode
        #[arg(short = 'k', long = "spikeOut", value_name = "LOG")]
        spike_out: Option<PathBuf>,

        /// Dump the call stack at this clock tick
        #[arg(short = 'c', long = "callStk", value_name = "TICK")]
        call_stk: Option<u64>,

        /// Entry symbol the call stack is rooted at
        #[arg(long, default_value = "main")]
        entry: String,

        /// Do not echo render-dialect log lines
        #[arg(long)]
        no_echo: bool,
    },

    /// Print <rev-print> strings from a REV simulator log
    Print {
        /// REV simulator log
        #[arg(short = 'l', long = "logFile", value_name = "LOG")]
        log_file: PathBuf,

        /// Prefix each string with its clock tick
        #[arg(short = 't', long = "timeStamp", visible_alias = "ts")]
        time_stamp: bool,
    },
}
