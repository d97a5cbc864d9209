//! Command implementations.

mod check;
mod print;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Check { .. } => handle_check(cli),
        Commands::Print {
            log_file,
            time_stamp,
        } => print::cmd_print(log_file, *time_stamp),
    }
}

fn handle_check(cli: &Cli) -> i32 {
    let Commands::Check {
        asm_file,
        sst_out,
        spike_out,
        call_stk,
        entry,
        no_echo,
    } = &cli.command
    else {
        unreachable!("check command variant mismatch");
    };

    check::cmd_check(
        asm_file,
        sst_out,
        spike_out.as_deref(),
        *call_stk,
        entry,
        !*no_echo,
        cli.silent,
    )
}
