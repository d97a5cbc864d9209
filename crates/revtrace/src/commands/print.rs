//! Print command.

use std::io;
use std::path::Path;

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal;

/// Handle the `print` command.
pub fn cmd_print(log_file: &Path, timestamps: bool) -> i32 {
    match revtrace::run_print(log_file, timestamps, io::stdout().lock()) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            terminal::error(&e.to_string());
            EXIT_FAILURE
        }
    }
}
