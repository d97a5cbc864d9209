//! `<rev-print>` string extraction.
//!
//! Guest programs emit "fast print" strings wrapped in `<rev-print>` tags.
//! A string may span several log lines; everything between the opening and
//! closing tag is reproduced.

use std::io::{self, Write};
use std::sync::OnceLock;

use regex::Regex;

static BOTH: OnceLock<Regex> = OnceLock::new();
static END: OnceLock<Regex> = OnceLock::new();
static START: OnceLock<Regex> = OnceLock::new();
static TIMESTAMP: OnceLock<Regex> = OnceLock::new();

/// Line-at-a-time extractor for `<rev-print>` strings.
#[derive(Debug, Default)]
pub struct FastPrintExtractor {
    in_string: bool,
    timestamps: bool,
}

impl FastPrintExtractor {
    /// Create an extractor; with `timestamps`, each string is preceded by a
    /// `#<tick>` line taken from the log prefix.
    #[must_use]
    pub const fn new(timestamps: bool) -> Self {
        Self {
            in_string: false,
            timestamps,
        }
    }

    /// Whether an opened string is still waiting for its closing tag.
    #[must_use]
    pub const fn in_string(&self) -> bool {
        self.in_string
    }

    /// Feed one log line (without terminator), writing any extracted text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn feed<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<()> {
        let both = BOTH.get_or_init(|| Regex::new(r"<rev-print>(.*)</rev-print>").unwrap());
        if let Some(caps) = both.captures(line) {
            self.in_string = false;
            return write!(out, "{}", &caps[1]);
        }

        let end = END.get_or_init(|| Regex::new(r"(.*)</rev-print>").unwrap());
        if let Some(caps) = end.captures(line) {
            self.in_string = false;
            return write!(out, "{}", &caps[1]);
        }

        let start = START.get_or_init(|| Regex::new(r"<rev-print>(.*)").unwrap());
        if let Some(caps) = start.captures(line) {
            self.in_string = true;
            if self.timestamps {
                let timestamp =
                    TIMESTAMP.get_or_init(|| Regex::new(r":(\d+)\]: <rev-print>").unwrap());
                if let Some(ts) = timestamp.captures(line) {
                    writeln!(out, "#{}", &ts[1])?;
                }
            }
            return writeln!(out, "{}", &caps[1]);
        }

        if self.in_string {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}
