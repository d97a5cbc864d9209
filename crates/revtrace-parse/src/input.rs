//! Input files.
//!
//! Simulator logs get large, so anything ending in `.zst` is decoded on the
//! fly. Lines are decoded lossily: a stray non-UTF-8 byte in a log must not
//! abort a run.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{ParseError, Result};

/// Open `path` for line-oriented reading, decompressing `.zst` files.
///
/// # Errors
///
/// Returns [`ParseError::Open`] if the file cannot be opened or the zstd
/// stream header is unreadable.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    let open_error = |source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(open_error)?;
    let is_zstd = path.extension().is_some_and(|ext| ext == "zst");
    if is_zstd {
        let decoder = zstd::stream::Decoder::new(file).map_err(open_error)?;
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Iterator over the lines of a reader, without line terminators.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
