//! Line-oriented input: the counting pre-pass and the chunked block reader.
//!
//! Records are newline-terminated; the terminator is stripped. A final
//! record without a terminator is still ingested, and empty records yield
//! empty values.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind as IoErrorKind, Read};
use std::path::Path;

use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};

/// Count input rows without materializing them, to size the code column
/// before encoding starts.
pub fn count_lines(path: &Path) -> Result<usize> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; 64 * 1024];
    let mut lines = 0usize;
    let mut last_byte = None;

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        lines += buf[..n].iter().filter(|&&b| b == b'\n').count();
        last_byte = Some(buf[n - 1]);
    }

    // A trailing record without a terminator is still a row.
    if let Some(b) = last_byte {
        if b != b'\n' {
            lines += 1;
        }
    }

    Ok(lines)
}

/// Streams the input file as blocks of lines, bounded by a byte budget and
/// a line cap, whichever fills first.
pub struct ChunkReader {
    reader: BufReader<File>,
    max_bytes: usize,
    max_lines: usize,
}

impl ChunkReader {
    pub fn open(path: &Path, config: &Config) -> Result<Self> {
        let file = File::open(path)?;
        Ok(ChunkReader {
            reader: BufReader::new(file),
            max_bytes: config.chunk_size,
            max_lines: config.max_lines_per_chunk,
        })
    }

    /// Next block of lines, or `None` at end of input.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<String>>> {
        let mut lines = Vec::new();
        let mut bytes = 0usize;

        while bytes < self.max_bytes && lines.len() < self.max_lines {
            let mut line = String::new();
            let n = self.reader.read_line(&mut line).map_err(|e| {
                if e.kind() == IoErrorKind::InvalidData {
                    Error::new(ErrorKind::Parse, format!("input is not valid UTF-8: {}", e))
                } else {
                    Error::from(e)
                }
            })?;
            if n == 0 {
                break;
            }

            bytes += n;
            if line.ends_with('\n') {
                line.pop();
            }
            lines.push(line);
        }

        if lines.is_empty() {
            Ok(None)
        } else {
            Ok(Some(lines))
        }
    }
}
