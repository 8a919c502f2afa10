//! IPD-IMGT/HLA `.dat` flat-file reader: record splitting, line classification and
//! per-record field extraction.

pub mod line;
pub mod record;
pub mod scanner;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::Lines;

use flate2::read::GzDecoder;

use crate::error::Error;

pub use record::{GenomicRecord, Interval};
pub use scanner::scan_record;

/// Record terminator line.
const TERMINATOR: &str = "//";

/// Leading tag every real record starts with.
const RECORD_TAG: &str = "ID";

/// Read a whole flat file into memory, decompressing `.gz` files.
///
/// A file with no content is an error; there is nothing to extract from it.
pub fn read_dat(path: &Path) -> Result<String, Error> {
    let file = File::open(path)?;
    let is_gz = path.extension().is_some_and(|ext| ext == "gz");
    let content = if is_gz {
        read_dat_gz(file)?
    } else {
        read_dat_from(BufReader::new(file))?
    };
    if content.trim().is_empty() {
        return Err(Error::Format(format!(
            "input file is empty: {}",
            path.display()
        )));
    }
    Ok(content)
}

/// Read gzip-compressed flat-file content.
pub fn read_dat_gz<R: Read>(reader: R) -> Result<String, Error> {
    read_dat_from(BufReader::new(GzDecoder::new(reader)))
}

/// Read plain flat-file content.
pub fn read_dat_from<R: Read>(mut reader: R) -> Result<String, Error> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(content)
}

/// Entry name from a record's `ID` line, used to label records that fail before
/// their allele name is known.
#[must_use]
pub fn entry_name<'a>(lines: &[&'a str]) -> &'a str {
    lines
        .first()
        .copied()
        .and_then(|l| l.strip_prefix(RECORD_TAG))
        .and_then(|rest| {
            rest.split(|c: char| c == ';' || c.is_whitespace())
                .find(|t| !t.is_empty())
        })
        .unwrap_or("?")
}

/// Lazily splits file content into record blocks on `//` lines.
///
/// Blocks that do not open with an `ID` line (file headers, trailing noise) are
/// skipped. Leading and trailing blank lines are removed from each block.
pub struct RecordSplitter<'a> {
    lines: Lines<'a>,
    exhausted: bool,
}

impl<'a> RecordSplitter<'a> {
    #[must_use]
    pub fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines(),
            exhausted: false,
        }
    }
}

impl<'a> Iterator for RecordSplitter<'a> {
    type Item = Vec<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let mut block: Vec<&'a str> = Vec::new();
            let mut terminated = false;
            for line in self.lines.by_ref() {
                if line.trim() == TERMINATOR {
                    terminated = true;
                    break;
                }
                block.push(line);
            }
            self.exhausted = !terminated;

            while block.last().is_some_and(|l| l.trim().is_empty()) {
                block.pop();
            }
            let first = block.iter().position(|l| !l.trim().is_empty());
            if let Some(first) = first {
                block.drain(..first);
                block[0] = block[0].trim_start();
                if block[0].starts_with(RECORD_TAG) {
                    return Some(block);
                }
            }
        }
        None
    }
}
