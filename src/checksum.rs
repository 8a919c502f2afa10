//! MD5 verification of input flat files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::Error;

const BUFFER_SIZE: usize = 64 * 1024;

/// Lowercase hex MD5 digest of everything `reader` yields.
pub fn md5_hex<R: Read>(mut reader: R) -> Result<String, Error> {
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Digest of the file as stored on disk (compressed bytes for `.gz`).
pub fn file_md5(path: &Path) -> Result<String, Error> {
    md5_hex(BufReader::new(File::open(path)?))
}

/// Fails with [`Error::Validation`] unless the file digest equals `expected`
/// (case-insensitive).
pub fn verify_md5(path: &Path, expected: &str) -> Result<(), Error> {
    let actual = file_md5(path)?;
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(Error::Validation(format!(
            "MD5 mismatch for {}: expected {expected}, got {actual}",
            path.display()
        )));
    }
    Ok(())
}
