//! FASTA reading and writing for extracted allele sequences.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Error;
use crate::pipeline::AnalysisResult;

/// One FASTA entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// First whitespace-delimited token of the header.
    pub id: String,
    /// Remainder of the header after the id, trimmed.
    pub description: String,
    pub sequence: Vec<u8>,
}

impl FastaRecord {
    /// Full header text without the leading `>`.
    #[must_use]
    pub fn header(&self) -> String {
        if self.description.is_empty() {
            self.id.clone()
        } else {
            format!("{} {}", self.id, self.description)
        }
    }
}

/// Write accepted alleles as `>allele4 class_X` records wrapped at `line_width`.
pub fn write_fasta<'a, W, I>(mut writer: W, results: I, line_width: usize) -> Result<(), Error>
where
    W: Write,
    I: IntoIterator<Item = &'a AnalysisResult>,
{
    if line_width == 0 {
        return Err(Error::Validation("FASTA line width must be positive".to_string()));
    }
    for result in results {
        writeln!(writer, ">{} class_{}", result.allele4, result.coding_class)?;
        for line in result.sequence.chunks(line_width) {
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read a FASTA file, decompressing `.gz` files.
pub fn read_fasta_path(path: &Path) -> Result<Vec<FastaRecord>, Error> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        read_fasta(BufReader::new(GzDecoder::new(file)))
    } else {
        read_fasta(BufReader::new(file))
    }
}

/// Read FASTA records from a buffered reader. Lines before the first header are
/// ignored; whitespace inside sequence lines is dropped.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>, Error> {
    let mut results = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                results.push(record);
            }
            let header = header.trim();
            let (id, description) = header
                .split_once(char::is_whitespace)
                .unwrap_or((header, ""));
            if id.is_empty() {
                return Err(Error::Parse(format!("empty FASTA header: >{header}")));
            }
            current = Some(FastaRecord {
                id: id.to_string(),
                description: description.trim().to_string(),
                sequence: Vec::new(),
            });
        } else if let Some(record) = current.as_mut() {
            record
                .sequence
                .extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
        }
    }

    if let Some(record) = current {
        results.push(record);
    }
    Ok(results)
}

/// Read FASTA from any reader; convenience for in-memory data.
pub fn read_fasta_from<R: Read>(reader: R) -> Result<Vec<FastaRecord>, Error> {
    read_fasta(BufReader::new(reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allele::CodingClass;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Cursor, Write};

    #[test]
    fn writes_wrapped_records() {
        let results = vec![
            AnalysisResult {
                allele4: "A*01:01".into(),
                coding_class: CodingClass::I,
                sequence: b"ABCDEFGHIJ".to_vec(),
            },
            AnalysisResult {
                allele4: "DRB1*15:01".into(),
                coding_class: CodingClass::II,
                sequence: b"MMMM".to_vec(),
            },
        ];
        let mut buf = Vec::new();
        write_fasta(&mut buf, &results, 4).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            ">A*01:01 class_I\nABCD\nEFGH\nIJ\n>DRB1*15:01 class_II\nMMMM\n"
        );
    }

    #[test]
    fn zero_width_rejected() {
        let results: Vec<AnalysisResult> = Vec::new();
        assert!(write_fasta(Vec::new(), &results, 0).is_err());
    }

    #[test]
    fn reads_ids_and_descriptions() {
        let fasta = ">A*01:01 class_I\nGSHSM\nRYFF\n\n>B*07:02\nGSHS M\n";
        let records = read_fasta(Cursor::new(fasta)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "A*01:01");
        assert_eq!(records[0].description, "class_I");
        assert_eq!(records[0].sequence, b"GSHSMRYFF");
        assert_eq!(records[0].header(), "A*01:01 class_I");
        assert_eq!(records[1].id, "B*07:02");
        assert_eq!(records[1].header(), "B*07:02");
        assert_eq!(records[1].sequence, b"GSHSM");
    }

    #[test]
    fn empty_header_is_an_error() {
        assert!(read_fasta(Cursor::new(">\nACGT\n")).is_err());
    }

    #[test]
    fn reads_gz_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alleles.fasta.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(b">C*07:01 class_I\nSHSM\n").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let records = read_fasta_path(&path).unwrap();
        assert_eq!(records[0].id, "C*07:01");
        assert_eq!(records[0].sequence, b"SHSM");
    }

    #[test]
    fn written_output_reads_back() {
        let results = vec![AnalysisResult {
            allele4: "DQB1*06:02".into(),
            coding_class: CodingClass::II,
            sequence: b"RDSPEDFVFQFKGMCYFTNGTERVRLVTRYIYNREEYARFDSDVGVYRAVTPLGPPAAEYWNSQKEVLERTRAELDTVCRHNYQLELRTTLQRR".to_vec(),
        }];
        let mut buf = Vec::new();
        write_fasta(&mut buf, &results, 60).unwrap();
        let records = read_fasta_from(Cursor::new(buf)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "DQB1*06:02");
        assert_eq!(records[0].description, "class_II");
        assert_eq!(records[0].sequence, results[0].sequence);
    }
}
