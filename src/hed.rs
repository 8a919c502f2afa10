//! HLA evolutionary divergence (HED): mean Grantham distance between two aligned
//! allele sequences, plus TSV annotation and per-locus summaries.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::fasta::FastaRecord;

/// Residue order of the rows and columns of [`GRANTHAM`].
const RESIDUES: &[u8; 20] = b"ARNDCQEGHILKMFPSTWYV";

#[rustfmt::skip]
const GRANTHAM: [[u16; 20]; 20] = [
    [  0, 112, 111, 126, 195,  91, 107,  60,  86,  94,  96, 106,  84, 113,  27,  99,  58, 148, 112,  64],
    [112,   0,  86,  96, 180,  43,  54, 125,  29,  97, 102,  26,  91,  97, 103, 110,  71, 101,  77,  96],
    [111,  86,   0,  23, 139,  46,  42,  80,  68, 149, 153,  94, 142, 160,  91,  46,  65, 174, 143, 133],
    [126,  96,  23,   0, 154,  61,  45,  94,  81, 168, 172, 101, 160, 177, 108,  65,  85, 181, 160, 152],
    [195, 180, 139, 154,   0, 154, 170, 159, 174, 198, 198, 202, 196, 205, 169, 112, 149, 215, 194, 192],
    [ 91,  43,  46,  61, 154,   0,  29,  87,  24, 109, 113,  53, 101, 116,  76,  68,  42, 130,  99,  96],
    [107,  54,  42,  45, 170,  29,   0,  98,  40, 134, 138,  56, 126, 152,  93,  80,  65, 181, 140, 121],
    [ 60, 125,  80,  94, 159,  87,  98,   0,  98, 135, 138, 127, 127, 153,  42,  56,  59, 184, 147, 109],
    [ 86,  29,  68,  81, 174,  24,  40,  98,   0,  94,  99,  32,  87, 100,  77,  89,  47, 115,  83,  84],
    [ 94,  97, 149, 168, 198, 109, 134, 135,  94,   0,   5, 102,  10,  21,  95, 142,  89,  61,  33,  29],
    [ 96, 102, 153, 172, 198, 113, 138, 138,  99,   5,   0, 107,  21,  22,  98, 145,  92,  61,  36,  32],
    [106,  26,  94, 101, 202,  53,  56, 127,  32, 102, 107,   0,  95, 103, 103, 121,  78, 110,  85,  97],
    [ 84,  91, 142, 160, 196, 101, 126, 127,  87,  10,  21,  95,   0,  28,  87, 135,  81,  84,  36,  21],
    [113,  97, 160, 177, 205, 116, 152, 153, 100,  21,  22, 103,  28,   0, 114, 155, 103,  40,  22,  50],
    [ 27, 103,  91, 108, 169,  76,  93,  42,  77,  95,  98, 103,  87, 114,   0,  74,  38, 147, 110,  68],
    [ 99, 110,  46,  65, 112,  68,  80,  56,  89, 142, 145, 121, 135, 155,  74,   0,  58, 177, 144, 124],
    [ 58,  71,  65,  85, 149,  42,  65,  59,  47,  89,  92,  78,  81, 103,  38,  58,   0, 128,  92,  69],
    [148, 101, 174, 181, 215, 130, 181, 184, 115,  61,  61, 110,  84,  40, 147, 177, 128,   0,  37,  88],
    [112,  77, 143, 160, 194,  99, 140, 147,  83,  33,  36,  85,  36,  22, 110, 144,  92,  37,   0,  55],
    [ 64,  96, 133, 152, 192,  96, 121, 109,  84,  29,  32,  97,  21,  50,  68, 124,  69,  88,  55,   0],
];

/// Header of the column appended by [`annotate`].
pub const HED_COLUMN: &str = "HED";

fn residue_index(residue: u8) -> Option<usize> {
    RESIDUES.iter().position(|&r| r == residue)
}

/// Grantham distance between two residues. Identical or non-standard residues score 0.
#[must_use]
pub fn grantham(a: u8, b: u8) -> u16 {
    if a == b {
        return 0;
    }
    match (residue_index(a), residue_index(b)) {
        (Some(i), Some(j)) => GRANTHAM[i][j],
        _ => 0,
    }
}

/// Mean per-position Grantham distance of two equal-length sequences.
pub fn hed(s1: &[u8], s2: &[u8]) -> Result<f64, Error> {
    if s1.len() != s2.len() {
        return Err(Error::Validation(format!(
            "length mismatch: {} vs {}",
            s1.len(),
            s2.len()
        )));
    }
    if s1.is_empty() {
        return Err(Error::Validation("cannot compute HED of empty sequences".to_string()));
    }
    let total: u64 = s1
        .iter()
        .zip(s2)
        .map(|(&a, &b)| u64::from(grantham(a, b)))
        .sum();
    Ok(total as f64 / s1.len() as f64)
}

/// Allele sequences keyed by FASTA id.
#[derive(Debug, Default, Clone)]
pub struct AlleleSequences {
    sequences: HashMap<String, Vec<u8>>,
}

impl AlleleSequences {
    /// Index records by id; a repeated id keeps its last sequence.
    #[must_use]
    pub fn new(records: Vec<FastaRecord>) -> Self {
        let sequences = records.into_iter().map(|r| (r.id, r.sequence)).collect();
        Self { sequences }
    }

    #[must_use]
    pub fn get(&self, allele: &str) -> Option<&[u8]> {
        self.sequences.get(allele).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// HED between two named alleles.
    pub fn pair(&self, allele1: &str, allele2: &str) -> Result<f64, Error> {
        let lookup = |allele: &str| {
            self.get(allele)
                .ok_or_else(|| Error::Validation(format!("unknown allele: {allele}")))
        };
        hed(lookup(allele1)?, lookup(allele2)?)
    }

    /// HED for a pair, or `None` when either allele is unknown or lengths differ.
    #[must_use]
    pub fn try_pair(&self, allele1: &str, allele2: &str) -> Option<f64> {
        self.pair(allele1, allele2).ok()
    }
}

/// Median and interquartile range of a set of HED values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HedSummary {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub count: usize,
}

impl HedSummary {
    /// `None` for an empty set.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            median: percentile(&sorted, 50.0),
            q1: percentile(&sorted, 25.0),
            q3: percentile(&sorted, 75.0),
            count: sorted.len(),
        })
    }
}

/// Percentile of sorted, non-empty data by linear interpolation between closest ranks.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Copy a tab-separated table, appending a `HED` column computed from its second and
/// third columns. Returns the HED of every row, `None` where it could not be computed.
pub fn annotate<R: Read, W: Write>(
    input: R,
    output: W,
    sequences: &AlleleSequences,
) -> Result<Vec<Option<f64>>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(input);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(output);

    let mut header_row = reader.headers()?.clone();
    if header_row.len() < 3 {
        return Err(Error::Validation(format!(
            "expected at least 3 columns (id, allele1, allele2), found {}",
            header_row.len()
        )));
    }
    header_row.push_field(HED_COLUMN);
    writer.write_record(&header_row)?;

    let mut values = Vec::new();
    for row in reader.records() {
        let mut row = row?;
        let value = match (row.get(1), row.get(2)) {
            (Some(a1), Some(a2)) => sequences.try_pair(a1.trim(), a2.trim()),
            _ => None,
        };
        let cell = value.map(|v| format!("{v:.2}")).unwrap_or_default();
        row.push_field(&cell);
        writer.write_record(&row)?;
        values.push(value);
    }
    writer.flush()?;
    Ok(values)
}

/// Annotate `input` into `output` on disk.
pub fn annotate_file(
    input: &Path,
    output: &Path,
    sequences: &AlleleSequences,
) -> Result<Vec<Option<f64>>, Error> {
    let reader = std::fs::File::open(input)?;
    let writer = std::io::BufWriter::new(std::fs::File::create(output)?);
    annotate(reader, writer, sequences)
}

/// One row of the per-locus summary.
#[derive(Debug, Clone, PartialEq)]
pub struct LocusSummary {
    pub locus: String,
    /// `None` when no pair of the locus produced a value.
    pub stats: Option<HedSummary>,
}

/// Per-locus summary plus the inputs that could not be used.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LocusTable {
    pub rows: Vec<LocusSummary>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// Annotate `<dir>/<LOCUS>.txt` into `<dir>/<LOCUS>_anno.txt` for every locus.
///
/// Missing or malformed inputs are recorded in `skipped`; I/O failures while
/// writing are fatal.
pub fn summarize_loci(
    dir: &Path,
    loci: &[String],
    sequences: &AlleleSequences,
) -> Result<LocusTable, Error> {
    let mut table = LocusTable::default();
    for locus in loci {
        let input = dir.join(format!("{locus}.txt"));
        let output = dir.join(format!("{locus}_anno.txt"));
        if !input.is_file() {
            table.skipped.push((input, "input file not found".to_string()));
            continue;
        }
        let values = match annotate_file(&input, &output, sequences) {
            Ok(values) => values,
            Err(Error::Validation(reason)) => {
                table.skipped.push((input, reason));
                continue;
            }
            Err(e) => return Err(e),
        };
        let valid: Vec<f64> = values.into_iter().flatten().collect();
        table.rows.push(LocusSummary {
            locus: locus.clone(),
            stats: HedSummary::from_values(&valid),
        });
    }
    Ok(table)
}

/// Render the per-locus table.
pub fn write_locus_table<W: Write>(mut writer: W, rows: &[LocusSummary]) -> Result<(), Error> {
    writeln!(
        writer,
        "{:<10} {:>12} {:>20} {:>15}",
        "HLA Locus", "Median HED", "IQR", "Valid Pairs"
    )?;
    for row in rows {
        match row.stats {
            Some(s) => {
                let iqr = format!("({:.2}-{:.2})", s.q1, s.q3);
                writeln!(
                    writer,
                    "{:<10} {:>12.2} {:>20} {:>15}",
                    row.locus, s.median, iqr, s.count
                )?;
            }
            None => writeln!(writer, "{:<10} {:>12} {:>20} {:>15}", row.locus, "N/A", "N/A", 0)?,
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sequences() -> AlleleSequences {
        let record = |id: &str, seq: &str| FastaRecord {
            id: id.to_string(),
            description: "class_I".to_string(),
            sequence: seq.as_bytes().to_vec(),
        };
        AlleleSequences::new(vec![
            record("A*01:01", "ARND"),
            record("A*02:01", "ARNE"),
            record("A*03:01", "LRND"),
            record("B*07:02", "ARNDC"),
        ])
    }

    #[test]
    fn matrix_is_symmetric() {
        for i in 0..20 {
            assert_eq!(GRANTHAM[i][i], 0);
            for j in 0..20 {
                assert_eq!(GRANTHAM[i][j], GRANTHAM[j][i]);
            }
        }
    }

    #[test]
    fn grantham_lookup() {
        assert_eq!(grantham(b'A', b'R'), 112);
        assert_eq!(grantham(b'I', b'L'), 5);
        assert_eq!(grantham(b'W', b'C'), 215);
        assert_eq!(grantham(b'X', b'A'), 0);
        assert_eq!(grantham(b'*', b'*'), 0);
    }

    #[test]
    fn hed_is_mean_distance() {
        // D vs E = 45 at one of four positions
        assert!((hed(b"ARND", b"ARNE").unwrap() - 11.25).abs() < 1e-9);
        assert_eq!(hed(b"ARND", b"ARND").unwrap(), 0.0);
        assert!(matches!(hed(b"AR", b"ARN"), Err(Error::Validation(_))));
        assert!(matches!(hed(b"", b""), Err(Error::Validation(_))));
    }

    #[test]
    fn pair_lookup() {
        let seqs = sequences();
        assert!((seqs.pair("A*01:01", "A*03:01").unwrap() - 24.0).abs() < 1e-9);
        assert!(seqs.pair("A*01:01", "A*99:99").is_err());
        assert!(seqs.pair("A*01:01", "B*07:02").is_err());
        assert_eq!(seqs.try_pair("A*01:01", "B*07:02"), None);
    }

    #[test]
    fn percentiles_interpolate() {
        let summary = HedSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert!((summary.median - 2.5).abs() < 1e-9);
        assert!((summary.q1 - 1.75).abs() < 1e-9);
        assert!((summary.q3 - 3.25).abs() < 1e-9);
        assert_eq!(summary.count, 4);

        let single = HedSummary::from_values(&[7.0]).unwrap();
        assert_eq!((single.q1, single.median, single.q3), (7.0, 7.0, 7.0));
        assert!(HedSummary::from_values(&[]).is_none());
    }

    #[test]
    fn annotates_table() {
        let input = "id\tallele1\tallele2\n\
                     p1\tA*01:01\tA*02:01\n\
                     p2\tA*01:01\tB*07:02\n\
                     p3\tA*01:01\tC*01:02\n";
        let mut out = Vec::new();
        let values = annotate(Cursor::new(input), &mut out, &sequences()).unwrap();
        assert_eq!(values, vec![Some(11.25), None, None]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id\tallele1\tallele2\tHED\n\
             p1\tA*01:01\tA*02:01\t11.25\n\
             p2\tA*01:01\tB*07:02\t\n\
             p3\tA*01:01\tC*01:02\t\n"
        );
    }

    #[test]
    fn too_few_columns() {
        let input = "id\tallele1\np1\tA*01:01\n";
        let result = annotate(Cursor::new(input), Vec::new(), &sequences());
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn summarizes_loci_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("A.txt"),
            "id\ta1\ta2\nx\tA*01:01\tA*02:01\ny\tA*01:01\tA*03:01\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("C.txt"), "id\na\n").unwrap();
        let loci = vec!["A".to_string(), "B".to_string(), "C".to_string()];

        let table = summarize_loci(dir.path(), &loci, &sequences()).unwrap();
        assert_eq!(table.rows.len(), 1);
        let stats = table.rows[0].stats.unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.median - 17.625).abs() < 1e-9);
        assert_eq!(table.skipped.len(), 2);
        assert!(dir.path().join("A_anno.txt").is_file());

        let mut out = Vec::new();
        write_locus_table(&mut out, &table.rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HLA Locus"));
        assert!(text.contains("(14.44-20.81)"));
    }
}
