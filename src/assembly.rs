//! Coding-sequence and analysis-region assembly from feature coordinates.

use crate::codon::codon_floor;
use crate::embl::{GenomicRecord, Interval};

/// Bases covered by `interval`, clamped to the sequence.
fn slice_clamped(seq: &[u8], interval: Interval) -> &[u8] {
    let end = interval.end.min(seq.len());
    let start = interval.start.min(end);
    &seq[start..end]
}

fn truncate_to_codons(mut dna: Vec<u8>) -> Vec<u8> {
    dna.truncate(codon_floor(dna.len()));
    dna
}

/// Splice the CDS segments in file order.
///
/// The codon_start offset is applied to the first segment only; splicing removes any
/// frame discontinuity at later segment boundaries. A trailing partial codon is
/// dropped.
#[must_use]
pub fn coding_sequence(seq: &[u8], cds_ranges: &[Interval], codon_start: u8) -> Vec<u8> {
    let skip = usize::from(codon_start.saturating_sub(1));
    let mut cds = Vec::with_capacity(cds_ranges.iter().map(Interval::len).sum());
    for (i, &range) in cds_ranges.iter().enumerate() {
        let segment = slice_clamped(seq, range);
        if i == 0 {
            cds.extend_from_slice(&segment[skip.min(segment.len())..]);
        } else {
            cds.extend_from_slice(segment);
        }
    }
    truncate_to_codons(cds)
}

/// Concatenate the exons of the analysis region (exon 2, plus exon 3 for class I).
///
/// Returns the first missing exon number when the record lacks one. When exon 1 is
/// absent the codon_start offset has not been absorbed upstream, so it is applied to
/// the start of the region instead.
pub fn analysis_region(record: &GenomicRecord) -> Result<Vec<u8>, u32> {
    let seq = &record.nucleotide_sequence;
    let mut region = Vec::new();
    for &number in record.coding_class.analysis_exons() {
        let interval = record.exon(number).ok_or(number)?;
        region.extend_from_slice(slice_clamped(seq, interval));
    }

    if record.exon(1).is_none() && record.codon_start > 1 {
        let skip = usize::from(record.codon_start - 1).min(region.len());
        region.drain(..skip);
    }

    Ok(truncate_to_codons(region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allele::{AlleleName, CodingClass, classical_loci};
    use std::collections::BTreeMap;

    fn record(class: CodingClass, exons: &[(u32, Interval)], codon_start: u8) -> GenomicRecord {
        let allele = AlleleName::parse("A*01:01:01", &classical_loci()).unwrap();
        GenomicRecord {
            entry_id: "HLA00001".into(),
            allele4: allele.allele4(),
            allele,
            coding_class: class,
            codon_start,
            cds_ranges: vec![],
            exon_ranges: exons.iter().copied().collect::<BTreeMap<_, _>>(),
            nucleotide_sequence: b"AAACCCGGGTTTAAACCCGGGTTT".to_vec(),
            annotated_translation: None,
        }
    }

    #[test]
    fn cds_offset_only_on_first_segment() {
        let seq = b"XATGAAAYCCCGGG";
        let cds = coding_sequence(
            seq,
            &[Interval::new(0, 7), Interval::new(8, 14)],
            2,
        );
        assert_eq!(cds, b"ATGAAACCCGGG");
    }

    #[test]
    fn cds_trailing_partial_codon_dropped() {
        let cds = coding_sequence(b"ATGAAACC", &[Interval::new(0, 8)], 1);
        assert_eq!(cds, b"ATGAAA");
    }

    #[test]
    fn class_one_joins_exons_two_and_three() {
        let rec = record(
            CodingClass::I,
            &[(2, Interval::new(0, 6)), (3, Interval::new(12, 18))],
            1,
        );
        assert_eq!(analysis_region(&rec).unwrap(), b"AAACCCAAACCC");
    }

    #[test]
    fn class_two_uses_exon_two_only() {
        let rec = record(
            CodingClass::II,
            &[(2, Interval::new(3, 9)), (3, Interval::new(12, 18))],
            1,
        );
        assert_eq!(analysis_region(&rec).unwrap(), b"CCCGGG");
    }

    #[test]
    fn missing_exons_reported() {
        let rec = record(CodingClass::I, &[(2, Interval::new(0, 6))], 1);
        assert_eq!(analysis_region(&rec), Err(3));
        let rec = record(CodingClass::II, &[(3, Interval::new(0, 6))], 1);
        assert_eq!(analysis_region(&rec), Err(2));
    }

    #[test]
    fn codon_start_applied_without_exon_one() {
        let rec = record(CodingClass::II, &[(2, Interval::new(0, 9))], 2);
        // AAACCCGGG minus one base, then trimmed to whole codons
        assert_eq!(analysis_region(&rec).unwrap(), b"AACCCG");
    }

    #[test]
    fn codon_start_ignored_with_exon_one() {
        let rec = record(
            CodingClass::II,
            &[(1, Interval::new(0, 3)), (2, Interval::new(3, 9))],
            3,
        );
        assert_eq!(analysis_region(&rec).unwrap(), b"CCCGGG");
    }
}
