//! Typed representation of one allele entry.

use std::collections::BTreeMap;

use crate::allele::{AlleleName, CodingClass};

/// Half-open, 0-based interval over a record's nucleotide sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Convert a 1-based inclusive feature-table range. Returns None for a zero start.
    #[must_use]
    pub fn from_one_based(start: usize, end: usize) -> Option<Self> {
        let start = start.checked_sub(1)?;
        Some(Self { start, end })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the interval is non-empty and ends within a sequence of `len` bases.
    #[must_use]
    pub fn fits(&self, len: usize) -> bool {
        self.start < self.end && self.end <= len
    }

    /// Bases covered by this interval, or None if it does not fit the sequence.
    #[must_use]
    pub fn slice<'a>(&self, seq: &'a [u8]) -> Option<&'a [u8]> {
        self.fits(seq.len()).then(|| &seq[self.start..self.end])
    }
}

/// One allele entry after line classification and field extraction.
#[derive(Debug, Clone)]
pub struct GenomicRecord {
    /// Entry name from the ID line (e.g. `HLA00001`).
    pub entry_id: String,
    pub allele: AlleleName,
    pub allele4: String,
    pub coding_class: CodingClass,
    /// 1-based offset into the first CDS segment (1, 2 or 3).
    pub codon_start: u8,
    pub cds_ranges: Vec<Interval>,
    pub exon_ranges: BTreeMap<u32, Interval>,
    pub nucleotide_sequence: Vec<u8>,
    pub annotated_translation: Option<Vec<u8>>,
}

impl GenomicRecord {
    #[must_use]
    pub fn locus(&self) -> &str {
        &self.allele.locus
    }

    #[must_use]
    pub fn exon(&self, number: u32) -> Option<Interval> {
        self.exon_ranges.get(&number).copied()
    }

    /// All feature intervals, CDS segments first, then exons in number order.
    pub fn intervals(&self) -> impl Iterator<Item = Interval> + '_ {
        self.cds_ranges
            .iter()
            .copied()
            .chain(self.exon_ranges.values().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_conversion() {
        let iv = Interval::from_one_based(1, 73).unwrap();
        assert_eq!(iv, Interval::new(0, 73));
        assert_eq!(iv.len(), 73);
        assert!(Interval::from_one_based(0, 10).is_none());
    }

    #[test]
    fn slicing_respects_bounds() {
        let seq = b"ACGTACGT";
        assert_eq!(Interval::new(2, 5).slice(seq), Some(&b"GTA"[..]));
        assert_eq!(Interval::new(0, 8).slice(seq), Some(&seq[..]));
        assert_eq!(Interval::new(4, 9).slice(seq), None);
        assert_eq!(Interval::new(5, 5).slice(seq), None);
    }
}
