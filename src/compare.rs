//! Comparison of extracted sequences against a reference protein FASTA.

use std::collections::{HashMap, HashSet};

use crate::fasta::FastaRecord;

/// Null alleles carry this suffix; they have no expressed protein to compare.
const NULL_SUFFIX: char = 'N';

/// Per-allele comparison outcome, in reference order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComparisonReport {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub mismatched: Vec<String>,
}

impl ComparisonReport {
    /// Number of reference alleles considered.
    #[must_use]
    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len() + self.mismatched.len()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

/// Compare `produced` against `reference`.
///
/// Produced records are keyed by id alone, so the `class_X` tag is ignored.
/// Reference records are keyed by their full header. Reference entries whose header
/// ends in `N` are skipped, and a repeated reference header is only counted once.
#[must_use]
pub fn compare(produced: &[FastaRecord], reference: &[FastaRecord]) -> ComparisonReport {
    let produced: HashMap<&str, &[u8]> = produced
        .iter()
        .map(|r| (r.id.as_str(), r.sequence.as_slice()))
        .collect();

    let mut report = ComparisonReport::default();
    let mut seen = HashSet::new();
    for record in reference {
        let allele = record.header();
        if allele.ends_with(NULL_SUFFIX) || !seen.insert(allele.clone()) {
            continue;
        }
        match produced.get(allele.as_str()) {
            None => report.missing.push(allele),
            Some(seq) if *seq != record.sequence.as_slice() => report.mismatched.push(allele),
            Some(_) => report.matched.push(allele),
        }
    }
    report
}
