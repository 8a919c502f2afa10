//! Reading-frame selection for the analysis region.
//!
//! Exon boundaries from the feature table are not guaranteed to sit in the
//! translation's frame. Each of the three offsets is translated and the first one
//! whose translation occurs verbatim in the annotated `/translation` wins. Without
//! such a hit the longest candidate is kept, with ties going to the smallest offset.
//! That fallback may not match the reference at all; the consistency check
//! downstream decides whether the record survives.

use crate::codon::{CodonTable, codon_floor, until_stop};

/// Outcome of the reading-frame search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFrame {
    /// Offset (0, 1 or 2) into the analysis region.
    pub offset: usize,
    /// Full translation at `offset`, stop codons included.
    pub candidate: Vec<u8>,
    /// True when `candidate` occurs in the annotated translation.
    pub exact: bool,
}

impl ResolvedFrame {
    /// Usable residues: the candidate up to its first stop codon.
    #[must_use]
    pub fn amino_acids(&self) -> &[u8] {
        until_stop(&self.candidate)
    }
}

/// True when `needle` occurs contiguously in `haystack`. The empty needle is
/// contained in everything.
#[must_use]
pub fn contains_slice(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty()
        || (needle.len() <= haystack.len()
            && haystack.windows(needle.len()).any(|w| w == needle))
}

/// Pick the reading frame of `region` that best reconstructs `reference`.
#[must_use]
pub fn resolve_frame(region: &[u8], reference: Option<&[u8]>, table: &CodonTable) -> ResolvedFrame {
    let mut best: Option<ResolvedFrame> = None;

    for offset in 0..3 {
        let shifted = region.get(offset..).unwrap_or_default();
        let candidate = table.translate(&shifted[..codon_floor(shifted.len())]);

        if reference.is_some_and(|r| contains_slice(r, &candidate)) {
            return ResolvedFrame {
                offset,
                candidate,
                exact: true,
            };
        }

        if best
            .as_ref()
            .is_none_or(|b| candidate.len() > b.candidate.len())
        {
            best = Some(ResolvedFrame {
                offset,
                candidate,
                exact: false,
            });
        }
    }

    best.unwrap_or_default()
}
