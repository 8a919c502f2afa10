//! Field extraction from classified record lines.

use std::collections::BTreeMap;

use crate::allele::{AlleleName, CodingClass, find_allele_token};
use crate::error::Rejection;

use super::line::{LineKind, classify};
use super::record::{GenomicRecord, Interval};

const TRANSLATION_QUALIFIER: &str = "/translation=\"";
const CODON_START_QUALIFIER: &str = "/codon_start=";

/// Which feature block the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    /// Location part of the first CDS feature (before its first qualifier).
    CdsLocation,
    /// Remainder of a feature that contributes no coordinates.
    Other,
}

/// Extract a [`GenomicRecord`] from the raw lines of one entry.
///
/// Unusable entries come back as a [`Rejection`] naming the failed check. Only
/// description-level problems are decided here; structural and consistency checks run
/// later in the pipeline.
pub fn scan_record(lines: &[&str], loci: &[String]) -> Result<GenomicRecord, Rejection> {
    let kinds = classify(lines);

    let mut entry_id = String::new();
    let mut allele_token: Option<&str> = None;
    let mut coding_class: Option<CodingClass> = None;

    let mut codon_start: u8 = 1;
    let mut translation: Option<Vec<u8>> = None;
    let mut in_translation = false;

    let mut cds_location = String::new();
    let mut cds_seen = false;
    let mut block = Block::None;

    let mut exon_ranges: BTreeMap<u32, Interval> = BTreeMap::new();
    let mut sequence: Vec<u8> = Vec::new();

    for (i, kind) in kinds.iter().enumerate() {
        if in_translation {
            let text = match *kind {
                LineKind::Feature { body, .. } => body,
                _ => lines[i].trim(),
            };
            let closed = text.ends_with('"');
            if let Some(aa) = translation.as_mut() {
                aa.extend_from_slice(text.trim_end_matches('"').as_bytes());
            }
            in_translation = !closed;
            continue;
        }

        match *kind {
            LineKind::Identification(rest) => {
                entry_id = rest
                    .split(|c: char| c == ';' || c.is_whitespace())
                    .next()
                    .unwrap_or("")
                    .to_string();
            }
            LineKind::Description(text) => {
                if coding_class.is_none() {
                    coding_class = CodingClass::from_description(text);
                }
                if allele_token.is_none() {
                    allele_token = find_allele_token(text);
                }
            }
            LineKind::Feature { key, body } => {
                if !key.is_empty() {
                    block = if key == "CDS" && !cds_seen {
                        cds_seen = true;
                        Block::CdsLocation
                    } else {
                        Block::Other
                    };
                    if key == "exon"
                        && let Some(exon) = exon_with_number(body, kinds.get(i + 1))
                    {
                        exon_ranges.insert(exon.0, exon.1);
                    }
                }

                if body.starts_with('/') {
                    if block == Block::CdsLocation {
                        block = Block::Other;
                    }
                    if let Some(rest) = body.strip_prefix(TRANSLATION_QUALIFIER) {
                        let closed = rest.ends_with('"');
                        translation = Some(rest.trim_end_matches('"').as_bytes().to_vec());
                        in_translation = !closed;
                    } else if let Some(value) = body.strip_prefix(CODON_START_QUALIFIER) {
                        codon_start = parse_codon_start(value)?;
                    }
                } else if block == Block::CdsLocation {
                    cds_location.push_str(body);
                }
            }
            LineKind::SequenceData(data) => {
                sequence.extend(
                    data.bytes()
                        .filter(|b| b"ACGTacgt".contains(b))
                        .map(|b| b.to_ascii_uppercase()),
                );
            }
            LineKind::SequenceHeader | LineKind::Other => {}
        }
    }

    let (Some(token), Some(coding_class)) = (allele_token, coding_class) else {
        return Err(Rejection::UnparseableDescription);
    };
    let allele = AlleleName::parse(token, loci)?;
    let allele4 = allele.allele4();

    let annotated_translation = translation
        .map(|aa| aa.trim_ascii().to_vec())
        .filter(|aa| !aa.is_empty());

    Ok(GenomicRecord {
        entry_id,
        allele,
        allele4,
        coding_class,
        codon_start,
        cds_ranges: find_ranges(&cds_location),
        exon_ranges,
        nucleotide_sequence: sequence,
        annotated_translation,
    })
}

fn parse_codon_start(value: &str) -> Result<u8, Rejection> {
    match value.trim().parse::<u8>() {
        Ok(n @ 1..=3) => Ok(n),
        _ => Err(Rejection::InvalidCodonStart(value.trim().to_string())),
    }
}

/// Pair an exon's location with the `/number` qualifier on the line right after it.
fn exon_with_number(location: &str, next: Option<&LineKind<'_>>) -> Option<(u32, Interval)> {
    let interval = *find_ranges(location).first()?;
    let Some(LineKind::Feature { body, .. }) = next else {
        return None;
    };
    let number = body
        .strip_prefix("/number=\"")?
        .strip_suffix('"')?
        .parse::<u32>()
        .ok()?;
    Some((number, interval))
}

/// Find every `start..end` pair in a feature location, converted to 0-based
/// half-open intervals. Partial-range markers (`<`, `>`) are ignored.
#[must_use]
pub fn find_ranges(location: &str) -> Vec<Interval> {
    let bytes = location.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start_begin = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let start_end = i;
        if !location[i..].starts_with("..") {
            continue;
        }
        let mut j = i + 2;
        while j < bytes.len() && bytes[j] == b'>' {
            j += 1;
        }
        let end_begin = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == end_begin {
            i = end_begin;
            continue;
        }
        if let (Ok(start), Ok(end)) = (
            location[start_begin..start_end].parse::<usize>(),
            location[end_begin..j].parse::<usize>(),
        ) && let Some(interval) = Interval::from_one_based(start, end)
        {
            ranges.push(interval);
        }
        i = j;
    }

    ranges
}
