//! Record-to-sequence extraction: filtering, frame resolution and the accepted-allele
//! mapping.
//!
//! Records are processed strictly in file order. The first record accepted for a
//! two-field allele key wins; later records with the same key are skipped.

use std::collections::HashMap;
use std::io::Write;

use crate::allele::CodingClass;
use crate::assembly::{analysis_region, coding_sequence};
use crate::codon::{CodonTable, until_stop};
use crate::config::ExtractionConfig;
use crate::embl::{GenomicRecord, RecordSplitter, entry_name, scan_record};
use crate::error::{Error, Rejection, RejectionKind};
use crate::frame::{contains_slice, resolve_frame};

/// A validated protein fragment for one two-field allele.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub allele4: String,
    pub coding_class: CodingClass,
    pub sequence: Vec<u8>,
}

/// Per-record details of an accepted analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub frame_offset: usize,
    /// True when the chosen frame was confirmed by the annotated translation.
    pub exact_frame: bool,
    /// Residues in the full CDS translation.
    pub cds_protein_len: usize,
    /// The full CDS translation disagrees with the annotated translation.
    pub cds_mismatch: bool,
}

/// Accepted results keyed by two-field allele, kept in acceptance order.
#[derive(Debug, Default, Clone)]
pub struct AlleleMapping {
    results: Vec<AnalysisResult>,
    index: HashMap<String, usize>,
}

impl AlleleMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, allele4: &str) -> bool {
        self.index.contains_key(allele4)
    }

    /// Insert a result unless its key is already present. Returns false for duplicates.
    pub fn insert(&mut self, result: AnalysisResult) -> bool {
        if self.index.contains_key(&result.allele4) {
            return false;
        }
        self.index.insert(result.allele4.clone(), self.results.len());
        self.results.push(result);
        true
    }

    #[must_use]
    pub fn get(&self, allele4: &str) -> Option<&AnalysisResult> {
        self.index.get(allele4).map(|&i| &self.results[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Counters from one extraction run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionStats {
    pub num_records: u32,
    pub num_accepted: u32,
    pub num_format: u32,
    pub num_structural: u32,
    pub num_consistency: u32,
    pub num_duplicate: u32,
    pub num_shifted_frame: u32,
    pub num_unverified: u32,
    pub num_cds_mismatch: u32,
}

impl ExtractionStats {
    fn count_rejection(&mut self, kind: RejectionKind) {
        match kind {
            RejectionKind::Format => self.num_format += 1,
            RejectionKind::Structural => self.num_structural += 1,
            RejectionKind::Consistency => self.num_consistency += 1,
            RejectionKind::Duplicate => self.num_duplicate += 1,
        }
    }

    #[must_use]
    pub fn num_rejected(&self) -> u32 {
        self.num_format + self.num_structural + self.num_consistency + self.num_duplicate
    }
}

/// Why one record was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based position of the record in the file.
    pub record: usize,
    /// Allele name when known, otherwise the entry name.
    pub label: String,
    pub rejection: Rejection,
}

/// Everything an extraction run produced.
#[derive(Debug, Default, Clone)]
pub struct ExtractionReport {
    pub mapping: AlleleMapping,
    pub stats: ExtractionStats,
    pub diagnostics: Vec<Diagnostic>,
    pub limit_reached: bool,
}

/// Filter and analyze one scanned record, without the duplicate check.
///
/// Checks run in a fixed order and the first failure is returned: required exons,
/// DNA sequence, CDS coordinates, interval bounds, minimum length, then containment
/// in the annotated translation. Records without an annotated translation skip the
/// containment check.
pub fn analyze_record(
    record: &GenomicRecord,
    min_length: usize,
    table: &CodonTable,
) -> Result<Analysis, Rejection> {
    let region_dna = analysis_region(record).map_err(Rejection::MissingExon)?;

    let seq = &record.nucleotide_sequence;
    if seq.is_empty() {
        return Err(Rejection::MissingSequence);
    }
    if record.cds_ranges.is_empty() {
        return Err(Rejection::MissingCds);
    }
    if let Some(bad) = record.intervals().find(|iv| !iv.fits(seq.len())) {
        return Err(Rejection::IntervalOutOfBounds {
            start: bad.start,
            end: bad.end,
            len: seq.len(),
        });
    }

    let reference = record.annotated_translation.as_deref();

    let cds_protein = table.translate(&coding_sequence(
        seq,
        &record.cds_ranges,
        record.codon_start,
    ));
    let cds_mismatch = reference.is_some_and(|r| until_stop(&cds_protein) != r);

    let frame = resolve_frame(&region_dna, reference, table);
    let amino_acids = frame.amino_acids();

    if amino_acids.len() < min_length {
        return Err(Rejection::TooShort {
            len: amino_acids.len(),
            min: min_length,
        });
    }
    if let Some(reference) = reference
        && !contains_slice(reference, amino_acids)
    {
        return Err(Rejection::TranslationMismatch);
    }

    Ok(Analysis {
        result: AnalysisResult {
            allele4: record.allele4.clone(),
            coding_class: record.coding_class,
            sequence: amino_acids.to_vec(),
        },
        frame_offset: frame.offset,
        exact_frame: frame.exact,
        cds_protein_len: cds_protein.len(),
        cds_mismatch,
    })
}

/// Accumulates accepted alleles and diagnostics across records.
pub struct Extractor {
    min_length: usize,
    loci: Vec<String>,
    top: Option<usize>,
    table: CodonTable,
    report: ExtractionReport,
}

impl Extractor {
    #[must_use]
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            min_length: config.min_length,
            loci: config.loci.clone(),
            top: config.top,
            table: CodonTable::standard(),
            report: ExtractionReport::default(),
        }
    }

    /// True once the configured record limit has been reached.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.top
            .is_some_and(|top| self.report.mapping.len() >= top)
    }

    /// Process the raw lines of one record. Rejections are recorded, never raised.
    pub fn process(&mut self, lines: &[&str]) -> Result<Analysis, Rejection> {
        self.report.stats.num_records += 1;
        let position = self.report.stats.num_records as usize;

        match self.evaluate(lines) {
            Ok(analysis) => {
                let stats = &mut self.report.stats;
                stats.num_accepted += 1;
                if analysis.frame_offset != 0 {
                    stats.num_shifted_frame += 1;
                }
                if !analysis.exact_frame {
                    stats.num_unverified += 1;
                }
                if analysis.cds_mismatch {
                    stats.num_cds_mismatch += 1;
                }
                self.report.mapping.insert(analysis.result.clone());
                Ok(analysis)
            }
            Err((label, rejection)) => {
                self.note_rejection(position, label, rejection.clone());
                Err(rejection)
            }
        }
    }

    /// Scan, de-duplicate and analyze one record. Errors carry the label to report.
    fn evaluate(&self, lines: &[&str]) -> Result<Analysis, (String, Rejection)> {
        let record = scan_record(lines, &self.loci)
            .map_err(|rejection| (entry_name(lines).to_string(), rejection))?;
        let label = || record.allele.full.clone();

        if self.report.mapping.contains(&record.allele4) {
            return Err((label(), Rejection::Duplicate(record.allele4.clone())));
        }
        analyze_record(&record, self.min_length, &self.table)
            .map_err(|rejection| (label(), rejection))
    }

    fn note_rejection(&mut self, record: usize, label: String, rejection: Rejection) {
        self.report.stats.count_rejection(rejection.kind());
        self.report.diagnostics.push(Diagnostic {
            record,
            label,
            rejection,
        });
    }

    #[must_use]
    pub fn finish(self) -> ExtractionReport {
        self.report
    }
}

/// Run the whole pipeline over flat-file content.
#[must_use]
pub fn extract(content: &str, config: &ExtractionConfig) -> ExtractionReport {
    let mut extractor = Extractor::new(config);
    let mut limit_reached = false;
    for lines in RecordSplitter::new(content) {
        if extractor.is_full() {
            limit_reached = true;
            break;
        }
        let _ = extractor.process(&lines);
    }
    let mut report = extractor.finish();
    report.limit_reached = limit_reached;
    report
}

/// Write diagnostics as a tab-separated table.
pub fn write_diagnostics<W: Write>(writer: W, diagnostics: &[Diagnostic]) -> Result<(), Error> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    tsv.write_record(["record", "allele", "kind", "reason"])?;
    for d in diagnostics {
        tsv.write_record([
            d.record.to_string().as_str(),
            d.label.as_str(),
            d.rejection.kind().as_str(),
            d.rejection.to_string().as_str(),
        ])?;
    }
    tsv.flush()?;
    Ok(())
}
