//! Error types for the hla-exons library.

use thiserror::Error;

/// Errors that abort an operation.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A tab-separated table could not be read or written.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A validation constraint was violated.
    #[error("{0}")]
    Validation(String),

    /// A file format error was detected.
    #[error("{0}")]
    Format(String),
}

/// Broad classification of why a record was left out of the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    Format,
    Structural,
    Consistency,
    Duplicate,
}

impl RejectionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Structural => "structural",
            Self::Consistency => "consistency",
            Self::Duplicate => "duplicate",
        }
    }
}

/// A record that was skipped. These never stop a run; the display text is the
/// diagnostic shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unparseable description")]
    UnparseableDescription,

    #[error("null allele: {0}")]
    NullAllele(String),

    #[error("non-classical locus: {0}")]
    UnsupportedLocus(String),

    #[error("malformed allele name: {0}")]
    MalformedAllele(String),

    #[error("invalid codon_start: {0}")]
    InvalidCodonStart(String),

    #[error("duplicate 4-digit allele: {0}")]
    Duplicate(String),

    #[error("exon {0} not present")]
    MissingExon(u32),

    #[error("no DNA sequence")]
    MissingSequence,

    #[error("no CDS coordinates")]
    MissingCds,

    #[error("interval {start}..{end} out of bounds for sequence length {len}")]
    IntervalOutOfBounds { start: usize, end: usize, len: usize },

    #[error("exon translation too short ({len} residues, minimum {min})")]
    TooShort { len: usize, min: usize },

    #[error("exon translation not found in /translation")]
    TranslationMismatch,
}

impl Rejection {
    #[must_use]
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::UnparseableDescription
            | Self::NullAllele(_)
            | Self::UnsupportedLocus(_)
            | Self::MalformedAllele(_)
            | Self::InvalidCodonStart(_) => RejectionKind::Format,
            Self::MissingExon(_)
            | Self::MissingSequence
            | Self::MissingCds
            | Self::IntervalOutOfBounds { .. } => RejectionKind::Structural,
            Self::TooShort { .. } | Self::TranslationMismatch => RejectionKind::Consistency,
            Self::Duplicate(_) => RejectionKind::Duplicate,
        }
    }
}
