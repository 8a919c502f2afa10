//! HLA allele nomenclature: locus, resolution fields and gene class.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Rejection};

/// Classical HLA loci kept by default.
pub const CLASSICAL_LOCI: [&str; 11] = [
    "A", "B", "C", "DRB1", "DRB3", "DRB4", "DRB5", "DQA1", "DQB1", "DPA1", "DPB1",
];

/// Suffix marking a null (non-expressed) allele.
const NULL_SUFFIX: char = 'N';

/// MHC gene family. Class I analysis covers exons 2 and 3, class II only exon 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodingClass {
    I,
    II,
}

impl CodingClass {
    /// Detect the class marker in a description line. "Class II" is tested first since
    /// it contains "Class I".
    #[must_use]
    pub fn from_description(line: &str) -> Option<Self> {
        if line.contains("Class II") {
            Some(Self::II)
        } else if line.contains("Class I") {
            Some(Self::I)
        } else {
            None
        }
    }

    /// Exon numbers that make up the analysis region, in order.
    #[must_use]
    pub fn analysis_exons(self) -> &'static [u32] {
        match self {
            Self::I => &[2, 3],
            Self::II => &[2],
        }
    }
}

impl fmt::Display for CodingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I => write!(f, "I"),
            Self::II => write!(f, "II"),
        }
    }
}

impl FromStr for CodingClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "I" | "class_I" => Ok(Self::I),
            "II" | "class_II" => Ok(Self::II),
            _ => Err(Error::Parse(format!("invalid coding class: '{s}'"))),
        }
    }
}

/// A parsed allele designation such as `A*01:01:01:01`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleName {
    pub full: String,
    pub locus: String,
    pub fields: Vec<String>,
}

impl AlleleName {
    /// Parse and screen an allele token against the locus allow-list.
    ///
    /// Null alleles and loci outside `loci` are rejected, as are names with fewer than
    /// two colon-delimited fields after the locus.
    pub fn parse(token: &str, loci: &[String]) -> Result<Self, Rejection> {
        if token.ends_with(NULL_SUFFIX) {
            return Err(Rejection::NullAllele(token.to_string()));
        }

        let Some((locus, rest)) = token.split_once('*') else {
            // No '*': the whole token is the locus, which cannot carry fields
            if !loci.iter().any(|l| l == token) {
                return Err(Rejection::UnsupportedLocus(token.to_string()));
            }
            return Err(Rejection::MalformedAllele(token.to_string()));
        };

        if !loci.iter().any(|l| l == locus) {
            return Err(Rejection::UnsupportedLocus(token.to_string()));
        }

        let fields: Vec<String> = rest.split(':').map(str::to_string).collect();
        if fields.len() < 2 {
            return Err(Rejection::MalformedAllele(token.to_string()));
        }

        Ok(Self {
            full: token.to_string(),
            locus: locus.to_string(),
            fields,
        })
    }

    /// Two-field (4-digit) key, e.g. `A*01:01`.
    #[must_use]
    pub fn allele4(&self) -> String {
        format!("{}*{}:{}", self.locus, self.fields[0], self.fields[1])
    }
}

/// Extract the allele token following `HLA-` in a description line.
#[must_use]
pub fn find_allele_token(line: &str) -> Option<&str> {
    let start = line.find("HLA-")? + 4;
    let rest = &line[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '*' | ':' | '-')))
        .unwrap_or(rest.len());
    let token = &rest[..end];
    (!token.is_empty()).then_some(token)
}

/// Default allow-list as owned strings.
#[must_use]
pub fn classical_loci() -> Vec<String> {
    CLASSICAL_LOCI.iter().map(|s| (*s).to_string()).collect()
}
