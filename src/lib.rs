//! hla-exons: antigen-recognition-domain protein extraction from IPD-IMGT/HLA `.dat`
//! flat files, with length, reference-comparison and HED utilities.

pub mod error;

pub mod allele;
pub mod assembly;
pub mod checksum;
pub mod cli;
pub mod codon;
pub mod compare;
pub mod config;
pub mod embl;
pub mod fasta;
pub mod frame;
pub mod hed;
pub mod length_report;
pub mod pipeline;
