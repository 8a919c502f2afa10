//! Sequence-length distribution of alleles, grouped by gene.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::Error;
use crate::fasta::FastaRecord;

/// Gene -> sequence length -> allele ids in file order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LengthDistribution {
    genes: BTreeMap<String, BTreeMap<usize, Vec<String>>>,
}

impl LengthDistribution {
    /// Group records by the gene before `*` in their id. Empty sequences are skipped.
    #[must_use]
    pub fn from_records(records: &[FastaRecord]) -> Self {
        let mut genes: BTreeMap<String, BTreeMap<usize, Vec<String>>> = BTreeMap::new();
        for record in records.iter().filter(|r| !r.sequence.is_empty()) {
            let gene = record.id.split('*').next().unwrap_or(&record.id);
            genes
                .entry(gene.to_string())
                .or_default()
                .entry(record.sequence.len())
                .or_default()
                .push(record.id.clone());
        }
        Self { genes }
    }

    /// Alleles of `gene` whose sequence has `length` residues.
    #[must_use]
    pub fn alleles(&self, gene: &str, length: usize) -> &[String] {
        self.genes
            .get(gene)
            .and_then(|lengths| lengths.get(&length))
            .map_or(&[], Vec::as_slice)
    }

    pub fn genes(&self) -> impl Iterator<Item = &str> {
        self.genes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Write one block per gene, lengths ascending.
    pub fn render<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        for (gene, lengths) in &self.genes {
            writeln!(writer, "\n=== Gene: {gene} ===")?;
            for (length, alleles) in lengths {
                writeln!(writer, "Length: {length}, Alleles: {}", alleles.len())?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
