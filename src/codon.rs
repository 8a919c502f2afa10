//! Standard genetic code translation.

/// Amino acid emitted for a stop codon.
pub const STOP: u8 = b'*';

/// Amino acid emitted for a codon containing a non-ACGT base.
pub const UNKNOWN: u8 = b'X';

/// Lookup table for translating codons to amino acids.
///
/// Indexed by 6-bit codon encoding: A=0, C=1, G=2, T=3.
/// Index = first*16 + second*4 + third.
pub struct CodonTable {
    table: [u8; 64],
}

fn base_to_index(b: u8) -> Option<usize> {
    match b {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' | b'U' | b'u' => Some(3),
        _ => None,
    }
}

impl CodonTable {
    /// Standard genetic code (NCBI translation table 1).
    #[must_use]
    pub fn standard() -> Self {
        #[rustfmt::skip]
        let table: [u8; 64] = [
            b'K', b'N', b'K', b'N',  // AA*
            b'T', b'T', b'T', b'T',  // AC*
            b'R', b'S', b'R', b'S',  // AG*
            b'I', b'I', b'M', b'I',  // AT*
            b'Q', b'H', b'Q', b'H',  // CA*
            b'P', b'P', b'P', b'P',  // CC*
            b'R', b'R', b'R', b'R',  // CG*
            b'L', b'L', b'L', b'L',  // CT*
            b'E', b'D', b'E', b'D',  // GA*
            b'A', b'A', b'A', b'A',  // GC*
            b'G', b'G', b'G', b'G',  // GG*
            b'V', b'V', b'V', b'V',  // GT*
            STOP, b'Y', STOP, b'Y',  // TA*
            b'S', b'S', b'S', b'S',  // TC*
            STOP, b'C', b'W', b'C',  // TG*
            b'L', b'F', b'L', b'F',  // TT*
        ];
        Self { table }
    }

    /// Translate a single codon. Callers pass exactly three bases.
    #[must_use]
    pub fn translate_codon(&self, codon: &[u8]) -> u8 {
        match (
            base_to_index(codon[0]),
            base_to_index(codon[1]),
            base_to_index(codon[2]),
        ) {
            (Some(a), Some(b), Some(c)) => self.table[a * 16 + b * 4 + c],
            _ => UNKNOWN,
        }
    }

    /// Translate whole codons; a trailing 1-2 base remainder is ignored.
    #[must_use]
    pub fn translate(&self, dna: &[u8]) -> Vec<u8> {
        dna.chunks_exact(3)
            .map(|codon| self.translate_codon(codon))
            .collect()
    }
}

impl Default for CodonTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Length of `len` rounded down to a whole number of codons.
#[must_use]
pub fn codon_floor(len: usize) -> usize {
    len - len % 3
}

/// Residues before the first stop codon.
#[must_use]
pub fn until_stop(protein: &[u8]) -> &[u8] {
    match protein.iter().position(|&aa| aa == STOP) {
        Some(pos) => &protein[..pos],
        None => protein,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn start_codon() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"ATG"), b'M');
    }

    #[test]
    fn stop_codons() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"TAA"), STOP);
        assert_eq!(table.translate_codon(b"TAG"), STOP);
        assert_eq!(table.translate_codon(b"TGA"), STOP);
    }

    #[test]
    fn translate_short_orf() {
        let table = CodonTable::standard();
        // ATG GCA TGC TAA = M A C *
        assert_eq!(table.translate(b"ATGGCATGCTAA"), b"MAC*");
    }

    #[test]
    fn trailing_bases_ignored() {
        let table = CodonTable::standard();
        assert_eq!(table.translate(b"ATGGC"), b"M");
        assert_eq!(table.translate(b"AT"), b"");
    }

    #[test]
    fn ambiguous_base() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"ATN"), UNKNOWN);
    }

    #[test]
    fn stop_truncation() {
        assert_eq!(until_stop(b"MAC*GG"), b"MAC");
        assert_eq!(until_stop(b"MAC"), b"MAC");
        assert_eq!(until_stop(b"*"), b"");
    }

    proptest! {
        #[test]
        fn translation_length_matches_codon_floor(dna in "[ACGT]{0,300}") {
            let table = CodonTable::standard();
            let protein = table.translate(dna.as_bytes());
            prop_assert_eq!(protein.len() * 3, codon_floor(dna.len()));
        }
    }
}
