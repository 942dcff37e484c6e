//! Genetic code and codon table.

use super::amino_acid::AminoAcid;
use crate::error::AnnotationError;
use crate::Result;

/// A single nucleotide base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    T,
    C,
    A,
    G,
}

impl Base {
    /// Parse a base from an ASCII byte.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b.to_ascii_uppercase() {
            b'A' => Some(Base::A),
            b'T' | b'U' => Some(Base::T), // U is treated as T
            b'G' => Some(Base::G),
            b'C' => Some(Base::C),
            _ => None,
        }
    }

    /// Convert to an uppercase ASCII byte.
    pub fn to_byte(self) -> u8 {
        match self {
            Base::A => b'A',
            Base::T => b'T',
            Base::G => b'G',
            Base::C => b'C',
        }
    }

    /// Watson-Crick complement.
    pub fn complement(self) -> Self {
        match self {
            Base::A => Base::T,
            Base::T => Base::A,
            Base::G => Base::C,
            Base::C => Base::G,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_byte() as char)
    }
}

/// A codon (three nucleotides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codon([Base; 3]);

impl Codon {
    /// Create a new codon from three bases.
    pub fn new(b1: Base, b2: Base, b3: Base) -> Self {
        Self([b1, b2, b3])
    }

    /// Parse a codon from exactly three nucleotide bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b1, b2, b3] => Some(Self([
                Base::from_byte(*b1)?,
                Base::from_byte(*b2)?,
                Base::from_byte(*b3)?,
            ])),
            _ => None,
        }
    }

    /// Parse a codon from a string.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_bytes(s.as_bytes())
    }

    /// Get the three bases.
    pub fn bases(&self) -> &[Base; 3] {
        &self.0
    }

    /// Amino acid encoded by this codon under the standard genetic code.
    pub fn amino_acid(&self) -> AminoAcid {
        let [b1, b2, b3] = self.0;
        STANDARD_CODE[b1.index() * 16 + b2.index() * 4 + b3.index()]
    }
}

impl std::fmt::Display for Codon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}

use AminoAcid::*;

/// Standard genetic code (NCBI table 1), indexed in TCAG order.
const STANDARD_CODE: [AminoAcid; 64] = [
    // TTx     TCx  ...
    Phe, Phe, Leu, Leu, Ser, Ser, Ser, Ser, Tyr, Tyr, Ter, Ter, Cys, Cys, Ter, Trp,
    // Cxx
    Leu, Leu, Leu, Leu, Pro, Pro, Pro, Pro, His, His, Gln, Gln, Arg, Arg, Arg, Arg,
    // Axx
    Ile, Ile, Ile, Met, Thr, Thr, Thr, Thr, Asn, Asn, Lys, Lys, Ser, Ser, Arg, Arg,
    // Gxx
    Val, Val, Val, Val, Ala, Ala, Ala, Ala, Asp, Asp, Glu, Glu, Gly, Gly, Gly, Gly,
];

/// Translate a single codon.
///
/// Fails with [`AnnotationError::Translation`] when the input is not three
/// A/C/G/T(U) bases.
pub fn translate_codon(codon: &[u8]) -> Result<AminoAcid> {
    Codon::from_bytes(codon)
        .map(|c| c.amino_acid())
        .ok_or_else(|| AnnotationError::Translation {
            codon: String::from_utf8_lossy(codon).into_owned(),
        })
}

/// Translate a nucleotide sequence codon by codon.
///
/// A trailing partial codon is ignored. Translation does not stop at `Ter`.
pub fn translate(seq: &[u8]) -> Result<Vec<AminoAcid>> {
    seq.chunks_exact(3).map(translate_codon).collect()
}

/// Whether the three bases form a stop codon.
pub fn is_stop_codon(codon: &[u8]) -> bool {
    matches!(translate_codon(codon), Ok(AminoAcid::Ter))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASES: [u8; 4] = [b'T', b'C', b'A', b'G'];

    fn all_codons() -> Vec<[u8; 3]> {
        let mut codons = Vec::with_capacity(64);
        for b1 in BASES {
            for b2 in BASES {
                for b3 in BASES {
                    codons.push([b1, b2, b3]);
                }
            }
        }
        codons
    }

    #[test]
    fn test_base_from_byte() {
        assert_eq!(Base::from_byte(b'a'), Some(Base::A));
        assert_eq!(Base::from_byte(b'U'), Some(Base::T));
        assert_eq!(Base::from_byte(b'N'), None);
        assert_eq!(Base::G.complement(), Base::C);
    }

    #[test]
    fn test_codon_parse() {
        let codon = Codon::parse("ATG").unwrap();
        assert_eq!(codon.to_string(), "ATG");
        assert!(Codon::parse("AT").is_none());
        assert!(Codon::parse("ATGC").is_none());
        assert!(Codon::parse("ANG").is_none());
    }

    #[test]
    fn test_standard_code_amino_acids() {
        assert_eq!(translate_codon(b"ATG").unwrap(), AminoAcid::Met);
        assert_eq!(translate_codon(b"TGG").unwrap(), AminoAcid::Trp);
        assert_eq!(translate_codon(b"GGC").unwrap(), AminoAcid::Gly);
        assert_eq!(translate_codon(b"GAA").unwrap(), AminoAcid::Glu);
        assert_eq!(translate_codon(b"GCC").unwrap(), AminoAcid::Ala);
        assert_eq!(translate_codon(b"AGA").unwrap(), AminoAcid::Arg);
        assert_eq!(translate_codon(b"ata").unwrap(), AminoAcid::Ile);
    }

    #[test]
    fn test_standard_code_stop_codons() {
        for stop in [b"TAA", b"TAG", b"TGA"] {
            assert!(is_stop_codon(stop));
        }
        assert!(!is_stop_codon(b"TGG"));
    }

    #[test]
    fn test_codon_count() {
        let translated: Vec<AminoAcid> = all_codons()
            .iter()
            .map(|c| translate_codon(c).unwrap())
            .collect();
        let stops = translated.iter().filter(|aa| aa.is_stop()).count();
        assert_eq!(stops, 3);
        assert_eq!(translated.len() - stops, 61);
    }

    #[test]
    fn test_invalid_codon_is_error() {
        let err = translate_codon(b"ANG").unwrap_err();
        assert_eq!(
            err,
            AnnotationError::Translation {
                codon: "ANG".to_string()
            }
        );
        assert!(translate_codon(b"AT").is_err());
    }

    #[test]
    fn test_translate_ignores_partial_codon() {
        let aas = translate(b"ATGGCCTAAGC").unwrap();
        assert_eq!(aas, vec![AminoAcid::Met, AminoAcid::Ala, AminoAcid::Ter]);
        assert!(translate(b"").unwrap().is_empty());
    }
}
