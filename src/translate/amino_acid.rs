//! Amino acid symbols used in protein notation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A residue produced by translation, including the stop marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    /// Stop
    Ter,
}

/// Three-letter and one-letter symbols, indexed by discriminant.
const SYMBOLS: [(&str, char); 21] = [
    ("Ala", 'A'),
    ("Arg", 'R'),
    ("Asn", 'N'),
    ("Asp", 'D'),
    ("Cys", 'C'),
    ("Gln", 'Q'),
    ("Glu", 'E'),
    ("Gly", 'G'),
    ("His", 'H'),
    ("Ile", 'I'),
    ("Leu", 'L'),
    ("Lys", 'K'),
    ("Met", 'M'),
    ("Phe", 'F'),
    ("Pro", 'P'),
    ("Ser", 'S'),
    ("Thr", 'T'),
    ("Trp", 'W'),
    ("Tyr", 'Y'),
    ("Val", 'V'),
    ("Ter", '*'),
];

impl AminoAcid {
    /// Three-letter code; the stop is `Ter`.
    pub fn three_letter(&self) -> &'static str {
        SYMBOLS[*self as usize].0
    }

    /// One-letter code; the stop is `*`.
    pub fn one_letter(&self) -> char {
        SYMBOLS[*self as usize].1
    }

    /// Whether this is the stop marker
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Ter)
    }

    /// Symbol used in HGVS protein notation: `*` for stop, otherwise the
    /// three-letter code.
    pub fn hgvs_code(&self) -> &'static str {
        match self {
            Self::Ter => "*",
            other => other.three_letter(),
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hgvs_code())
    }
}

/// Render a run of residues in HGVS three-letter form (e.g. `GlyGlu*`).
pub fn residues_to_hgvs(residues: &[AminoAcid]) -> String {
    residues.iter().map(|aa| aa.hgvs_code()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_follow_declaration_order() {
        assert_eq!(AminoAcid::Ala.three_letter(), "Ala");
        assert_eq!(AminoAcid::Gly.three_letter(), "Gly");
        assert_eq!(AminoAcid::Trp.one_letter(), 'W');
        assert_eq!(AminoAcid::Val.one_letter(), 'V');
    }

    #[test]
    fn test_stop_renders_as_star() {
        assert_eq!(AminoAcid::Ter.hgvs_code(), "*");
        assert_eq!(AminoAcid::Ter.three_letter(), "Ter");
        assert_eq!(AminoAcid::Ter.one_letter(), '*');
        assert!(AminoAcid::Ter.is_stop());
        assert!(!AminoAcid::Met.is_stop());
        assert_eq!(AminoAcid::Lys.to_string(), "Lys");
    }

    #[test]
    fn test_residues_to_hgvs() {
        let run = [AminoAcid::Gly, AminoAcid::Glu, AminoAcid::Ter];
        assert_eq!(residues_to_hgvs(&run), "GlyGlu*");
        assert_eq!(residues_to_hgvs(&[]), "");
    }
}
