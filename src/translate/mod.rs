//! Codon translation.
//!
//! The standard genetic code is an immutable table; every function here is
//! pure and safe to share across threads.

pub mod amino_acid;
pub mod codon;

pub use amino_acid::{residues_to_hgvs, AminoAcid};
pub use codon::{is_stop_codon, translate, translate_codon, Base, Codon};

/// Reverse complement of a nucleotide sequence.
///
/// Non-ACGT symbols (e.g. `N`) are passed through unchanged.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match Base::from_byte(b) {
            Some(base) => base.complement().to_byte(),
            None => b,
        })
        .collect()
}
