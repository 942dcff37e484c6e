//! 3' shuffling algorithm
//!
//! # Coordinate System
//!
//! This module uses **0-based half-open intervals**:
//!
//! | Parameter | Basis | Notes |
//! |-----------|-------|-------|
//! | `start` | 0-based | Inclusive start position |
//! | `end` | 0-based | Exclusive end position (`start` for insertions) |
//! | `boundaries.right` | 0-based | Exclusive right limit |
//!
//! A deletion removes `seq[start..end]`. An insertion places its bases
//! immediately before `seq[start]`. Bases compare case-insensitively.

use crate::normalize::boundary::Boundaries;

/// Result of a shuffle operation
///
/// All positions are 0-based, matching the input coordinate system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleResult {
    /// New start position (0-based, inclusive)
    pub start: u64,
    /// New end position (0-based, exclusive)
    pub end: u64,
    /// Deleted or inserted bases, rotated to match the new window
    pub allele: Vec<u8>,
    /// Number of bases the window moved
    pub shift: u64,
}

impl ShuffleResult {
    /// Whether the variant was moved
    pub fn shifted(&self) -> bool {
        self.shift > 0
    }
}

/// Shift a deletion of `seq[start..end]` as far 3' as the sequence allows.
///
/// The window advances while the base immediately after it equals its first
/// base; each step rotates the deleted sequence left by one.
pub fn shuffle_deletion(seq: &[u8], start: u64, end: u64, boundaries: &Boundaries) -> ShuffleResult {
    let limit = boundaries.right.min(seq.len() as u64);
    let mut new_start = start;
    let mut new_end = end;

    if new_start < new_end {
        while new_end < limit
            && seq[new_start as usize].eq_ignore_ascii_case(&seq[new_end as usize])
        {
            new_start += 1;
            new_end += 1;
        }
    }

    let allele = seq
        .get(new_start as usize..new_end.min(seq.len() as u64) as usize)
        .map(<[u8]>::to_vec)
        .unwrap_or_default();

    ShuffleResult {
        start: new_start,
        end: new_end,
        allele,
        shift: new_start - start,
    }
}

/// Shift an insertion of `inserted` before `seq[pos]` as far 3' as the
/// sequence allows.
pub fn shuffle_insertion(
    seq: &[u8],
    pos: u64,
    inserted: &[u8],
    boundaries: &Boundaries,
) -> ShuffleResult {
    let limit = boundaries.right.min(seq.len() as u64);
    let mut allele = inserted.to_vec();
    let mut new_pos = pos;

    if !allele.is_empty() {
        while new_pos < limit && seq[new_pos as usize].eq_ignore_ascii_case(&allele[0]) {
            allele.rotate_left(1);
            new_pos += 1;
        }
    }

    ShuffleResult {
        start: new_pos,
        end: new_pos,
        allele,
        shift: new_pos - pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shuffle_deletion_3prime() {
        // Sequence: ATGGGGGCAT
        // Delete one G at position 3 (0-based): should shift to position 6
        let ref_seq = b"ATGGGGGCAT";
        let result = shuffle_deletion(ref_seq, 3, 4, &Boundaries::whole(ref_seq.len()));

        assert!(result.shifted());
        assert_eq!(result.start, 6);
        assert_eq!(result.end, 7);
        assert_eq!(result.allele, b"G".to_vec());
    }

    #[test]
    fn test_shuffle_deletion_rotates_allele() {
        // Delete CAG from ACAGCAGT: CAG -> AGC -> GCA
        let ref_seq = b"ACAGCAGT";
        let result = shuffle_deletion(ref_seq, 1, 4, &Boundaries::whole(ref_seq.len()));

        assert_eq!(result.start, 4);
        assert_eq!(result.end, 7);
        assert_eq!(result.shift, 3);
        assert_eq!(result.allele, b"CAG".to_vec());

        let partial = shuffle_deletion(b"ACAGCAAT", 1, 4, &Boundaries::whole(8));
        assert_eq!(partial.start, 3);
        assert_eq!(partial.allele, b"GCA".to_vec());
    }

    #[test]
    fn test_no_shuffle_needed() {
        // Delete T at position 2: no adjacent T's to shift to
        let ref_seq = b"ATGCATGCAT";
        let result = shuffle_deletion(ref_seq, 2, 3, &Boundaries::whole(ref_seq.len()));

        assert!(!result.shifted());
        assert_eq!(result.start, 2);
        assert_eq!(result.end, 3);
    }

    #[test]
    fn test_shuffle_respects_boundary() {
        let ref_seq = b"ATGGGGGCAT";
        let result = shuffle_deletion(ref_seq, 3, 4, &Boundaries::new(5));

        assert_eq!(result.start, 4);
        assert_eq!(result.end, 5);
    }

    #[test]
    fn test_shuffle_stops_at_sequence_end() {
        let ref_seq = b"ATAAA";
        let result = shuffle_deletion(ref_seq, 2, 3, &Boundaries::new(100));

        assert_eq!(result.start, 4);
        assert_eq!(result.end, 5);
    }

    #[test]
    fn test_shuffle_deletion_idempotent() {
        let ref_seq = b"TTCAGCAGCAGA";
        let bounds = Boundaries::whole(ref_seq.len());
        let once = shuffle_deletion(ref_seq, 2, 5, &bounds);
        let twice = shuffle_deletion(ref_seq, once.start, once.end, &bounds);

        assert_eq!(once.start, 8);
        assert_eq!(twice.start, once.start);
        assert_eq!(twice.allele, once.allele);
        assert!(!twice.shifted());
    }

    #[test]
    fn test_shuffle_insertion() {
        // Insert A before index 1 of GAAAC: shifts to index 4
        let result = shuffle_insertion(b"GAAAC", 1, b"A", &Boundaries::whole(5));
        assert_eq!(result.start, 4);
        assert_eq!(result.shift, 3);
        assert_eq!(result.allele, b"A".to_vec());

        // Insert CA before index 1 of GCACAT: CA -> AC -> CA, lands before T
        let result = shuffle_insertion(b"GCACAT", 1, b"CA", &Boundaries::whole(6));
        assert_eq!(result.start, 5);
        assert_eq!(result.allele, b"CA".to_vec());
    }

    #[test]
    fn test_shuffle_ignores_case() {
        // Lowercase reference, uppercase inserted allele
        let result = shuffle_insertion(b"gaaac", 1, b"A", &Boundaries::whole(5));
        assert_eq!(result.start, 4);
        assert_eq!(result.allele, b"A".to_vec());

        let result = shuffle_deletion(b"atgggggcat", 3, 4, &Boundaries::whole(10));
        assert_eq!(result.start, 6);
        assert_eq!(result.allele, b"g".to_vec());
    }

    #[test]
    fn test_shuffle_insertion_no_match() {
        let result = shuffle_insertion(b"GTTT", 1, b"A", &Boundaries::whole(4));
        assert!(!result.shifted());
        assert_eq!(result.start, 1);
    }
}
