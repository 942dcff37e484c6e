//! Frameshift scanning.
//!
//! Wild-type and mutant reading frames are translated from the codon that
//! holds the first edited base. The first residue that differs within the
//! lookahead window names the frameshift; the mutant frame is then followed
//! through the 3' UTR to count codons to the new stop.

use crate::error::AnnotationError;
use crate::reference::TranscriptContext;
use crate::translate::{translate_codon, AminoAcid};
use crate::Result;

/// Smallest accepted lookahead window, in codons.
pub const MIN_LOOKAHEAD_CODONS: usize = 30;

/// Protein-level result of a frame-changing edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// First changed residue is followed by a shifted frame.
    ///
    /// `new_stop` counts codons from the changed residue (as 1) to the first
    /// stop of the mutant frame, `None` if the transcript ends first.
    Frameshift {
        position: u64,
        reference: AminoAcid,
        alternate: AminoAcid,
        new_stop: Option<u64>,
    },
    /// First changed residue is itself a stop.
    Nonsense { position: u64, reference: AminoAcid },
    /// No residue differs within the window.
    Unchanged {
        position: u64,
        reference: AminoAcid,
        alternate: AminoAcid,
    },
}

impl ScanOutcome {
    /// HGVS protein notation, e.g. `p.Gly1172Glufs*34`.
    ///
    /// A shifted frame that starts at the original stop codon is written as
    /// an extension, e.g. `p.*110Glnext*17`.
    pub fn notation(&self) -> String {
        match self {
            ScanOutcome::Frameshift {
                position,
                reference,
                alternate,
                new_stop,
            } => {
                if reference.is_stop() {
                    // Extensions count from the residue after the old stop
                    let ext = new_stop.map_or_else(|| "?".to_string(), |n| (n - 1).to_string());
                    return format!("p.*{}{}ext*{}", position, alternate.hgvs_code(), ext);
                }
                let stop = new_stop.map_or_else(|| "?".to_string(), |n| n.to_string());
                format!(
                    "p.{}{}{}fs*{}",
                    reference.hgvs_code(),
                    position,
                    alternate.hgvs_code(),
                    stop
                )
            }
            ScanOutcome::Nonsense {
                position,
                reference,
            } => format!("p.{}{}*", reference.hgvs_code(), position),
            ScanOutcome::Unchanged {
                position,
                reference,
                alternate,
            } => format!(
                "p.{}{}delins{}",
                reference.hgvs_code(),
                position,
                alternate.hgvs_code()
            ),
        }
    }

    /// Whether the first changed residue is a stop.
    pub fn is_nonsense(&self) -> bool {
        matches!(self, ScanOutcome::Nonsense { .. })
    }

    /// Whether the shifted frame starts at the original stop codon.
    pub fn is_stop_loss(&self) -> bool {
        matches!(self, ScanOutcome::Frameshift { reference, .. } if reference.is_stop())
    }
}

/// Compares wild-type and mutant translations of one transcript's ORF.
pub struct FrameshiftScanner<'a> {
    accession: &'a str,
    orf: &'a [u8],
    lookahead: usize,
}

impl<'a> FrameshiftScanner<'a> {
    /// Scanner over the coding sequence plus 3' UTR of `ctx`.
    ///
    /// `lookahead_codons` below [`MIN_LOOKAHEAD_CODONS`] is raised to it.
    pub fn new(ctx: &'a dyn TranscriptContext, lookahead_codons: usize) -> Self {
        Self {
            accession: ctx.accession(),
            orf: ctx.coding_sequence_plus_3utr(),
            lookahead: lookahead_codons.max(MIN_LOOKAHEAD_CODONS),
        }
    }

    /// Scan an edit that replaces `deleted_len` bases starting at CDS
    /// position `cds_pos` (1-based) with `inserted`.
    pub fn scan(&self, cds_pos: u64, deleted_len: usize, inserted: &[u8]) -> Result<ScanOutcome> {
        if cds_pos == 0 {
            return Err(self.context_error("edit starts before c.1"));
        }
        let edit = (cds_pos - 1) as usize;
        let codon_start = edit - edit % 3;
        if edit + deleted_len > self.orf.len() {
            return Err(self.context_error(&format!(
                "edit c.{}+{} runs past the end of the transcript",
                cds_pos, deleted_len
            )));
        }

        let mut mutant = Vec::with_capacity(self.orf.len() - codon_start + inserted.len());
        mutant.extend_from_slice(&self.orf[codon_start..edit]);
        mutant.extend_from_slice(inserted);
        mutant.extend_from_slice(&self.orf[edit + deleted_len..]);

        let wild_type = &self.orf[codon_start..];
        let window = 3 * self.lookahead;
        let wt_codons = wild_type[..wild_type.len().min(window)].chunks_exact(3);
        let mt_codons = mutant[..mutant.len().min(window)].chunks_exact(3);

        let first_residue = (codon_start / 3) as u64 + 1;
        let mut first_pair: Option<(AminoAcid, AminoAcid)> = None;

        for (i, (wt, mt)) in wt_codons.zip(mt_codons).enumerate() {
            let wt_aa = translate_codon(wt)?;
            let mt_aa = translate_codon(mt)?;
            first_pair.get_or_insert((wt_aa, mt_aa));
            let position = first_residue + i as u64;

            if wt_aa != mt_aa {
                if mt_aa.is_stop() {
                    return Ok(ScanOutcome::Nonsense {
                        position,
                        reference: wt_aa,
                    });
                }
                return Ok(ScanOutcome::Frameshift {
                    position,
                    reference: wt_aa,
                    alternate: mt_aa,
                    new_stop: stop_distance(&mutant[3 * i..]),
                });
            }
            if wt_aa.is_stop() {
                break;
            }
        }

        match first_pair {
            Some((reference, alternate)) => Ok(ScanOutcome::Unchanged {
                position: first_residue,
                reference,
                alternate,
            }),
            None => Err(self.context_error(&format!(
                "no complete codon at residue {}",
                first_residue
            ))),
        }
    }

    fn context_error(&self, msg: &str) -> AnnotationError {
        AnnotationError::sequence_context(self.accession, msg)
    }
}

/// Codons from the start of `frame` to its first stop, counting the first
/// codon as 1.
fn stop_distance(frame: &[u8]) -> Option<u64> {
    frame
        .chunks_exact(3)
        .map(|codon| translate_codon(codon).ok())
        .take_while(Option::is_some)
        .position(|aa| aa == Some(AminoAcid::Ter))
        .map(|i| i as u64 + 1)
}
