//! Shifting boundaries.

/// Right limit for 3' shuffling
///
/// 0-based and exclusive. Shifting only ever moves a variant 3', so no left
/// limit is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundaries {
    /// Rightmost position (cannot shift past this)
    pub right: u64,
}

impl Boundaries {
    pub fn new(right: u64) -> Self {
        Self { right }
    }

    /// Boundaries spanning a whole sequence of `len` bases.
    pub fn whole(len: usize) -> Self {
        Self::new(len as u64)
    }
}
