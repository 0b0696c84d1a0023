//! Reverse lookup from a position back to known theory.

use crate::index::{MoveIndex, PositionIndex};
use crate::record::OpeningRecord;

/// Exact-match position lookup. Canonical serialization is the engine's
/// job, so no fuzzy matching happens here.
#[derive(Debug, Clone, Copy)]
pub struct TranspositionDetector<'a> {
    positions: &'a PositionIndex,
}

impl<'a> TranspositionDetector<'a> {
    pub fn new(positions: &'a PositionIndex) -> Self {
        Self { positions }
    }

    pub fn from_index(index: &'a MoveIndex) -> Self {
        Self::new(index.positions())
    }

    /// Preferred opening filed under `position`, if any.
    pub fn detect(&self, position: &str) -> Option<&'a OpeningRecord> {
        self.positions.get(position).and_then(|records| records.first())
    }

    /// Like [`detect`](Self::detect) but skips `current`, for telling a
    /// learner they reached some *other* line.
    pub fn detect_other(
        &self,
        position: &str,
        current: &OpeningRecord,
    ) -> Option<&'a OpeningRecord> {
        self.positions
            .get(position)?
            .iter()
            .find(|r| !(r.eco_code == current.eco_code && r.name == current.name))
    }
}
