//! Expected-line bookkeeping for one chosen opening.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::record::OpeningRecord;
use crate::replay::{replay_canonical, PositionEngine};
use crate::sequence;

/// Where a learner stands relative to the chosen line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineState {
    /// Every ply so far matches the line.
    InLine,
    /// Some played ply differs from the line.
    Deviated,
    /// The whole line has been played. Further plies are free play.
    EndOfLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub is_end: bool,
}

/// An opening record with its parsed mainline.
///
/// The model is a single line per opening: at most one expected ply at any
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningLine {
    record: OpeningRecord,
    plies: Vec<String>,
}

impl OpeningLine {
    pub fn new(record: OpeningRecord) -> Self {
        let plies = sequence::parse(&record.move_text);
        Self { record, plies }
    }

    /// Respell the line in `engine`'s canonical SAN so it compares equal to
    /// plies played through the same engine. A line that does not replay
    /// keeps its corpus spelling.
    pub fn with_canonical_plies<E: PositionEngine>(mut self, engine: &E) -> Self {
        if let Ok((_, plies)) = replay_canonical(engine, self.plies.as_slice()) {
            self.plies = plies;
        }
        self
    }

    pub fn record(&self) -> &OpeningRecord {
        &self.record
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn plies(&self) -> &[String] {
        &self.plies
    }

    pub fn len(&self) -> usize {
        self.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }

    pub fn user_color(&self) -> Color {
        self.record.user_color()
    }

    /// Expected plies at `ply_index`: one ply, or none past the end.
    pub fn expected_next_plies(&self, ply_index: usize) -> &[String] {
        match self.plies.get(ply_index) {
            Some(_) => &self.plies[ply_index..=ply_index],
            None => &[],
        }
    }

    pub fn expected_ply(&self, ply_index: usize) -> Option<&str> {
        self.plies.get(ply_index).map(String::as_str)
    }

    /// Even indices are White to move.
    pub fn side_to_move(ply_index: usize) -> Color {
        if ply_index % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn is_opponent_turn(&self, ply_index: usize) -> bool {
        Self::side_to_move(ply_index) != self.user_color()
    }

    /// The ply to auto-play for the opponent, if it is their turn and the
    /// line continues.
    pub fn opponent_next_ply(&self, ply_index: usize) -> Option<&str> {
        if !self.is_opponent_turn(ply_index) {
            return None;
        }
        self.expected_ply(ply_index)
    }

    /// True iff `played` is a prefix of the line. Overrunning the line is a
    /// mismatch.
    pub fn matches_mainline<S: AsRef<str>>(&self, played: &[S]) -> bool {
        played.len() <= self.plies.len() && self.first_divergence(played).is_none()
    }

    /// Index of the first played ply that differs from the line, ignoring
    /// plies past the end.
    pub fn first_divergence<S: AsRef<str>>(&self, played: &[S]) -> Option<usize> {
        played
            .iter()
            .zip(&self.plies)
            .position(|(ply, expected)| ply.as_ref() != expected.as_str())
    }

    pub fn line_state<S: AsRef<str>>(&self, played: &[S]) -> LineState {
        if self.first_divergence(played).is_some() {
            LineState::Deviated
        } else if played.len() >= self.plies.len() {
            LineState::EndOfLine
        } else {
            LineState::InLine
        }
    }

    pub fn progress(&self, ply_index: usize) -> Progress {
        let total = self.plies.len();
        Progress {
            completed: ply_index.min(total),
            total,
            is_end: ply_index >= total,
        }
    }
}

impl From<OpeningRecord> for OpeningLine {
    fn from(record: OpeningRecord) -> Self {
        Self::new(record)
    }
}
