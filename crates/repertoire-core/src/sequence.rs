//! Move text normalization — lightweight regex-based parser.
//!
//! Corpus move text carries move numbers (`"1. e4 e5 2. Nf3"`). The index is
//! keyed by the bare ply sequence, so numbers are stripped and whitespace is
//! collapsed before anything else looks at a line.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MOVE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.").expect("move number pattern is valid"));

/// Split raw move text into ply tokens.
///
/// Never fails. Anything that is not a `<digits>.` marker passes through as
/// an ordinary token; replay is what rejects garbage.
pub fn parse(move_text: &str) -> Vec<String> {
    let stripped = MOVE_NUMBER_RE.replace_all(move_text, " ");
    stripped.split_whitespace().map(str::to_string).collect()
}

/// Canonical single-space join of the parsed plies.
pub fn normalize(move_text: &str) -> String {
    parse(move_text).join(" ")
}

/// Normalized, move-number-free key of a ply sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveSequenceKey(String);

impl MoveSequenceKey {
    pub fn from_plies<S: AsRef<str>>(plies: &[S]) -> Self {
        let joined = plies
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        Self(joined)
    }

    pub fn from_move_text(move_text: &str) -> Self {
        Self(normalize(move_text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn plies(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|p| !p.is_empty())
    }

    /// Number of plies in the key.
    pub fn ply_count(&self) -> usize {
        self.plies().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MoveSequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
