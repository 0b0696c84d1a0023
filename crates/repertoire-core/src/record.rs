//! Opening records as they come out of the corpus.

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Three-character Encyclopedia of Chess Openings code, e.g. `C50`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EcoCode(String);

impl EcoCode {
    /// Validate a raw code: one letter `A`..=`E` followed by two digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = raw.as_bytes();
        if bytes.len() != 3 {
            return None;
        }
        if !matches!(bytes[0], b'A'..=b'E') {
            return None;
        }
        if !bytes[1..].iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Family letter, also the corpus partition key.
    pub fn family_letter(&self) -> char {
        self.0.as_bytes()[0] as char
    }

    /// Side the learner plays. Corpus convention: A, B and C lines are
    /// trained as White, D and E lines as Black.
    pub fn user_color(&self) -> Color {
        match self.family_letter() {
            'A' | 'B' | 'C' => Color::White,
            _ => Color::Black,
        }
    }
}

impl TryFrom<String> for EcoCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid ECO code: {value:?}"))
    }
}

impl From<EcoCode> for String {
    fn from(code: EcoCode) -> Self {
        code.0
    }
}

impl fmt::Display for EcoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One opening from the corpus. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningRecord {
    /// Position string the corpus files this opening under.
    pub position_key: String,
    pub eco_code: EcoCode,
    pub name: String,
    /// Raw move text including move numbers.
    pub move_text: String,
    pub is_family_root: bool,
}

impl OpeningRecord {
    pub fn user_color(&self) -> Color {
        self.eco_code.user_color()
    }

    pub fn family_name(&self) -> &str {
        family_name(&self.name)
    }
}

const NAME_SEPARATORS: [&str; 5] = [":", ",", "\u{2013}", "\u{2014}", " - "];

/// Byte range of the earliest family separator in `name`.
fn first_separator(name: &str) -> Option<(usize, usize)> {
    NAME_SEPARATORS
        .iter()
        .filter_map(|sep| name.find(sep).map(|at| (at, at + sep.len())))
        .min_by_key(|&(at, _)| at)
}

/// Family prefix of an opening name: `"Sicilian Defense: Najdorf"` gives
/// `"Sicilian Defense"`. Names without a separator are their own family.
pub fn family_name(name: &str) -> &str {
    match first_separator(name) {
        Some((start, _)) => name[..start].trim(),
        None => name.trim(),
    }
}

/// Everything after the family prefix, if any.
pub fn variation_name(name: &str) -> Option<&str> {
    let (_, end) = first_separator(name)?;
    let rest = name[end..].trim();
    (!rest.is_empty()).then_some(rest)
}
