#![allow(dead_code)]

use repertoire_core::corpus::parse_partition;
use repertoire_core::sequence;
use repertoire_core::{replay, OpeningRecord, ShakmatyEngine};

/// `(eco, name, moves, family root)` for a small but realistic corpus.
pub const LINES: &[(&str, &str, &str, bool)] = &[
    ("A00", "Polish Opening", "1. b4", true),
    ("A06", "Reti Opening: Transposition to Queen's Pawn", "1. Nf3 d5 2. d4", false),
    ("B00", "King's Pawn Opening", "1. e4", true),
    ("B20", "Sicilian Defense", "1. e4 c5", true),
    ("B20", "Sicilian Defense: Bowdler Attack", "1. e4 c5 2. Bc4", false),
    (
        "B90",
        "Sicilian Defense: Najdorf Variation",
        "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6",
        false,
    ),
    ("C20", "King's Pawn Game", "1. e4 e5", true),
    ("C44", "King's Knight Opening: Normal Variation", "1. e4 e5 2. Nf3 Nc6", false),
    ("C50", "Italian Game", "1. e4 e5 2. Nf3 Nc6 3. Bc4", true),
    ("C50", "Giuoco Piano", "1.e4 e5 2.Nf3 Nc6 3.Bc4", false),
    ("C50", "Italian Game: Giuoco Piano", "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5", false),
    ("D00", "Queen's Pawn Game", "1. d4 d5", true),
    ("D02", "Queen's Pawn Game: Zukertort Variation", "1. d4 d5 2. Nf3", false),
    ("D06", "Queen's Gambit", "1. d4 d5 2. c4", true),
    ("D30", "Queen's Gambit Declined", "1. d4 d5 2. c4 e6", true),
    ("E20", "Nimzo-Indian Defense", "1. d4 Nf6 2. c4 e6 3. Nc3 Bb4", true),
    ("E60", "King's Indian Defense", "1. d4 Nf6 2. c4 g6", true),
];

/// A record whose line cannot be played.
pub const CORRUPT: (&str, &str, &str, bool) = ("C40", "Corrupted Gambit", "1. e4 e5 2. Ke3", false);

pub const CORRUPT_KEY: &str = "corrupt-entry";

/// Corpus-style position key for a line: full FEN with counters. The
/// fullmove field doubles as a uniqueness suffix for duplicate lines.
fn position_key(moves: &str, serial: usize) -> String {
    let plies = sequence::parse(moves);
    let fen = replay(&ShakmatyEngine, &plies, plies.len()).expect("fixture lines are legal");
    format!("{fen} 0 {}", serial + 1)
}

fn entry(name: &str, eco: &str, moves: &str, root: bool) -> serde_json::Value {
    serde_json::json!({ "name": name, "eco": eco, "moves": moves, "isEcoRoot": root })
}

/// One JSON partition per ECO letter, the way the corpus ships.
pub fn partitions() -> Vec<(char, String)> {
    "ABCDE"
        .chars()
        .map(|letter| {
            let mut object = serde_json::Map::new();
            for (serial, (eco, name, moves, root)) in LINES.iter().enumerate() {
                if !eco.starts_with(letter) {
                    continue;
                }
                object.insert(
                    position_key(moves, serial),
                    entry(name, eco, moves, *root),
                );
            }
            if letter == 'C' {
                let (eco, name, moves, root) = CORRUPT;
                object.insert(
                    CORRUPT_KEY.to_string(),
                    entry(name, eco, moves, root),
                );
            }
            (letter, serde_json::Value::Object(object).to_string())
        })
        .collect()
}

/// The whole fixture corpus, including the corrupt record.
pub fn corpus() -> Vec<OpeningRecord> {
    partitions()
        .iter()
        .flat_map(|(_, json)| parse_partition(json).expect("fixture partition decodes"))
        .collect()
}

pub fn record(corpus: &[OpeningRecord], name: &str) -> OpeningRecord {
    corpus
        .iter()
        .find(|r| r.name == name)
        .cloned()
        .unwrap_or_else(|| panic!("no fixture record named {name}"))
}
