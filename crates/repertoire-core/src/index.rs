//! The compiled lookup structures: move-sequence index and position index.
//!
//! Both are built once by [`crate::builder::IndexBuilder`] and are read-only
//! afterwards, so a single `MoveIndex` can be shared by any number of
//! sessions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{family_name, OpeningRecord};
use crate::sequence::MoveSequenceKey;

/// All openings reaching one exact ply sequence.
///
/// Records are ordered by `(ply count, name)`; consumers taking the first
/// record rely on this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub key: MoveSequenceKey,
    pub records: Vec<OpeningRecord>,
}

impl IndexEntry {
    pub fn ply_count(&self) -> usize {
        self.key.ply_count()
    }

    /// Preferred record for this sequence.
    pub fn best(&self) -> Option<&OpeningRecord> {
        self.records.first()
    }
}

/// Replayed position string -> openings reaching it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionIndex {
    by_position: BTreeMap<String, Vec<OpeningRecord>>,
}

impl PositionIndex {
    pub(crate) fn new(by_position: BTreeMap<String, Vec<OpeningRecord>>) -> Self {
        Self { by_position }
    }

    pub fn get(&self, position: &str) -> Option<&[OpeningRecord]> {
        self.by_position.get(position).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[OpeningRecord])> {
        self.by_position
            .iter()
            .map(|(position, records)| (position.as_str(), records.as_slice()))
    }
}

/// Summary of one build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
    pub total_records: usize,
    pub indexed_records: usize,
    pub unique_keys: usize,
    pub avg_records_per_key: f64,
    pub rejected_records: usize,
    pub distinct_positions: usize,
    /// Records whose corpus position key differs from the replayed position.
    pub position_mismatches: usize,
    /// Records whose corpus position key was already taken by an earlier
    /// record. They are still indexed.
    pub duplicate_position_keys: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveIndex {
    pub(crate) entries: BTreeMap<MoveSequenceKey, IndexEntry>,
    pub(crate) positions: PositionIndex,
    pub(crate) stats: BuildStats,
}

impl MoveIndex {
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn positions(&self) -> &PositionIndex {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Every indexed record, in key order then entry order.
    pub fn records(&self) -> impl Iterator<Item = &OpeningRecord> {
        self.entries.values().flat_map(|e| e.records.iter())
    }

    /// Look up a normalized sequence key (`"e4 e5 Nf3"`).
    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.entries.get(&MoveSequenceKey::from_move_text(key))
    }

    pub fn lookup_plies<S: AsRef<str>>(&self, plies: &[S]) -> Option<&IndexEntry> {
        self.entries.get(&MoveSequenceKey::from_plies(plies))
    }

    pub fn best_line(&self, key: &str) -> Option<&OpeningRecord> {
        self.get(key).and_then(IndexEntry::best)
    }

    /// Deepest entry whose sequence is a prefix of `plies`.
    pub fn classify<S: AsRef<str>>(&self, plies: &[S]) -> Option<&IndexEntry> {
        (1..=plies.len())
            .rev()
            .find_map(|len| self.lookup_plies(&plies[..len]))
    }

    /// Family roots grouped by family name. Within a family, roots keep
    /// index order.
    pub fn family_roots(&self) -> BTreeMap<&str, Vec<&OpeningRecord>> {
        let mut families: BTreeMap<&str, Vec<&OpeningRecord>> = BTreeMap::new();
        for record in self.records().filter(|r| r.is_family_root) {
            families
                .entry(family_name(&record.name))
                .or_default()
                .push(record);
        }
        families
    }

    /// Case-insensitive substring search over opening names.
    pub fn search(&self, fragment: &str) -> Vec<&OpeningRecord> {
        let needle = fragment.to_lowercase();
        self.records()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Find the record for an exact `(eco, name)` pair.
    pub fn find(&self, eco_code: &str, name: &str) -> Option<&OpeningRecord> {
        self.records()
            .find(|r| r.eco_code.as_str() == eco_code && r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::record::EcoCode;
    use crate::replay::ShakmatyEngine;

    fn record(eco: &str, name: &str, moves: &str, root: bool) -> OpeningRecord {
        OpeningRecord {
            position_key: String::new(),
            eco_code: EcoCode::parse(eco).unwrap(),
            name: name.to_string(),
            move_text: moves.to_string(),
            is_family_root: root,
        }
    }

    fn index() -> MoveIndex {
        build(
            &ShakmatyEngine,
            vec![
                record("C20", "King's Pawn Game", "1. e4 e5", true),
                record("C50", "Italian Game", "1. e4 e5 2. Nf3 Nc6 3. Bc4", true),
                record(
                    "C50",
                    "Italian Game: Giuoco Piano",
                    "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5",
                    false,
                ),
                record("B20", "Sicilian Defense", "1. e4 c5", true),
                record(
                    "B90",
                    "Sicilian Defense: Najdorf Variation",
                    "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6",
                    false,
                ),
            ],
        )
        .index
    }

    #[test]
    fn test_get_normalizes_key() {
        let index = index();
        assert_eq!(index.best_line("1. e4 c5").unwrap().name, "Sicilian Defense");
        assert_eq!(index.get("e4  c5").unwrap().ply_count(), 2);
        assert!(index.get("e4 c6").is_none());
    }

    #[test]
    fn test_classify_takes_deepest_prefix() {
        let index = index();
        let played = ["e4", "e5", "Nf3", "Nc6", "Bc4", "Nf6"];
        assert_eq!(index.classify(&played).unwrap().best().unwrap().name, "Italian Game");

        let played = ["e4", "e5", "Nf3", "d6"];
        assert_eq!(index.classify(&played).unwrap().best().unwrap().name, "King's Pawn Game");

        assert!(index.classify(&["d4"]).is_none());
    }

    #[test]
    fn test_family_roots() {
        let index = index();
        let families = index.family_roots();
        let names: Vec<_> = families.keys().copied().collect();
        assert_eq!(names, vec!["Italian Game", "King's Pawn Game", "Sicilian Defense"]);
        assert_eq!(families["Sicilian Defense"].len(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let index = index();
        let hits: Vec<_> = index.search("sicilian").iter().map(|r| r.name.as_str()).collect();
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&"Sicilian Defense: Najdorf Variation"));
    }

    #[test]
    fn test_find() {
        let index = index();
        assert!(index.find("C50", "Italian Game").is_some());
        assert!(index.find("C51", "Italian Game").is_none());
    }
}
