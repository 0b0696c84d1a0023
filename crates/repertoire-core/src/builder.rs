//! Offline compilation of the corpus into a [`MoveIndex`].
//!
//! Records are ingested one at a time (grouping is order independent) and
//! the ordering pass runs once in [`IndexBuilder::finish`], after every
//! group is complete. Same corpus in, same bytes out.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::error::{DataIntegrityError, ReplayError};
use crate::index::{BuildStats, IndexEntry, MoveIndex, PositionIndex};
use crate::record::OpeningRecord;
use crate::replay::{replay, PositionEngine};
use crate::sequence::{self, MoveSequenceKey};

/// A record that survived replay, with its ply count cached for sorting.
struct Verified {
    ply_count: usize,
    record: OpeningRecord,
}

/// Result of a build: the index plus every rejected record.
#[derive(Debug)]
pub struct BuildReport {
    pub index: MoveIndex,
    pub rejected: Vec<DataIntegrityError>,
}

/// Accumulates corpus records and produces the index.
pub struct IndexBuilder<'e, E: PositionEngine> {
    engine: &'e E,
    groups: BTreeMap<MoveSequenceKey, Vec<Verified>>,
    positions: BTreeMap<String, Vec<Verified>>,
    rejected: Vec<DataIntegrityError>,
    seen_keys: BTreeSet<String>,
    total_records: usize,
    position_mismatches: usize,
    duplicate_position_keys: usize,
}

impl<'e, E: PositionEngine> IndexBuilder<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self {
            engine,
            groups: BTreeMap::new(),
            positions: BTreeMap::new(),
            rejected: Vec::new(),
            seen_keys: BTreeSet::new(),
            total_records: 0,
            position_mismatches: 0,
            duplicate_position_keys: 0,
        }
    }

    /// Parse, verify and file one record. Records whose line does not
    /// replay are rejected and reported, never silently dropped.
    pub fn ingest(&mut self, record: OpeningRecord) {
        self.total_records += 1;

        if !self.seen_keys.insert(record.position_key.clone()) {
            warn!(
                name = %record.name,
                position_key = %record.position_key,
                "Duplicate corpus position key"
            );
            self.duplicate_position_keys += 1;
        }

        let plies = sequence::parse(&record.move_text);
        let position = match replay(self.engine, &plies, plies.len()) {
            Ok(position) => position,
            Err(err) => {
                let (index, token) = match err {
                    ReplayError::IllegalMove { index, token } => (index, token),
                    ReplayError::OutOfRange { len, .. } => (len, String::new()),
                };
                let err = DataIntegrityError {
                    position_key: record.position_key,
                    name: record.name,
                    eco_code: record.eco_code.to_string(),
                    index,
                    token,
                };
                warn!("Rejected corpus record: {err}");
                self.rejected.push(err);
                return;
            }
        };

        if let Some(canonical) = self.engine.canonicalize(&record.position_key) {
            if canonical != position {
                debug!(
                    name = %record.name,
                    corpus = %record.position_key,
                    replayed = %position,
                    "Corpus position key disagrees with replayed line"
                );
                self.position_mismatches += 1;
            }
        }

        let ply_count = plies.len();
        let key = MoveSequenceKey::from_plies(&plies);

        self.positions.entry(position).or_default().push(Verified {
            ply_count,
            record: record.clone(),
        });
        self.groups
            .entry(key)
            .or_default()
            .push(Verified { ply_count, record });
    }

    pub fn ingest_all<I: IntoIterator<Item = OpeningRecord>>(&mut self, records: I) {
        for record in records {
            self.ingest(record);
        }
    }

    /// Sort every group and emit the index.
    pub fn finish(self) -> BuildReport {
        let mut indexed_records = 0usize;

        let entries: BTreeMap<MoveSequenceKey, IndexEntry> = self
            .groups
            .into_iter()
            .map(|(key, group)| {
                indexed_records += group.len();
                let records = sorted_records(group);
                (key.clone(), IndexEntry { key, records })
            })
            .collect();

        let positions: BTreeMap<String, Vec<OpeningRecord>> = self
            .positions
            .into_iter()
            .map(|(position, group)| (position, sorted_records(group)))
            .collect();

        let unique_keys = entries.len();
        let avg_records_per_key = if unique_keys > 0 {
            indexed_records as f64 / unique_keys as f64
        } else {
            0.0
        };

        let stats = BuildStats {
            total_records: self.total_records,
            indexed_records,
            unique_keys,
            avg_records_per_key,
            rejected_records: self.rejected.len(),
            distinct_positions: positions.len(),
            position_mismatches: self.position_mismatches,
            duplicate_position_keys: self.duplicate_position_keys,
        };

        info!(
            "Built move index: {} records, {} keys, {:.2} records/key, {} rejected, {} positions",
            stats.total_records,
            stats.unique_keys,
            stats.avg_records_per_key,
            stats.rejected_records,
            stats.distinct_positions
        );

        BuildReport {
            index: MoveIndex {
                entries,
                positions: PositionIndex::new(positions),
                stats,
            },
            rejected: self.rejected,
        }
    }
}

/// `(ply count, name)` ascending; position key settles exact name clashes
/// so the order is total.
fn sorted_records(mut group: Vec<Verified>) -> Vec<OpeningRecord> {
    group.sort_by(|a, b| {
        a.ply_count
            .cmp(&b.ply_count)
            .then_with(|| a.record.name.cmp(&b.record.name))
            .then_with(|| a.record.position_key.cmp(&b.record.position_key))
    });
    group.into_iter().map(|v| v.record).collect()
}

/// Build an index from a whole corpus in one call.
pub fn build<E, I>(engine: &E, records: I) -> BuildReport
where
    E: PositionEngine,
    I: IntoIterator<Item = OpeningRecord>,
{
    let mut builder = IndexBuilder::new(engine);
    builder.ingest_all(records);
    builder.finish()
}
