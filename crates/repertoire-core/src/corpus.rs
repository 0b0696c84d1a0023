//! Decoding of raw corpus partitions.
//!
//! A partition is one JSON object per ECO family letter, keyed by position
//! string:
//!
//! ```json
//! { "<position>": { "name": "...", "eco": "C50", "moves": "1. e4 e5", "isEcoRoot": true } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::CorpusError;
use crate::record::{EcoCode, OpeningRecord};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOpening {
    name: String,
    eco: String,
    moves: String,
    #[serde(default, alias = "isFamilyRoot")]
    is_eco_root: bool,
}

/// Decode one partition. Records come back ordered by position key.
///
/// Shape errors (bad JSON, malformed ECO codes) fail the whole partition;
/// move legality is checked later by the index builder.
pub fn parse_partition(json: &str) -> Result<Vec<OpeningRecord>, CorpusError> {
    let raw: BTreeMap<String, RawOpening> = serde_json::from_str(json)?;

    raw.into_iter()
        .map(|(position_key, opening)| {
            let eco_code = EcoCode::parse(opening.eco.trim()).ok_or_else(|| {
                CorpusError::InvalidEcoCode {
                    position_key: position_key.clone(),
                    eco: opening.eco.clone(),
                }
            })?;
            Ok(OpeningRecord {
                position_key,
                eco_code,
                name: opening.name,
                move_text: opening.moves,
                is_family_root: opening.is_eco_root,
            })
        })
        .collect()
}

/// Read and decode one partition file.
pub fn load_partition<P: AsRef<Path>>(path: P) -> Result<Vec<OpeningRecord>, CorpusError> {
    let data = fs::read_to_string(path)?;
    parse_partition(&data)
}
