//! Persisted move index.
//!
//! The index is written once by the `build-index` tool and loaded at
//! startup for in-memory lookups. Every map inside [`MoveIndex`] is ordered,
//! so the bytes depend only on the corpus.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::ArtifactError;
use crate::index::MoveIndex;

/// Default path to the binary index file.
pub const INDEX_FILE_PATH: &str = "data/opening_index.bin";

pub fn to_bytes(index: &MoveIndex) -> Result<Vec<u8>, ArtifactError> {
    Ok(bincode::serialize(index)?)
}

pub fn from_bytes(bytes: &[u8]) -> Result<MoveIndex, ArtifactError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Save the index, creating parent directories as needed.
pub fn save_index<P: AsRef<Path>>(index: &MoveIndex, path: P) -> Result<(), ArtifactError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, index)?;
    writer.flush()?;
    Ok(())
}

/// Load the index from a binary file.
pub fn load_index<P: AsRef<Path>>(path: P) -> Result<MoveIndex, ArtifactError> {
    let reader = BufReader::new(File::open(path)?);
    let index: MoveIndex = bincode::deserialize_from(reader)?;
    tracing::debug!("Loaded move index: {} keys", index.len());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::record::{EcoCode, OpeningRecord};
    use crate::replay::ShakmatyEngine;

    fn corpus() -> Vec<OpeningRecord> {
        [
            ("C50", "Italian Game", "1. e4 e5 2. Nf3 Nc6 3. Bc4"),
            ("B20", "Sicilian Defense", "1. e4 c5"),
        ]
        .into_iter()
        .map(|(eco, name, moves)| OpeningRecord {
            position_key: name.to_string(),
            eco_code: EcoCode::parse(eco).unwrap(),
            name: name.to_string(),
            move_text: moves.to_string(),
            is_family_root: true,
        })
        .collect()
    }

    #[test]
    fn test_save_then_load() {
        let index = build(&ShakmatyEngine, corpus()).index;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/index.bin");

        save_index(&index, &path).unwrap();
        let loaded = load_index(&path).unwrap();
        assert_eq!(loaded, index);
        assert_eq!(fs::read(&path).unwrap(), to_bytes(&index).unwrap());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_index(dir.path().join("missing.bin")),
            Err(ArtifactError::Io(_))
        ));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(matches!(from_bytes(&[0xff; 3]), Err(ArtifactError::Encode(_))));
    }
}
