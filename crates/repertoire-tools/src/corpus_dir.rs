//! Discovery and loading of corpus partitions on disk.

use std::path::{Path, PathBuf};

use repertoire_core::corpus::load_partition;
use repertoire_core::{CorpusError, OpeningRecord};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CorpusDirError {
    #[error("bad partition pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("unreadable partition path: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("no partitions matching {0}")]
    Empty(String),

    #[error("partition {path}: {source}")]
    Partition {
        path: PathBuf,
        #[source]
        source: CorpusError,
    },
}

/// Partition files under `dir` matching `pattern`, sorted by path so the
/// corpus is always read in the same order.
pub fn partition_paths(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, CorpusDirError> {
    let full = dir.join(pattern);
    let full = full.to_string_lossy();
    let mut paths = glob::glob(&full)?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    if paths.is_empty() {
        return Err(CorpusDirError::Empty(full.into_owned()));
    }
    Ok(paths)
}

/// Load every partition into one record list.
pub fn load_corpus(dir: &Path, pattern: &str) -> Result<Vec<OpeningRecord>, CorpusDirError> {
    let mut records = Vec::new();
    for path in partition_paths(dir, pattern)? {
        let partition = load_partition(&path).map_err(|source| CorpusDirError::Partition {
            path: path.clone(),
            source,
        })?;
        info!("Loaded {} records from {}", partition.len(), path.display());
        records.extend(partition);
    }
    Ok(records)
}
