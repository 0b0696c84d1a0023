//! Tool configuration from environment variables.

use std::env;
use std::path::PathBuf;

use repertoire_core::artifact::INDEX_FILE_PATH;

pub const DEFAULT_CORPUS_DIR: &str = "data/openings";
pub const DEFAULT_CORPUS_PATTERN: &str = "eco*.json";

#[derive(Clone, Debug)]
pub struct ToolConfig {
    /// Directory holding the corpus partitions.
    pub corpus_dir: PathBuf,
    /// File name pattern of a partition inside `corpus_dir`.
    pub corpus_pattern: String,
    /// Where the compiled index is written and read.
    pub index_path: PathBuf,
}

impl ToolConfig {
    pub fn from_env() -> Self {
        Self {
            corpus_dir: env::var("CORPUS_DIR")
                .unwrap_or_else(|_| DEFAULT_CORPUS_DIR.to_string())
                .into(),
            corpus_pattern: env::var("CORPUS_PATTERN")
                .unwrap_or_else(|_| DEFAULT_CORPUS_PATTERN.to_string()),
            index_path: env::var("INDEX_PATH")
                .unwrap_or_else(|_| INDEX_FILE_PATH.to_string())
                .into(),
        }
    }
}
