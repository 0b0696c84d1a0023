//! Error types for the repertoire core.

use thiserror::Error;

/// A move sequence could not be replayed from the starting position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("illegal move {token:?} at ply {index}")]
    IllegalMove { index: usize, token: String },

    #[error("replay target {up_to} is past the end of a {len}-ply sequence")]
    OutOfRange { up_to: usize, len: usize },
}

/// A corpus record whose move text does not replay legally.
///
/// Raised by the index builder only. The record is rejected and the build
/// continues with the rest of the corpus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record {name:?} ({eco_code}, {position_key}) fails at ply {index}: {token:?}")]
pub struct DataIntegrityError {
    pub position_key: String,
    pub name: String,
    pub eco_code: String,
    pub index: usize,
    pub token: String,
}

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid ECO code {eco:?} for position {position_key}")]
    InvalidEcoCode { position_key: String, eco: String },
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encode(#[from] bincode::Error),
}

/// Rejected session operations. The session is left untouched whenever one
/// of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("illegal move {token:?} at ply {ply_index}")]
    IllegalMove { ply_index: usize, token: String },

    #[error("cannot rewind to ply {target}, only {ply_index} plies played")]
    RewindBeyondHistory { target: usize, ply_index: usize },

    #[error("snapshot belongs to {found:?}, not {expected:?}")]
    OpeningMismatch { expected: String, found: String },

    #[error(transparent)]
    Replay(#[from] ReplayError),
}

/// Errors from the session snapshot store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
