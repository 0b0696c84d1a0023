//! Opening repertoire indexing and navigation.
//!
//! Offline, [`builder`] compiles a FEN-keyed opening corpus into a
//! move-sequence-keyed [`index::MoveIndex`]. At session time,
//! [`session::RepertoireSession`] walks a learner through one opening line,
//! reporting deviations and transpositions into other known lines.

pub mod artifact;
pub mod builder;
pub mod corpus;
pub mod error;
pub mod index;
pub mod navigator;
pub mod record;
pub mod replay;
pub mod sequence;
pub mod session;
pub mod store;
pub mod transposition;

pub use builder::{build, BuildReport, IndexBuilder};
pub use error::{
    ArtifactError, CorpusError, DataIntegrityError, PersistenceError, ReplayError, SessionError,
};
pub use index::{BuildStats, IndexEntry, MoveIndex, PositionIndex};
pub use navigator::{LineState, OpeningLine, Progress};
pub use record::{family_name, variation_name, EcoCode, OpeningRecord};
pub use replay::{replay, replay_canonical, PositionEngine, ShakmatyEngine};
pub use sequence::MoveSequenceKey;
pub use session::{Deviation, PlyOutcome, RepertoireSession, SessionEvent, SessionSnapshot};
pub use store::{JsonSessionStore, SessionStore};
pub use transposition::TranspositionDetector;
pub use shakmaty::Color;
