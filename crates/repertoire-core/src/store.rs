//! Session snapshot persistence, keyed by opening.

use std::path::PathBuf;

use crate::error::PersistenceError;
use crate::session::SessionSnapshot;

/// Key-value storage for learner sessions. One snapshot per opening.
pub trait SessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistenceError>;
    fn load(
        &self,
        eco_code: &str,
        opening_name: &str,
    ) -> Result<Option<SessionSnapshot>, PersistenceError>;
    fn delete(&self, eco_code: &str, opening_name: &str) -> Result<(), PersistenceError>;
}

/// File-safe key for an opening: `C50_italian-game`.
pub fn session_key(eco_code: &str, opening_name: &str) -> String {
    let mut slug = String::with_capacity(opening_name.len());
    for c in opening_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    format!("{eco_code}_{slug}")
}

/// JSON-file-per-session store.
pub struct JsonSessionStore {
    dir: PathBuf,
}

impl JsonSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file_path(&self, eco_code: &str, opening_name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", session_key(eco_code, opening_name)))
    }
}

impl SessionStore for JsonSessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.file_path(&snapshot.eco_code, &snapshot.opening_name);
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&path, json)?;
        Ok(())
    }

    fn load(
        &self,
        eco_code: &str,
        opening_name: &str,
    ) -> Result<Option<SessionSnapshot>, PersistenceError> {
        let path = self.file_path(eco_code, opening_name);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let snapshot: SessionSnapshot = serde_json::from_str(&contents)?;
        // Slugs can collide; only hand back the opening that was asked for.
        if snapshot.eco_code != eco_code || snapshot.opening_name != opening_name {
            tracing::warn!("Session file {:?} belongs to another opening", path);
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    fn delete(&self, eco_code: &str, opening_name: &str) -> Result<(), PersistenceError> {
        let path = self.file_path(eco_code, opening_name);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}
