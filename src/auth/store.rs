//! On-disk session persistence for the CLI.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::PathBuf;

use super::Session;

/// Environment variable overriding the session file location.
pub const SESSION_FILE_ENV: &str = "REELREC_SESSION_FILE";

/// Stores the session as JSON under the user config directory so the CLI
/// stays signed in across invocations.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolves the session file path from `REELREC_SESSION_FILE`, falling
    /// back to `<config dir>/reelrec/session.json`.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = std::env::var(SESSION_FILE_ENV) {
            return Ok(Self::new(PathBuf::from(path)));
        }
        let config_dir = dirs::config_dir().context("Could not determine the config directory")?;
        Ok(Self::new(config_dir.join("reelrec").join("session.json")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the stored session. A missing file means signed out; an
    /// unreadable file is treated the same way, with a warning.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file at {:?}", self.path))?;
        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(
                    "Ignoring unreadable session file at {:?}: {}",
                    self.path, e
                );
                Ok(None)
            }
        }
    }

    /// Saves the session atomically: write to a temp file, then rename.
    #[tracing::instrument(skip(self, session))]
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(session)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes())
            .with_context(|| format!("Failed to write session file at {:?}", tmp_path))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to move session file into {:?}", self.path))?;
        debug!("Saved session to {:?}", self.path);
        Ok(())
    }

    /// Removes the stored session. A missing file is not an error.
    #[tracing::instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove session file at {:?}", self.path))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_session() -> Session {
        Session {
            access_token: "acc".into(),
            refresh_token: "ref".into(),
            expires_at: Some(1_700_000_000),
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        store.save(&sample_session()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, Some(sample_session()));

        // The temp file from the atomic write must be gone
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn test_load_missing_file_is_signed_out() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_load_corrupt_file_is_signed_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/deeper/session.json"));
        store.save(&sample_session()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_clear_removes_session() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.save(&sample_session()).unwrap();

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        // Clearing twice is fine
        store.clear().unwrap();
    }
}
