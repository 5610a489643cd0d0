//! On-disk session store.
//!
//! Two fixed entries under the platform data directory: `saved_chats.json`
//! holds the serialized transcript, `theme_color` holds the theme preference
//! string. The two persist independently; clearing the transcript leaves the
//! theme untouched. Absent or unreadable files degrade to an empty transcript
//! and the dark default rather than failing startup.

use crate::core::message::Transcript;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const TRANSCRIPT_FILE: &str = "saved_chats.json";
const THEME_FILE: &str = "theme_color";

/// Persisted theme preference. The on-disk strings match the original
/// interface's stored values; an absent file means dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark_mode",
            ThemePreference::Light => "light_mode",
        }
    }

    pub fn from_saved(value: &str) -> Self {
        if value.trim() == "light_mode" {
            ThemePreference::Light
        } else {
            ThemePreference::Dark
        }
    }

    /// Parse a configuration/CLI theme name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Some(ThemePreference::Dark),
            "light" => Some(ThemePreference::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    /// The platform data directory could not be determined or created.
    DataDir { source: std::io::Error },

    /// A store entry could not be written.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The transcript could not be serialized.
    Serialize { source: serde_json::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DataDir { source } => {
                write!(f, "Failed to prepare data directory: {source}")
            }
            StoreError::Write { path, source } => {
                write!(f, "Failed to write {}: {source}", path.display())
            }
            StoreError::Serialize { source } => {
                write!(f, "Failed to serialize transcript: {source}")
            }
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::DataDir { source } => Some(source),
            StoreError::Write { source, .. } => Some(source),
            StoreError::Serialize { source } => Some(source),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SavedTranscript {
    saved_at: DateTime<Utc>,
    messages: Transcript,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Store rooted at the platform data directory, creating it if needed.
    pub fn open_default() -> Result<Self, StoreError> {
        let proj_dirs = ProjectDirs::from("org", "glimmer", "glimmer")
            .expect("Failed to determine data directory");
        Self::at_path(proj_dirs.data_dir())
    }

    /// Store rooted at an explicit directory. Tests point this at a temp dir.
    pub fn at_path(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::DataDir { source })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Restore the saved transcript and theme. Missing files yield the empty
    /// transcript and dark theme; corrupt files are logged and treated as
    /// missing.
    pub fn load(&self) -> (Transcript, ThemePreference) {
        let transcript = match fs::read_to_string(self.transcript_path()) {
            Ok(contents) => match serde_json::from_str::<SavedTranscript>(&contents) {
                Ok(saved) => saved.messages,
                Err(e) => {
                    tracing::warn!(
                        path = %self.transcript_path().display(),
                        error = %e,
                        "discarding unreadable saved transcript"
                    );
                    Transcript::new()
                }
            },
            Err(_) => Transcript::new(),
        };

        (transcript, self.saved_theme().unwrap_or_default())
    }

    /// The persisted theme choice, if one has ever been saved. Callers that
    /// have their own fallback chain (CLI flag, config file) use this rather
    /// than [`SessionStore::load`]'s dark default.
    pub fn saved_theme(&self) -> Option<ThemePreference> {
        fs::read_to_string(self.theme_path())
            .ok()
            .map(|contents| ThemePreference::from_saved(&contents))
    }

    /// Persist the transcript atomically: write to a temp file in the store
    /// directory, then rename over the previous snapshot.
    pub fn save(&self, transcript: &Transcript) -> Result<(), StoreError> {
        let saved = SavedTranscript {
            saved_at: Utc::now(),
            messages: transcript.clone(),
        };
        let contents =
            serde_json::to_string_pretty(&saved).map_err(|source| StoreError::Serialize { source })?;
        self.write_atomic(&self.transcript_path(), contents.as_bytes())
    }

    /// Remove the persisted transcript. The theme preference survives.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(self.transcript_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Write {
                path: self.transcript_path(),
                source,
            }),
        }
    }

    pub fn set_theme(&self, theme: ThemePreference) -> Result<(), StoreError> {
        self.write_atomic(&self.theme_path(), theme.as_str().as_bytes())
    }

    fn transcript_path(&self) -> PathBuf {
        self.dir.join(TRANSCRIPT_FILE)
    }

    fn theme_path(&self) -> PathBuf {
        self.dir.join(THEME_FILE)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        let map_err = |source: std::io::Error| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(map_err)?;
        temp_file.write_all(contents).map_err(map_err)?;
        temp_file.as_file_mut().sync_all().map_err(map_err)?;
        temp_file.persist(path).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e.error,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Message, MessageStatus};
    use tempfile::TempDir;

    fn store_in_temp_dir() -> (TempDir, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at_path(dir.path()).unwrap();
        (dir, store)
    }

    fn sample_transcript() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("Hello there"));
        let mut reply = Message::pending_assistant();
        reply.text = "Hi there".to_string();
        reply.status = MessageStatus::Complete;
        transcript.push(reply);
        transcript
    }

    #[test]
    fn missing_files_yield_empty_transcript_and_dark_theme() {
        let (_dir, store) = store_in_temp_dir();
        let (transcript, theme) = store.load();
        assert!(transcript.is_empty());
        assert_eq!(theme, ThemePreference::Dark);
    }

    #[test]
    fn transcript_round_trips() {
        let (_dir, store) = store_in_temp_dir();
        let transcript = sample_transcript();
        store.save(&transcript).unwrap();

        let (restored, _) = store.load();
        assert_eq!(restored, transcript);
    }

    #[test]
    fn clear_removes_transcript_but_keeps_theme() {
        let (_dir, store) = store_in_temp_dir();
        store.save(&sample_transcript()).unwrap();
        store.set_theme(ThemePreference::Light).unwrap();

        store.clear().unwrap();

        let (transcript, theme) = store.load();
        assert!(transcript.is_empty());
        assert_eq!(theme, ThemePreference::Light);
    }

    #[test]
    fn clear_on_empty_store_is_fine() {
        let (_dir, store) = store_in_temp_dir();
        store.clear().unwrap();
    }

    #[test]
    fn theme_persists_the_original_storage_strings() {
        let (dir, store) = store_in_temp_dir();
        store.set_theme(ThemePreference::Light).unwrap();
        let raw = std::fs::read_to_string(dir.path().join("theme_color")).unwrap();
        assert_eq!(raw, "light_mode");

        let (_, theme) = store.load();
        assert_eq!(theme, ThemePreference::Light);
    }

    #[test]
    fn corrupt_transcript_degrades_to_empty() {
        let (dir, store) = store_in_temp_dir();
        std::fs::write(dir.path().join("saved_chats.json"), "{not json").unwrap();
        let (transcript, _) = store.load();
        assert!(transcript.is_empty());
    }
}
