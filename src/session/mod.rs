mod schema;

pub use schema::*;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CrError, CrResult};

/// UTF-8 JSON session file persisted at `settings/.recent_session` by default (the path the
/// reference implementation's `SettingsManager.RECENT_SESSION_PATH` hard-codes).
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default location, `settings/.recent_session`, relative to the process's working
    /// directory.
    pub fn default_path() -> PathBuf {
        Path::new("settings").join(".recent_session")
    }

    /// Load the session file, falling back to `defaults` (logged at `warn`) if it doesn't
    /// exist or fails to parse — the core never treats a missing or corrupt session cache as
    /// fatal.
    pub fn load_or_default(&self, defaults: Sessions) -> Sessions {
        if !self.path.exists() {
            return defaults;
        }
        match self.load() {
            Ok(sessions) => sessions,
            Err(err) => {
                log::warn!(
                    "Failed to load session file {}: {err}; falling back to defaults",
                    self.path.display()
                );
                defaults
            }
        }
    }

    pub fn load(&self) -> CrResult<Sessions> {
        let data = fs::read_to_string(&self.path)
            .map_err(|err| CrError::SessionError(format!("reading {}: {err}", self.path.display())))?;
        serde_json::from_str(&data)
            .map_err(|err| CrError::SessionError(format!("parsing {}: {err}", self.path.display())))
    }

    /// Persist the full settings map (every mode, not just the one just edited), matching the
    /// reference implementation's `prompt_for_settings_and_save`, which carries forward the
    /// other mode's last values untouched.
    pub fn save(&self, sessions: &Sessions) -> CrResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    CrError::SessionError(format!("creating {}: {err}", parent.display()))
                })?;
            }
        }
        let json = serde_json::to_string_pretty(sessions)
            .map_err(|err| CrError::SessionError(format!("serializing session: {err}")))?;
        fs::write(&self.path, json)
            .map_err(|err| CrError::SessionError(format!("writing {}: {err}", self.path.display())))
    }
}

/// The full session file: one entry per mode name, keyed exactly as stored on disk.
pub type Sessions = BTreeMap<String, ModeSettings>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_save_and_load() {
        let dir = std::env::temp_dir().join(format!(
            "osipenko-session-test-{}",
            std::process::id()
        ));
        let path = dir.join(".recent_session");
        let store = SessionStore::new(&path);

        let mut sessions = Sessions::new();
        sessions.insert(
            "ARBITRARY_MAPPING".to_string(),
            ModeSettings::orbit(1, "x + y", "y - x", (1.0, -1.5), 100),
        );

        store.save(&sessions).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, sessions);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let store = SessionStore::new("/nonexistent/path/.recent_session");
        let defaults = Sessions::new();
        let loaded = store.load_or_default(defaults.clone());
        assert_eq!(loaded, defaults);
    }
}
