//! Persistent user preferences (TOML on disk)
//!
//! Currently tracks only the remembered opened project, written when a
//! project opens and cleared when it closes, so the next launch can offer
//! to reopen it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pide_core::prelude::*;

const PREFERENCES_FILENAME: &str = "preferences.toml";

/// User preferences persisted across runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Project path remembered while a project is open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened_project: Option<PathBuf>,
}

impl Preferences {
    /// Default preferences file location under the platform config dir
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("pocket-ide").join(PREFERENCES_FILENAME)
    }

    /// Load preferences from `path`. A missing file yields defaults; a
    /// malformed file is an error so user edits are not silently discarded.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Bad preferences file: {e}")))
    }

    /// Write preferences to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize preferences: {e}")))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn set_opened_project(&mut self, project: impl Into<PathBuf>) {
        self.opened_project = Some(project.into());
    }

    pub fn clear_opened_project(&mut self) {
        self.opened_project = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::load_from(&dir.path().join("none.toml")).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_round_trip_opened_project() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs/preferences.toml");

        let mut prefs = Preferences::default();
        prefs.set_opened_project("/projects/demo");
        prefs.save_to(&path).unwrap();

        let loaded = Preferences::load_from(&path).unwrap();
        assert_eq!(
            loaded.opened_project.as_deref(),
            Some(Path::new("/projects/demo"))
        );
    }

    #[test]
    fn test_clear_opened_project_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");

        let mut prefs = Preferences::default();
        prefs.set_opened_project("/projects/demo");
        prefs.save_to(&path).unwrap();

        prefs.clear_opened_project();
        prefs.save_to(&path).unwrap();

        let loaded = Preferences::load_from(&path).unwrap();
        assert!(loaded.opened_project.is_none());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "opened_project = [not valid").unwrap();

        let err = Preferences::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
