// ── Persisted user preferences ──
//
// One boolean flag with three-valued semantics: dark mode on, off, or
// unset (follow the ambient system theme). Stored as a small TOML file
// under the project config directory. Writes complete only after the
// value is on disk; a watch channel gives readers the current value
// immediately and every subsequent change.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::CoreError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    dark_mode: Option<bool>,
}

/// File-backed preference store with a reactive read side.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    dark_mode: watch::Sender<Option<bool>>,
}

impl PreferenceStore {
    /// Open the store at `path`, reading any existing settings file.
    /// A missing file means no explicit preference.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(raw) => toml::from_str::<Settings>(&raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(CoreError::Io(e)),
        };
        let (dark_mode, _) = watch::channel(settings.dark_mode);
        Ok(Self { path, dark_mode })
    }

    /// The conventional settings path under the user's config dir.
    pub fn default_path() -> Result<PathBuf, CoreError> {
        let dirs = directories::ProjectDirs::from("dev", "salmeron", "domo").ok_or_else(|| {
            CoreError::Config {
                message: "cannot determine a config directory for this platform".into(),
            }
        })?;
        Ok(dirs.config_dir().join("settings.toml"))
    }

    /// Reactive read: the receiver holds the current value and wakes on
    /// every write. `None` means no explicit preference -- the caller
    /// should fall back to the system theme.
    pub fn subscribe(&self) -> watch::Receiver<Option<bool>> {
        self.dark_mode.subscribe()
    }

    /// The current value without subscribing.
    pub fn dark_mode(&self) -> Option<bool> {
        *self.dark_mode.borrow()
    }

    /// Set the dark-mode flag. Resolves only after the value is
    /// durably persisted; the change is emitted to subscribers after.
    pub async fn set_dark_mode(&self, enabled: bool) -> Result<(), CoreError> {
        self.persist(Some(enabled)).await?;
        let _ = self.dark_mode.send(Some(enabled));
        Ok(())
    }

    /// Flip the flag relative to the caller's current view of it.
    pub async fn toggle_dark_mode(&self, current: bool) -> Result<(), CoreError> {
        self.set_dark_mode(!current).await
    }

    /// Drop the explicit preference, returning to system-theme
    /// behavior.
    pub async fn clear_dark_mode(&self) -> Result<(), CoreError> {
        self.persist(None).await?;
        let _ = self.dark_mode.send(None);
        Ok(())
    }

    async fn persist(&self, dark_mode: Option<bool>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = toml::to_string_pretty(&Settings { dark_mode })?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}
