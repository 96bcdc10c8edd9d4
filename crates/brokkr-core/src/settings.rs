//! Workspace settings
//!
//! Settings live at `.brokkr/settings.toml` inside a workspace, or at
//! `~/.brokkr/settings.toml` when running outside one. A directory is a
//! workspace root when it contains `.brokkr/settings.toml`; the lookup
//! walks upward from the base directory so commands work from
//! subdirectories.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::home_dir;

const SETTINGS_RELATIVE_PATH: &str = ".brokkr/settings.toml";

/// Persisted per-workspace settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Active build profile (e.g. "gradle", "maven")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

impl WorkspaceSettings {
    /// Load settings from a specific file
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::settings(format!("{}: {}", path, e)))
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::settings(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Locate and load the settings governing `base_dir`
    ///
    /// Workspace settings win over user-level settings; a missing file is
    /// not an error and yields defaults.
    pub fn find(base_dir: &Utf8Path) -> Result<Self> {
        if let Some(workspace_dir) = find_workspace_dir(base_dir) {
            let path = workspace_dir.join(SETTINGS_RELATIVE_PATH);
            debug!("Loading workspace settings from {}", path);
            return Self::load(&path);
        }

        let user_path = home_dir()?.join(SETTINGS_RELATIVE_PATH);
        if user_path.is_file() {
            debug!("Loading user settings from {}", user_path);
            return Self::load(&user_path);
        }

        Ok(Self::default())
    }
}

/// Find the workspace root containing `dir`, if any
pub fn find_workspace_dir(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current = Some(dir);
    while let Some(candidate) = current {
        if candidate.join(SETTINGS_RELATIVE_PATH).is_file() {
            return Some(candidate.to_path_buf());
        }
        current = candidate.parent();
    }
    None
}
