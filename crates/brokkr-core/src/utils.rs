//! Shared path utilities

use camino::Utf8PathBuf;

use crate::error::{Error, Result};

/// Get the user's home directory
///
/// Prefers the HOME environment variable over the platform lookup so that
/// containerized and test environments can redirect it.
pub fn home_dir() -> Result<Utf8PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(Utf8PathBuf::from(home));
        }
    }

    directories::BaseDirs::new()
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.home_dir().to_path_buf()).ok())
        .ok_or(Error::NoHomeDir)
}

/// Get the brokkr configuration directory (~/.brokkr), creating it if needed
pub fn brokkr_home() -> Result<Utf8PathBuf> {
    let dir = home_dir()?.join(".brokkr");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the user extensions directory
///
/// BROKKR_EXT_HOME overrides the default ~/.brokkr/extensions; the
/// directory is created if it does not exist.
pub fn extensions_dir() -> Result<Utf8PathBuf> {
    let dir = match std::env::var("BROKKR_EXT_HOME") {
        Ok(ext_home) if !ext_home.is_empty() => Utf8PathBuf::from(ext_home),
        _ => brokkr_home()?.join("extensions"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
