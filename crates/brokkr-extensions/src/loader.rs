//! Extension pack loading
//!
//! The loader materializes a working set of extension packs into a
//! process-unique scratch directory: every `.tar.gz` in the user
//! extensions directory, overlaid with the bundled packs shipped beside
//! the executable. Each archive is unpacked and its manifest parsed into a
//! [`ResolutionContext`] — the scoped set of loadable commands for one
//! invocation. The context is exclusively owned by its loader and all of
//! its resources are reclaimed on release.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use brokkr_core::error::{Error, Result};
use camino::Utf8PathBuf;
use flate2::read::GzDecoder;
use serde::Deserialize;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::manifest::{ExtensionManifest, MANIFEST_FILE_NAME};

/// Archive suffix for extension packs
pub const PACK_SUFFIX: &str = ".tar.gz";

/// One pack loaded into a resolution context
#[derive(Debug)]
pub struct LoadedExtension {
    /// Archive file name the pack was loaded from
    pub archive: String,

    /// Unpacked pack root inside the scratch directory
    pub root: Utf8PathBuf,

    /// Parsed manifest
    pub manifest: ExtensionManifest,
}

/// The scoped set of loaded extension packs for one invocation
///
/// Owns the scratch directory the packs were unpacked into. `release`
/// reclaims everything and is idempotent; dropping an unreleased context
/// also deletes the scratch directory, best effort.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    scratch: Option<TempDir>,
    extensions: Vec<LoadedExtension>,
}

impl ResolutionContext {
    /// The loaded packs, in deterministic (lexicographic archive) order
    pub fn extensions(&self) -> &[LoadedExtension] {
        &self.extensions
    }

    /// Release the scratch directory and loaded packs
    ///
    /// Deletion failure is logged, never escalated; the scratch directory
    /// is disposable. Safe to call more than once.
    pub fn release(&mut self) {
        self.extensions.clear();
        if let Some(scratch) = self.scratch.take() {
            debug!("Releasing extension scratch directory");
            if let Err(e) = scratch.close() {
                warn!("Failed to delete extension scratch directory: {}", e);
            }
        }
    }
}

/// Bundled packs shipped beside the brokkr executable
///
/// A `bundled/extensions.toml` manifest maps pack name to version:
///
/// ```toml
/// [extensions]
/// maven-pack = "1.2.0"
/// ```
///
/// and each `<name>-<version>.tar.gz` lives in the same directory. A
/// missing manifest or artifact is tolerated; an environment with no
/// bundled packs is valid.
#[derive(Debug, Clone)]
pub struct BundledPacks {
    manifest_path: Utf8PathBuf,
    artifacts_dir: Utf8PathBuf,
}

#[derive(Debug, Deserialize)]
struct BundledManifest {
    #[serde(default)]
    extensions: std::collections::BTreeMap<String, String>,
}

impl BundledPacks {
    pub fn new(manifest_path: Utf8PathBuf, artifacts_dir: Utf8PathBuf) -> Self {
        Self {
            manifest_path,
            artifacts_dir,
        }
    }

    /// The default location: a `bundled` directory next to the executable
    pub fn beside_executable() -> Option<Self> {
        let exe = std::env::current_exe().ok()?;
        let dir = Utf8PathBuf::from_path_buf(exe.parent()?.join("bundled")).ok()?;
        Some(Self::new(dir.join("extensions.toml"), dir))
    }

    /// Copy every bundled artifact named in the manifest into `scratch`,
    /// overwriting same-named user copies (bundled versions win over stale
    /// copies already materialized).
    fn materialize(&self, scratch: &Path) {
        if !self.manifest_path.is_file() {
            debug!("No bundled pack manifest at {}", self.manifest_path);
            return;
        }

        let content = match std::fs::read_to_string(&self.manifest_path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read bundled pack manifest: {}", e);
                return;
            }
        };

        let manifest: BundledManifest = match toml::from_str(&content) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Invalid bundled pack manifest: {}", e);
                return;
            }
        };

        for (name, version) in &manifest.extensions {
            if semver::Version::parse(version).is_err() {
                warn!("Ignoring bundled pack '{}' with invalid version '{}'", name, version);
                continue;
            }

            let artifact = format!("{}-{}{}", name, version, PACK_SUFFIX);
            let source = self.artifacts_dir.join(&artifact);
            if !source.is_file() {
                warn!("Bundled pack artifact not found: {}", source);
                continue;
            }

            if let Err(e) = std::fs::copy(&source, scratch.join(&artifact)) {
                warn!("Failed to materialize bundled pack '{}': {}", name, e);
            }
        }
    }
}

/// Materializes extension packs and owns the resulting resolution context
///
/// The context is constructed lazily on the first `acquire` and reused for
/// the loader's lifetime; `release` reclaims it.
pub struct ExtensionLoader {
    extensions_dir: Utf8PathBuf,
    bundled: Option<BundledPacks>,
    context: Option<ResolutionContext>,
}

impl ExtensionLoader {
    /// Create a loader over the given user extensions directory, with
    /// bundled packs discovered beside the executable
    pub fn new(extensions_dir: Utf8PathBuf) -> Self {
        Self {
            extensions_dir,
            bundled: BundledPacks::beside_executable(),
            context: None,
        }
    }

    /// Override the bundled pack location (tests, relocated installs)
    pub fn with_bundled(mut self, bundled: Option<BundledPacks>) -> Self {
        self.bundled = bundled;
        self
    }

    /// Get the resolution context, materializing it on first use
    pub fn acquire(&mut self) -> Result<&ResolutionContext> {
        if self.context.is_none() {
            self.context = Some(self.load()?);
        }
        Ok(self.context.as_ref().expect("context just materialized"))
    }

    /// Release the context and its scratch directory; safe to call more
    /// than once
    pub fn release(&mut self) {
        if let Some(mut context) = self.context.take() {
            context.release();
        }
    }

    fn load(&self) -> Result<ResolutionContext> {
        let scratch = tempfile::Builder::new()
            .prefix("brokkr-extensions-")
            .tempdir()
            .map_err(|e| {
                Error::extension_load(format!("failed to create scratch directory: {}", e))
            })?;

        self.copy_user_packs(scratch.path());

        if let Some(bundled) = &self.bundled {
            bundled.materialize(scratch.path());
        }

        let mut archives: Vec<PathBuf> = std::fs::read_dir(scratch.path())
            .map_err(|e| {
                Error::extension_load(format!("failed to enumerate scratch directory: {}", e))
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_pack_archive(path))
            .collect();

        // Deterministic enumeration order: lexicographic by archive name
        archives.sort();

        let mut extensions = Vec::new();
        for archive in &archives {
            match load_archive(archive, scratch.path()) {
                Ok(extension) => extensions.push(extension),
                Err(e) => {
                    warn!("Skipping extension archive {}: {:#}", archive.display(), e);
                }
            }
        }

        info!(
            "Loaded {} extension pack(s) from {} archive(s)",
            extensions.len(),
            archives.len()
        );

        Ok(ResolutionContext {
            scratch: Some(scratch),
            extensions,
        })
    }

    fn copy_user_packs(&self, scratch: &Path) {
        let entries = match std::fs::read_dir(&self.extensions_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    "No user extensions at {}: {}",
                    self.extensions_dir, e
                );
                return;
            }
        };

        for entry in entries.filter_map(|entry| entry.ok()) {
            let path = entry.path();
            if !is_pack_archive(&path) {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            if let Err(e) = std::fs::copy(&path, scratch.join(file_name)) {
                warn!("Skipping unreadable extension artifact {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for ExtensionLoader {
    fn drop(&mut self) {
        self.release();
    }
}

fn is_pack_archive(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(PACK_SUFFIX))
}

fn load_archive(archive: &Path, scratch: &Path) -> anyhow::Result<LoadedExtension> {
    let file_name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .context("Archive has a non UTF-8 name")?
        .to_string();
    let stem = file_name.trim_end_matches(PACK_SUFFIX);

    let dest = scratch.join(stem);
    std::fs::create_dir_all(&dest)?;

    let file = File::open(archive)?;
    tar::Archive::new(GzDecoder::new(file))
        .unpack(&dest)
        .with_context(|| format!("Failed to unpack {}", file_name))?;

    if !dest.join(MANIFEST_FILE_NAME).is_file() {
        anyhow::bail!("{} has no {} at the pack root", file_name, MANIFEST_FILE_NAME);
    }

    let manifest = ExtensionManifest::from_pack_dir(&dest)?;
    let root = Utf8PathBuf::from_path_buf(dest)
        .map_err(|p| anyhow::anyhow!("Non UTF-8 pack root: {}", p.display()))?;

    debug!(
        "Loaded pack '{}' ({} command(s)) from {}",
        manifest.metadata.name,
        manifest.commands.len(),
        file_name
    );

    Ok(LoadedExtension {
        archive: file_name,
        root,
        manifest,
    })
}
