//! Extension pack manifest
//!
//! Every pack carries an `extension.yaml` at its root describing the pack
//! and the commands it contributes:
//!
//! ```yaml
//! metadata:
//!   name: maven-pack
//!   version: "1.2.0"
//!   description: Maven build support
//! commands:
//!   - name: server start
//!     description: Start the local server with Maven
//!     profiles: [maven]
//!     exec:
//!       program: bin/server-start.sh
//!     flags:
//!       - name: port
//!         aliases: ["-p", "--port"]
//!         takes_value: true
//!         value_name: PORT
//!         help: Port to listen on
//! ```

use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use brokkr_core::schema::{FlagSpec, OptionsSchema, PositionalSpec};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

/// Manifest file name inside a pack
pub const MANIFEST_FILE_NAME: &str = "extension.yaml";

/// Parsed extension.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionManifest {
    /// Pack metadata
    pub metadata: ExtensionMetadata,

    /// Commands the pack contributes
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
}

/// Pack metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionMetadata {
    /// Pack name (lowercase, hyphens allowed)
    pub name: String,

    /// Pack version
    pub version: String,

    /// Short description
    #[serde(default)]
    pub description: String,
}

/// One command declared by a pack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Primary command name, possibly multi-word (e.g. "server start")
    pub name: String,

    /// One-line description
    #[serde(default)]
    pub description: String,

    /// Profile tags; empty means profile-agnostic
    #[serde(default)]
    pub profiles: Vec<String>,

    /// Flag declarations
    #[serde(default)]
    pub flags: Vec<FlagSpec>,

    /// Positional declarations
    #[serde(default)]
    pub positionals: Vec<PositionalSpec>,

    /// How to run the command
    pub exec: ExecSpec,
}

/// Subprocess specification for a pack command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecSpec {
    /// Program path relative to the pack root
    pub program: String,

    /// Fixed arguments placed before the parsed options
    #[serde(default)]
    pub args: Vec<String>,
}

impl ExtensionManifest {
    /// Read a manifest from an unpacked pack directory
    pub fn from_pack_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let manifest: Self = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Invalid manifest in {}", path.display()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read a manifest straight out of a pack archive without unpacking the
    /// whole pack. Used to validate packs before installing them.
    pub fn from_archive(archive: &Path) -> Result<Self> {
        let file = File::open(archive)
            .with_context(|| format!("Failed to open {}", archive.display()))?;
        let mut pack = tar::Archive::new(GzDecoder::new(file));

        for entry in pack.entries().context("Not a valid pack archive")? {
            let mut entry = entry.context("Corrupt pack archive entry")?;

            let is_manifest = {
                let path = entry.path().context("Corrupt pack archive path")?;
                path.file_name().and_then(|n| n.to_str()) == Some(MANIFEST_FILE_NAME)
                    && path.components().count() <= 2
            };

            if is_manifest {
                let mut content = String::new();
                std::io::Read::read_to_string(&mut entry, &mut content)
                    .context("Failed to read pack manifest")?;
                let manifest: Self =
                    serde_yaml_ng::from_str(&content).context("Invalid pack manifest")?;
                manifest.validate()?;
                return Ok(manifest);
            }
        }

        Err(anyhow!(
            "{} contains no {}",
            archive.display(),
            MANIFEST_FILE_NAME
        ))
    }

    /// Basic structural validation
    pub fn validate(&self) -> Result<()> {
        if self.metadata.name.is_empty() {
            return Err(anyhow!("Pack metadata is missing a name"));
        }
        if self.metadata.version.is_empty() {
            return Err(anyhow!("Pack '{}' is missing a version", self.metadata.name));
        }
        for command in &self.commands {
            if command.exec.program.is_empty() {
                return Err(anyhow!(
                    "Command '{}' in pack '{}' declares no program",
                    command.name,
                    self.metadata.name
                ));
            }
        }
        Ok(())
    }
}

impl CommandEntry {
    /// Build the options schema this entry declares
    pub fn schema(&self) -> OptionsSchema {
        OptionsSchema {
            names: vec![self.name.clone()],
            description: self.description.clone(),
            flags: self.flags.clone(),
            positionals: self.positionals.clone(),
        }
    }
}
