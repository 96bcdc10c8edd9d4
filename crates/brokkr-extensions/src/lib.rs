//! Extension management for Brokkr
//!
//! This crate handles:
//! - Extension pack manifests (extension.yaml inside a .tar.gz pack)
//! - Materializing user and bundled packs into a scratch directory and
//!   loading them into a resolution context
//! - Subprocess-backed execution of pack-declared commands
//! - Command registry construction with profile filtering

pub mod executor;
pub mod loader;
pub mod manifest;
pub mod registry;

pub use executor::ExtensionCommand;
pub use loader::{BundledPacks, ExtensionLoader, LoadedExtension, ResolutionContext};
pub use manifest::{CommandEntry, ExtensionManifest, ExtensionMetadata};
pub use registry::{build_registry, CommandDescriptor, CommandRegistry, CommandSource, ProfileFilter};
