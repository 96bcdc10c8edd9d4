//! # brokkr-core
//!
//! Core library for the Brokkr CLI providing:
//! - Declared option schemas and flag classification
//! - The `Command` trait and registration types
//! - Workspace settings (.brokkr/settings.toml)
//! - Error types shared across the workspace

pub mod command;
pub mod error;
pub mod schema;
pub mod settings;
pub mod utils;

pub use command::{Command, CommandContext, CommandRegistration};
pub use error::{Error, Result};
pub use schema::{classify, FlagSpec, OptionsSchema, ParsedOptions, PositionalSpec};
pub use settings::WorkspaceSettings;
pub use utils::home_dir;
