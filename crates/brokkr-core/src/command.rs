//! The command capability and registration types
//!
//! Commands receive an explicit [`CommandContext`] instead of reading
//! ambient process state: the working directory and active profile travel
//! with the invocation, so a failing command cannot leave the process
//! pointing at the wrong directory or profile for whatever runs next.

use camino::Utf8PathBuf;

use crate::schema::{OptionsSchema, ParsedOptions};

/// Execution context passed to every command invocation
#[derive(Debug)]
pub struct CommandContext {
    /// Resolved working directory (`--base` override applied)
    pub base_dir: Utf8PathBuf,

    /// Active build profile
    pub profile: String,

    /// Parsed options for the matched command
    pub options: ParsedOptions,
}

/// A runnable command implementation
pub trait Command {
    /// Execute the command
    fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()>;

    /// Release resources held by the command. Invoked unconditionally after
    /// execution, whether or not `execute` returned an error.
    fn close(&self) {}
}

/// One command offered for registration: its declared schema, profile tags,
/// and implementation. Registrations are consumed by the registry builder;
/// whether one becomes a registry entry depends on the active profile and
/// on name collisions.
pub struct CommandRegistration {
    /// Declared options shape (primary name first in `schema.names`)
    pub schema: OptionsSchema,

    /// Profile tags. Empty means profile-agnostic: visible in every run.
    pub profiles: Vec<String>,

    /// The implementation
    pub command: Box<dyn Command>,
}

impl CommandRegistration {
    /// Register a profile-agnostic command
    pub fn new(schema: OptionsSchema, command: Box<dyn Command>) -> Self {
        Self {
            schema,
            profiles: Vec::new(),
            command,
        }
    }

    /// Register a command visible only under the given profiles
    pub fn with_profiles(
        schema: OptionsSchema,
        profiles: &[&str],
        command: Box<dyn Command>,
    ) -> Self {
        Self {
            schema,
            profiles: profiles.iter().map(|p| p.to_string()).collect(),
            command,
        }
    }
}
