//! Version command

use anyhow::{Context, Result};
use brokkr_core::command::{Command, CommandContext, CommandRegistration};
use brokkr_core::schema::{FlagSpec, OptionsSchema};

use crate::version::VersionInfo;

/// Show version information
pub struct VersionCommand;

impl VersionCommand {
    pub fn registration() -> CommandRegistration {
        let schema = OptionsSchema::new("version", "Show version information")
            .flag(FlagSpec::switch("json", &["--json"], "Output as JSON"));

        CommandRegistration::new(schema, Box::new(VersionCommand))
    }
}

impl Command for VersionCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let info = VersionInfo::current();

        if ctx.options.is_set("json") {
            let json = serde_json::to_string_pretty(&info)
                .context("Failed to serialize version info")?;
            println!("{}", json);
        } else {
            println!("{}", info);
        }

        Ok(())
    }
}
