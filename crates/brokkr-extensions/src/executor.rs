//! Subprocess-backed execution of pack-declared commands
//!
//! A pack command runs as an external process: the declared program inside
//! the unpacked pack, invoked with the pack's fixed arguments followed by
//! the parsed options reconstructed as an argument vector. The working
//! directory and active profile travel explicitly, as arguments and
//! environment, never as ambient process state mutated in place.

use anyhow::{anyhow, bail, Context, Result};
use brokkr_core::command::{Command, CommandContext};
use brokkr_core::schema::OptionsSchema;
use camino::Utf8PathBuf;
use tracing::debug;

use crate::manifest::{CommandEntry, ExecSpec};

/// A command loaded from an extension pack
pub struct ExtensionCommand {
    name: String,
    program: Utf8PathBuf,
    exec: ExecSpec,
    schema: OptionsSchema,
}

impl ExtensionCommand {
    /// Build an executable command from a pack entry
    pub fn new(pack_root: &Utf8PathBuf, entry: &CommandEntry) -> Self {
        Self {
            name: entry.name.clone(),
            program: pack_root.join(&entry.exec.program),
            exec: entry.exec.clone(),
            schema: entry.schema(),
        }
    }

    /// Reconstruct the argument vector the program receives: fixed args,
    /// declared positionals in order, then flags in schema order (valued
    /// as `--flag value`, switches bare).
    fn build_argv(&self, ctx: &CommandContext) -> Vec<String> {
        let mut argv = self.exec.args.clone();

        for positional in &self.schema.positionals {
            if let Some(value) = ctx.options.positional(&positional.name) {
                argv.push(value.to_string());
            }
        }

        for flag in &self.schema.flags {
            if flag.takes_value {
                if let Some(value) = ctx.options.value(&flag.name) {
                    argv.push(flag.primary_alias().to_string());
                    argv.push(value.to_string());
                }
            } else if ctx.options.is_set(&flag.name) {
                argv.push(flag.primary_alias().to_string());
            }
        }

        argv
    }
}

impl Command for ExtensionCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        if !self.program.is_file() {
            return Err(anyhow!(
                "Pack program not found: {} (declared by '{}')",
                self.program,
                self.name
            ));
        }

        let argv = self.build_argv(ctx);
        debug!("Running pack command '{}': {} {:?}", self.name, self.program, argv);

        let output = duct::cmd(self.program.as_std_path(), &argv)
            .dir(ctx.base_dir.as_std_path())
            .env("BROKKR_BASE", ctx.base_dir.as_str())
            .env("BROKKR_PROFILE", &ctx.profile)
            .unchecked()
            .run()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            bail!(
                "'{}' exited with status {}",
                self.name,
                output.status.code().unwrap_or(-1)
            );
        }

        Ok(())
    }
}
