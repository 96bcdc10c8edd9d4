//! Extension install command - add a pack to the user extensions directory

use anyhow::{anyhow, bail, Context, Result};
use brokkr_core::command::{Command, CommandContext, CommandRegistration};
use brokkr_core::schema::{OptionsSchema, PositionalSpec};
use brokkr_core::utils::extensions_dir;
use brokkr_extensions::loader::PACK_SUFFIX;
use brokkr_extensions::ExtensionManifest;

use crate::output;

/// Validate a pack archive and copy it into the extensions directory.
/// The pack's commands become available on the next invocation; already
/// constructed registries are snapshots and never see it.
pub struct ExtensionInstallCommand;

impl ExtensionInstallCommand {
    pub fn registration() -> CommandRegistration {
        let schema = OptionsSchema::new("extension install", "Install an extension pack")
            .positional(PositionalSpec::new("path", true, "Path to a pack archive (.tar.gz)"));

        CommandRegistration::new(schema, Box::new(ExtensionInstallCommand))
    }
}

impl Command for ExtensionInstallCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let path = ctx
            .options
            .positional("path")
            .ok_or_else(|| anyhow!("A pack archive path is required"))?;
        let source = ctx.base_dir.join(path);

        if !source.as_str().ends_with(PACK_SUFFIX) {
            bail!("{} is not a pack archive (expected {})", source, PACK_SUFFIX);
        }

        if !ctx.options.is_set("quiet") {
            output::info(&format!("Validating pack {}", source));
        }
        let manifest = ExtensionManifest::from_archive(source.as_std_path())
            .with_context(|| format!("{} is not a valid extension pack", source))?;

        let file_name = source
            .file_name()
            .ok_or_else(|| anyhow!("{} has no file name", source))?;
        let dest = extensions_dir()?.join(file_name);
        std::fs::copy(source.as_std_path(), dest.as_std_path())
            .with_context(|| format!("Failed to install pack into {}", dest))?;

        if !ctx.options.is_set("quiet") {
            output::success(&format!(
                "Installed '{}' {} ({} command(s))",
                manifest.metadata.name,
                manifest.metadata.version,
                manifest.commands.len()
            ));
        }
        Ok(())
    }
}
