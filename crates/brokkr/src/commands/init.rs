//! Init command - initialize a workspace

use anyhow::{bail, Context, Result};
use brokkr_core::command::{Command, CommandContext, CommandRegistration};
use brokkr_core::schema::{FlagSpec, OptionsSchema, PositionalSpec};
use brokkr_core::settings::WorkspaceSettings;

use crate::output;

/// Initialize a gradle workspace in (or under) the working directory
pub struct InitCommand;

impl InitCommand {
    pub fn registration() -> CommandRegistration {
        let schema = OptionsSchema::new("init", "Initialize a new workspace")
            .flag(FlagSpec::switch(
                "force",
                &["-f", "--force"],
                "Reinitialize an existing workspace",
            ))
            .positional(PositionalSpec::new(
                "name",
                false,
                "Directory to initialize (defaults to the working directory)",
            ));

        CommandRegistration::with_profiles(schema, &["gradle"], Box::new(InitCommand))
    }
}

impl Command for InitCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let target = match ctx.options.positional("name") {
            Some(name) => ctx.base_dir.join(name),
            None => ctx.base_dir.clone(),
        };

        let settings_path = target.join(".brokkr/settings.toml");
        if settings_path.is_file() && !ctx.options.is_set("force") {
            bail!("{} is already a workspace (use --force to reinitialize)", target);
        }

        std::fs::create_dir_all(&target)
            .with_context(|| format!("Failed to create {}", target))?;

        WorkspaceSettings {
            profile: Some(ctx.profile.clone()),
        }
        .save(&settings_path)?;

        let settings_gradle = target.join("settings.gradle");
        if !settings_gradle.is_file() {
            let name = target.file_name().unwrap_or("workspace");
            std::fs::write(&settings_gradle, format!("rootProject.name = \"{}\"\n", name))?;
        }
        std::fs::create_dir_all(target.join("modules"))?;

        if !ctx.options.is_set("quiet") {
            output::success(&format!(
                "Initialized workspace at {} (profile: {})",
                target, ctx.profile
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokkr_core::schema::ParsedOptions;
    use brokkr_core::settings::find_workspace_dir;
    use camino::Utf8PathBuf;

    fn ctx(base: &std::path::Path, options: ParsedOptions) -> CommandContext {
        CommandContext {
            base_dir: Utf8PathBuf::from_path_buf(base.to_path_buf()).unwrap(),
            profile: "gradle".to_string(),
            options,
        }
    }

    #[test]
    fn initializes_workspace_with_profile() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut options = ParsedOptions::default();
        options.set_switch("quiet");

        InitCommand.execute(&ctx(tmp.path(), options)).unwrap();

        let base = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        assert_eq!(find_workspace_dir(&base), Some(base.clone()));

        let settings = WorkspaceSettings::find(&base).unwrap();
        assert_eq!(settings.profile.as_deref(), Some("gradle"));
    }

    #[test]
    fn refuses_to_reinitialize_without_force() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut options = ParsedOptions::default();
        options.set_switch("quiet");
        InitCommand.execute(&ctx(tmp.path(), options)).unwrap();

        let again = ParsedOptions::default();
        assert!(InitCommand.execute(&ctx(tmp.path(), again)).is_err());

        let mut forced = ParsedOptions::default();
        forced.set_switch("force");
        forced.set_switch("quiet");
        InitCommand.execute(&ctx(tmp.path(), forced)).unwrap();
    }
}
