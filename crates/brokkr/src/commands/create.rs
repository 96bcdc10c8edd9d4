//! Create command - scaffold a new project module

use anyhow::{anyhow, bail, Context, Result};
use brokkr_core::command::{Command, CommandContext, CommandRegistration};
use brokkr_core::schema::{FlagSpec, OptionsSchema, PositionalSpec};

use crate::output;

const DEFAULT_TEMPLATE: &str = "basic";
const TEMPLATES: &[&str] = &["basic", "library", "activator"];

/// Scaffold a new project module under the working directory
pub struct CreateCommand;

impl CreateCommand {
    pub fn registration() -> CommandRegistration {
        let schema = OptionsSchema::new("create", "Create a new project module")
            .flag(FlagSpec::valued(
                "template",
                &["-t", "--template"],
                "NAME",
                "Project template (basic, library, activator)",
            ))
            .positional(PositionalSpec::new("name", true, "Name of the module to create"));

        CommandRegistration::new(schema, Box::new(CreateCommand))
    }
}

impl Command for CreateCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let name = ctx
            .options
            .positional("name")
            .ok_or_else(|| anyhow!("A module name is required"))?;
        let template = ctx.options.value("template").unwrap_or(DEFAULT_TEMPLATE);

        if !TEMPLATES.contains(&template) {
            bail!(
                "Unknown template '{}'. Available templates: {}",
                template,
                TEMPLATES.join(", ")
            );
        }

        let dest = ctx.base_dir.join(name);
        if dest.exists() {
            bail!("{} already exists", dest);
        }

        std::fs::create_dir_all(dest.join("src/main/java"))
            .with_context(|| format!("Failed to create {}", dest))?;
        std::fs::create_dir_all(dest.join("src/test/java"))?;

        let build_file = match template {
            "library" => format!("plugins {{\n    id \"java-library\"\n}}\n\ngroup = \"{}\"\n", name),
            "activator" => format!(
                "plugins {{\n    id \"java\"\n}}\n\ngroup = \"{}\"\n\ndependencies {{\n    compileOnly \"org.osgi:osgi.core:8.0.0\"\n}}\n",
                name
            ),
            _ => format!("plugins {{\n    id \"java\"\n}}\n\ngroup = \"{}\"\n", name),
        };
        std::fs::write(dest.join("build.gradle"), build_file)?;

        if !ctx.options.is_set("quiet") {
            output::success(&format!("Created '{}' from template '{}'", name, template));
        }
        Ok(())
    }
}
