//! Server commands - start and stop the workspace's local server
//!
//! Gradle-profile flavors of the server lifecycle: both resolve the
//! enclosing workspace and delegate to the build-tool runner. Build-tool
//! specific variants for other profiles come from extension packs.

use anyhow::Result;
use brokkr_core::command::{Command, CommandContext, CommandRegistration};
use brokkr_core::schema::{FlagSpec, OptionsSchema};
use brokkr_core::settings::find_workspace_dir;
use camino::Utf8PathBuf;

use crate::gradle::GradleRunner;

fn workspace_dir(ctx: &CommandContext) -> Utf8PathBuf {
    find_workspace_dir(&ctx.base_dir).unwrap_or_else(|| ctx.base_dir.clone())
}

/// Start the local server via the gradle build
pub struct ServerStartCommand;

impl ServerStartCommand {
    pub fn registration() -> CommandRegistration {
        let schema = OptionsSchema::new("server start", "Start the workspace's local server")
            .flag(FlagSpec::valued("port", &["-p", "--port"], "PORT", "Port to listen on"))
            .flag(FlagSpec::switch("debug", &["-d", "--debug"], "Enable the debug agent"));

        CommandRegistration::with_profiles(schema, &["gradle"], Box::new(ServerStartCommand))
    }
}

impl Command for ServerStartCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let mut args = vec!["serverStart".to_string()];

        if let Some(port) = ctx.options.value("port") {
            args.push(format!("-Pserver.port={}", port));
        }
        if ctx.options.is_set("debug") {
            args.push("-Pserver.debug=true".to_string());
        }

        GradleRunner::new(&workspace_dir(ctx)).run(&args)
    }
}

/// Stop the local server via the gradle build
pub struct ServerStopCommand;

impl ServerStopCommand {
    pub fn registration() -> CommandRegistration {
        let schema = OptionsSchema::new("server stop", "Stop the workspace's local server");

        CommandRegistration::with_profiles(schema, &["gradle"], Box::new(ServerStopCommand))
    }
}

impl Command for ServerStopCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        GradleRunner::new(&workspace_dir(ctx)).run(&["serverStop".to_string()])
    }
}
