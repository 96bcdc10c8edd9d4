//! Command dispatch
//!
//! One invocation flows through a fixed protocol: extract the `--base`
//! override from the raw vector, discover the active profile with a
//! provisional parse, load extension packs, build the profile-filtered
//! registry, normalize the vector, resolve and parse the command, then
//! execute it with an explicit context. The command's `close` hook and the
//! loader release run on every exit path, success or failure.

use std::io::Write;

use brokkr_core::command::CommandContext;
use brokkr_core::error::{Error, Result};
use brokkr_core::schema::OptionsSchema;
use brokkr_core::settings::WorkspaceSettings;
use brokkr_core::utils::extensions_dir;
use brokkr_extensions::{
    build_registry, CommandRegistry, ExtensionLoader, ProfileFilter, ResolutionContext,
};
use camino::Utf8PathBuf;
use tracing::{debug, warn};

use crate::commands;
use crate::normalize::normalize;
use crate::parse;

/// Profile assumed when neither the arguments nor the settings name one
pub const DEFAULT_PROFILE: &str = "gradle";

/// The dispatcher: owns the output and error channels for one run
pub struct BrokkrCli {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl Default for BrokkrCli {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokkrCli {
    /// Dispatcher over the process stdout/stderr
    pub fn new() -> Self {
        Self::with_streams(Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    /// Dispatcher over caller-supplied channels (tests capture these)
    pub fn with_streams(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self { out, err }
    }

    /// Run one invocation
    ///
    /// Every error kind has been reported to the error channel by the time
    /// this returns; callers only map the kind to an exit status.
    pub fn run(&mut self, args: &[String]) -> Result<()> {
        let result = self.run_inner(args);

        if let Err(err) = &result {
            match err {
                // Reported at the failure site, with usage context
                Error::NoSuchCommand { .. }
                | Error::MalformedArguments { .. }
                | Error::CommandFailed { .. } => {}
                other => {
                    let _ = writeln!(self.err, "Error: {}", other);
                }
            }
        }

        result
    }

    fn run_inner(&mut self, args: &[String]) -> Result<()> {
        let base_dir = resolve_base_dir(args)?;

        let settings = WorkspaceSettings::find(&base_dir).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings: {}", e);
            WorkspaceSettings::default()
        });

        // Provisional, profile-unfiltered registry; the only result this
        // pass contributes is the profile name.
        let provisional = build_registry(
            commands::registrations(),
            &ResolutionContext::default(),
            &ProfileFilter::Any,
        );
        let profile = discover_profile(args, &provisional)
            .or(settings.profile)
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        debug!("Active profile: {}", profile);

        let ext_dir = extensions_dir()
            .map_err(|e| Error::extension_load(format!("no usable extensions directory: {}", e)))?;
        let mut loader = ExtensionLoader::new(ext_dir);

        let outcome = self.dispatch(args, &base_dir, &profile, &mut loader);
        loader.release();
        outcome
    }

    fn dispatch(
        &mut self,
        args: &[String],
        base_dir: &Utf8PathBuf,
        profile: &str,
        loader: &mut ExtensionLoader,
    ) -> Result<()> {
        let context = loader.acquire()?;
        let registry = build_registry(
            commands::registrations(),
            context,
            &ProfileFilter::Active(profile.to_string()),
        );

        // Help surface bypasses normal dispatch
        if args.is_empty() || (args.len() == 1 && args[0] == "--help") {
            return self.print_usage(&registry);
        }
        if args[0] == "help" {
            return self.print_help(&args[1..], &registry);
        }

        let normalized = normalize(args, &registry);
        let name = normalized
            .first()
            .cloned()
            .unwrap_or_default();

        let Some(descriptor) = registry.get(&name) else {
            writeln!(self.err, "Error: no such command '{}'", name)?;
            self.print_usage(&registry)?;
            return Err(Error::NoSuchCommand { name });
        };

        let options = match parse::parse_command(&descriptor.name, &descriptor.schema, &normalized[1..])
        {
            Ok(options) => options,
            Err(e) => {
                writeln!(self.err, "{}: {}", descriptor.name, e)?;
                return Err(Error::MalformedArguments {
                    command: descriptor.name.clone(),
                    message: e.to_string(),
                });
            }
        };

        if options.is_set("help") {
            writeln!(self.out, "{}", parse::render_usage(&descriptor.name, &descriptor.schema))?;
            return Ok(());
        }

        let ctx = CommandContext {
            base_dir: base_dir.clone(),
            profile: profile.to_string(),
            options,
        };
        debug!("Executing '{}' (base: {})", descriptor.name, ctx.base_dir);

        let result = descriptor.command().execute(&ctx);
        // Release hook runs whether or not execute failed
        descriptor.command().close();

        result.map_err(|source| {
            if ctx.options.is_set("trace") {
                let _ = writeln!(self.err, "error: {:?}", source);
            } else {
                let _ = writeln!(self.err, "error: {:#}", source);
                let _ = writeln!(
                    self.err,
                    "For more information run `brokkr {} --trace`",
                    descriptor.name
                );
            }
            Error::CommandFailed {
                command: descriptor.name.clone(),
                source,
            }
        })
    }

    fn print_help(&mut self, rest: &[String], registry: &CommandRegistry) -> Result<()> {
        if rest.is_empty() {
            return self.print_usage(registry);
        }

        let name = rest.join(" ");
        match registry.get(&name) {
            Some(descriptor) => {
                writeln!(self.out, "{}", parse::render_usage(&descriptor.name, &descriptor.schema))?;
                Ok(())
            }
            None => self.print_usage(registry),
        }
    }

    fn print_usage(&mut self, registry: &CommandRegistry) -> Result<()> {
        writeln!(self.out, "Usage: brokkr [OPTIONS] <COMMAND> [ARGS]")?;
        writeln!(self.out)?;
        writeln!(self.out, "Commands:")?;

        let mut descriptors: Vec<_> = registry.descriptors().iter().collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        for descriptor in descriptors {
            writeln!(self.out, "  {:<20} {}", descriptor.name, descriptor.schema.description)?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "Options:")?;
        for flag in &OptionsSchema::base().flags {
            writeln!(self.out, "  {:<20} {}", flag.aliases.join(", "), flag.help)?;
        }

        Ok(())
    }
}

/// Extract the `--base` override from the raw vector and resolve it
/// against the current directory. Runs before any parsing because the
/// settings lookup and profile resolution depend on it.
fn resolve_base_dir(args: &[String]) -> Result<Utf8PathBuf> {
    let base = args
        .windows(2)
        .find(|pair| pair[0] == "--base")
        .map(|pair| pair[1].as_str())
        .unwrap_or(".");

    let path = std::path::Path::new(base);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    Utf8PathBuf::from_path_buf(absolute).map_err(|p| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("non UTF-8 base path: {}", p.display()),
        ))
    })
}

/// Preliminary parse pass: read the `--profile` value if the vector names
/// a provisional command that parses cleanly. Every other result of this
/// pass is discarded; failures mean "no profile in the arguments".
fn discover_profile(args: &[String], provisional: &CommandRegistry) -> Option<String> {
    let normalized = normalize(args, provisional);
    let name = normalized.first()?;
    let descriptor = provisional.get(name)?;
    let options = parse::parse_command(&descriptor.name, &descriptor.schema, &normalized[1..]).ok()?;
    options.value("profile").map(str::to_string)
}
