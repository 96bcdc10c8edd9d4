//! Declarative parser adapter
//!
//! Bridges an [`OptionsSchema`] to a runtime-built `clap` command: the
//! schema's flag and positional declarations become clap arguments, the
//! normalized token vector is handed to clap in a single pass, and the
//! matches come back as a [`ParsedOptions`]. Command-name resolution is
//! not this module's job — the dispatcher resolves the leading token
//! against the registry before the parser runs, which keeps "no such
//! command" and "malformed flags" distinct failure kinds.

use brokkr_core::schema::{OptionsSchema, ParsedOptions};
use clap::{Arg, ArgAction, Command as ClapCommand};

/// Build the clap command for a schema
fn to_clap(name: &str, schema: &OptionsSchema) -> ClapCommand {
    let mut cmd = ClapCommand::new(name.to_string())
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .about(schema.description.clone());

    for flag in &schema.flags {
        let mut arg = Arg::new(flag.name.clone());

        for alias in &flag.aliases {
            if let Some(long) = alias.strip_prefix("--") {
                arg = if arg.get_long().is_none() {
                    arg.long(long.to_string())
                } else {
                    arg.visible_alias(long.to_string())
                };
            } else if let Some(short) = alias.strip_prefix('-') {
                let mut chars = short.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    arg = if arg.get_short().is_none() {
                        arg.short(c)
                    } else {
                        arg.short_alias(c)
                    };
                }
            }
        }

        arg = if flag.takes_value {
            let value_name = flag.value_name.clone().unwrap_or_else(|| "VALUE".to_string());
            arg.action(ArgAction::Set)
                .value_name(value_name)
                .required(flag.required)
        } else {
            arg.action(ArgAction::SetTrue)
        };

        cmd = cmd.arg(arg.help(flag.help.clone()));
    }

    for positional in &schema.positionals {
        cmd = cmd.arg(
            Arg::new(positional.name.clone())
                .action(ArgAction::Set)
                .required(positional.required)
                .help(positional.help.clone()),
        );
    }

    cmd
}

/// Parse the tokens following a resolved command name against its schema
///
/// Returns the populated options or the parser's structured error
/// (unknown flag, missing required value, wrong arity).
pub fn parse_command(
    name: &str,
    schema: &OptionsSchema,
    tokens: &[String],
) -> Result<ParsedOptions, clap::Error> {
    let matches = to_clap(name, schema).try_get_matches_from(tokens)?;

    let mut options = ParsedOptions::default();

    for flag in &schema.flags {
        if flag.takes_value {
            if let Some(value) = matches.get_one::<String>(&flag.name) {
                options.insert_value(&flag.name, value.clone());
            }
        } else if matches.get_flag(&flag.name) {
            options.set_switch(&flag.name);
        }
    }

    for positional in &schema.positionals {
        if let Some(value) = matches.get_one::<String>(&positional.name) {
            options.insert_positional(&positional.name, value.clone());
        }
    }

    Ok(options)
}

/// Render usage text for one command
pub fn render_usage(name: &str, schema: &OptionsSchema) -> String {
    to_clap(name, schema).render_help().to_string()
}
