//! Command registry construction
//!
//! The registry is an immutable snapshot of every command visible in one
//! invocation: the host's built-in registrations merged with the commands
//! declared by loaded extension packs, filtered by the active profile and
//! deduplicated by primary name.
//!
//! Enumeration order is deterministic: built-ins first, in declared
//! registration order; then extension archives in lexicographic filename
//! order; then manifest declaration order within one archive. On a name
//! collision the earliest-registered command wins and later ones are
//! dropped — a dedup policy, not an error.

use std::collections::{BTreeSet, HashMap};

use brokkr_core::command::{Command, CommandRegistration};
use brokkr_core::schema::{classify, OptionsSchema};
use tracing::{debug, warn};

use crate::executor::ExtensionCommand;
use crate::loader::ResolutionContext;

/// Where a registry entry was registered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    /// Compiled into the host
    Builtin,

    /// Declared by an extension pack (archive file name)
    Extension(String),
}

/// One registered command
pub struct CommandDescriptor {
    /// Primary command name (first declared name), possibly multi-word
    pub name: String,

    /// Options shape, with the base flags merged in
    pub schema: OptionsSchema,

    /// Profile tags the command was registered with
    pub profiles: Vec<String>,

    /// Registration source
    pub source: CommandSource,

    command: Box<dyn Command>,
}

impl CommandDescriptor {
    /// The command implementation
    pub fn command(&self) -> &dyn Command {
        self.command.as_ref()
    }
}

/// Profile restriction applied while building a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFilter {
    /// Keep every command regardless of tags (provisional pass only)
    Any,

    /// Keep untagged commands plus commands tagged with the given profile.
    /// With an empty profile name, tagged commands are all dropped:
    /// they are opt-in only.
    Active(String),
}

impl ProfileFilter {
    fn keeps(&self, profiles: &[String]) -> bool {
        match self {
            ProfileFilter::Any => true,
            ProfileFilter::Active(active) => {
                profiles.is_empty() || profiles.iter().any(|p| p == active)
            }
        }
    }
}

/// Immutable snapshot of the commands visible in one invocation
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Look up a command by primary name
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    /// Registered descriptors in registration order
    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// Registered primary names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Registered primary names containing a space, in registration order
    pub fn multiword_names(&self) -> Vec<&str> {
        self.commands
            .iter()
            .map(|c| c.name.as_str())
            .filter(|n| n.contains(' '))
            .collect()
    }

    /// Union of flag classifications over every registered schema:
    /// (aliases that consume a following value, boolean aliases)
    pub fn flag_sets(&self) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut valued = BTreeSet::new();
        let mut boolean = BTreeSet::new();

        for descriptor in &self.commands {
            let (v, b) = classify(&descriptor.schema);
            valued.extend(v);
            boolean.extend(b);
        }

        (valued, boolean)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn register(&mut self, registration: CommandRegistration, source: CommandSource) {
        let schema = registration.schema.merged_with_base();

        let Some(name) = schema.primary_name().map(str::to_string) else {
            warn!("Skipping command with no declared name from {:?}", source);
            return;
        };

        if self.index.contains_key(&name) {
            debug!("Dropping duplicate registration for '{}' from {:?}", name, source);
            return;
        }

        self.commands.push(CommandDescriptor {
            name: name.clone(),
            schema,
            profiles: registration.profiles,
            source,
            command: registration.command,
        });
        self.index.insert(name, self.commands.len() - 1);
    }
}

/// Build the command registry for one invocation
///
/// Enumerates the host registrations and every command declared by the
/// packs in `context`, applies the profile filter, and deduplicates by
/// primary name (first registration wins). A pack command with a missing
/// name or unusable declaration is a configuration error for that one
/// command: logged and skipped, never fatal for the build.
pub fn build_registry(
    host: Vec<CommandRegistration>,
    context: &ResolutionContext,
    filter: &ProfileFilter,
) -> CommandRegistry {
    let mut registry = CommandRegistry::default();

    for registration in host {
        if filter.keeps(&registration.profiles) {
            registry.register(registration, CommandSource::Builtin);
        }
    }

    for extension in context.extensions() {
        for entry in &extension.manifest.commands {
            if !filter.keeps(&entry.profiles) {
                continue;
            }

            let registration = CommandRegistration {
                schema: entry.schema(),
                profiles: entry.profiles.clone(),
                command: Box::new(ExtensionCommand::new(&extension.root, entry)),
            };
            registry.register(registration, CommandSource::Extension(extension.archive.clone()));
        }
    }

    registry
}
