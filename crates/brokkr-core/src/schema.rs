//! Declared option schemas and flag classification
//!
//! Every command carries an [`OptionsSchema`]: an explicit table of the
//! flags and positionals it accepts. Schemas are plain data (they are also
//! the wire format extension packs declare their commands in), so flag
//! classification is a lookup, not runtime introspection.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A single flag declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagSpec {
    /// Field name the parsed value is stored under (e.g. "template")
    pub name: String,

    /// Alias tokens as typed by the user (e.g. "-t", "--template")
    pub aliases: Vec<String>,

    /// Whether the flag consumes the following token as its value.
    /// `false` marks a boolean switch.
    #[serde(default)]
    pub takes_value: bool,

    /// Whether the flag must be present
    #[serde(default)]
    pub required: bool,

    /// Placeholder shown in usage for valued flags
    #[serde(default)]
    pub value_name: Option<String>,

    /// One-line help text
    #[serde(default)]
    pub help: String,
}

impl FlagSpec {
    /// Declare a valued flag
    pub fn valued(name: &str, aliases: &[&str], value_name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            takes_value: true,
            required: false,
            value_name: Some(value_name.to_string()),
            help: help.to_string(),
        }
    }

    /// Declare a boolean switch
    pub fn switch(name: &str, aliases: &[&str], help: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            takes_value: false,
            required: false,
            value_name: None,
            help: help.to_string(),
        }
    }

    /// Mark the flag required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The alias used when reconstructing an argument vector: the first
    /// long alias, falling back to the first alias declared.
    pub fn primary_alias(&self) -> &str {
        self.aliases
            .iter()
            .find(|a| a.starts_with("--"))
            .or_else(|| self.aliases.first())
            .map(String::as_str)
            .unwrap_or(&self.name)
    }
}

/// A positional argument declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionalSpec {
    /// Field name the parsed value is stored under
    pub name: String,

    /// Whether the positional must be present
    #[serde(default)]
    pub required: bool,

    /// One-line help text
    #[serde(default)]
    pub help: String,
}

impl PositionalSpec {
    pub fn new(name: &str, required: bool, help: &str) -> Self {
        Self {
            name: name.to_string(),
            required,
            help: help.to_string(),
        }
    }
}

/// The declared shape of a command's options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsSchema {
    /// Declared command names, primary name first (possibly multi-word,
    /// e.g. "server start")
    pub names: Vec<String>,

    /// One-line command description
    #[serde(default)]
    pub description: String,

    /// Flag declarations
    #[serde(default)]
    pub flags: Vec<FlagSpec>,

    /// Positional declarations, in order
    #[serde(default)]
    pub positionals: Vec<PositionalSpec>,
}

impl OptionsSchema {
    /// Create a schema with a single declared name
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            names: vec![name.to_string()],
            description: description.to_string(),
            flags: Vec::new(),
            positionals: Vec::new(),
        }
    }

    /// The base options shape shared by every command: the global flags
    /// understood regardless of which command runs.
    pub fn base() -> Self {
        Self {
            names: Vec::new(),
            description: String::new(),
            flags: vec![
                FlagSpec::valued("base", &["--base"], "DIR", "Working directory for the command"),
                FlagSpec::valued("profile", &["-P", "--profile"], "NAME", "Active build profile"),
                FlagSpec::switch("help", &["-h", "--help"], "Print usage for the command"),
                FlagSpec::switch("quiet", &["-q", "--quiet"], "Suppress informational output"),
                FlagSpec::switch("trace", &["--trace"], "Print full error detail on failure"),
            ],
            positionals: Vec::new(),
        }
    }

    /// Add a flag
    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    /// Add a positional
    pub fn positional(mut self, positional: PositionalSpec) -> Self {
        self.positionals.push(positional);
        self
    }

    /// The primary command name, if one was declared
    pub fn primary_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str).filter(|n| !n.is_empty())
    }

    /// Merge the base flag set into this schema, base flags first.
    /// Declared flags shadow base flags of the same name.
    pub fn merged_with_base(mut self) -> Self {
        let declared: BTreeSet<String> = self.flags.iter().map(|f| f.name.clone()).collect();
        let mut flags: Vec<FlagSpec> = Self::base()
            .flags
            .into_iter()
            .filter(|f| !declared.contains(&f.name))
            .collect();
        flags.append(&mut self.flags);
        self.flags = flags;
        self
    }

    /// Find a flag spec by field name
    pub fn find_flag(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.name == name)
    }
}

/// Split a schema's flag aliases into the set that consumes a following
/// value and the set that does not.
///
/// Pure function of the schema. An alias appearing in both sets is a defect
/// in the schema's declarations, not a runtime condition; the normalizer
/// treats such an alias as valued because the valued pass runs first.
pub fn classify(schema: &OptionsSchema) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut valued = BTreeSet::new();
    let mut boolean = BTreeSet::new();

    for flag in &schema.flags {
        for alias in &flag.aliases {
            if flag.takes_value {
                valued.insert(alias.clone());
            } else {
                boolean.insert(alias.clone());
            }
        }
    }

    (valued, boolean)
}

/// Option values populated by the declarative parser for one command
#[derive(Debug, Clone, Default)]
pub struct ParsedOptions {
    values: BTreeMap<String, String>,
    switches: BTreeSet<String>,
    positionals: BTreeMap<String, String>,
}

impl ParsedOptions {
    /// Store a valued flag
    pub fn insert_value(&mut self, name: &str, value: String) {
        self.values.insert(name.to_string(), value);
    }

    /// Store a boolean switch that was present
    pub fn set_switch(&mut self, name: &str) {
        self.switches.insert(name.to_string());
    }

    /// Store a positional value
    pub fn insert_positional(&mut self, name: &str, value: String) {
        self.positionals.insert(name.to_string(), value);
    }

    /// Value of a flag, if it was supplied
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether a boolean switch was supplied
    pub fn is_set(&self, name: &str) -> bool {
        self.switches.contains(name)
    }

    /// Value of a positional, if it was supplied
    pub fn positional(&self, name: &str) -> Option<&str> {
        self.positionals.get(name).map(String::as_str)
    }
}
