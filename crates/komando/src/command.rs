//! The command tree data model.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::bind::{ParsedArgs, ParsedFlags};
use crate::value::{FlagType, Value};

pub const COMMANDS_GROUP: &str = "Commands";
pub const FLAGS_GROUP: &str = "Flags";
pub const INHERITED_FLAGS_GROUP: &str = "Inherited Flags";
pub const ARGUMENTS_GROUP: &str = "Arguments";

/// Command body, invoked with the bound positionals and flags.
pub type Handler = Arc<dyn Fn(&ParsedArgs, &ParsedFlags) -> anyhow::Result<()> + Send + Sync>;

/// Formats the version line from `(name, version)`.
pub type VersionFormatter = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// One node of the command tree.
#[derive(Clone, Default)]
pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    /// Root only.
    pub version: Option<String>,
    pub usage: Option<String>,
    pub description: Option<String>,
    pub example: Option<String>,
    pub epilog: Option<String>,
    /// Help bucket when listed under the parent.
    pub group_name: Option<String>,
    pub commands: Vec<Command>,
    pub flags: IndexMap<String, Flag>,
    pub args: IndexMap<String, Arg>,
    pub run: Option<Handler>,
    /// Root only.
    pub show_version: Option<VersionFormatter>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("version", &self.version)
            .field("group_name", &self.group_name)
            .field("commands", &self.commands)
            .field("flags", &self.flags)
            .field("args", &self.args)
            .field("run", &self.run.is_some())
            .finish_non_exhaustive()
    }
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = Some(epilog.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn group(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }

    pub fn subcommand(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Declare a flag; redeclaring a name replaces the earlier definition.
    pub fn flag(mut self, name: impl Into<String>, flag: Flag) -> Self {
        self.flags.insert(name.into(), flag);
        self
    }

    pub fn arg(mut self, name: impl Into<String>, arg: Arg) -> Self {
        self.args.insert(name.into(), arg);
        self
    }

    pub fn run<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ParsedArgs, &ParsedFlags) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.run = Some(Arc::new(handler));
        self
    }

    pub fn show_version<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.show_version = Some(Arc::new(formatter));
        self
    }

    /// Whether `token` is this command's name or one of its aliases.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }

    /// First child matching `token`, in declaration order.
    pub fn find_child(&self, token: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches(token))
    }

    /// The version line for this command.
    pub fn version_line(&self, version: &str) -> String {
        match &self.show_version {
            Some(formatter) => formatter(&self.name, version),
            None => format!("{}@{}", self.name, version),
        }
    }
}

/// A named option.
#[derive(Debug, Clone)]
pub struct Flag {
    pub ty: FlagType,
    pub short: Option<char>,
    pub default: Option<Value>,
    /// Exposed to every descendant command.
    pub inherit: bool,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub group_name: Option<String>,
}

impl Flag {
    pub fn new(ty: FlagType) -> Self {
        Self {
            ty,
            short: None,
            default: None,
            inherit: false,
            placeholder: None,
            description: None,
            group_name: None,
        }
    }

    pub fn boolean() -> Self {
        Self::new(FlagType::boolean())
    }

    pub fn string() -> Self {
        Self::new(FlagType::string())
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn inherit(mut self) -> Self {
        self.inherit = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn group(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }
}

/// How many positional tokens an [`Arg`] consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nargs {
    /// `?`
    Optional,
    /// `*`, consumes the rest.
    ZeroOrMore,
    /// `+`, consumes the rest.
    OneOrMore,
    Exactly(usize),
}

impl Default for Nargs {
    fn default() -> Self {
        Self::Exactly(1)
    }
}

impl fmt::Display for Nargs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optional => f.write_str("?"),
            Self::ZeroOrMore => f.write_str("*"),
            Self::OneOrMore => f.write_str("+"),
            Self::Exactly(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for Nargs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "?" => Ok(Self::Optional),
            "*" => Ok(Self::ZeroOrMore),
            "+" => Ok(Self::OneOrMore),
            other => other
                .parse::<usize>()
                .map(Self::Exactly)
                .map_err(|_| format!("invalid nargs `{other}`, expected ?, *, + or a count")),
        }
    }
}

/// A positional slot.
#[derive(Debug, Clone, Default)]
pub struct Arg {
    pub nargs: Option<Nargs>,
    pub description: Option<String>,
}

impl Arg {
    pub fn new(nargs: Nargs) -> Self {
        Self {
            nargs: Some(nargs),
            description: None,
        }
    }

    pub fn optional() -> Self {
        Self::new(Nargs::Optional)
    }

    pub fn zero_or_more() -> Self {
        Self::new(Nargs::ZeroOrMore)
    }

    pub fn one_or_more() -> Self {
        Self::new(Nargs::OneOrMore)
    }

    pub fn exactly(n: usize) -> Self {
        Self::new(Nargs::Exactly(n))
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn arity(&self) -> Nargs {
        self.nargs.unwrap_or_default()
    }
}

/// `camelCase` and `snake_case` names as they appear on the command line.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c == '_' {
            out.push('-');
        } else if c.is_ascii_uppercase() {
            if prev.is_some_and(|p| p.is_ascii_alphanumeric()) {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}
