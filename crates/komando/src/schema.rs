//! Serializable snapshot of a command tree.
//!
//! Handlers and converters are code and cannot be serialized; the snapshot
//! keeps everything else so tooling can inspect a CLI without running it.

use serde::Serialize;

use crate::command::{Command, Flag, kebab_case};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlagSchema {
    pub name: String,
    /// Spelling on the command line, without the leading `--`.
    pub long: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// `boolean`, `scalar` or `repeated`.
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub inherit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgSchema {
    pub name: String,
    /// `?`, `*`, `+` or a count.
    pub nargs: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epilog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Whether the command has a handler.
    pub runnable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandSchema>,
}

impl FlagSchema {
    pub fn from_flag(name: &str, flag: &Flag) -> Self {
        Self {
            name: name.to_string(),
            long: kebab_case(name),
            short: flag.short,
            kind: flag.ty.kind().to_string(),
            default: flag.default.clone(),
            inherit: flag.inherit,
            placeholder: flag.placeholder.clone(),
            description: flag.description.clone(),
            group: flag.group_name.clone(),
        }
    }
}

impl CommandSchema {
    pub fn from_command(command: &Command) -> Self {
        Self {
            name: command.name.clone(),
            aliases: command.aliases.clone(),
            version: command.version.clone(),
            usage: command.usage.clone(),
            description: command.description.clone(),
            example: command.example.clone(),
            epilog: command.epilog.clone(),
            group: command.group_name.clone(),
            runnable: command.run.is_some(),
            flags: command
                .flags
                .iter()
                .map(|(name, flag)| FlagSchema::from_flag(name, flag))
                .collect(),
            args: command
                .args
                .iter()
                .map(|(name, arg)| ArgSchema {
                    name: name.clone(),
                    nargs: arg.arity().to_string(),
                    description: arg.description.clone(),
                })
                .collect(),
            commands: command.commands.iter().map(Self::from_command).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
