//! Error taxonomy.
//!
//! Definition errors come from building the command tree and are always the
//! integrator's fault. Everything else is raised while binding one invocation.

use thiserror::Error;

use crate::terminal::render_table;

/// A malformed command tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("root command \"{name}\" cannot declare aliases")]
    RootAliases { name: String },

    #[error("duplicate subcommand or alias \"{token}\" found in \"{parent}\" command")]
    DuplicateCommand { parent: String, token: String },

    #[error("short flag -{short} in \"{command}\" maps to both --{first} and --{second}")]
    DuplicateShort {
        command: String,
        short: char,
        first: String,
        second: String,
    },

    #[error("flags --{first} and --{second} in \"{command}\" are both spelled --{long}")]
    DuplicateFlag {
        command: String,
        long: String,
        first: String,
        second: String,
    },

    #[error(
        "found duplicate flags when merging inherited and child flags in \"{command}\": {}",
        .flags.join(", ")
    )]
    InheritedFlagConflict { command: String, flags: Vec<String> },

    #[error("flag \"{flag}\" in \"{command}\" shadows the built-in {builtin}")]
    ReservedFlag {
        command: String,
        flag: String,
        builtin: &'static str,
    },

    #[error("argument \"{arg}\" in \"{command}\" must take at least one value")]
    ZeroArity { command: String, arg: String },

    #[error("invalid name \"{name}\" in \"{command}\"")]
    InvalidName { command: String, name: String },
}

/// A required positional was not satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArityError {
    #[error("argument \"{arg}\" expected at least one argument")]
    AtLeastOne { arg: String },

    #[error("argument \"{arg}\" expected {expected} argument(s)")]
    Exactly { arg: String, expected: usize },
}

impl ArityError {
    /// Name of the positional that failed.
    pub fn arg(&self) -> &str {
        match self {
            Self::AtLeastOne { arg } | Self::Exactly { arg, .. } => arg,
        }
    }
}

/// One flag-like token that no declared flag accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFlag {
    pub token: String,
    pub value: Option<String>,
}

/// Every unknown flag found in one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown flags found:\n{}", self.table())]
pub struct UnknownFlags {
    pub flags: Vec<UnknownFlag>,
}

impl UnknownFlags {
    pub const HEADERS: [&'static str; 2] = ["flag", "value"];

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|f| f.token.as_str())
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.flags
            .iter()
            .map(|f| {
                vec![
                    f.token.clone(),
                    f.value.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect()
    }

    /// Tabular listing of the offending tokens.
    pub fn table(&self) -> String {
        render_table(&Self::HEADERS, &self.rows())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    UnknownFlags(#[from] UnknownFlags),

    #[error(transparent)]
    Arity(#[from] ArityError),

    #[error("invalid value for --{flag}: {message}")]
    InvalidValue { flag: String, message: String },

    #[error("missing value for {flag}")]
    MissingValue { flag: String },

    /// Raised by a command handler; passed through untouched.
    #[error(transparent)]
    Handler(anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_messages_name_the_argument() {
        let err = ArityError::AtLeastOne {
            arg: "files".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "argument \"files\" expected at least one argument"
        );

        let err = ArityError::Exactly {
            arg: "pair".to_string(),
            expected: 2,
        };
        assert_eq!(err.to_string(), "argument \"pair\" expected 2 argument(s)");
        assert_eq!(err.arg(), "pair");
    }

    #[test]
    fn unknown_flags_message_contains_table() {
        let err = UnknownFlags {
            flags: vec![
                UnknownFlag {
                    token: "--bogus".to_string(),
                    value: None,
                },
                UnknownFlag {
                    token: "--mode".to_string(),
                    value: Some("fast".to_string()),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("unknown flags found:\n"));
        assert!(msg.contains("--bogus"));
        assert!(msg.contains("fast"));
        assert_eq!(err.tokens().collect::<Vec<_>>(), ["--bogus", "--mode"]);
    }

    #[test]
    fn inherited_conflict_lists_flags() {
        let err = DefinitionError::InheritedFlagConflict {
            command: "child".to_string(),
            flags: vec!["verbose".to_string(), "quiet".to_string()],
        };
        assert!(err.to_string().ends_with("verbose, quiet"));
    }
}
