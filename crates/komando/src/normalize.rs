//! Fill in definition defaults and validate a command tree.

use std::collections::{HashMap, HashSet};

use crate::command::{COMMANDS_GROUP, Command, FLAGS_GROUP, Flag, Nargs, kebab_case};
use crate::error::DefinitionError;

/// Something that can be listed under a help group.
pub trait Grouped {
    fn group_name_mut(&mut self) -> &mut Option<String>;
}

impl Grouped for Command {
    fn group_name_mut(&mut self) -> &mut Option<String> {
        &mut self.group_name
    }
}

impl Grouped for Flag {
    fn group_name_mut(&mut self) -> &mut Option<String> {
        &mut self.group_name
    }
}

/// Stamp `label` on every item without a group. Existing labels are kept.
pub fn assign_group<'a, T, I>(label: &str, items: I)
where
    T: Grouped + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    for item in items {
        let group = item.group_name_mut();
        if group.is_none() {
            *group = Some(label.to_string());
        }
    }
}

/// Return a copy of `root` with every default filled in.
///
/// Normalizing an already normalized tree returns an identical tree.
pub fn normalize(root: &Command) -> Result<Command, DefinitionError> {
    if !root.aliases.is_empty() {
        return Err(DefinitionError::RootAliases {
            name: root.name.clone(),
        });
    }

    let mut out = root.clone();
    normalize_node(&mut out, root.version.is_some())?;
    tracing::debug!(command = %out.name, "normalized command tree");
    Ok(out)
}

fn normalize_node(cmd: &mut Command, has_version: bool) -> Result<(), DefinitionError> {
    validate_name(&cmd.name, &cmd.name)?;
    validate_siblings(cmd)?;
    validate_flags(cmd, has_version)?;

    for (name, flag) in cmd.flags.iter_mut() {
        if flag.ty.is_bool() {
            flag.placeholder = None;
        } else if flag.placeholder.is_none() {
            flag.placeholder = Some(name.clone());
        }
    }

    for (name, arg) in cmd.args.iter_mut() {
        let nargs = *arg.nargs.get_or_insert_with(Nargs::default);
        if nargs == Nargs::Exactly(0) {
            return Err(DefinitionError::ZeroArity {
                command: cmd.name.clone(),
                arg: name.clone(),
            });
        }
    }

    assign_group(COMMANDS_GROUP, cmd.commands.iter_mut());
    assign_group(FLAGS_GROUP, cmd.flags.values_mut());

    for child in &mut cmd.commands {
        normalize_node(child, has_version)?;
    }
    Ok(())
}

fn validate_name(command: &str, name: &str) -> Result<(), DefinitionError> {
    if name.trim().is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace) {
        return Err(DefinitionError::InvalidName {
            command: command.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn validate_siblings(cmd: &Command) -> Result<(), DefinitionError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for child in &cmd.commands {
        // An alias repeating the command's own name is harmless.
        let own: HashSet<&str> = std::iter::once(child.name.as_str())
            .chain(child.aliases.iter().map(String::as_str))
            .collect();
        for token in own {
            if !seen.insert(token) {
                return Err(DefinitionError::DuplicateCommand {
                    parent: cmd.name.clone(),
                    token: token.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_flags(cmd: &Command, has_version: bool) -> Result<(), DefinitionError> {
    let mut shorts: HashMap<char, &str> = HashMap::new();
    let mut longs: HashMap<String, &str> = HashMap::new();
    for (name, flag) in &cmd.flags {
        validate_name(&cmd.name, name)?;

        let long = kebab_case(name);
        if let Some(first) = longs.insert(long.clone(), name.as_str()) {
            return Err(DefinitionError::DuplicateFlag {
                command: cmd.name.clone(),
                long,
                first: first.to_string(),
                second: name.clone(),
            });
        }

        let reserved = match (name.as_str(), flag.short) {
            ("help", _) => Some("--help"),
            (_, Some('h')) => Some("-h"),
            ("version", _) if has_version => Some("--version"),
            (_, Some('V')) if has_version => Some("-V"),
            _ => None,
        };
        if let Some(builtin) = reserved {
            return Err(DefinitionError::ReservedFlag {
                command: cmd.name.clone(),
                flag: name.clone(),
                builtin,
            });
        }

        if let Some(short) = flag.short {
            if let Some(first) = shorts.insert(short, name.as_str()) {
                return Err(DefinitionError::DuplicateShort {
                    command: cmd.name.clone(),
                    short,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
        }
    }
    Ok(())
}
