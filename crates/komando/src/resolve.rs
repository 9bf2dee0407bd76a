//! Walk the command tree along the leading tokens of argv.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::command::{Command, Flag, INHERITED_FLAGS_GROUP, kebab_case};
use crate::error::DefinitionError;

/// The command selected by argv, with the flag set active for it.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub root: &'a Command,
    pub command: &'a Command,
    /// The command's own flags followed by every inherited flag.
    pub flags: IndexMap<String, Flag>,
    /// Canonical names of the subcommands walked, root excluded.
    pub path: Vec<&'a str>,
    /// Tokens left after the subcommand chain.
    pub remaining: Vec<String>,
}

impl Resolution<'_> {
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// `root sub1 sub2`, as shown in usage lines.
    pub fn display_name(&self) -> String {
        let mut name = self.root.name.clone();
        for part in &self.path {
            name.push(' ');
            name.push_str(part);
        }
        name
    }
}

/// Descend from `root` while the next token names a child command.
///
/// The first child in declaration order whose name or alias equals the token
/// wins. Resolution stops at the first token that matches nothing.
pub fn resolve<'a>(root: &'a Command, argv: &[String]) -> Result<Resolution<'a>, DefinitionError> {
    let mut current = root;
    let mut flags = root.flags.clone();
    let mut path = Vec::new();
    let mut consumed = 0usize;

    while let Some(token) = argv.get(consumed) {
        let Some(child) = current.find_child(token) else {
            break;
        };
        flags = merge_flags(&flags, child)?;
        tracing::debug!(command = %child.name, %token, "matched subcommand");
        current = child;
        path.push(child.name.as_str());
        consumed += 1;
    }

    Ok(Resolution {
        root,
        command: current,
        flags,
        path,
        remaining: argv[consumed..].to_vec(),
    })
}

/// Merge the inheritable part of `parent` into `child`'s own flags.
///
/// Inherited flags are relabeled into the "Inherited Flags" group. A child
/// flag reusing an inherited name, its command-line spelling or its short
/// character is an error.
pub fn merge_flags(
    parent: &IndexMap<String, Flag>,
    child: &Command,
) -> Result<IndexMap<String, Flag>, DefinitionError> {
    let mut merged = child.flags.clone();

    let conflicts: Vec<String> = parent
        .iter()
        .filter(|(name, flag)| flag.inherit && merged.contains_key(name.as_str()))
        .map(|(name, _)| name.clone())
        .collect();
    if !conflicts.is_empty() {
        return Err(DefinitionError::InheritedFlagConflict {
            command: child.name.clone(),
            flags: conflicts,
        });
    }

    let mut shorts: HashMap<char, String> = merged
        .iter()
        .filter_map(|(name, flag)| flag.short.map(|s| (s, name.clone())))
        .collect();

    let mut longs: HashMap<String, String> = merged
        .keys()
        .map(|name| (kebab_case(name), name.clone()))
        .collect();

    for (name, flag) in parent.iter().filter(|(_, flag)| flag.inherit) {
        let long = kebab_case(name);
        if let Some(first) = longs.insert(long.clone(), name.clone()) {
            return Err(DefinitionError::DuplicateFlag {
                command: child.name.clone(),
                long,
                first,
                second: name.clone(),
            });
        }
        if let Some(short) = flag.short {
            if let Some(first) = shorts.insert(short, name.clone()) {
                return Err(DefinitionError::DuplicateShort {
                    command: child.name.clone(),
                    short,
                    first,
                    second: name.clone(),
                });
            }
        }
        let mut inherited = flag.clone();
        inherited.group_name = Some(INHERITED_FLAGS_GROUP.to_string());
        merged.insert(name.clone(), inherited);
    }

    Ok(merged)
}
