//! Help screen layout.
//!
//! A screen is a list of titled sections. Commands, flags and positionals
//! share one left column whose width is the widest entry plus a fixed gap;
//! descriptions are word-wrapped into whatever the terminal has left.

use std::fmt;

use indexmap::IndexMap;

use crate::command::{
    ARGUMENTS_GROUP, COMMANDS_GROUP, Command, FLAGS_GROUP, Flag, INHERITED_FLAGS_GROUP, Nargs,
    kebab_case,
};
use crate::resolve::Resolution;
use crate::terminal::{display_width, pad_to};
use crate::value::Value;

/// Space between the left column and descriptions.
const GAP: usize = 4;
/// Indentation of every row under its section title.
const ROW_INDENT: usize = 4;
/// Columns kept free on the right edge.
const RIGHT_MARGIN: usize = 2;
/// Descriptions never wrap narrower than this.
const MIN_DESCRIPTION_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    pub title: String,
    pub rows: Vec<String>,
}

/// A rendered help screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpScreen {
    pub sections: Vec<HelpSection>,
    pub epilog: Option<String>,
}

impl HelpScreen {
    pub fn section(&self, title: &str) -> Option<&HelpSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// One entry per console write: each section, then the epilog.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .sections
            .iter()
            .map(|section| {
                let mut text = format!("\n  {}", section.title);
                for row in &section.rows {
                    text.push_str("\n    ");
                    text.push_str(row);
                }
                text
            })
            .collect();
        if let Some(epilog) = &self.epilog {
            lines.push(format!("\n{epilog}"));
        }
        lines
    }
}

impl fmt::Display for HelpScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Help for the command selected by `resolution`.
pub fn render(resolution: &Resolution<'_>, columns: usize) -> HelpScreen {
    render_command(
        resolution.command,
        &resolution.flags,
        &resolution.display_name(),
        resolution.is_root(),
        resolution.root.version.as_deref(),
        columns,
    )
}

/// Help for `command` with an explicit active flag set.
///
/// `--help`, and `--version` when `version` is given, are added to the
/// displayed rows only.
///
/// The left column is sized over argument rows as well as commands and
/// flags, so a wide arity placeholder such as `<a,a,a>` stays aligned.
pub fn render_command(
    command: &Command,
    flags: &IndexMap<String, Flag>,
    display_name: &str,
    is_root: bool,
    version: Option<&str>,
    columns: usize,
) -> HelpScreen {
    let builtin_group = if is_root {
        FLAGS_GROUP
    } else {
        INHERITED_FLAGS_GROUP
    };
    let mut flags = flags.clone();
    flags.insert(
        "help".to_string(),
        Flag::boolean()
            .short('h')
            .description("Show this message")
            .group(builtin_group),
    );
    if version.is_some() {
        flags.insert(
            "version".to_string(),
            Flag::boolean()
                .short('V')
                .description("Show version info")
                .group(builtin_group),
        );
    }

    let command_rows: Vec<(&str, String, String)> = command
        .commands
        .iter()
        .map(|cmd| {
            let mut left = cmd.name.clone();
            for alias in &cmd.aliases {
                left.push_str(", ");
                left.push_str(alias);
            }
            let group = cmd.group_name.as_deref().unwrap_or(COMMANDS_GROUP);
            (group, left, cmd.description.clone().unwrap_or_default())
        })
        .collect();

    let flag_rows: Vec<(&str, String, String)> = flags
        .iter()
        .map(|(name, flag)| {
            let group = flag.group_name.as_deref().unwrap_or(FLAGS_GROUP);
            (group, flag_left(name, flag), flag_description(flag))
        })
        .collect();

    let arg_rows: Vec<(&str, String, String)> = command
        .args
        .iter()
        .map(|(name, arg)| {
            (
                ARGUMENTS_GROUP,
                format_nargs(arg.arity(), name),
                arg.description.clone().unwrap_or_default(),
            )
        })
        .collect();

    let left_width = command_rows
        .iter()
        .chain(&flag_rows)
        .chain(&arg_rows)
        .map(|(_, left, _)| display_width(left))
        .max()
        .unwrap_or(0)
        + GAP;
    let description_indent = left_width + ROW_INDENT;
    let description_width = columns
        .saturating_sub(description_indent + RIGHT_MARGIN)
        .max(MIN_DESCRIPTION_WIDTH);

    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut push = |title: &str, row: String| {
        groups.entry(title.to_string()).or_default().push(row);
    };

    if let Some(description) = &command.description {
        push("Description", description.clone());
    }
    if !command.aliases.is_empty() {
        push("Aliases", command.aliases.join(", "));
    }
    let usage = command
        .usage
        .clone()
        .unwrap_or_else(|| default_usage(command, display_name));
    push("Usage", usage);
    if let Some(example) = &command.example {
        push("Example", example.clone());
    }

    for (group, left, description) in command_rows.into_iter().chain(flag_rows).chain(arg_rows) {
        let row = if description.is_empty() {
            left
        } else {
            format!(
                "{}{}",
                pad_to(&left, left_width),
                wrap(&description, description_width, description_indent)
            )
        };
        push(group, row);
    }

    HelpScreen {
        sections: groups
            .into_iter()
            .map(|(title, rows)| HelpSection { title, rows })
            .collect(),
        epilog: command.epilog.clone(),
    }
}

/// `$ app sub [command] [args] [flags]`
pub fn default_usage(command: &Command, display_name: &str) -> String {
    let mut usage = format!("$ {display_name}");
    if !command.commands.is_empty() {
        usage.push_str(" [command]");
    }
    if !command.args.is_empty() {
        usage.push_str(" [args]");
    }
    // --help is always there.
    usage.push_str(" [flags]");
    usage
}

/// Placeholder text for a value taking `nargs` tokens.
pub fn format_nargs(nargs: Nargs, placeholder: &str) -> String {
    match nargs {
        Nargs::Optional => format!("[{placeholder}]"),
        Nargs::ZeroOrMore => format!("[{placeholder}...]"),
        Nargs::OneOrMore => format!("<{placeholder}...>"),
        Nargs::Exactly(1) => format!("<{placeholder}>"),
        Nargs::Exactly(n) => format!("<{}>", vec![placeholder; n].join(",")),
    }
}

fn flag_left(name: &str, flag: &Flag) -> String {
    let mut left = match flag.short {
        Some(short) => format!("-{short}, "),
        None => "    ".to_string(),
    };
    left.push_str("--");
    left.push_str(&kebab_case(name));
    if !flag.ty.is_bool() {
        let placeholder = flag.placeholder.as_deref().unwrap_or(name);
        let nargs = if flag.ty.is_repeated() {
            Nargs::OneOrMore
        } else {
            Nargs::Exactly(1)
        };
        left.push(' ');
        left.push_str(&format_nargs(nargs, placeholder));
    }
    left
}

fn flag_description(flag: &Flag) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(description) = flag.description.as_deref().filter(|d| !d.is_empty()) {
        parts.push(description.to_string());
    }
    match &flag.default {
        None | Some(Value::Bool(false)) => {}
        Some(default) => parts.push(format!("(default: {default})")),
    }
    parts.join(" ")
}

/// Greedy word wrap at whitespace.
///
/// Continuation lines are indented by `indent` columns. Explicit newlines in
/// `text` are kept. A word longer than `width` gets a line of its own.
pub fn wrap(text: &str, width: usize, indent: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0usize;
        for word in paragraph.split_whitespace() {
            let word_width = display_width(word);
            if !line.is_empty() && line_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if !line.is_empty() {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }
        lines.push(line);
    }
    lines.join(&format!("\n{}", " ".repeat(indent)))
}
