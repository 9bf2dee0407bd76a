use std::process::ExitCode;

use anyhow::Result;
use komando::schema::CommandSchema;
use komando::value::convert;
use komando::{Arg, Command, Flag, FlagType, ParsedArgs, ParsedFlags};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    init_tracing();
    komando::run(&cli())
}

fn cli() -> Command {
    Command::new("bat")
        .version(env!("CARGO_PKG_VERSION"))
        .description(
            "bat-style front end\n    A cat(1) clone with syntax highlighting and Git integration.",
        )
        .usage("bat [OPTIONS] [FILE]...\n    bat <SUBCOMMAND>")
        .subcommand(cache())
        .subcommand(
            Command::new("schema")
                .description("Print the command tree as JSON.")
                .group("Tooling")
                .run(|_, _| print_schema()),
        )
        .flag(
            "showAll",
            Flag::boolean()
                .short('A')
                .description("Show non-printable characters (space, tab, newline, ..)."),
        )
        .flag(
            "plain",
            Flag::boolean()
                .short('p')
                .description("Show plain style (alias for '--style=plain')."),
        )
        .flag(
            "language",
            Flag::string()
                .short('l')
                .description("Set the language for syntax highlighting."),
        )
        .flag(
            "highlightLine",
            Flag::new(FlagType::repeated(convert::string))
                .short('H')
                .placeholder("N:M")
                .description("Highlight lines N through M."),
        )
        .flag(
            "fileName",
            Flag::new(FlagType::repeated(convert::string))
                .placeholder("name")
                .description("Specify the name to display for a file."),
        )
        .flag(
            "diff",
            Flag::boolean()
                .short('d')
                .description("Only show lines that have been added/removed/modified."),
        )
        .flag(
            "tabs",
            Flag::new(FlagType::integer())
                .placeholder("T")
                .description("Set the tab width to T spaces."),
        )
        .flag(
            "wrap",
            Flag::new(FlagType::choice(&["auto", "never", "character"]))
                .placeholder("mode")
                .default_value("auto")
                .description("Specify the text-wrapping mode (*auto*, never, character)."),
        )
        .flag(
            "number",
            Flag::boolean()
                .short('n')
                .description("Show line numbers (alias for '--style=numbers')."),
        )
        .flag(
            "color",
            Flag::new(FlagType::choice(&["auto", "never", "always"]))
                .placeholder("when")
                .default_value("auto")
                .inherit()
                .description("When to use colors (*auto*, never, always)."),
        )
        .flag(
            "italicText",
            Flag::new(FlagType::choice(&["always", "never"]))
                .placeholder("when")
                .default_value("never")
                .description("Use italics in output (always, *never*)"),
        )
        .flag(
            "decorations",
            Flag::new(FlagType::choice(&["auto", "never", "always"]))
                .placeholder("when")
                .default_value("auto")
                .description("When to show the decorations (*auto*, never, always)."),
        )
        .flag(
            "paging",
            Flag::new(FlagType::choice(&["auto", "never", "always"]))
                .placeholder("when")
                .default_value("auto")
                .description("Specify when to use the pager (*auto*, never, always)."),
        )
        .flag(
            "mapSyntax",
            Flag::new(FlagType::repeated(convert::string))
                .short('m')
                .placeholder("glob:syntax")
                .description(
                    "Use the specified syntax for files matching the glob pattern ('*.cpp:C++').",
                ),
        )
        .flag(
            "theme",
            Flag::string()
                .placeholder("theme")
                .description("Set the color theme for syntax highlighting."),
        )
        .flag(
            "listThemes",
            Flag::boolean().description("Display all supported highlighting themes."),
        )
        .flag(
            "style",
            Flag::new(FlagType::choice(&[
                "auto", "full", "plain", "changes", "header", "grid", "numbers", "snip",
            ]))
            .placeholder("components")
            .default_value("auto")
            .description(
                "Comma-separated list of style elements to display \
                 (*auto*, full, plain, changes, header, grid, numbers, snip).",
            ),
        )
        .flag(
            "lineRange",
            Flag::new(FlagType::repeated(convert::string))
                .short('r')
                .placeholder("N:M")
                .description("Only print the lines from N to M."),
        )
        .flag(
            "listLanguages",
            Flag::boolean()
                .short('L')
                .description("Display all supported languages."),
        )
        .arg(
            "file",
            Arg::one_or_more()
                .description("File(s) to print / concatenate. Use '-' for standard input."),
        )
        .run(print_invocation)
}

fn cache() -> Command {
    let dir_flag = |description: &str| Flag::string().placeholder("dir").description(description);

    Command::new("cache")
        .description("Modify the syntax-definition and theme cache.")
        .flag(
            "build",
            Flag::boolean()
                .short('b')
                .description("Initialize (or update) the syntax/theme cache."),
        )
        .flag(
            "clear",
            Flag::boolean()
                .short('c')
                .description("Remove the cached syntax definitions and themes."),
        )
        .flag(
            "source",
            dir_flag("Use a different directory to load syntaxes and themes from."),
        )
        .flag(
            "target",
            dir_flag("Use a different directory to store the cached syntax and theme set."),
        )
        .flag(
            "blank",
            Flag::boolean().description(
                "Create completely new syntax and theme sets (instead of appending to the default sets).",
            ),
        )
        .run(print_invocation)
}

/// Echo what was bound, one `name: value` line each.
fn print_invocation(args: &ParsedArgs, flags: &ParsedFlags) -> Result<()> {
    println!("Arguments:");
    for (name, value) in args.iter() {
        println!("  {name}: {value}");
    }
    if !args.passthrough().is_empty() {
        println!("  --: {}", args.passthrough().join(" "));
    }
    println!("Flags:");
    for (name, value) in flags.iter() {
        println!("  {name}: {value}");
    }
    tracing::debug!(flags = flags.len(), "invocation printed");
    Ok(())
}

fn print_schema() -> Result<()> {
    let tree = komando::normalize(&cli())?;
    println!("{}", CommandSchema::from_command(&tree).to_json_pretty()?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
