//! The resolve → bind → run pipeline.

use std::process::ExitCode;

use crate::bind::bind;
use crate::command::Command;
use crate::error::{DefinitionError, Error, Result, UnknownFlags};
use crate::help;
use crate::normalize::normalize;
use crate::resolve::resolve;
use crate::terminal::{Console, Stdio, terminal_columns};

const HELP_FLAGS: [&str; 2] = ["-h", "--help"];
const VERSION_FLAGS: [&str; 2] = ["-V", "--version"];

/// How one invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran to completion.
    Ran,
    /// Help was requested.
    Help,
    /// The resolved command has no handler; help was shown instead.
    NoHandler,
    /// The version line was printed.
    Version,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Ran | Self::Help | Self::Version => 0,
            Self::NoHandler => 1,
        }
    }
}

/// A normalized command tree ready to dispatch invocations.
///
/// The tree is never mutated after construction, so one dispatcher can
/// serve any number of invocations.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    root: Command,
    columns: Option<usize>,
}

impl Dispatcher {
    pub fn new(root: &Command) -> Result<Self, DefinitionError> {
        Ok(Self {
            root: normalize(root)?,
            columns: None,
        })
    }

    /// Fix the help width instead of asking the terminal.
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    pub fn dispatch(&self, argv: &[String], console: &mut dyn Console) -> Result<Outcome> {
        let root = &self.root;

        if let Some(version) = root.version.as_deref() {
            if has_flag(argv, &VERSION_FLAGS) {
                tracing::debug!(%version, "version requested");
                console.line(&root.version_line(version));
                return Ok(Outcome::Version);
            }
        }

        let resolution = resolve(root, argv)?;
        let columns = self.columns.unwrap_or_else(terminal_columns);

        if has_flag(&resolution.remaining, &HELP_FLAGS) {
            tracing::debug!(command = %resolution.display_name(), "help requested");
            for line in help::render(&resolution, columns).lines() {
                console.line(&line);
            }
            return Ok(Outcome::Help);
        }

        let Some(handler) = resolution.command.run.clone() else {
            tracing::debug!(command = %resolution.display_name(), "no handler, showing help");
            for line in help::render(&resolution, columns).lines() {
                console.line(&line);
            }
            return Ok(Outcome::NoHandler);
        };

        let (args, flags) = bind(&resolution)?;
        tracing::debug!(command = %resolution.display_name(), "running handler");
        handler(&args, &flags).map_err(Error::Handler)?;
        Ok(Outcome::Ran)
    }
}

/// Normalize `root` and dispatch one invocation.
pub fn dispatch(root: &Command, argv: &[String], console: &mut dyn Console) -> Result<Outcome> {
    Dispatcher::new(root)?.dispatch(argv, console)
}

/// Process entry point: dispatch `std::env::args` and map the result to an
/// exit code. Errors are reported on stderr.
pub fn run(root: &Command) -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    run_from(root, &argv, &mut Stdio)
}

/// [`run`] with explicit argv and console.
pub fn run_from(root: &Command, argv: &[String], console: &mut dyn Console) -> ExitCode {
    match dispatch(root, argv, console) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            report(&err, console);
            ExitCode::FAILURE
        }
    }
}

/// Human-readable error report. Unknown flags are listed as a table first.
pub fn report(err: &Error, console: &mut dyn Console) {
    match err {
        Error::UnknownFlags(unknown) => {
            console.table(&UnknownFlags::HEADERS, &unknown.rows());
            console.error_line("Error: Unknown flags found. See the above table.");
        }
        other => console.error_line(&format!("Error: {other}")),
    }
    console.error_line("Try --help for more info.");
}

/// Whether any of `names` appears before the `--` separator.
fn has_flag(argv: &[String], names: &[&str]) -> bool {
    argv.iter()
        .take_while(|arg| arg.as_str() != "--")
        .any(|arg| names.contains(&arg.as_str()))
}
