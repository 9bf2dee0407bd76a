//! Output sink and terminal geometry.

use std::io::{IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

/// Width used when the terminal size is unknown.
pub const FALLBACK_COLUMNS: usize = 80;

/// Where help, version and diagnostics are written.
pub trait Console {
    fn line(&mut self, text: &str);

    fn error_line(&mut self, text: &str);

    /// A diagnostic table, written to the error stream by default.
    fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        for line in render_table(headers, rows).lines() {
            self.error_line(line);
        }
    }
}

/// Process stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdio;

impl Console for Stdio {
    fn line(&mut self, text: &str) {
        // A closed pipe is not worth a panic.
        let _ = writeln!(std::io::stdout().lock(), "{text}");
    }

    fn error_line(&mut self, text: &str) {
        let _ = writeln!(std::io::stderr().lock(), "{text}");
    }
}

/// Keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub out: Vec<String>,
    pub err: Vec<String>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stdout lines joined the way a terminal would show them.
    pub fn stdout(&self) -> String {
        self.out.join("\n")
    }

    pub fn stderr(&self) -> String {
        self.err.join("\n")
    }
}

impl Console for Recorder {
    fn line(&mut self, text: &str) {
        self.out.push(text.to_string());
    }

    fn error_line(&mut self, text: &str) {
        self.err.push(text.to_string());
    }
}

/// Columns available for help output.
///
/// `COLUMNS` wins over the terminal query; non-terminals get
/// [`FALLBACK_COLUMNS`].
pub fn terminal_columns() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&c| c > 0);
    if let Some(columns) = from_env {
        return columns;
    }

    if std::io::stdout().is_terminal() {
        match crossterm::terminal::size() {
            Ok((columns, _)) if columns > 0 => return usize::from(columns),
            Ok(_) => {}
            Err(err) => tracing::debug!(%err, "terminal size query failed"),
        }
    }
    FALLBACK_COLUMNS
}

/// Display width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// `s` padded with spaces to `width` columns. Longer strings are kept whole.
pub fn pad_to(s: &str, width: usize) -> String {
    let mut out = s.to_string();
    let w = display_width(s);
    if w < width {
        out.push_str(&" ".repeat(width - w));
    }
    out
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        if i + 1 == cells.len() {
            line.push_str(cell);
        } else {
            line.push_str(&pad_to(cell, widths[i]));
        }
    }
    line
}

/// Render rows under a header line, columns separated by two spaces.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().take(columns).enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule: Vec<&str> = rule.iter().map(String::as_str).collect();

    let mut lines = vec![format_row(headers, &widths), format_row(&rule, &widths)];
    for row in rows {
        let cells: Vec<&str> = (0..columns)
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        lines.push(format_row(&cells, &widths));
    }
    lines.join("\n")
}
