//! Context panel printed around a failing source line

use crate::SourceFile;
use colored::Colorize;
use std::fmt;
use std::io::{self, IsTerminal};

/// Lines of context shown on each side of the failing line
pub const PANEL_SCOPE: usize = 3;

/// The failing line with its context and the `(Error)` summary
struct Panel<'src> {
    source: &'src SourceFile,
    line: usize,
    message: &'src str,
    highlight: bool,
}

impl fmt::Display for Panel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.line.saturating_sub(PANEL_SCOPE).max(1);
        let end = (self.line + PANEL_SCOPE).min(self.source.line_count());

        writeln!(f)?;
        for number in start..=end {
            let text = self.source.line(number).unwrap_or_default();
            let row = format!("{number:<3}| {text}");
            if number == self.line && self.highlight {
                writeln!(f, "{}", row.white().on_red())?;
            } else {
                writeln!(f, "{row}")?;
            }
        }

        writeln!(
            f,
            "\n(Error) {}:{}  {}",
            self.source.path.display(),
            self.line,
            self.message
        )
    }
}

/// Render the context panel and the `(Error)` summary line
///
/// Lines outside the file are clamped away. With `highlight` set, the
/// failing line is painted white on red.
pub fn render_panel(source: &SourceFile, line: usize, message: &str, highlight: bool) -> String {
    Panel {
        source,
        line,
        message,
        highlight,
    }
    .to_string()
}

/// Print the panel to stderr, highlighting only when stderr is a terminal
#[allow(clippy::print_stderr, reason = "the panel is the user-facing error report")]
pub fn report(source: &SourceFile, line: usize, message: &str) {
    let highlight = io::stderr().is_terminal();
    eprint!("{}", render_panel(source, line, message, highlight));
}
