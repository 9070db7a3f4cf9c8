//! Console output for report lines

use chatprobe::{LogLevel, LogSink};
use console::{style, Term};

/// [`LogSink`] that writes report lines to stdout.
///
/// Quiet mode keeps warn-level lines (FAIL) only.
#[derive(Debug)]
pub struct ConsoleSink {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl ConsoleSink {
    /// Create a console sink
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }
}

impl LogSink for ConsoleSink {
    fn line(&mut self, level: LogLevel, text: &str) {
        if self.quiet && level != LogLevel::Warn {
            return;
        }
        let _ = self.term.write_line(&render_line(text, self.use_color));
    }
}

/// Style a report line by its leading tag
#[must_use]
pub fn render_line(text: &str, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    let tags = [
        ("[PASS]", style("[PASS]").green().bold()),
        ("[FAIL]", style("[FAIL]").red().bold()),
        ("[INFO]", style("[INFO]").cyan()),
        ("[SUMMARY]", style("[SUMMARY]").bold()),
    ];
    for (tag, styled) in tags {
        if let Some(rest) = text.strip_prefix(tag) {
            return format!("{}{rest}", styled.force_styling(true));
        }
    }
    if text.starts_with("===") {
        return style(text).bold().force_styling(true).to_string();
    }
    text.to_string()
}
