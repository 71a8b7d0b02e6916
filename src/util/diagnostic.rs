//! User-facing diagnostics.
//!
//! Every reported error names its root cause, the declarations involved and,
//! where there is one, a suggested fix.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

/// Hints shared by several commands.
pub mod suggestions {
    pub const NO_MANIFEST: &str =
        "help: Create a Modgraph.toml with a [project] section, or pass --manifest-path";

    pub const TARGET_NOT_FOUND: &str = "help: Run `modgraph list` to see available targets";

    pub const MODULE_NOT_FOUND: &str = "help: Run `modgraph list` to see declared modules";

    pub const COMPILE_FAILED: &str = "help: Run `modgraph check` to list every configuration fault";
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }

    /// Bold ANSI color code for the label.
    fn color_code(self) -> u8 {
        match self {
            Severity::Error => 31,
            Severity::Warning => 33,
            Severity::Note => 36,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn paint(text: &str, code: u8, color: bool) -> String {
    if color {
        format!("\x1b[1;{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// A message for the terminal: headline, optional file, context lines and
/// numbered suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
    /// Declaration file the diagnostic points at
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    /// Append a context line.
    pub fn with_context(mut self, line: impl Into<String>) -> Self {
        self.context.push(line.into());
        self
    }

    /// Append a suggested fix.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Point at a file.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for the terminal, with ANSI colors if `color` is set.
    pub fn format(&self, color: bool) -> String {
        let mut out = String::new();
        let label = paint(self.severity.label(), self.severity.color_code(), color);

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}: {}", label, self.message);
        if let Some(path) = &self.location {
            let _ = writeln!(out, "  --> {}", path.display());
        }
        for line in &self.context {
            let _ = writeln!(out, "  = {}", line);
        }

        if !self.suggestions.is_empty() {
            let _ = writeln!(out, "\n{}: consider:", paint("help", 32, color));
            for (n, suggestion) in self.suggestions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", n + 1, suggestion);
            }
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rendering() {
        let diag = Diagnostic::error("failed to compile target `PaperUnrealServer`")
            .with_location("Source/PaperUnreal/PaperUnreal.modgraph.toml")
            .with_context("kind: unknown-module")
            .with_context("module: Ghost")
            .with_suggestion("Declare a [[module]] named `Ghost`");

        assert_eq!(
            diag.to_string(),
            "error: failed to compile target `PaperUnrealServer`\n\
             \x20 --> Source/PaperUnreal/PaperUnreal.modgraph.toml\n\
             \x20 = kind: unknown-module\n\
             \x20 = module: Ghost\n\
             \n\
             help: consider:\n\
             \x20 1. Declare a [[module]] named `Ghost`\n"
        );
    }

    #[test]
    fn test_colored_labels() {
        let warning = Diagnostic::warning("module `Legacy` is not used by any target");
        assert!(warning.format(true).starts_with("\x1b[1;33mwarning\x1b[0m: "));

        let note = Diagnostic::note("n").with_suggestion("s").format(true);
        assert!(note.starts_with("\x1b[1;36mnote"));
        assert!(note.contains("\x1b[1;32mhelp\x1b[0m: consider:"));
    }

    #[test]
    fn test_no_suggestions_no_help_block() {
        let output = Diagnostic::error("boom").with_context("why").format(false);
        assert_eq!(output, "error: boom\n  = why\n");
        assert_eq!(Severity::Note.to_string(), "note");
    }
}
