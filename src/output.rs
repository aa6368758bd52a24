//! Terminal output formatting for the kiln CLI.
//!
//! Status lines go to stderr with Cargo-style right-aligned coloured verbs.
//! stdout carries only the machine-readable stage summary.

use std::io::{self, IsTerminal, Write};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

/// Width for the right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// Print a status line with a green bold verb.
    /// e.g. "   Compiling courthouse/lobby (10x8)"
    pub fn status(&self, verb: &str, message: &str) {
        self.line(GREEN, verb, message);
    }

    /// Print a warning line with a yellow bold verb.
    pub fn warning(&self, verb: &str, message: &str) {
        self.line(YELLOW, verb, message);
    }

    /// Print an error line with a red bold verb.
    pub fn error(&self, verb: &str, message: &str) {
        self.line(RED, verb, message);
    }

    /// Print a diagnostic with its severity label and optional help text.
    pub fn diagnostic(&self, diagnostic: &crate::diag::Diagnostic) {
        let color = match diagnostic.severity {
            crate::diag::Severity::Error => RED,
            crate::diag::Severity::Warning => YELLOW,
        };
        let label = diagnostic.severity.to_string();
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(
                stderr,
                "  {BOLD}{color}{label}{RESET}[{}]: {}",
                diagnostic.code, diagnostic.message
            );
        } else {
            let _ = writeln!(stderr, "  {label}[{}]: {}", diagnostic.code, diagnostic.message);
        }
        if let Some(help) = &diagnostic.help {
            let _ = writeln!(stderr, "    help: {}", help);
        }
    }

    fn line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Print the machine-readable stage summary to stdout.
///
/// One line, fixed field order, consumed by CI tooling.
pub fn summary(stage: &str, pass: usize, fail: usize) {
    println!("{stage}: pass={pass} fail={fail}");
}

/// Pluralize a count: `plural(1, "map", "maps")` → "1 map".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &std::path::Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_singular() {
        assert_eq!(plural(1, "map", "maps"), "1 map");
    }

    #[test]
    fn test_plural_zero() {
        assert_eq!(plural(0, "map", "maps"), "0 maps");
    }

    #[test]
    fn test_plural_many() {
        assert_eq!(plural(3, "asset", "assets"), "3 assets");
    }

    #[test]
    fn test_display_path_absolute() {
        use std::path::Path;
        let p = Path::new("/nonexistent/path/to/file");
        assert_eq!(display_path(p), "/nonexistent/path/to/file");
    }
}
