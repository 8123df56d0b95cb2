//! Output-mode helpers shared by all subcommands.
//!
//! The global `--json`, `--quiet`, and `--no-color` flags are exported as
//! environment variables in `main` so every module can check them without
//! threading state through call signatures.

/// Whether machine-readable JSON output was requested.
pub fn is_json() -> bool {
    std::env::var("GLEANER_JSON").is_ok_and(|v| v == "1")
}

/// Whether non-essential output is suppressed.
pub fn is_quiet() -> bool {
    std::env::var("GLEANER_QUIET").is_ok_and(|v| v == "1")
}

/// Whether colored output is disabled.
pub fn no_color() -> bool {
    std::env::var("GLEANER_NO_COLOR").is_ok_and(|v| v == "1")
}

/// Print a JSON value on stdout.
pub fn print_json(value: &serde_json::Value) {
    println!("{value}");
}

/// Status symbols, colored unless disabled.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        Self { color: !no_color() }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.color {
            "\x1b[32m✓\x1b[0m"
        } else {
            "[OK]"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.color {
            "\x1b[33m!\x1b[0m"
        } else {
            "[!!]"
        }
    }

    pub fn err_sym(&self) -> &'static str {
        if self.color {
            "\x1b[31m✗\x1b[0m"
        } else {
            "[ERR]"
        }
    }
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}
