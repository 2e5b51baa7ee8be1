//! CLI output helpers
//!
//! Human output goes to stdout with status markers; JSON mode prints
//! machine-readable objects instead. `quiet` suppresses informational
//! lines but never errors.

use serde_json::Value;

/// Prints command results in the selected format.
pub struct Printer {
    json: bool,
    quiet: bool,
}

impl Printer {
    pub fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }

    /// True when machine-readable output was requested.
    pub fn json_mode(&self) -> bool {
        self.json
    }

    /// Confirmation of a completed action.
    pub fn success(&self, message: &str) {
        if self.json {
            println!(
                "{}",
                serde_json::json!({ "success": true, "message": message })
            );
        } else if !self.quiet {
            println!("\u{2713} {}", message);
        }
    }

    /// A non-fatal problem the user should know about.
    pub fn warn(&self, message: &str) {
        if self.json {
            eprintln!(
                "{}",
                serde_json::json!({ "level": "warning", "message": message })
            );
        } else {
            eprintln!("\u{26a0} Warning: {}", message);
        }
    }

    /// Informational line, hidden in quiet mode.
    pub fn info(&self, message: &str) {
        if self.json || self.quiet {
            return;
        }
        println!("  {}", message);
    }

    /// A machine-readable value; printed only in JSON mode.
    pub fn value(&self, value: &Value) {
        if self.json {
            println!("{}", value);
        }
    }
}
