//! Terminal output formatting.
//!
//! Progress and diagnostics go to stderr so stdout stays clean for data
//! output (listings, field blocks) that may be piped.

use crossterm::style::{Color, Stylize};

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    /// Create a renderer with optional color output.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn painted(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Progress/status line, e.g. "Downloading alice/rainbow...".
    pub fn status(&self, msg: &str) {
        eprintln!("{}", self.painted(msg, Color::Yellow));
    }

    /// Final success line for a command.
    pub fn success(&self, msg: &str) {
        eprintln!("{}", self.painted(msg, Color::Green));
    }

    /// Render a warning line.
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", self.painted(msg, Color::Yellow));
    }

    /// Render an error line.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.painted(&format!("error: {msg}"), Color::Red));
    }

    /// Titled section header on stdout.
    pub fn section(&self, title: &str) {
        println!("{}", self.painted(title, Color::Cyan));
    }

    /// One key/value field row on stdout.
    pub fn field(&self, key: &str, value: &str) {
        println!("  {:<10} {value}", format!("{key}:"));
    }

    /// Plain data line on stdout.
    pub fn line(&self, text: &str) {
        println!("{text}");
    }

    /// Highlighted data line on stdout (e.g. the active list entry).
    pub fn line_highlighted(&self, text: &str) {
        println!("{}", self.painted(text, Color::Green));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn painted_passes_through_without_color() {
        let renderer = Renderer::new(false);
        assert_eq!(renderer.painted("hello", Color::Green), "hello");
    }

    #[test]
    fn painted_styles_with_color() {
        let renderer = Renderer::new(true);
        let painted = renderer.painted("hello", Color::Green);
        assert!(painted.contains("hello"));
        assert_ne!(painted, "hello");
    }
}
