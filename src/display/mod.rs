//! Console presentation helpers.

pub mod graph;
pub mod progress;

pub use graph::BarChart;
pub use progress::ProgressSource;

use std::fmt::Display;

const BOLD: &str = "\u{1b}[1m";
const REVERSED: &str = "\u{1b}[7m";
const RESET: &str = "\u{1b}[0m";

/// Emphasises values in command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlighter {
    enabled: bool,
}

impl Highlighter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// `text` in bold reverse video, padded by one space on each side.
    pub fn highlight(&self, text: impl Display) -> String {
        if self.enabled {
            format!("{}{} {} {}", BOLD, REVERSED, text, RESET)
        } else {
            text.to_string()
        }
    }
}

/// Amount in złoty with four decimals.
pub fn pln(value: f64) -> String {
    format!("{:.4} PLN", value)
}
