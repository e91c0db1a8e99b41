//! Terminal styling for CLI output

use colored::{ColoredString, Colorize};

pub struct Theme;

impl Theme {
    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn primary(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn command(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn project(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn money(text: &str) -> ColoredString {
        text.green()
    }

    pub fn duration(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green().bold()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    /// Colour for a timer state label
    pub fn state(label: &str) -> ColoredString {
        match label {
            "Running" => label.green().bold(),
            "Paused" => label.yellow().bold(),
            _ => label.dimmed(),
        }
    }

    pub fn divider(width: usize) -> ColoredString {
        "─".repeat(width).dimmed()
    }

    pub fn divider_bold(width: usize) -> ColoredString {
        "━".repeat(width).normal()
    }
}
