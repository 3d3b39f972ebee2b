//! Terminal styling shared by the command handlers

use memsift::Palette;

/// Escape codes for report text. Every field is empty when colour is off.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub palette: Palette,
    pub bold: &'static str,
    pub dim: &'static str,
    pub underline: &'static str,
    pub red: &'static str,
    pub green: &'static str,
    pub reset: &'static str,
}

impl Style {
    pub fn new(color: bool) -> Self {
        if color {
            Style {
                palette: Palette::ansi(),
                bold: "\x1b[1m",
                dim: "\x1b[2m",
                underline: "\x1b[4m",
                red: "\x1b[31m",
                green: "\x1b[32m",
                reset: "\x1b[0m",
            }
        } else {
            Style {
                palette: Palette::plain(),
                bold: "",
                dim: "",
                underline: "",
                red: "",
                green: "",
                reset: "",
            }
        }
    }
}

/// `key` left-aligned in a fixed-width column, then `value`
pub fn key_value(key: &str, value: impl std::fmt::Display) -> String {
    format!("{:<24} {}", key, value)
}
