//! Color theme for the dashboard.
//!
//! Maps the three severity levels to terminal colors. Colors are stored as
//! hex strings so they can come straight out of the YAML config.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::model::Severity;

/// Severity color theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Color for HIGH severity rows (default red).
    #[serde(default = "default_high")]
    pub high: String,

    /// Color for MODERATE severity rows (default yellow).
    #[serde(default = "default_moderate")]
    pub moderate: String,

    /// Color for LOW severity rows (default green).
    #[serde(default = "default_low")]
    pub low: String,
}

fn default_high() -> String {
    "#FF0000".to_string()
}
fn default_moderate() -> String {
    "#FFFF00".to_string()
}
fn default_low() -> String {
    "#00FF00".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            high: default_high(),
            moderate: default_moderate(),
            low: default_low(),
        }
    }
}

impl Theme {
    /// Returns the color for a severity level.
    #[must_use]
    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::High => parse_color(&self.high),
            Severity::Moderate => parse_color(&self.moderate),
            Severity::Low => parse_color(&self.low),
        }
    }

    /// Style for a table row of the given severity.
    #[must_use]
    pub fn row_style(&self, severity: Severity) -> Style {
        Style::default().fg(self.severity_color(severity))
    }

    /// Bold emphasis style for bars and headers.
    #[must_use]
    pub fn emphasis(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

/// Parses a hex color string to a ratatui Color.
fn parse_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');

    if hex.len() != 6 {
        return Color::White;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FF0000"), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("#00FF00"), Color::Rgb(0, 255, 0));
        assert_eq!(parse_color("#0000FF"), Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_parse_color_invalid_falls_back() {
        assert_eq!(parse_color("nope"), Color::White);
        assert_eq!(parse_color("#ZZZZZZ"), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_severity_colors_are_distinct() {
        let theme = Theme::default();
        let high = theme.severity_color(Severity::High);
        let moderate = theme.severity_color(Severity::Moderate);
        let low = theme.severity_color(Severity::Low);

        assert_ne!(high, moderate);
        assert_ne!(moderate, low);
        assert_ne!(high, low);
    }

    #[test]
    fn test_emphasis_is_bold() {
        let theme = Theme::default();
        assert!(theme.emphasis().add_modifier.contains(Modifier::BOLD));
    }
}
