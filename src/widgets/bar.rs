//! Horizontal usage bar.
//!
//! Renders a single line of the form `label: [|||||     ] 42.00%`. The
//! bracketed fill area is the line width minus 20 columns, leaving room for
//! the label, brackets, and percentage text.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

/// Columns reserved outside the bracketed fill area.
const RESERVED_COLS: u16 = 20;

/// One-line usage bar widget.
#[derive(Debug, Clone)]
pub struct UsageBar<'a> {
    label: &'a str,
    usage: f64,
    max_value: f64,
    style: Style,
}

impl<'a> UsageBar<'a> {
    /// Creates a bar showing `usage` out of `max_value`, rendered bold.
    #[must_use]
    pub fn new(label: &'a str, usage: f64, max_value: f64) -> Self {
        Self {
            label,
            usage,
            max_value,
            style: Style::default().add_modifier(Modifier::BOLD),
        }
    }

    /// Overrides the default style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Number of fill characters for a given fill-area width.
    ///
    /// The fill is proportional to `usage / max_value` and clamped to the
    /// area, so over-100% readings never overflow the brackets.
    fn filled(&self, fill_width: usize) -> usize {
        if self.max_value <= 0.0 {
            return 0;
        }
        let ratio = (self.usage / self.max_value).clamp(0.0, 1.0);
        ((ratio * fill_width as f64) as usize).min(fill_width)
    }
}

impl Widget for UsageBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let fill_width = area.width.saturating_sub(RESERVED_COLS) as usize;
        let filled = self.filled(fill_width);
        let bar: String = "|".repeat(filled);

        let text = format!(
            "{}: [{bar:<fill_width$}] {:.2}%",
            self.label, self.usage
        );
        buf.set_stringn(area.x, area.y, text, area.width as usize, self.style);
    }
}
