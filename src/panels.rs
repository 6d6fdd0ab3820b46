//! Frame rendering.
//!
//! One function draws the whole frame from the display model: usage bars,
//! the command reference, filter readouts, the process table, and the
//! status/prompt lines. Every line is positioned independently and drawing
//! outside the terminal is a silent no-op, so a tiny window just shows
//! whatever fits.

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::input::Prompt;
use crate::model::DisplayModel;
use crate::state::ViewState;
use crate::theme::Theme;
use crate::widgets::UsageBar;

/// Fixed lines below the last table row: prompt, status, bottom margin.
const FOOTER_ROWS: usize = 3;

/// Lines above the first table row, excluding the per-core bars.
const FIXED_HEADER_ROWS: usize = 12;

const TITLE: &str = "Process Monitor (Press 'q' to Quit)";
const COMMANDS: &str = "Commands: [f] Filter by Name | [p] Filter by PID | [s] Toggle Sort CPU/Mem | [a] Toggle Asc/Desc | [k] Kill Process";

/// Process rows that fit on a terminal of `height` with `core_count`
/// per-core bars. Zero when the terminal is too small for any.
#[must_use]
pub fn table_capacity(height: u16, core_count: usize) -> usize {
    (height as usize).saturating_sub(core_count + FIXED_HEADER_ROWS + FOOTER_ROWS)
}

/// Draws one complete frame.
pub fn draw(
    frame: &mut Frame,
    model: &DisplayModel,
    view: &ViewState,
    theme: &Theme,
    prompt: Option<&Prompt>,
) {
    let area = frame.area();

    for bar in &model.bars {
        if let Some(rect) = line_rect(area, bar.row) {
            frame.render_widget(
                UsageBar::new(&bar.label, bar.usage, bar.max_value),
                rect,
            );
        }
    }

    let base = model.core_count as u16;
    draw_line(frame, area, base + 6, Line::raw(TITLE));
    draw_line(frame, area, base + 7, Line::raw(COMMANDS));
    draw_line(
        frame,
        area,
        base + 8,
        Line::raw(format!("Search Process Name: {}", view.name_filter)),
    );
    let pid_text = view
        .pid_filter
        .map_or_else(|| "None".to_string(), |pid| pid.to_string());
    draw_line(frame, area, base + 9, Line::raw(format!("Filter PID: {pid_text}")));

    draw_line(
        frame,
        area,
        base + 10,
        Line::styled(
            format!("{:<10}{:<30}{:<10}{:<10}{}", "PID", "Process Name", "CPU%", "Memory", "Disk I/O"),
            theme.emphasis(),
        ),
    );
    let dash_width = (area.width.saturating_sub(1) as usize).min(80);
    draw_line(frame, area, base + 11, Line::raw("-".repeat(dash_width)));

    let first_table_row = base + FIXED_HEADER_ROWS as u16;
    for (i, row) in model.rows.iter().enumerate() {
        // Names wider than the column are truncated, not wrapped.
        let name: String = row.name.chars().take(28).collect();
        let text = format!(
            "{:<10}{:<30}{:<10}{:<10}{}",
            row.pid,
            name,
            format!("{:.2}", row.cpu_pct),
            row.mem_human,
            row.io_human
        );
        draw_line(
            frame,
            area,
            first_table_row + i as u16,
            Line::styled(text, theme.row_style(row.severity)),
        );
    }

    if let Some(prompt) = prompt {
        let row = area.height.saturating_sub(3);
        draw_line(frame, area, row, Line::raw(prompt.display_line()));
    }

    if !view.status_message.is_empty() {
        let row = area.height.saturating_sub(2);
        draw_line(
            frame,
            area,
            row,
            Line::styled(view.status_message.clone(), theme.emphasis()),
        );
    }
}

/// The one-line rect at `row`, or `None` when it falls outside the area.
fn line_rect(area: Rect, row: u16) -> Option<Rect> {
    if row >= area.height {
        return None;
    }
    Some(Rect::new(area.x, area.y + row, area.width, 1))
}

fn draw_line(frame: &mut Frame, area: Rect, row: u16, line: Line<'_>) {
    if let Some(rect) = line_rect(area, row) {
        frame.render_widget(Paragraph::new(line), rect);
    }
}
