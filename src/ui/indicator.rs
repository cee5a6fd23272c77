//! Scroll-mode indicator — a small badge rendered in the top-right corner
//! of the page area when smooth scrolling is off.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// A "native scroll" badge so it's obvious which mode a comparison is in.
///
/// It picks its own position (top-right of `area`) and is invisible when
/// `visible` is false.
pub struct ModeIndicator {
    /// Whether to show the indicator at all.
    pub visible: bool,
}

impl Widget for ModeIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width < 20 || area.height == 0 {
            return;
        }

        let label = " native scroll ";
        let label_width = label.len() as u16;
        let x = area.x + area.width.saturating_sub(label_width + 2);
        let y = area.y;

        let line = Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

        buf.set_line(x, y, &line, label_width);
    }
}
