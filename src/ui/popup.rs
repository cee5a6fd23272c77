//! Popup overlay widget for the settings menu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::settings::{SettingsItem, SETTINGS_ITEMS};
use crate::app::state::AppState;

use super::theme::Theme;

/// Settings menu popup overlay.
pub struct SettingsPopup<'a> {
    pub state: &'a AppState,
    pub selected: usize,
}

impl Widget for SettingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (SETTINGS_ITEMS.len() as u16) + 6;
        let popup = centered_fixed(44, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Settings ")
            .title_style(Theme::accent_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let is_selected = i == self.selected;
            let (prefix, style) = if is_selected {
                (
                    " ▸ ",
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("   ", Style::default().fg(Color::White))
            };

            let (value, value_style) = match item {
                SettingsItem::Toggle { get, .. } => {
                    if get(self.state) {
                        ("[ON]".to_string(), Style::default().fg(Color::Green))
                    } else {
                        ("[OFF]".to_string(), Style::default().fg(Color::DarkGray))
                    }
                }
                SettingsItem::Cycle { value, .. } => {
                    (value(self.state), Style::default().fg(Color::Yellow))
                }
            };

            // Fixed-width columns: label left-aligned, value right-aligned.
            let label_col = format!("{prefix}{:<20}", item.label());
            let inner_width = inner.width as usize;
            let value_width = inner_width.saturating_sub(label_col.len() + 1).max(1);
            let value_col = format!("{value:>value_width$} ");

            lines.push(Line::from(vec![
                Span::styled(label_col, style),
                Span::styled(value_col, value_style),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter/Space: change  Esc: close",
            Theme::hint_style(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Create a centered rectangle with fixed dimensions, clamped to the
/// available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
