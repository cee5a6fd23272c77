//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── chrome ─────────────────────────────────────────────────
    pub fn accent_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── fades ──────────────────────────────────────────────────

    /// Grey ramp for an opacity in `[0, 1]` — the terminal stand-in for
    /// alpha blending against the black page background.
    pub fn fade(opacity: f64) -> Color {
        let level = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
        Color::Rgb(level, level, level)
    }

    /// Like [`Self::fade`] but toward the accent colour, for headlines.
    pub fn fade_accent(opacity: f64) -> Color {
        let o = opacity.clamp(0.0, 1.0);
        Color::Rgb((o * 180.0) as u8, (o * 220.0) as u8, (o * 255.0) as u8)
    }
}
