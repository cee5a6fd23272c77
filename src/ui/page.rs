//! The scrollable demo page widget.
//!
//! Pure consumer of engine snapshots: scroll offset, reveal token states,
//! progress values, and spring offsets are read here and quantized onto
//! the cell grid.  The engine never knows how any of this is painted.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use crate::app::state::AppState;
use crate::page::{Section, SectionKind};
use scroll_stage::motion::reveal::TokenRenderState;
use scroll_stage::motion::{CurveSpec, ElementSnapshot, TrackHandle};

use super::theme::Theme;

/// Renders the page at the engine's current scroll offset.
pub struct PageWidget<'a> {
    state: &'a AppState,
}

impl<'a> PageWidget<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn snapshot(&self, handle: Option<TrackHandle>) -> ElementSnapshot {
        handle
            .and_then(|h| self.state.engine.snapshot(h))
            .unwrap_or_default()
    }
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        for (index, section) in self.state.page.sections.iter().enumerate() {
            let Some(screen) = self.state.section_screen_rect(index) else {
                continue;
            };
            let screen_top = screen.top;
            // Generous cull: anything fully outside the area is skipped.
            if screen.bottom() < 0.0 || screen_top > area.height as f64 {
                continue;
            }

            let tracks = self.state.tracks[index];
            match section.kind {
                SectionKind::Hero => render_hero(
                    self.state,
                    section,
                    screen_top,
                    self.snapshot(tracks.progress),
                    self.snapshot(tracks.reveal),
                    self.snapshot(tracks.spring),
                    area,
                    buf,
                ),
                SectionKind::Feature | SectionKind::Contact => render_section(
                    section,
                    screen_top,
                    self.snapshot(tracks.progress),
                    self.snapshot(tracks.reveal),
                    self.snapshot(tracks.visibility),
                    area,
                    buf,
                ),
            }
        }
    }
}

// ── hero ────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn render_hero(
    state: &AppState,
    section: &Section,
    screen_top: f64,
    progress: ElementSnapshot,
    reveal: ElementSnapshot,
    spring: ElementSnapshot,
    area: Rect,
    buf: &mut Buffer,
) {
    let p = progress.progress.unwrap_or(0.0);
    // Hero mappings: scale [0,1] -> [1,1.15], fade [0,0.8] -> [1,0].
    let fade_curve = CurveSpec::span(0.0, 1.0, 0.8, 0.0);
    let opacity = fade_curve.evaluate(p);
    let scale_curve = CurveSpec::span(0.0, 1.0, 1.0, 1.15);
    let scale = scale_curve.evaluate(p);
    // Scale renders as a horizontal inset: the headline creeps outward as
    // the hero "grows" while scrolling away.
    let inset = ((scale - 1.0) * 20.0).round() as i32;

    let headline_row = screen_top + (state.viewport.height * 0.35).floor();
    if let Some(tokens) = &reveal.tokens {
        render_tokens(
            section.headline.split_whitespace(),
            tokens,
            6 - inset.min(5),
            headline_row,
            true,
            area,
            buf,
        );
    }

    // Body copy under the headline, dimmed by scroll fade.
    let body_color = Theme::fade(opacity * 0.7);
    for (i, line) in section.body.iter().enumerate() {
        put_line(
            buf,
            area,
            6.0,
            headline_row + 3.0 + i as f64,
            line,
            Style::default().fg(body_color),
        );
    }

    // The pointer-chasing card, offset by the spring.
    let (ox, oy) = spring.offset.unwrap_or((0.0, 0.0));
    let card_x = area.width as f64 * 0.68 + ox;
    let card_y = screen_top + state.viewport.height * 0.30 + oy;
    render_card(card_x, card_y, opacity, area, buf);

    // Scroll hint near the bottom, fading with the rest.
    if opacity > 0.2 {
        put_line(
            buf,
            area,
            6.0,
            screen_top + state.viewport.height - 2.0,
            "scroll to explore",
            Style::default().fg(Theme::fade(opacity * 0.45)),
        );
    }
}

fn render_card(x: f64, y: f64, opacity: f64, area: Rect, buf: &mut Buffer) {
    let style = Style::default().fg(Theme::fade_accent(opacity));
    let lines = ["╭──────────────╮", "│ scroll-stage │", "╰──────────────╯"];
    for (i, line) in lines.iter().enumerate() {
        put_line(buf, area, x, y + i as f64, line, style);
    }
}

// ── feature / contact ───────────────────────────────────────────

fn render_section(
    section: &Section,
    screen_top: f64,
    progress: ElementSnapshot,
    reveal: ElementSnapshot,
    visibility: ElementSnapshot,
    area: Rect,
    buf: &mut Buffer,
) {
    let p = progress.progress.unwrap_or(0.0);
    // Brightest while the section travels the middle of the viewport.
    let dim_curve = CurveSpec::new(vec![(0.0, 0.35), (0.5, 1.0), (1.0, 0.35)])
        .expect("static breakpoints are sorted");
    let brightness = dim_curve.evaluate(p);
    // A one-row parallax drift across the travel.
    let drift = ((p - 0.5) * -2.0).round();

    let pad = 6.0;
    let top = screen_top + pad + drift;

    if let Some(tokens) = &reveal.tokens {
        render_tokens(
            section.headline.split_whitespace(),
            tokens,
            4,
            top,
            false,
            area,
            buf,
        );
    }

    // Body slides up two rows as the entrance fires; before that it waits
    // dimmed below its resting place.
    let entered = visibility.triggered.unwrap_or(true);
    let (body_offset, body_scale) = if entered { (0.0, 1.0) } else { (2.0, 0.4) };
    let body_color = Theme::fade(brightness * 0.8 * body_scale);
    for (i, line) in section.body.iter().enumerate() {
        put_line(
            buf,
            area,
            4.0,
            top + 2.0 + body_offset + i as f64,
            line,
            Style::default().fg(body_color),
        );
    }
}

// ── shared helpers ──────────────────────────────────────────────

/// Paint the reveal tokens of a headline, one word at a time.  A token's
/// `rise` drops it one row below the baseline until its entrance is more
/// than halfway done; its opacity drives the colour ramp.
fn render_tokens<'t>(
    words: impl Iterator<Item = &'t str>,
    tokens: &[TokenRenderState],
    x: i32,
    row: f64,
    accent: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let mut cursor = x as f64;
    for (word, token) in words.zip(tokens.iter()) {
        if token.opacity > 0.05 {
            let color = if accent {
                Theme::fade_accent(token.opacity)
            } else {
                Theme::fade(token.opacity)
            };
            let word_row = if token.rise > 0.5 { row + 1.0 } else { row };
            put_line(buf, area, cursor, word_row, word, Style::default().fg(color));
        }
        cursor += word.chars().count() as f64 + 1.0;
    }
}

/// Clip a single line of text into `area` at fractional coordinates.
fn put_line(buf: &mut Buffer, area: Rect, x: f64, y: f64, text: &str, style: Style) {
    let row = y.round() as i64;
    if row < 0 || row >= area.height as i64 {
        return;
    }
    let col = x.round() as i64;
    if col >= area.width as i64 {
        return;
    }
    // Left-clip if the x coordinate is negative.
    let (text, col) = if col < 0 {
        let skip = (-col) as usize;
        let clipped: String = text.chars().skip(skip).collect();
        (clipped, 0i64)
    } else {
        (text.to_owned(), col)
    };
    if text.is_empty() {
        return;
    }
    let max_width = (area.width as i64 - col).max(0) as usize;
    let clipped: String = text.chars().take(max_width).collect();
    buf.set_string(
        area.x + col as u16,
        area.y + row as u16,
        clipped,
        style,
    );
}
