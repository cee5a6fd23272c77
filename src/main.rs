//! A scroll-synchronized motion demo for the terminal.
//!
//! Run the binary to open the scrollable page.  Mouse wheel and arrow keys
//! scroll; `s` toggles smooth scrolling; `?` opens settings; `q` quits.

mod app;
mod config;
mod page;
mod ui;

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Terminal};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::config::AppConfig;
use crate::page::PageModel;
use crate::ui::{
    indicator::ModeIndicator, layout::AppLayout, page::PageWidget, popup::SettingsPopup,
    theme::Theme,
};
use scroll_stage::motion::Viewport;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-synchronized motion demo")]
struct Cli {
    /// Start with native (non-smooth) scrolling.
    #[arg(long)]
    no_smooth: bool,

    /// Override the smooth-scroll ease duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Frame rate for the animation loop.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

// ───────────────────────────────────────── main ──────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute the UI stream
        .init();

    let cli = Cli::parse();

    // ── configuration ─────────────────────────────────────────
    let mut user_config = AppConfig::load();
    if cli.no_smooth {
        user_config.tuning.smooth = false;
    }
    if let Some(duration) = cli.duration {
        user_config.tuning.ease_duration = duration.clamp(0.1, 5.0);
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let viewport = Viewport::new(size.width as f64, size.height.saturating_sub(1) as f64);
    let mut state = AppState::new(PageModel::demo(), user_config, viewport);

    // ── event loop ────────────────────────────────────────────
    let frame_interval = Duration::from_micros(1_000_000 / cli.fps.clamp(10, 240) as u64);
    let mut events = spawn_event_reader(frame_interval);
    let session_start = Instant::now();
    let mut last_frame = session_start;

    loop {
        let Some(event) = events.recv().await else {
            break; // reader task gone
        };

        match event {
            AppEvent::Key(k) => handler::handle_key(&mut state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
            AppEvent::Resize(w, h) => state.resize(w, h.saturating_sub(1)),
            AppEvent::Tick => {}
        }

        if state.should_quit {
            break;
        }

        // One engine tick and one draw per display frame, no matter how
        // bursty the input stream gets.
        if last_frame.elapsed() < frame_interval {
            continue;
        }
        last_frame = Instant::now();
        state
            .scheduler
            .tick(session_start.elapsed().as_secs_f64());

        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            frame.render_widget(PageWidget::new(&state), layout.page_area);
            frame.render_widget(
                ModeIndicator {
                    visible: !state.engine.smooth_scroll_running(),
                },
                layout.page_area,
            );

            let hint = state.config.status_bar_hint();
            let status_text = match state.active_view {
                ActiveView::Page => state.status_message.as_deref().unwrap_or(&hint),
                ActiveView::SettingsMenu => "",
            };
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);

            if state.active_view == ActiveView::SettingsMenu {
                frame.render_widget(
                    SettingsPopup {
                        state: &state,
                        selected: state.settings_selected,
                    },
                    frame.area(),
                );
            }
        })?;
    }

    // ── teardown ──────────────────────────────────────────────
    state.shutdown();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
