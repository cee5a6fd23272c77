//! Input handling — maps key/mouse events to state mutations.
//!
//! Nothing here touches the engine's internals directly; every effect goes
//! through the engine's input intake (scroll deltas, pointer positions) or
//! the settings table, so the per-tick ordering guarantees hold no matter
//! how bursty the input is.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::config::Action;

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Page => handle_page_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
    }
}

// ── Page view (configurable bindings) ───────────────────────────

fn handle_page_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };

    let step = state.config.tuning.wheel_step;
    let page_step = state.viewport.height * 0.9;

    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::ScrollUp => state.engine.queue_scroll_delta(-step),
        Action::ScrollDown => state.engine.queue_scroll_delta(step),
        Action::PageUp => state.engine.queue_scroll_delta(-page_step),
        Action::PageDown => state.engine.queue_scroll_delta(page_step),
        Action::Top => {
            // Glide all the way rather than jumping; feels like the rest.
            let pos = state.engine.scroll_position();
            state.engine.queue_scroll_delta(-pos);
        }
        Action::Bottom => {
            let max = state.layout.max_scroll(state.viewport);
            let pos = state.engine.scroll_position();
            state.engine.queue_scroll_delta(max - pos);
        }
        Action::ToggleSmooth => toggle_smooth(state),
    }
}

fn toggle_smooth(state: &mut AppState) {
    let enable = !state.engine.smooth_scroll_running();
    if enable {
        state.engine.start_smooth_scroll();
    } else {
        state.engine.stop_smooth_scroll();
    }
    state.config.tuning.smooth = enable;
    let _ = state.config.save();
    state.status_message = Some(if enable {
        "Smooth scrolling on".into()
    } else {
        "Smooth scrolling off (native)".into()
    });
}

// ── Settings menu ───────────────────────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
            state.active_view = ActiveView::Page;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state
                .settings_selected
                .checked_sub(1)
                .unwrap_or(SETTINGS_ITEMS.len() - 1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.settings_selected = (state.settings_selected + 1) % SETTINGS_ITEMS.len();
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            activate_settings_item(state, state.settings_selected);
        }
        _ => {}
    }
}

fn activate_settings_item(state: &mut AppState, index: usize) {
    match SETTINGS_ITEMS.get(index) {
        Some(SettingsItem::Toggle { get, set, .. }) => {
            let next = !get(state);
            set(state, next);
        }
        Some(SettingsItem::Cycle { cycle, .. }) => cycle(state),
        None => {}
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.  Wheel and movement both go through the engine's
/// coalesced intake; the tick consumes the latest values.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Page {
        return;
    }
    let step = state.config.tuning.wheel_step;
    match mouse.kind {
        MouseEventKind::ScrollUp => state.engine.queue_scroll_delta(-step),
        MouseEventKind::ScrollDown => state.engine.queue_scroll_delta(step),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            state
                .engine
                .pointer_moved(mouse.column as f64, mouse.row as f64);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use scroll_stage::motion::Viewport;
    use crate::page::PageModel;

    fn state() -> AppState {
        let config = AppConfig {
            bindings: AppConfig::default_bindings(),
            tuning: Default::default(),
        };
        AppState::new(PageModel::demo(), config, Viewport::new(80.0, 30.0))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('q')));
        assert!(s.should_quit);

        let mut s = state();
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(s.should_quit);
    }

    #[test]
    fn scroll_keys_feed_the_engine() {
        let mut s = state();
        // Native mode so the delta is visible on the very next tick.
        s.engine.stop_smooth_scroll();
        handle_key(&mut s, press(KeyCode::Down));
        s.scheduler.tick(0.016);
        assert!(s.engine.scroll_position() > 0.0);
    }

    #[test]
    fn toggle_smooth_flips_engine_mode() {
        let mut s = state();
        assert!(s.engine.smooth_scroll_running());
        handle_key(&mut s, press(KeyCode::Char('s')));
        assert!(!s.engine.smooth_scroll_running());
        handle_key(&mut s, press(KeyCode::Char('s')));
        assert!(s.engine.smooth_scroll_running());
    }

    #[test]
    fn settings_navigation_wraps() {
        let mut s = state();
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT));
        assert_eq!(s.active_view, ActiveView::SettingsMenu);

        handle_key(&mut s, press(KeyCode::Up));
        assert_eq!(s.settings_selected, SETTINGS_ITEMS.len() - 1);
        handle_key(&mut s, press(KeyCode::Down));
        assert_eq!(s.settings_selected, 0);

        handle_key(&mut s, press(KeyCode::Esc));
        assert_eq!(s.active_view, ActiveView::Page);
    }

    #[test]
    fn wheel_scrolls_and_motion_tracks_pointer() {
        let mut s = state();
        s.engine.stop_smooth_scroll();
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut s, wheel);
        s.scheduler.tick(0.016);
        assert_eq!(s.engine.scroll_position(), s.config.tuning.wheel_step);
    }
}
