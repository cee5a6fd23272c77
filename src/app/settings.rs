//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the
//! handler and UI renderers consume the same source of truth without
//! cross-importing.

use super::state::AppState;
use scroll_stage::motion::SpringParams;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Boolean toggle — reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Toggle { label, .. } | Self::Cycle { label, .. } => label,
        }
    }
}

/// Re-apply spring tuning to every registered spring track.
fn apply_spring_tuning(state: &mut AppState) {
    let params = SpringParams::new(
        state.config.tuning.stiffness,
        state.config.tuning.damping,
        0.2,
    );
    let handles: Vec<_> = state.tracks.iter().filter_map(|t| t.spring).collect();
    for handle in handles {
        state.engine.set_spring_params(handle, params);
    }
}

fn cycle_value(values: &[f64], current: f64) -> f64 {
    let idx = values
        .iter()
        .position(|v| (*v - current).abs() < 1e-9)
        .unwrap_or(values.len() - 1);
    values[(idx + 1) % values.len()]
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Toggle {
        label: "Smooth Scrolling",
        get: |s| s.config.tuning.smooth,
        set: |s, v| {
            s.config.tuning.smooth = v;
            if v {
                s.engine.start_smooth_scroll();
            } else {
                s.engine.stop_smooth_scroll();
            }
            let _ = s.config.save();
        },
    },
    SettingsItem::Cycle {
        label: "Ease Duration",
        value: |s| format!("{:.1}s", s.config.tuning.ease_duration),
        cycle: |s| {
            const DURATIONS: &[f64] = &[0.6, 0.9, 1.2, 1.6, 2.0];
            let next = cycle_value(DURATIONS, s.config.tuning.ease_duration);
            s.config.tuning.ease_duration = next;
            s.engine.set_ease_duration(next);
            let _ = s.config.save();
            s.status_message = Some(format!("Ease duration: {next:.1}s"));
        },
    },
    SettingsItem::Cycle {
        label: "Spring Stiffness",
        value: |s| format!("{:.0}", s.config.tuning.stiffness),
        cycle: |s| {
            const STIFFNESS: &[f64] = &[80.0, 120.0, 150.0, 220.0, 320.0];
            s.config.tuning.stiffness = cycle_value(STIFFNESS, s.config.tuning.stiffness);
            apply_spring_tuning(s);
            let _ = s.config.save();
        },
    },
    SettingsItem::Cycle {
        label: "Spring Damping",
        value: |s| format!("{:.0}", s.config.tuning.damping),
        cycle: |s| {
            const DAMPING: &[f64] = &[8.0, 12.0, 15.0, 22.0, 30.0];
            s.config.tuning.damping = cycle_value(DAMPING, s.config.tuning.damping);
            apply_spring_tuning(s);
            let _ = s.config.save();
        },
    },
    SettingsItem::Cycle {
        label: "Wheel Step",
        value: |s| format!("{:.0} rows", s.config.tuning.wheel_step),
        cycle: |s| {
            const STEPS: &[f64] = &[1.0, 3.0, 5.0, 8.0];
            s.config.tuning.wheel_step = cycle_value(STEPS, s.config.tuning.wheel_step);
            let _ = s.config.save();
        },
    },
];
