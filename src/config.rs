//! User configuration — motion tuning and keybindings, with persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/scroll-stage/config.toml` (default
//! `~/.config/scroll-stage/config.toml`).  Tuning values are clamped on
//! load so a hand-edited file can't put the engine in a silly state.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    ToggleSmooth,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used when serialising).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::Top,
        Action::Bottom,
        Action::ToggleSmooth,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::ToggleSmooth => "toggle_smooth",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "scroll_up" => Some(Action::ScrollUp),
            "scroll_down" => Some(Action::ScrollDown),
            "page_up" => Some(Action::PageUp),
            "page_down" => Some(Action::PageDown),
            "top" => Some(Action::Top),
            "bottom" => Some(Action::Bottom),
            "toggle_smooth" => Some(Action::ToggleSmooth),
            "open_settings" => Some(Action::OpenSettings),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => format!("{other:?}"),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Alt+Up"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            // Single characters keep their case so `Shift+G` survives a
            // round trip through the file.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── motion tuning ─────

/// Engine tuning values, persisted alongside the bindings.  All bounds are
/// sanity rails for hand-edited files, not correctness limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTuning {
    /// Smooth-scroll glide duration in seconds.
    pub ease_duration: f64,
    /// Rows added per wheel notch.
    pub wheel_step: f64,
    /// Spring stiffness / damping for pointer offsets.
    pub stiffness: f64,
    pub damping: f64,
    /// Default pre-trigger margin for visibility, in rows.
    pub trigger_margin: f64,
    /// Whether the emulator starts enabled.
    pub smooth: bool,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            ease_duration: 1.2,
            wheel_step: 3.0,
            stiffness: 150.0,
            damping: 15.0,
            trigger_margin: 8.0,
            smooth: true,
        }
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — keybindings and motion tuning.
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub tuning: MotionTuning,
}

impl AppConfig {
    /// Hard-coded default keybindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use KeyCode::Char;
        let n = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let mut m = HashMap::new();

        m.insert(
            Action::ScrollUp,
            vec![KeyBind::new(KeyCode::Up, n), KeyBind::new(Char('k'), n)],
        );
        m.insert(
            Action::ScrollDown,
            vec![KeyBind::new(KeyCode::Down, n), KeyBind::new(Char('j'), n)],
        );
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]);
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)],
        );
        // Shifted characters arrive with or without the SHIFT flag
        // depending on the terminal, so bind both.
        m.insert(
            Action::Top,
            vec![KeyBind::new(KeyCode::Home, n), KeyBind::new(Char('g'), n)],
        );
        m.insert(
            Action::Bottom,
            vec![
                KeyBind::new(KeyCode::End, n),
                KeyBind::new(Char('G'), n),
                KeyBind::new(Char('G'), shift),
            ],
        );
        m.insert(Action::ToggleSmooth, vec![KeyBind::new(Char('s'), n)]);
        m.insert(
            Action::OpenSettings,
            vec![KeyBind::new(Char('?'), n), KeyBind::new(Char('?'), shift)],
        );
        m.insert(Action::Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: smooth on/off | {}: settings | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::ToggleSmooth),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                return Self::parse_config(&contents);
            }
        }
        Self {
            bindings: Self::default_bindings(),
            tuning: MotionTuning::default(),
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut bindings = Self::default_bindings();
        let mut tuning = MotionTuning::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Motion tuning.
            match key {
                "ease_duration" => {
                    if let Ok(v) = value.parse::<f64>() {
                        tuning.ease_duration = v.clamp(0.1, 5.0);
                    }
                    continue;
                }
                "wheel_step" => {
                    if let Ok(v) = value.parse::<f64>() {
                        tuning.wheel_step = v.clamp(1.0, 20.0);
                    }
                    continue;
                }
                "stiffness" => {
                    if let Ok(v) = value.parse::<f64>() {
                        tuning.stiffness = v.clamp(10.0, 1000.0);
                    }
                    continue;
                }
                "damping" => {
                    if let Ok(v) = value.parse::<f64>() {
                        tuning.damping = v.clamp(1.0, 100.0);
                    }
                    continue;
                }
                "trigger_margin" => {
                    if let Ok(v) = value.parse::<f64>() {
                        tuning.trigger_margin = v.clamp(-50.0, 50.0);
                    }
                    continue;
                }
                "smooth" => {
                    tuning.smooth = value == "true";
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                bindings.insert(action, parsed);
            }
        }

        Self { bindings, tuning }
    }

    fn serialise(&self) -> String {
        let t = self.tuning;
        let mut lines = vec![
            "# scroll-stage configuration".to_string(),
            String::new(),
            "# Motion tuning".to_string(),
            format!("ease_duration = {}", t.ease_duration),
            format!("wheel_step = {}", t.wheel_step),
            format!("stiffness = {}", t.stiffness),
            format!("damping = {}", t.damping),
            format!("trigger_margin = {}", t.trigger_margin),
            format!("smooth = {}", t.smooth),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Home, End, PageUp, PageDown, Space".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/scroll-stage/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("scroll-stage").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuning_values_clamp_on_parse() {
        let cfg = AppConfig::parse_config(
            "ease_duration = 99\nwheel_step = 0\nstiffness = -4\nsmooth = false\n",
        );
        assert_eq!(cfg.tuning.ease_duration, 5.0);
        assert_eq!(cfg.tuning.wheel_step, 1.0);
        assert_eq!(cfg.tuning.stiffness, 10.0);
        assert!(!cfg.tuning.smooth);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = AppConfig::parse_config("no_such_key = whatever\n");
        assert_eq!(cfg.tuning, MotionTuning::default());
    }

    #[test]
    fn bindings_round_trip_through_serialise() {
        let cfg = AppConfig {
            bindings: AppConfig::default_bindings(),
            tuning: MotionTuning::default(),
        };
        let reparsed = AppConfig::parse_config(&cfg.serialise());
        for &action in Action::ALL {
            assert_eq!(
                cfg.bindings.get(&action),
                reparsed.bindings.get(&action),
                "bindings differ for {action:?}"
            );
        }
        assert_eq!(reparsed.tuning, cfg.tuning);
    }
}
