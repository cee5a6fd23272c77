//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event
//! handling).  The engine and the frame scheduler are owned here too —
//! one session, one loop.

use crate::config::AppConfig;
use crate::page::{PageLayout, PageModel, SectionKind};
use scroll_stage::motion::{
    Capabilities, ElemRect, FrameScheduler, MotionEngine, OffsetPolicy, SpringParams,
    TrackConfig, TrackHandle, Viewport,
};

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Page,
    SettingsMenu,
}

/// The motion tracks registered for one section.  Unused concerns stay
/// `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionTracks {
    pub progress: Option<TrackHandle>,
    pub visibility: Option<TrackHandle>,
    pub reveal: Option<TrackHandle>,
    pub spring: Option<TrackHandle>,
}

impl SectionTracks {
    /// All registered handles, for geometry pushes and teardown.
    pub fn handles(&self) -> impl Iterator<Item = TrackHandle> {
        [self.progress, self.visibility, self.reveal, self.spring]
            .into_iter()
            .flatten()
    }
}

/// Top-level application state.
pub struct AppState {
    /// The per-session motion engine.
    pub engine: MotionEngine,
    /// The single frame loop driving the engine.
    pub scheduler: FrameScheduler,
    /// Demo page content.
    pub page: PageModel,
    /// Current document layout (recomputed on resize).
    pub layout: PageLayout,
    /// Per-section track handles, same order as `page.sections`.
    pub tracks: Vec<SectionTracks>,
    /// Current viewport, in cell units.
    pub viewport: Viewport,
    /// User configuration (tuning + bindings).
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
}

impl AppState {
    pub fn new(page: PageModel, config: AppConfig, viewport: Viewport) -> Self {
        let mut engine = MotionEngine::new(viewport, Capabilities::default());
        let mut scheduler = FrameScheduler::new();
        engine.attach(&mut scheduler);
        engine.set_ease_duration(config.tuning.ease_duration);
        if config.tuning.smooth {
            engine.start_smooth_scroll();
        }

        let layout = page.layout(viewport);
        let mut state = Self {
            engine,
            scheduler,
            page,
            layout,
            tracks: Vec::new(),
            viewport,
            config,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            settings_selected: 0,
        };
        state.register_tracks();
        state.push_geometry();
        state
    }

    /// Opt every section into its motion tracks.  Called once at startup;
    /// re-registering would reset one-shot triggers, so resize only pushes
    /// fresh geometry.
    fn register_tracks(&mut self) {
        let tuning = self.config.tuning;
        // Stronger strength than the engine default: cell grids need a
        // visible nudge.
        let spring_params = SpringParams::new(tuning.stiffness, tuning.damping, 0.2);

        for section in &self.page.sections {
            let mut tracks = SectionTracks::default();
            match section.kind {
                SectionKind::Hero => {
                    tracks.progress = Some(self.engine.track(TrackConfig::Progress {
                        policy: OffsetPolicy::from_top(),
                    }));
                    tracks.reveal = Some(self.engine.track(TrackConfig::Reveal {
                        text: section.headline.clone(),
                        margin: 0.0,
                        base_delay: 0.3,
                        per_token_delay: 0.08,
                    }));
                    tracks.spring = Some(self.engine.track(TrackConfig::Spring {
                        params: spring_params,
                    }));
                }
                SectionKind::Feature | SectionKind::Contact => {
                    tracks.progress = Some(self.engine.track(TrackConfig::Progress {
                        policy: OffsetPolicy::through_viewport(),
                    }));
                    tracks.visibility = Some(self.engine.track(TrackConfig::Visibility {
                        margin: tuning.trigger_margin,
                    }));
                    tracks.reveal = Some(self.engine.track(TrackConfig::Reveal {
                        text: section.headline.clone(),
                        // Fire only once the headline is a couple of rows
                        // inside the viewport.
                        margin: -2.0,
                        base_delay: 0.3,
                        per_token_delay: 0.08,
                    }));
                }
            }
            self.tracks.push(tracks);
        }
    }

    /// Send every section's current rect to the engine.
    fn push_geometry(&mut self) {
        for (tracks, rect) in self.tracks.iter().zip(self.layout.rects.iter()) {
            for handle in tracks.handles() {
                self.engine.update_geometry(handle, *rect);
            }
        }
        self.engine
            .set_scroll_bounds(self.layout.max_scroll(self.viewport));
    }

    /// Viewport changed: relayout and re-push geometry.  Track identities
    /// are preserved so fired triggers stay fired.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Viewport::new(width as f64, height as f64);
        self.engine.set_viewport(self.viewport);
        self.layout = self.page.layout(self.viewport);
        self.push_geometry();
    }

    /// Section rect shifted into screen space at the current scroll.
    pub fn section_screen_rect(&self, index: usize) -> Option<ElemRect> {
        let rect = self.layout.rects.get(index)?;
        let scroll = self.engine.scroll_position();
        Some(ElemRect::new(rect.top - scroll, rect.left, rect.width, rect.height))
    }

    /// Tear the session down; every subscription and track dies here.
    pub fn shutdown(&mut self) {
        for tracks in std::mem::take(&mut self.tracks) {
            for handle in tracks.handles() {
                self.engine.untrack(handle);
            }
        }
        let mut scheduler = std::mem::take(&mut self.scheduler);
        self.engine.shutdown(&mut scheduler);
        self.scheduler = scheduler;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let config = AppConfig {
            bindings: AppConfig::default_bindings(),
            tuning: Default::default(),
        };
        AppState::new(PageModel::demo(), config, Viewport::new(80.0, 30.0))
    }

    #[test]
    fn every_section_gets_tracks_and_geometry() {
        let mut s = state();
        assert_eq!(s.tracks.len(), s.page.sections.len());

        s.scheduler.tick(0.0);
        for tracks in &s.tracks {
            for handle in tracks.handles() {
                assert!(s.engine.snapshot(handle).is_some());
            }
        }
    }

    #[test]
    fn resize_preserves_fired_triggers() {
        let mut s = state();
        s.scheduler.tick(0.0);
        // Hero reveal fires at scroll 0.
        let hero_reveal = s.tracks[0].reveal.unwrap();
        assert_eq!(s.engine.snapshot(hero_reveal).unwrap().triggered, Some(true));

        s.resize(120, 40);
        s.scheduler.tick(0.016);
        assert_eq!(s.engine.snapshot(hero_reveal).unwrap().triggered, Some(true));
    }

    #[test]
    fn shutdown_unsubscribes_and_untracks() {
        let mut s = state();
        s.scheduler.tick(0.0);
        let hero_progress = s.tracks[0].progress.unwrap();
        s.shutdown();
        assert_eq!(s.scheduler.subscriber_count(), 0);
        assert!(s.engine.snapshot(hero_progress).is_none());
        assert!(s.tracks.is_empty());
    }
}
