// SPDX-License-Identifier: MIT OR Apache-2.0
//! Modal stroke controller.
//!
//! The controller receives every input event while the brush is active and
//! runs a small state machine:
//!
//! - `Idle` → `Painting` on left press: snapshot the curves for undo and
//!   for shape preservation.
//! - `Painting` on pointer move: apply the brush, at most once per
//!   [`SAMPLE_INTERVAL`].
//! - `Painting` → `Idle` on left release: record the painted state.
//! - Escape, or the brush being disabled, ends any stroke and tears the
//!   brush down.
//!
//! Navigation input and input over host UI regions always pass through.

use crate::cache::StrokeCache;
use crate::clock::{Clock, SystemClock};
use crate::error::{BrushError, Result};
use crate::history::{HistoryError, UndoHistory};
use crate::input::{ui_region_at, EventKind, HistoryCommand, InputEvent, Key, MouseButton, UiRegion};
use crate::noise::{NoiseSource, RandomNoise};
use crate::overlay::{OverlayGuard, OverlayRegistry};
use crate::selector::{apply_brush, PassContext, PassReport};
use crate::settings::BrushSettings;
use crate::snapshot::{RestoreReport, StrokeSnapshot};
use crate::store::CurveStore;
use crate::view::ViewTransform;
use std::time::Duration;

/// Minimum time between two applied brush samples (about 31 Hz)
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(32);

/// Pointer cursor requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    /// The host's normal pointer
    Default,
    /// No pointer; the brush overlay replaces it
    Hidden,
}

/// Host actions the controller can trigger
pub trait HostCommands {
    /// Redraw the editor area
    fn request_redraw(&mut self);

    /// Change the pointer cursor
    fn set_cursor(&mut self, cursor: CursorStyle);

    /// Frame the view on the selected keyframes
    fn frame_selected(&mut self);
}

/// Host state borrowed for the duration of one event
pub struct HostContext<'a> {
    /// Curve storage
    pub store: &'a mut dyn CurveStore,
    /// Curve-to-region mapping of the editor view
    pub view: &'a dyn ViewTransform,
    /// Host UI regions that take pointer input away from the brush
    pub regions: &'a [UiRegion],
    /// Host actions
    pub commands: &'a mut dyn HostCommands,
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokePhase {
    /// Brush hovering, not painting
    #[default]
    Idle,
    /// Left button held, brush applying
    Painting,
}

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The brush handled the event
    Consumed,
    /// The host should handle the event
    PassThrough,
    /// The brush shut down; stop forwarding events
    Cancelled,
}

/// Brush state published for cursor drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    /// Center in region pixels
    pub position: [f32; 2],
    /// Radius in region pixels
    pub radius: f32,
    /// Strength at the center
    pub strength: f32,
    /// Whether the brush is running
    pub enabled: bool,
    /// Whether a stroke is in progress
    pub painting: bool,
}

/// The stroke in progress
#[derive(Debug)]
pub struct Stroke {
    /// Curve state when the stroke began
    pub start_snapshot: StrokeSnapshot,
    /// Brush samples applied so far
    pub samples_applied: usize,
}

/// Drives strokes from host input events
pub struct StrokeController {
    settings: BrushSettings,
    phase: StrokePhase,
    stroke: Option<Stroke>,
    position: [f32; 2],
    last_sample: Duration,
    history: UndoHistory,
    cache: StrokeCache,
    overlay: Option<OverlayGuard>,
    clock: Box<dyn Clock>,
    noise: Box<dyn NoiseSource>,
    last_report: PassReport,
}

impl StrokeController {
    /// Create an inactive controller using the wall clock and random noise
    pub fn new(settings: BrushSettings) -> Self {
        Self {
            settings,
            phase: StrokePhase::Idle,
            stroke: None,
            position: [0.0, 0.0],
            last_sample: Duration::ZERO,
            history: UndoHistory::new(),
            cache: StrokeCache::new(),
            overlay: None,
            clock: Box::new(SystemClock::new()),
            noise: Box::new(RandomNoise::thread_local()),
            last_report: PassReport::default(),
        }
    }

    /// Use a different time source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Use a different noise source
    pub fn with_noise(mut self, noise: impl NoiseSource + 'static) -> Self {
        self.noise = Box::new(noise);
        self
    }

    /// Current settings
    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    /// Mutable settings, for the host's property panel
    pub fn settings_mut(&mut self) -> &mut BrushSettings {
        &mut self.settings
    }

    /// Current state machine phase
    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    /// The stroke in progress
    pub fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    /// Whether the brush is activated and enabled
    pub fn is_active(&self) -> bool {
        self.overlay.is_some() && self.settings.enabled
    }

    /// Whether a stroke is in progress
    pub fn is_painting(&self) -> bool {
        self.phase == StrokePhase::Painting
    }

    /// Brush-local undo history
    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Per-stroke cache
    pub fn cache(&self) -> &StrokeCache {
        &self.cache
    }

    /// Counters of the most recent applied sample
    pub fn last_report(&self) -> PassReport {
        self.last_report
    }

    /// Brush state for cursor drawing
    pub fn brush_state(&self) -> BrushState {
        BrushState {
            position: self.position,
            radius: self.settings.radius,
            strength: self.settings.strength,
            enabled: self.is_active(),
            painting: self.is_painting(),
        }
    }

    /// Start the brush: register overlays and enable it
    pub fn activate(&mut self, registry: &OverlayRegistry, position: [f32; 2]) -> Result<()> {
        if self.overlay.is_some() {
            return Err(BrushError::AlreadyActive);
        }
        self.settings.validate()?;

        self.cache.clear();
        self.position = position;
        self.phase = StrokePhase::Idle;
        self.overlay = Some(OverlayGuard::acquire(
            registry,
            position,
            self.settings.radius,
            self.settings.strength,
        ));
        self.settings.enabled = true;

        tracing::info!("Curve brush activated in {} mode", self.settings.mode.name());
        Ok(())
    }

    /// Stop the brush, ending any stroke in progress
    pub fn deactivate(&mut self, store: &mut dyn CurveStore) {
        if self.is_painting() {
            self.end_stroke(store);
        }
        self.teardown();
    }

    /// Handle one host input event
    pub fn handle_event(&mut self, event: &InputEvent, host: &mut HostContext<'_>) -> EventOutcome {
        if self.overlay.is_none() {
            return EventOutcome::PassThrough;
        }
        self.position = event.region_position;

        if event.modifiers.alt || event.is_navigation() {
            host.commands.set_cursor(CursorStyle::Default);
            return EventOutcome::PassThrough;
        }

        if event.kind == EventKind::KeyPress(Key::Escape) || !self.settings.enabled {
            self.deactivate(host.store);
            host.commands.set_cursor(CursorStyle::Default);
            host.commands.request_redraw();
            return EventOutcome::Cancelled;
        }

        if let Some(command) = event.history_command() {
            self.run_history_command(command, host.store);
            host.commands.request_redraw();
            return EventOutcome::Consumed;
        }

        if ui_region_at(host.regions, event.window_position).is_some() {
            if self.is_painting() && event.kind == EventKind::Release(MouseButton::Left) {
                self.end_stroke(host.store);
            }
            host.commands.set_cursor(CursorStyle::Default);
            return EventOutcome::PassThrough;
        }

        host.commands.set_cursor(CursorStyle::Hidden);

        match event.kind {
            EventKind::PointerMove => {
                self.publish_overlay();
                host.commands.request_redraw();

                if self.is_painting() {
                    let now = self.clock.now();
                    if now.saturating_sub(self.last_sample) >= SAMPLE_INTERVAL {
                        self.sample(host);
                        self.last_sample = now;
                    }
                }
            }
            EventKind::Press(MouseButton::Left) => {
                if !self.is_painting() {
                    self.begin_stroke(host.store);
                }
                self.last_sample = self.clock.now();
            }
            EventKind::Release(MouseButton::Left) => {
                if self.is_painting() {
                    self.end_stroke(host.store);
                }
            }
            _ => {}
        }

        EventOutcome::Consumed
    }

    /// Step back one history entry
    pub fn undo(&mut self, store: &mut dyn CurveStore) -> std::result::Result<RestoreReport, HistoryError> {
        self.history.undo(store)
    }

    /// Re-apply the most recently undone entry
    pub fn redo(&mut self, store: &mut dyn CurveStore) -> std::result::Result<RestoreReport, HistoryError> {
        self.history.redo(store)
    }

    fn run_history_command(&mut self, command: HistoryCommand, store: &mut dyn CurveStore) {
        let result = match command {
            HistoryCommand::Undo => self.undo(store),
            HistoryCommand::Redo => self.redo(store),
        };
        match result {
            Ok(report) => tracing::debug!(
                "{:?}: restored {} curves, skipped {}",
                command,
                report.restored_curves,
                report.skipped_curves
            ),
            Err(err) => tracing::debug!("{:?} ignored: {err}", command),
        }
    }

    fn begin_stroke(&mut self, store: &mut dyn CurveStore) {
        self.cache.clear();
        let snapshot = StrokeSnapshot::capture(&*store);
        if self.history.top() != Some(&snapshot) {
            self.history.push(snapshot.clone());
        }
        self.stroke = Some(Stroke {
            start_snapshot: snapshot,
            samples_applied: 0,
        });
        self.phase = StrokePhase::Painting;
        self.publish_overlay();

        tracing::debug!("Stroke began at {:?}", self.position);
    }

    fn end_stroke(&mut self, store: &mut dyn CurveStore) {
        let Some(stroke) = self.stroke.take() else {
            self.phase = StrokePhase::Idle;
            return;
        };
        let snapshot = StrokeSnapshot::capture(&*store);
        if self.history.top() != Some(&snapshot) {
            self.history.push(snapshot);
        }
        self.cache.clear();
        self.phase = StrokePhase::Idle;
        self.publish_overlay();

        tracing::debug!(
            "Stroke ended after {} samples, history depth {}",
            stroke.samples_applied,
            self.history.len()
        );
    }

    fn sample(&mut self, host: &mut HostContext<'_>) {
        let mut report = PassReport::default();
        let mut ctx = PassContext {
            store: &mut *host.store,
            view: host.view,
            noise: &mut *self.noise,
            stroke_start: self.stroke.as_ref().map(|s| &s.start_snapshot),
            cache: &mut self.cache,
        };
        for _ in 0..self.settings.iterations.max(1) {
            report.merge(apply_brush(self.position, &self.settings, &mut ctx));
        }

        self.cache.record_sample(self.position);
        if let Some(stroke) = self.stroke.as_mut() {
            stroke.samples_applied += 1;
        }
        if self.settings.auto_frame {
            host.commands.frame_selected();
        }
        self.last_report = report;

        tracing::debug!(
            "Brush sample: {} keyframes on {} curves ({} culled)",
            report.keyframes_transformed,
            report.curves_committed,
            report.curves_culled
        );
    }

    fn publish_overlay(&self) {
        if let Some(overlay) = &self.overlay {
            overlay.update(
                self.position,
                self.settings.radius,
                self.settings.strength,
                self.is_painting(),
            );
        }
    }

    /// Release overlays, drop caches and history, and disable the brush.
    ///
    /// Safe to call when nothing is held.
    pub fn teardown(&mut self) {
        let was_active = self.overlay.is_some();
        if let Some(mut overlay) = self.overlay.take() {
            overlay.release();
        }
        self.stroke = None;
        self.phase = StrokePhase::Idle;
        self.cache.clear();
        self.history.clear();
        self.settings.enabled = false;

        if was_active {
            tracing::info!("Curve brush deactivated");
        }
    }
}

impl Drop for StrokeController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for StrokeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeController")
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .field("position", &self.position)
            .field("history", &self.history.stats())
            .finish_non_exhaustive()
    }
}
