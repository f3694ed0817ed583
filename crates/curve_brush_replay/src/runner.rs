// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drives a stroke controller through a replay script.

use crate::error::{ReplayError, Result};
use crate::script::ReplayScript;
use curve_brush_core::{
    Curve, CursorStyle, EventOutcome, HostCommands, HostContext, ManualClock, OverlayRegistry,
    RandomNoise, StrokeController,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Headless host: counts what the engine asks for
#[derive(Debug, Default)]
pub struct ReplayHost {
    /// Redraw requests
    pub redraws: usize,
    /// Frame-selected requests
    pub frames: usize,
    /// Last requested cursor
    pub cursor: Option<CursorStyle>,
}

impl HostCommands for ReplayHost {
    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = Some(cursor);
    }

    fn frame_selected(&mut self) {
        self.frames += 1;
    }
}

/// What happened during a replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Events in the script
    pub events_total: usize,
    /// Events handed to the controller
    pub events_delivered: usize,
    /// Events the brush consumed
    pub consumed: usize,
    /// Events left to the host
    pub passed_through: usize,
    /// Timestamp of the event that shut the brush down
    pub cancelled_at_ms: Option<u64>,
    /// Strokes started
    pub strokes: usize,
    /// Brush samples applied
    pub samples: usize,
    /// Undo entries held when the replay finished
    pub history_depth: usize,
    /// Redraw requests
    pub redraws: usize,
    /// Frame-selected requests
    pub frames: usize,
}

/// Replay result written by the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayOutput {
    /// Run counters
    pub summary: ReplaySummary,
    /// Curves after the replay
    pub curves: Vec<Curve>,
}

impl ReplayOutput {
    /// Pretty RON
    pub fn to_ron_string(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write to `path` (JSON for `.json`, RON otherwise), or stdout as RON
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        let Some(path) = path else {
            println!("{}", self.to_ron_string()?);
            return Ok(());
        };

        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => self.to_json_string()?,
            _ => self.to_ron_string()?,
        };
        std::fs::write(path, content).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Wrote replay result to {:?}", path);
        Ok(())
    }
}

/// Run a script to completion.
///
/// The brush is activated before the first event and deactivated after the
/// last one, ending any stroke still in progress. Events after a cancel are
/// not delivered.
pub fn run(script: &ReplayScript) -> Result<ReplayOutput> {
    let mut store = script.build_curves();
    let clock = ManualClock::new();
    let registry = OverlayRegistry::new();
    let mut host = ReplayHost::default();

    let mut controller = StrokeController::new(script.settings.clone()).with_clock(clock.clone());
    if let Some(seed) = script.seed {
        controller = controller.with_noise(RandomNoise::seeded(seed));
    }

    let mut position = script
        .events
        .first()
        .map(|e| e.action.to_event([0.0, 0.0]).region_position)
        .unwrap_or_default();
    controller.activate(&registry, position)?;
    tracing::info!(
        "Replaying {} events over {} curves",
        script.events.len(),
        script.curves.len()
    );

    let mut summary = ReplaySummary {
        events_total: script.events.len(),
        ..ReplaySummary::default()
    };

    for timed in &script.events {
        clock.set(Duration::from_millis(timed.at_ms));
        let event = timed.action.to_event(position);
        position = event.region_position;

        let was_painting = controller.is_painting();
        let samples_before = controller.cache().samples().len();
        let outcome = {
            let mut ctx = HostContext {
                store: &mut store,
                view: &script.view,
                regions: &script.regions,
                commands: &mut host,
            };
            controller.handle_event(&event, &mut ctx)
        };
        summary.events_delivered += 1;
        if !was_painting && controller.is_painting() {
            summary.strokes += 1;
        }
        summary.samples += controller
            .cache()
            .samples()
            .len()
            .saturating_sub(samples_before);

        tracing::debug!("{} ms: {:?} -> {:?}", timed.at_ms, timed.action, outcome);
        match outcome {
            EventOutcome::Consumed => summary.consumed += 1,
            EventOutcome::PassThrough => summary.passed_through += 1,
            EventOutcome::Cancelled => {
                summary.cancelled_at_ms = Some(timed.at_ms);
                let skipped = summary.events_total - summary.events_delivered;
                if skipped > 0 {
                    tracing::info!("Brush cancelled at {} ms, {skipped} events not delivered", timed.at_ms);
                }
                break;
            }
        }
    }

    if controller.is_active() {
        controller.deactivate(&mut store);
    }
    summary.history_depth = controller.history().len();
    summary.redraws = host.redraws;
    summary.frames = host.frames;
    if !registry.is_empty() {
        tracing::warn!("{} overlays still registered after replay", registry.len());
    }

    tracing::info!(
        "Replay finished: {} strokes, {} samples, {} consumed, {} passed through",
        summary.strokes,
        summary.samples,
        summary.consumed,
        summary.passed_through
    );

    Ok(ReplayOutput {
        summary,
        curves: store.into_curves(),
    })
}
