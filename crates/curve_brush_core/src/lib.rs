// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brush-based keyframe editing for animation curves.
//!
//! This crate sculpts the keyframes of 2D animation curves with a circular
//! brush:
//! - Radial falloff around the brush center
//! - Six brush modes (smooth, noise, flatten, sharpen, relax, shape preserving)
//! - Stroke-start snapshots for shape preservation and undo
//! - A modal stroke controller with throttled sampling
//! - A bounded brush-local undo/redo history
//!
//! ## Architecture
//!
//! The engine is host-agnostic. A host supplies:
//! - Curve storage through [`CurveStore`]
//! - The curve-to-screen mapping through [`ViewTransform`]
//! - Redraw, cursor and framing requests through [`HostCommands`]
//! - A drawing surface that reads the [`OverlayRegistry`]
//!
//! [`CurveSet`] and [`View2d`] are in-memory implementations for tools and
//! tests.

pub mod cache;
pub mod clock;
pub mod controller;
pub mod curve;
pub mod error;
pub mod falloff;
pub mod history;
pub mod input;
pub mod keyframe;
pub mod modes;
pub mod noise;
pub mod overlay;
pub mod selector;
pub mod settings;
pub mod snapshot;
pub mod store;
pub mod view;

pub use cache::StrokeCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{
    BrushState, CursorStyle, EventOutcome, HostCommands, HostContext, Stroke, StrokeController,
    StrokePhase, SAMPLE_INTERVAL,
};
pub use curve::{Curve, CurveId, Neighborhood};
pub use error::{BrushError, Result};
pub use falloff::{falloff_weight, screen_distance};
pub use history::{HistoryError, HistoryStats, UndoHistory, MAX_UNDO_STATES};
pub use input::{
    ui_region_at, EventKind, HistoryCommand, InputEvent, Key, Modifiers, MouseButton, RegionKind,
    UiRegion,
};
pub use keyframe::{HandleType, Keyframe, KeyframeId};
pub use modes::{apply_mode, BrushMode, KeyUpdate, TransformInputs};
pub use noise::{NoiseSource, RandomNoise, SequenceNoise};
pub use overlay::{BrushOverlay, OverlayGuard, OverlayId, OverlayKind, OverlayRegistry};
pub use selector::{apply_brush, PassContext, PassReport};
pub use settings::{BrushSettings, SettingsError};
pub use snapshot::{KeyframeState, RestoreReport, StrokeSnapshot};
pub use store::{CurveSet, CurveStore};
pub use view::{View2d, ViewTransform};
