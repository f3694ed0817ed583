// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brush mode transforms.
//!
//! Every transform is a pure function of a keyframe's [`Neighborhood`] and
//! a falloff weight. Modes that read neighbors leave the first and last
//! keyframe of a curve untouched.

use crate::curve::Neighborhood;
use crate::noise::NoiseSource;
use serde::{Deserialize, Serialize};

/// Neighbor value ranges below this are treated as flat
pub const RANGE_EPSILON: f32 = 1e-4;

/// Brush operation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BrushMode {
    /// Pull values toward the 3-point local average
    #[default]
    Smooth,
    /// Add uniform random noise
    Noise,
    /// Pull values toward the curve's mean value
    Flatten,
    /// Push values away from the neighbor average
    Sharpen,
    /// Even out keyframe spacing in time
    Relax,
    /// Smooth while keeping the stroke-start contour
    ShapePreserving,
}

impl BrushMode {
    /// All modes in panel order
    pub const ALL: [BrushMode; 6] = [
        Self::Smooth,
        Self::Noise,
        Self::Flatten,
        Self::Sharpen,
        Self::Relax,
        Self::ShapePreserving,
    ];

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Smooth => "Smooth",
            Self::Noise => "Noise",
            Self::Flatten => "Flatten",
            Self::Sharpen => "Sharpen",
            Self::Relax => "Relax",
            Self::ShapePreserving => "Shape Preserving",
        }
    }

    /// Get the tooltip text
    pub fn description(&self) -> &'static str {
        match self {
            Self::Smooth => "Smooth keyframes",
            Self::Noise => "Add controlled noise",
            Self::Flatten => "Flatten to average value",
            Self::Sharpen => "Increase contrast between keyframes",
            Self::Relax => "Evenly space keyframes",
            Self::ShapePreserving => "Smooth while preserving the original shape",
        }
    }

    /// Whether the mode can move keyframes in time
    pub fn changes_time(&self) -> bool {
        matches!(self, Self::Relax)
    }
}

/// New control point for a keyframe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyUpdate {
    /// New time
    pub time: f32,
    /// New value
    pub value: f32,
}

impl KeyUpdate {
    /// The keyframe as it is
    pub fn unchanged(hood: &Neighborhood) -> Self {
        Self {
            time: hood.current[0],
            value: hood.current[1],
        }
    }

    /// Same time, new value
    pub fn value(hood: &Neighborhood, value: f32) -> Self {
        Self {
            time: hood.current[0],
            value,
        }
    }
}

/// Per-call inputs some modes need besides the neighborhood
pub struct TransformInputs<'a> {
    /// Mean value over all keyframes of the curve
    pub curve_average: Option<f32>,
    /// Stroke-start relative position of the keyframe between its neighbors
    pub relative_position: Option<f32>,
    /// Random source for the noise mode
    pub noise: &'a mut dyn NoiseSource,
}

/// Apply `mode` to one keyframe
pub fn apply_mode(
    mode: BrushMode,
    hood: &Neighborhood,
    weight: f32,
    inputs: &mut TransformInputs<'_>,
) -> KeyUpdate {
    let old = hood.current[1];
    match mode {
        BrushMode::Smooth => KeyUpdate::value(hood, smooth(hood, weight)),
        BrushMode::Noise => KeyUpdate::value(hood, add_noise(old, inputs.noise.sample(), weight)),
        BrushMode::Flatten => match inputs.curve_average {
            Some(average) => KeyUpdate::value(hood, flatten(old, average, weight)),
            None => KeyUpdate::unchanged(hood),
        },
        BrushMode::Sharpen => KeyUpdate::value(hood, sharpen(hood, weight)),
        BrushMode::Relax => KeyUpdate {
            time: relax(hood, weight),
            value: old,
        },
        BrushMode::ShapePreserving => {
            KeyUpdate::value(hood, shape_preserving(hood, inputs.relative_position, weight))
        }
    }
}

/// `old + (avg(prev, old, next) - old) * weight`
pub fn smooth(hood: &Neighborhood, weight: f32) -> f32 {
    let old = hood.current[1];
    match hood.interior() {
        Some((prev, next)) => {
            let average = (prev[1] + old + next[1]) / 3.0;
            old + (average - old) * weight
        }
        None => old,
    }
}

/// `old + sample * weight`, with `sample` uniform in `[-1, 1]`
pub fn add_noise(old: f32, sample: f32, weight: f32) -> f32 {
    old + sample * weight
}

/// `old + (average - old) * weight`
pub fn flatten(old: f32, average: f32, weight: f32) -> f32 {
    old + (average - old) * weight
}

/// `old + (old - avg(prev, next)) * weight`
pub fn sharpen(hood: &Neighborhood, weight: f32) -> f32 {
    let old = hood.current[1];
    match hood.interior() {
        Some((prev, next)) => {
            let average = (prev[1] + next[1]) / 2.0;
            old + (old - average) * weight
        }
        None => old,
    }
}

/// New time moved toward the midpoint of the neighbor times
pub fn relax(hood: &Neighborhood, weight: f32) -> f32 {
    let time = hood.current[0];
    match hood.interior() {
        Some((prev, next)) => {
            let ideal = (prev[0] + next[0]) / 2.0;
            time + (ideal - time) * weight
        }
        None => time,
    }
}

/// Position of `value` between `prev` and `next`, or `None` on a flat range
pub fn relative_position(prev: f32, value: f32, next: f32) -> Option<f32> {
    let range = next - prev;
    if range.abs() < RANGE_EPSILON {
        return None;
    }
    Some((value - prev) / range)
}

/// Blend of the 3-point smoothed value and the value at `relative` between
/// the current neighbors
pub fn shape_preserving(hood: &Neighborhood, relative: Option<f32>, weight: f32) -> f32 {
    let old = hood.current[1];
    let (Some((prev, next)), Some(relative)) = (hood.interior(), relative) else {
        return old;
    };
    let smoothed = (prev[1] + old + next[1]) / 3.0;
    let target = prev[1] + relative * (next[1] - prev[1]);
    smoothed * weight + target * (1.0 - weight)
}
