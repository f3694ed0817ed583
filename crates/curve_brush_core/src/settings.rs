// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brush settings exposed to the host's property panel.

use crate::error::{BrushError, Result};
use crate::modes::BrushMode;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

/// Allowed brush radius in pixels
pub const RADIUS_RANGE: RangeInclusive<f32> = 1.0..=500.0;
/// Allowed brush strength
pub const STRENGTH_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Allowed passes per sample
pub const ITERATIONS_RANGE: RangeInclusive<u32> = 1..=10;
/// Allowed keyframe sampling stride
pub const SAMPLE_STRIDE_RANGE: RangeInclusive<u32> = 1..=10;

/// Out of range setting
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// Radius outside [`RADIUS_RANGE`]
    #[error("Brush radius {0} is outside 1..=500")]
    Radius(f32),

    /// Strength outside [`STRENGTH_RANGE`]
    #[error("Brush strength {0} is outside 0..=1")]
    Strength(f32),

    /// Iterations outside [`ITERATIONS_RANGE`]
    #[error("Iteration count {0} is outside 1..=10")]
    Iterations(u32),

    /// Stride outside [`SAMPLE_STRIDE_RANGE`]
    #[error("Sample stride {0} is outside 1..=10")]
    SampleStride(u32),
}

/// Brush configuration, read by the engine on every event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Brush radius in region pixels
    pub radius: f32,
    /// Strength at the brush center
    pub strength: f32,
    /// Brush passes per applied sample
    pub iterations: u32,
    /// Operation mode
    pub mode: BrushMode,
    /// Only affect selected keyframes
    pub affect_selected: bool,
    /// Select keyframes the brush touches
    pub select_while_painting: bool,
    /// Thin dense curves by sampling every `sample_stride`-th keyframe
    pub use_acceleration: bool,
    /// Keyframe index stride when acceleration is on
    pub sample_stride: u32,
    /// Frame the view on the curves after each sample
    pub auto_frame: bool,
    /// Keep handle types when moving keyframes
    pub preserve_handles: bool,
    /// Whether the brush is active
    pub enabled: bool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: 50.0,
            strength: 0.5,
            iterations: 1,
            mode: BrushMode::Smooth,
            affect_selected: false,
            select_while_painting: false,
            use_acceleration: true,
            sample_stride: 1,
            auto_frame: false,
            preserve_handles: true,
            enabled: false,
        }
    }
}

impl BrushSettings {
    /// Default settings with the given mode
    pub fn with_mode(mode: BrushMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Check every value against its allowed range
    pub fn validate(&self) -> std::result::Result<(), SettingsError> {
        if !RADIUS_RANGE.contains(&self.radius) {
            return Err(SettingsError::Radius(self.radius));
        }
        if !STRENGTH_RANGE.contains(&self.strength) {
            return Err(SettingsError::Strength(self.strength));
        }
        if !ITERATIONS_RANGE.contains(&self.iterations) {
            return Err(SettingsError::Iterations(self.iterations));
        }
        if !SAMPLE_STRIDE_RANGE.contains(&self.sample_stride) {
            return Err(SettingsError::SampleStride(self.sample_stride));
        }
        Ok(())
    }

    /// Copy with every value clamped into its allowed range
    pub fn clamped(&self) -> Self {
        let radius = if self.radius.is_nan() { 50.0 } else { self.radius };
        let strength = if self.strength.is_nan() { 0.0 } else { self.strength };
        Self {
            radius: radius.clamp(*RADIUS_RANGE.start(), *RADIUS_RANGE.end()),
            strength: strength.clamp(*STRENGTH_RANGE.start(), *STRENGTH_RANGE.end()),
            iterations: self
                .iterations
                .clamp(*ITERATIONS_RANGE.start(), *ITERATIONS_RANGE.end()),
            sample_stride: self
                .sample_stride
                .clamp(*SAMPLE_STRIDE_RANGE.start(), *SAMPLE_STRIDE_RANGE.end()),
            ..self.clone()
        }
    }

    /// Keyframe index stride in effect
    pub fn effective_stride(&self) -> usize {
        if self.use_acceleration {
            self.sample_stride.max(1) as usize
        } else {
            1
        }
    }

    /// Parse settings from RON and validate them
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let settings: BrushSettings = ron::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings as pretty RON
    pub fn to_ron_string(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BrushError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_ron_string()?;
        std::fs::write(path, content).map_err(|source| BrushError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
