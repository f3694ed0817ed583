// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-stroke lookup cache owned by the stroke controller.

use crate::curve::CurveId;
use crate::keyframe::KeyframeId;
use crate::snapshot::StrokeSnapshot;
use std::collections::HashMap;

/// Values derived from the stroke-start snapshot, plus the applied sample
/// positions of the current stroke.
///
/// Cleared when a stroke begins and when the controller tears down.
#[derive(Debug, Default)]
pub struct StrokeCache {
    relative: HashMap<(CurveId, KeyframeId), Option<f32>>,
    samples: Vec<[f32; 2]>,
}

impl StrokeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Stroke-start relative position of a keyframe, computed once per stroke
    pub fn relative_position(
        &mut self,
        start: Option<&StrokeSnapshot>,
        curve: CurveId,
        keyframe: KeyframeId,
    ) -> Option<f32> {
        let start = start?;
        *self
            .relative
            .entry((curve, keyframe))
            .or_insert_with(|| start.relative_position(curve, keyframe))
    }

    /// Remember an applied brush sample position
    pub fn record_sample(&mut self, position: [f32; 2]) {
        self.samples.push(position);
    }

    /// Sample positions applied during the current stroke
    pub fn samples(&self) -> &[[f32; 2]] {
        &self.samples
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.relative.is_empty() && self.samples.is_empty()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.relative.clear();
        self.samples.clear();
    }
}
