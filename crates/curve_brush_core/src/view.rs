// SPDX-License-Identifier: MIT OR Apache-2.0
//! Coordinate transforms between curve space and region (screen) space.

use serde::{Deserialize, Serialize};

/// Pure mapping between curve-domain `(time, value)` and region pixels
pub trait ViewTransform {
    /// Curve space to region space
    fn view_to_region(&self, point: [f32; 2]) -> [f32; 2];

    /// Region space to curve space
    fn region_to_view(&self, point: [f32; 2]) -> [f32; 2];
}

/// Linear 2D view: pan offset plus independent zoom per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View2d {
    /// Curve-space point shown at the region origin
    pub offset: [f32; 2],
    /// Pixels per time unit
    pub time_scale: f32,
    /// Pixels per value unit
    pub value_scale: f32,
}

impl View2d {
    /// Create a view with the given zoom and no pan
    pub fn new(time_scale: f32, value_scale: f32) -> Self {
        Self {
            offset: [0.0, 0.0],
            time_scale,
            value_scale,
        }
    }

    /// Set the pan offset
    pub fn with_offset(mut self, offset: [f32; 2]) -> Self {
        self.offset = offset;
        self
    }
}

impl Default for View2d {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl ViewTransform for View2d {
    fn view_to_region(&self, [time, value]: [f32; 2]) -> [f32; 2] {
        [
            (time - self.offset[0]) * self.time_scale,
            (value - self.offset[1]) * self.value_scale,
        ]
    }

    fn region_to_view(&self, [x, y]: [f32; 2]) -> [f32; 2] {
        [
            x / self.time_scale + self.offset[0],
            y / self.value_scale + self.offset[1],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_mapping_is_inverse() {
        let view = View2d::new(20.0, 4.0).with_offset([10.0, -5.0]);
        let region = view.view_to_region([12.0, 0.0]);
        assert_eq!(region, [40.0, 20.0]);
        assert_eq!(view.region_to_view(region), [12.0, 0.0]);
    }
}
