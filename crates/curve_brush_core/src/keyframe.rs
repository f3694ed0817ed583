// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for animation curves.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Bezier handle type on either side of a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum HandleType {
    /// Handle position is fully user controlled
    Free,
    /// Handle stays collinear with the opposite handle
    Aligned,
    /// Handle points at the neighboring keyframe
    Vector,
    /// Handle is recalculated from the neighbors
    Auto,
    /// Like `Auto`, without overshooting extremes
    #[default]
    AutoClamped,
}

impl HandleType {
    /// Whether `Curve::update` recomputes handles of this type
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Vector | Self::Auto | Self::AutoClamped)
    }
}

/// A keyframe on a curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Time (frame) of the control point
    pub time: f32,
    /// Value of the control point
    pub value: f32,
    /// Left bezier handle as `(time, value)`
    pub handle_left: [f32; 2],
    /// Right bezier handle as `(time, value)`
    pub handle_right: [f32; 2],
    /// Left handle type
    pub handle_left_type: HandleType,
    /// Right handle type
    pub handle_right_type: HandleType,
    /// Whether the control point is selected
    #[serde(default)]
    pub selected: bool,
}

impl Keyframe {
    /// Create a new keyframe with handles collapsed onto the control point
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            value,
            handle_left: [time, value],
            handle_right: [time, value],
            handle_left_type: HandleType::AutoClamped,
            handle_right_type: HandleType::AutoClamped,
            selected: false,
        }
    }

    /// Set handle positions and types
    pub fn with_handles(
        mut self,
        left: [f32; 2],
        right: [f32; 2],
        handle_type: HandleType,
    ) -> Self {
        self.handle_left = left;
        self.handle_right = right;
        self.handle_left_type = handle_type;
        self.handle_right_type = handle_type;
        self
    }

    /// Mark the keyframe as selected
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Control point as `(time, value)`
    pub fn co(&self) -> [f32; 2] {
        [self.time, self.value]
    }

    /// Move the control point, carrying both handles by the same offset.
    ///
    /// Without `preserve_handles` the handle types fall back to
    /// `AutoClamped` so the next curve update recomputes them.
    pub fn move_to(&mut self, time: f32, value: f32, preserve_handles: bool) {
        let dt = time - self.time;
        let dv = value - self.value;
        self.time = time;
        self.value = value;
        self.handle_left[0] += dt;
        self.handle_left[1] += dv;
        self.handle_right[0] += dt;
        self.handle_right[1] += dv;

        if !preserve_handles {
            self.handle_left_type = HandleType::AutoClamped;
            self.handle_right_type = HandleType::AutoClamped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_to_carries_handles() {
        let mut kf = Keyframe::new(1.0, 2.0)
            .with_handles([0.5, 1.0], [1.5, 3.0], HandleType::Free);
        kf.move_to(2.0, 4.0, true);

        assert_eq!(kf.co(), [2.0, 4.0]);
        assert_eq!(kf.handle_left, [1.5, 3.0]);
        assert_eq!(kf.handle_right, [2.5, 5.0]);
        assert_eq!(kf.handle_left_type, HandleType::Free);
    }

    #[test]
    fn test_move_to_without_preserving_resets_types() {
        let mut kf = Keyframe::new(0.0, 0.0)
            .with_handles([-1.0, 0.0], [1.0, 0.0], HandleType::Aligned);
        kf.move_to(0.0, 1.0, false);

        assert_eq!(kf.handle_left_type, HandleType::AutoClamped);
        assert_eq!(kf.handle_right_type, HandleType::AutoClamped);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Keyframe::new(0.0, 0.0);
        let b = Keyframe::new(0.0, 0.0);
        assert_ne!(a.id, b.id);
    }
}
