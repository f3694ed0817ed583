// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation curve definitions.

use crate::keyframe::{HandleType, Keyframe, KeyframeId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveId(pub Uuid);

impl CurveId {
    /// Create a new random curve ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CurveId {
    fn default() -> Self {
        Self::new()
    }
}

/// Local context of a keyframe: its control point and those of its neighbors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood {
    /// Previous keyframe `(time, value)`
    pub prev: Option<[f32; 2]>,
    /// The keyframe itself
    pub current: [f32; 2],
    /// Next keyframe `(time, value)`
    pub next: Option<[f32; 2]>,
}

impl Neighborhood {
    /// Both neighbors, if the keyframe is interior
    pub fn interior(&self) -> Option<([f32; 2], [f32; 2])> {
        Some((self.prev?, self.next?))
    }
}

/// An animation curve: keyframes ordered by time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// Unique curve ID
    pub id: CurveId,
    /// Curve name (usually the animated property path)
    pub name: String,
    /// Keyframes, ordered by time
    pub keyframes: Vec<Keyframe>,
    /// Whether the curve is hidden in the editor
    #[serde(default)]
    pub hidden: bool,
}

impl Curve {
    /// Create a new empty curve
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CurveId::new(),
            name: name.into(),
            keyframes: Vec::new(),
            hidden: false,
        }
    }

    /// Create a curve from `(time, value)` points
    pub fn from_points(name: impl Into<String>, points: &[(f32, f32)]) -> Self {
        let mut curve = Self::new(name);
        curve.keyframes = points.iter().map(|&(t, v)| Keyframe::new(t, v)).collect();
        curve.update();
        curve
    }

    /// Add a keyframe
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> KeyframeId {
        let id = keyframe.id;
        self.keyframes.push(keyframe);
        self.sort_keyframes();
        id
    }

    /// Remove a keyframe
    pub fn remove_keyframe(&mut self, keyframe_id: KeyframeId) -> Option<Keyframe> {
        let index = self.index_of(keyframe_id)?;
        Some(self.keyframes.remove(index))
    }

    /// Sort keyframes by time, keeping the order of equal times
    pub fn sort_keyframes(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Whether keyframes are ordered by time
    pub fn is_sorted(&self) -> bool {
        self.keyframes.windows(2).all(|w| w[0].time <= w[1].time)
    }

    /// Get keyframe by ID
    pub fn keyframe(&self, keyframe_id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == keyframe_id)
    }

    /// Get mutable keyframe by ID
    pub fn keyframe_mut(&mut self, keyframe_id: KeyframeId) -> Option<&mut Keyframe> {
        self.keyframes.iter_mut().find(|k| k.id == keyframe_id)
    }

    /// Index of a keyframe in time order
    pub fn index_of(&self, keyframe_id: KeyframeId) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id == keyframe_id)
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Values in keyframe order
    pub fn values(&self) -> Vec<f32> {
        self.keyframes.iter().map(|k| k.value).collect()
    }

    /// Times in keyframe order
    pub fn times(&self) -> Vec<f32> {
        self.keyframes.iter().map(|k| k.time).collect()
    }

    /// Earliest and latest keyframe time
    pub fn time_range(&self) -> Option<(f32, f32)> {
        let first = self.keyframes.first()?.time;
        Some(self.keyframes.iter().fold((first, first), |(lo, hi), k| {
            (lo.min(k.time), hi.max(k.time))
        }))
    }

    /// Mean value over all keyframes
    pub fn average_value(&self) -> Option<f32> {
        if self.keyframes.is_empty() {
            return None;
        }
        let sum: f32 = self.keyframes.iter().map(|k| k.value).sum();
        Some(sum / self.keyframes.len() as f32)
    }

    /// Local context of the keyframe at `index`
    pub fn neighborhood(&self, index: usize) -> Option<Neighborhood> {
        let current = self.keyframes.get(index)?.co();
        let prev = index
            .checked_sub(1)
            .and_then(|i| self.keyframes.get(i))
            .map(Keyframe::co);
        let next = self.keyframes.get(index + 1).map(Keyframe::co);
        Some(Neighborhood { prev, current, next })
    }

    /// Commit edits: restore time order and recompute computed handles
    pub fn update(&mut self) {
        if !self.is_sorted() {
            self.sort_keyframes();
        }
        self.recalculate_handles();
    }

    /// Recompute `Auto`, `AutoClamped` and `Vector` handles from neighbors
    fn recalculate_handles(&mut self) {
        for index in 0..self.keyframes.len() {
            let Some(hood) = self.neighborhood(index) else {
                continue;
            };
            let kf = &mut self.keyframes[index];
            if kf.handle_left_type.is_computed() {
                kf.handle_left = computed_handle(&hood, kf.handle_left_type, Side::Left);
            }
            if kf.handle_right_type.is_computed() {
                kf.handle_right = computed_handle(&hood, kf.handle_right_type, Side::Right);
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn computed_handle(hood: &Neighborhood, handle_type: HandleType, side: Side) -> [f32; 2] {
    let [t, v] = hood.current;
    let toward = match side {
        Side::Left => hood.prev,
        Side::Right => hood.next,
    };

    if handle_type == HandleType::Vector {
        return match toward {
            Some([nt, nv]) => [t + (nt - t) / 3.0, v + (nv - v) / 3.0],
            None => [t, v],
        };
    }

    let slope = match hood.interior() {
        Some(([pt, pv], [nt, nv])) => {
            let is_extreme = (v >= pv && v >= nv) || (v <= pv && v <= nv);
            if (handle_type == HandleType::AutoClamped && is_extreme) || (nt - pt).abs() < f32::EPSILON {
                0.0
            } else {
                (nv - pv) / (nt - pt)
            }
        }
        None => 0.0,
    };

    // Boundary keys mirror the spacing of their only neighbor
    let reach = toward
        .or(match side {
            Side::Left => hood.next,
            Side::Right => hood.prev,
        })
        .map(|[nt, _]| (nt - t).abs() / 3.0)
        .unwrap_or(0.0);

    match side {
        Side::Left => [t - reach, v - slope * reach],
        Side::Right => [t + reach, v + slope * reach],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_sorts() {
        let curve = Curve::from_points("x", &[(2.0, 0.0), (0.0, 1.0), (1.0, 2.0)]);
        assert_eq!(curve.times(), vec![0.0, 1.0, 2.0]);
        assert_eq!(curve.values(), vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_time_range_and_average() {
        let curve = Curve::from_points("x", &[(0.0, 0.0), (1.0, 10.0), (4.0, 2.0)]);
        assert_eq!(curve.time_range(), Some((0.0, 4.0)));
        assert_eq!(curve.average_value(), Some(4.0));
        assert_eq!(Curve::new("empty").time_range(), None);
        assert_eq!(Curve::new("empty").average_value(), None);
    }

    #[test]
    fn test_neighborhood_boundaries() {
        let curve = Curve::from_points("x", &[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)]);
        let first = curve.neighborhood(0).unwrap();
        assert!(first.prev.is_none());
        assert!(first.interior().is_none());

        let middle = curve.neighborhood(1).unwrap();
        assert_eq!(middle.interior(), Some(([0.0, 0.0], [2.0, 0.0])));
        assert!(curve.neighborhood(3).is_none());
    }

    #[test]
    fn test_update_resorts_after_time_change() {
        let mut curve = Curve::from_points("x", &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let id = curve.keyframes[0].id;
        curve.keyframes[0].time = 5.0;
        assert!(!curve.is_sorted());

        curve.update();
        assert!(curve.is_sorted());
        assert_eq!(curve.index_of(id), Some(2));
    }

    #[test]
    fn test_auto_clamped_flat_at_extreme() {
        let curve = Curve::from_points("x", &[(0.0, 0.0), (3.0, 10.0), (6.0, 0.0)]);
        let peak = &curve.keyframes[1];
        assert_eq!(peak.handle_left, [2.0, 10.0]);
        assert_eq!(peak.handle_right, [4.0, 10.0]);
    }

    #[test]
    fn test_free_handles_untouched_by_update() {
        let mut curve = Curve::new("x");
        curve.add_keyframe(Keyframe::new(0.0, 0.0).with_handles([-1.0, 5.0], [1.0, -5.0], HandleType::Free));
        curve.add_keyframe(Keyframe::new(3.0, 3.0));
        curve.update();
        assert_eq!(curve.keyframes[0].handle_left, [-1.0, 5.0]);
        assert_eq!(curve.keyframes[1].handle_left, [2.0, 3.0]);
    }
}
