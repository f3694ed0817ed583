// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve storage seam and an in-memory curve set.
//!
//! The engine never owns curve data. It reads and mutates curves through
//! [`CurveStore`], which a host implements over its own keyframe storage.
//! [`CurveSet`] is the in-memory store used by the replay host and tests.

use crate::curve::{Curve, CurveId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Host-side access to editable animation curves
pub trait CurveStore {
    /// Curves the brush may edit, in display order
    fn editable_curves(&self) -> Vec<CurveId>;

    /// Get a curve
    fn curve(&self, id: CurveId) -> Option<&Curve>;

    /// Get a mutable curve
    fn curve_mut(&mut self, id: CurveId) -> Option<&mut Curve>;

    /// Notify the store that a curve was edited.
    ///
    /// Implementations re-establish time order and refresh whatever depends
    /// on the curve (handles, evaluation caches).
    fn commit(&mut self, id: CurveId);
}

/// In-memory set of curves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurveSet {
    curves: IndexMap<CurveId, Curve>,
}

impl CurveSet {
    /// Create an empty curve set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a curve
    pub fn add_curve(&mut self, curve: Curve) -> CurveId {
        let id = curve.id;
        self.curves.insert(id, curve);
        id
    }

    /// Remove a curve
    pub fn remove_curve(&mut self, id: CurveId) -> Option<Curve> {
        self.curves.shift_remove(&id)
    }

    /// Get all curves
    pub fn curves(&self) -> impl Iterator<Item = &Curve> {
        self.curves.values()
    }

    /// Get curve count
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Consume the set, returning curves in insertion order
    pub fn into_curves(self) -> Vec<Curve> {
        self.curves.into_values().collect()
    }
}

impl FromIterator<Curve> for CurveSet {
    fn from_iter<I: IntoIterator<Item = Curve>>(iter: I) -> Self {
        let mut set = Self::new();
        for curve in iter {
            set.add_curve(curve);
        }
        set
    }
}

impl CurveStore for CurveSet {
    fn editable_curves(&self) -> Vec<CurveId> {
        self.curves.keys().copied().collect()
    }

    fn curve(&self, id: CurveId) -> Option<&Curve> {
        self.curves.get(&id)
    }

    fn curve_mut(&mut self, id: CurveId) -> Option<&mut Curve> {
        self.curves.get_mut(&id)
    }

    fn commit(&mut self, id: CurveId) {
        if let Some(curve) = self.curves.get_mut(&id) {
            curve.update();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editable_curves_keep_insertion_order() {
        let a = Curve::from_points("a", &[(0.0, 0.0)]);
        let b = Curve::from_points("b", &[(0.0, 0.0)]);
        let (ida, idb) = (a.id, b.id);
        let set: CurveSet = [a, b].into_iter().collect();

        assert_eq!(set.editable_curves(), vec![ida, idb]);
    }

    #[test]
    fn test_remove_curve() {
        let mut set = CurveSet::new();
        let id = set.add_curve(Curve::new("a"));
        assert!(set.remove_curve(id).is_some());
        assert!(set.curve(id).is_none());
        assert_eq!(set.curve_count(), 0);
    }

    #[test]
    fn test_commit_resorts() {
        let mut set = CurveSet::new();
        let id = set.add_curve(Curve::from_points("a", &[(0.0, 0.0), (1.0, 1.0)]));
        set.curve_mut(id).unwrap().keyframes[0].time = 2.0;
        set.commit(id);
        assert_eq!(set.curve(id).unwrap().times(), vec![1.0, 2.0]);
    }
}
