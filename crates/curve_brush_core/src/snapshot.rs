// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deep-copied curve state used for stroke-relative shaping and undo.

use crate::curve::{Curve, CurveId};
use crate::keyframe::{HandleType, Keyframe, KeyframeId};
use crate::modes::relative_position;
use crate::store::CurveStore;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Recorded state of one keyframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyframeState {
    /// Keyframe the state belongs to
    pub id: KeyframeId,
    /// Time
    pub time: f32,
    /// Value
    pub value: f32,
    /// Left handle `(time, value)`
    pub handle_left: [f32; 2],
    /// Right handle `(time, value)`
    pub handle_right: [f32; 2],
    /// Left handle type
    pub handle_left_type: HandleType,
    /// Right handle type
    pub handle_right_type: HandleType,
}

impl KeyframeState {
    /// Record a keyframe
    pub fn capture(kf: &Keyframe) -> Self {
        Self {
            id: kf.id,
            time: kf.time,
            value: kf.value,
            handle_left: kf.handle_left,
            handle_right: kf.handle_right,
            handle_left_type: kf.handle_left_type,
            handle_right_type: kf.handle_right_type,
        }
    }

    /// Write the recorded state back; selection is left alone
    pub fn apply(&self, kf: &mut Keyframe) {
        kf.time = self.time;
        kf.value = self.value;
        kf.handle_left = self.handle_left;
        kf.handle_right = self.handle_right;
        kf.handle_left_type = self.handle_left_type;
        kf.handle_right_type = self.handle_right_type;
    }
}

/// Outcome of restoring a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Curves written back and committed
    pub restored_curves: usize,
    /// Curves no longer present in the store
    pub skipped_curves: usize,
    /// Keyframes no longer present on their curve
    pub skipped_keyframes: usize,
}

/// Immutable state of a set of curves at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeSnapshot {
    curves: IndexMap<CurveId, Vec<KeyframeState>>,
}

impl StrokeSnapshot {
    /// Record every visible editable curve in `store`
    pub fn capture(store: &dyn CurveStore) -> Self {
        let curves = store
            .editable_curves()
            .into_iter()
            .filter_map(|id| store.curve(id))
            .filter(|curve| !curve.hidden)
            .map(|curve| (curve.id, Self::record(curve)))
            .collect();
        Self { curves }
    }

    /// Record the given curves
    pub fn from_curves<'a>(curves: impl IntoIterator<Item = &'a Curve>) -> Self {
        Self {
            curves: curves
                .into_iter()
                .map(|curve| (curve.id, Self::record(curve)))
                .collect(),
        }
    }

    fn record(curve: &Curve) -> Vec<KeyframeState> {
        curve.keyframes.iter().map(KeyframeState::capture).collect()
    }

    /// Recorded curves
    pub fn curve_ids(&self) -> impl Iterator<Item = CurveId> + '_ {
        self.curves.keys().copied()
    }

    /// Recorded keyframes of a curve, in time order at capture
    pub fn keyframes(&self, curve: CurveId) -> Option<&[KeyframeState]> {
        self.curves.get(&curve).map(Vec::as_slice)
    }

    /// Recorded state of one keyframe
    pub fn keyframe(&self, curve: CurveId, keyframe: KeyframeId) -> Option<&KeyframeState> {
        self.keyframes(curve)?.iter().find(|k| k.id == keyframe)
    }

    /// Number of recorded curves
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Position of a keyframe between its recorded neighbors' values.
    ///
    /// `None` for boundary keyframes, unknown keyframes, and flat neighbor
    /// ranges.
    pub fn relative_position(&self, curve: CurveId, keyframe: KeyframeId) -> Option<f32> {
        let states = self.keyframes(curve)?;
        let index = states.iter().position(|k| k.id == keyframe)?;
        let prev = states.get(index.checked_sub(1)?)?;
        let next = states.get(index + 1)?;
        relative_position(prev.value, states[index].value, next.value)
    }

    /// Write the recorded state back into `store`.
    ///
    /// Curves or keyframes that no longer exist are skipped; everything else
    /// is restored and each touched curve is committed.
    pub fn restore(&self, store: &mut dyn CurveStore) -> RestoreReport {
        let mut report = RestoreReport::default();

        for (&curve_id, states) in &self.curves {
            let Some(curve) = store.curve_mut(curve_id) else {
                tracing::warn!("Skipping restore of missing curve {:?}", curve_id);
                report.skipped_curves += 1;
                continue;
            };

            for state in states {
                match curve.keyframe_mut(state.id) {
                    Some(kf) => state.apply(kf),
                    None => report.skipped_keyframes += 1,
                }
            }

            store.commit(curve_id);
            report.restored_curves += 1;
        }

        if report.skipped_keyframes > 0 {
            tracing::warn!("Skipped {} missing keyframes during restore", report.skipped_keyframes);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CurveSet;

    #[test]
    fn test_capture_skips_hidden_curves() {
        let mut set = CurveSet::new();
        let visible = set.add_curve(Curve::from_points("a", &[(0.0, 1.0)]));
        let mut hidden = Curve::from_points("b", &[(0.0, 1.0)]);
        hidden.hidden = true;
        let hidden = set.add_curve(hidden);

        let snapshot = StrokeSnapshot::capture(&set);
        assert!(snapshot.keyframes(visible).is_some());
        assert!(snapshot.keyframes(hidden).is_none());
    }

    #[test]
    fn test_snapshot_is_independent_of_live_curves() {
        let mut set = CurveSet::new();
        let id = set.add_curve(Curve::from_points("a", &[(0.0, 1.0), (1.0, 2.0)]));
        let snapshot = StrokeSnapshot::capture(&set);

        set.curve_mut(id).unwrap().keyframes[0].value = 99.0;
        assert_eq!(snapshot.keyframes(id).unwrap()[0].value, 1.0);

        snapshot.restore(&mut set);
        assert_eq!(set.curve(id).unwrap().values(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_restore_skips_missing_curve() {
        let mut set = CurveSet::new();
        let gone = set.add_curve(Curve::from_points("a", &[(0.0, 1.0)]));
        let kept = set.add_curve(Curve::from_points("b", &[(0.0, 1.0)]));
        let snapshot = StrokeSnapshot::capture(&set);

        set.remove_curve(gone);
        set.curve_mut(kept).unwrap().keyframes[0].value = 5.0;

        let report = snapshot.restore(&mut set);
        assert_eq!(report.skipped_curves, 1);
        assert_eq!(report.restored_curves, 1);
        assert_eq!(set.curve(kept).unwrap().values(), vec![1.0]);
    }

    #[test]
    fn test_restore_reorders_times() {
        let mut set = CurveSet::new();
        let id = set.add_curve(Curve::from_points("a", &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]));
        let snapshot = StrokeSnapshot::capture(&set);

        let curve = set.curve_mut(id).unwrap();
        curve.keyframes[1].time = 5.0;
        curve.update();

        snapshot.restore(&mut set);
        assert_eq!(set.curve(id).unwrap().times(), vec![0.0, 1.0, 2.0]);
        assert_eq!(set.curve(id).unwrap().values(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_relative_position() {
        let curve = Curve::from_points("a", &[(0.0, 0.0), (1.0, 5.0), (2.0, 10.0)]);
        let snapshot = StrokeSnapshot::from_curves([&curve]);
        let ids: Vec<_> = curve.keyframes.iter().map(|k| k.id).collect();

        assert_eq!(snapshot.relative_position(curve.id, ids[0]), None);
        assert_eq!(snapshot.relative_position(curve.id, ids[1]), Some(0.5));
        assert_eq!(snapshot.relative_position(curve.id, ids[2]), None);
        assert_eq!(snapshot.relative_position(CurveId::new(), ids[1]), None);
    }

    #[test]
    fn test_relative_position_flat_neighbors() {
        let curve = Curve::from_points("a", &[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)]);
        let snapshot = StrokeSnapshot::from_curves([&curve]);
        assert_eq!(snapshot.relative_position(curve.id, curve.keyframes[1].id), None);
    }
}
