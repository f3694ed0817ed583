// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve and keyframe selection for one brush pass.
//!
//! A pass walks every editable curve, culls curves out of reach of the
//! brush, weights the remaining candidate keyframes by falloff and hands
//! them to the mode transforms. Keyframes are mutated in place in index
//! order, so later keyframes see their already-moved neighbors.

use crate::cache::StrokeCache;
use crate::curve::{Curve, CurveId};
use crate::falloff::{falloff_weight, screen_distance};
use crate::modes::{apply_mode, BrushMode, TransformInputs};
use crate::noise::NoiseSource;
use crate::settings::BrushSettings;
use crate::snapshot::StrokeSnapshot;
use crate::store::CurveStore;
use crate::view::ViewTransform;

/// Counters describing one brush pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Curves considered (visible, non-empty)
    pub curves_visited: usize,
    /// Curves rejected by the time range test
    pub curves_culled: usize,
    /// Curves committed back to the store
    pub curves_committed: usize,
    /// Keyframes handed to a transform
    pub keyframes_transformed: usize,
}

impl PassReport {
    /// Add another pass's counters
    pub fn merge(&mut self, other: PassReport) {
        self.curves_visited += other.curves_visited;
        self.curves_culled += other.curves_culled;
        self.curves_committed += other.curves_committed;
        self.keyframes_transformed += other.keyframes_transformed;
    }
}

/// Everything a pass reads or mutates besides the settings
pub struct PassContext<'a> {
    /// Curve storage
    pub store: &'a mut dyn CurveStore,
    /// Curve-to-region mapping
    pub view: &'a dyn ViewTransform,
    /// Random source for the noise mode
    pub noise: &'a mut dyn NoiseSource,
    /// Curve state when the stroke began
    pub stroke_start: Option<&'a StrokeSnapshot>,
    /// Per-stroke cache
    pub cache: &'a mut StrokeCache,
}

/// Brush reach along the time axis, in curve units
pub fn time_reach(view: &dyn ViewTransform, position: [f32; 2], radius: f32) -> (f32, f32) {
    let brush_time = view.region_to_view(position)[0];
    let rim_time = view.region_to_view([position[0] + radius, position[1]])[0];
    (brush_time, (rim_time - brush_time).abs())
}

/// Whether any part of the curve's time range is within `reach` of `brush_time`
pub fn curve_in_reach(curve: &Curve, brush_time: f32, reach: f32) -> bool {
    match curve.time_range() {
        Some((min, max)) => brush_time >= min - reach && brush_time <= max + reach,
        None => false,
    }
}

/// Indices of keyframes eligible for the brush, before falloff
pub fn candidate_indices(curve: &Curve, settings: &BrushSettings) -> Vec<usize> {
    let stride = settings.effective_stride();
    (0..curve.keyframe_count())
        .step_by(stride)
        .filter(|&i| !settings.affect_selected || curve.keyframes[i].selected)
        .collect()
}

/// Apply one brush pass at region `position` to every eligible curve
pub fn apply_brush(position: [f32; 2], settings: &BrushSettings, ctx: &mut PassContext<'_>) -> PassReport {
    let mut report = PassReport::default();
    let (brush_time, reach) = time_reach(ctx.view, position, settings.radius);

    for curve_id in ctx.store.editable_curves() {
        let Some(curve) = ctx.store.curve_mut(curve_id) else {
            continue;
        };
        if curve.hidden || curve.keyframes.is_empty() {
            continue;
        }
        report.curves_visited += 1;

        if !curve_in_reach(curve, brush_time, reach) {
            report.curves_culled += 1;
            continue;
        }

        report.keyframes_transformed += paint_curve(
            curve,
            curve_id,
            position,
            settings,
            ctx.view,
            &mut *ctx.noise,
            ctx.stroke_start,
            &mut *ctx.cache,
        );

        if settings.mode.changes_time() && !curve.is_sorted() {
            curve.sort_keyframes();
        }
        ctx.store.commit(curve_id);
        report.curves_committed += 1;
    }

    report
}

fn paint_curve(
    curve: &mut Curve,
    curve_id: CurveId,
    position: [f32; 2],
    settings: &BrushSettings,
    view: &dyn ViewTransform,
    noise: &mut dyn NoiseSource,
    stroke_start: Option<&StrokeSnapshot>,
    cache: &mut StrokeCache,
) -> usize {
    let mut transformed = 0;
    // Mean of the values as they were when the pass reached this curve
    let curve_average = match settings.mode {
        BrushMode::Flatten => curve.average_value(),
        _ => None,
    };

    for index in candidate_indices(curve, settings) {
        let Some(hood) = curve.neighborhood(index) else {
            continue;
        };
        let distance = screen_distance(view.view_to_region(hood.current), position);
        let weight = falloff_weight(distance, settings.radius, settings.strength);
        if weight <= 0.0 {
            continue;
        }

        let keyframe_id = curve.keyframes[index].id;
        let mut inputs = TransformInputs {
            curve_average,
            relative_position: match settings.mode {
                BrushMode::ShapePreserving => {
                    cache.relative_position(stroke_start, curve_id, keyframe_id)
                }
                _ => None,
            },
            noise: &mut *noise,
        };
        let update = apply_mode(settings.mode, &hood, weight, &mut inputs);

        let keyframe = &mut curve.keyframes[index];
        keyframe.move_to(update.time, update.value, settings.preserve_handles);
        if settings.select_while_painting {
            keyframe.selected = true;
        }
        transformed += 1;
    }

    transformed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::SequenceNoise;
    use crate::store::CurveSet;
    use crate::view::View2d;

    /// Store that records which curves were committed
    struct SpyStore {
        inner: CurveSet,
        committed: Vec<CurveId>,
    }

    impl CurveStore for SpyStore {
        fn editable_curves(&self) -> Vec<CurveId> {
            self.inner.editable_curves()
        }

        fn curve(&self, id: CurveId) -> Option<&Curve> {
            self.inner.curve(id)
        }

        fn curve_mut(&mut self, id: CurveId) -> Option<&mut Curve> {
            self.inner.curve_mut(id)
        }

        fn commit(&mut self, id: CurveId) {
            self.committed.push(id);
            self.inner.commit(id);
        }
    }

    fn run(store: &mut dyn CurveStore, position: [f32; 2], settings: &BrushSettings) -> PassReport {
        let view = View2d::default();
        let mut noise = SequenceNoise::new(vec![1.0]);
        let mut cache = StrokeCache::new();
        let start = StrokeSnapshot::capture(&*store);
        let mut ctx = PassContext {
            store,
            view: &view,
            noise: &mut noise,
            stroke_start: Some(&start),
            cache: &mut cache,
        };
        apply_brush(position, settings, &mut ctx)
    }

    fn settings(mode: BrushMode, radius: f32, strength: f32) -> BrushSettings {
        BrushSettings {
            mode,
            radius,
            strength,
            ..BrushSettings::default()
        }
    }

    #[test]
    fn test_flatten_covers_whole_curve() {
        let mut set = CurveSet::new();
        let id = set.add_curve(Curve::from_points("a", &[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)]));

        let report = run(&mut set, [1.0, 5.0], &settings(BrushMode::Flatten, 500.0, 1.0));
        assert_eq!(report.keyframes_transformed, 3);

        let curve = set.curve(id).unwrap();
        assert_eq!(curve.times(), vec![0.0, 1.0, 2.0]);
        // Weight is just under 1 since no key sits exactly at the center
        for value in curve.values() {
            assert!((value - 10.0 / 3.0).abs() < 1e-2, "{value}");
        }
    }

    #[test]
    fn test_far_curve_is_culled() {
        let mut set = CurveSet::new();
        let near = set.add_curve(Curve::from_points("near", &[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)]));
        let far = set.add_curve(Curve::from_points("far", &[(500.0, 0.0), (510.0, 9.0), (520.0, 0.0)]));
        let mut spy = SpyStore { inner: set, committed: Vec::new() };

        let report = run(&mut spy, [10.0, 5.0], &settings(BrushMode::Smooth, 50.0, 1.0));

        assert_eq!(report.curves_visited, 2);
        assert_eq!(report.curves_culled, 1);
        assert_eq!(spy.committed, vec![near]);
        assert_eq!(spy.inner.curve(far).unwrap().values(), vec![0.0, 9.0, 0.0]);
    }

    #[test]
    fn test_brush_inside_long_curve_is_not_culled() {
        let mut set = CurveSet::new();
        let points: Vec<_> = (0..=100).map(|i| (i as f32 * 10.0, (i % 2) as f32 * 10.0)).collect();
        set.add_curve(Curve::from_points("long", &points));

        let report = run(&mut set, [500.0, 5.0], &settings(BrushMode::Smooth, 30.0, 1.0));
        assert_eq!(report.curves_culled, 0);
        assert!(report.keyframes_transformed > 0);
    }

    #[test]
    fn test_hidden_curve_is_skipped() {
        let mut curve = Curve::from_points("a", &[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)]);
        curve.hidden = true;
        let mut set = CurveSet::new();
        let id = set.add_curve(curve);

        let report = run(&mut set, [1.0, 5.0], &settings(BrushMode::Flatten, 500.0, 1.0));
        assert_eq!(report, PassReport::default());
        assert_eq!(set.curve(id).unwrap().values(), vec![0.0, 10.0, 0.0]);
    }

    #[test]
    fn test_candidate_stride_is_by_index() {
        let curve = Curve::from_points(
            "a",
            &[(0.0, 0.0), (0.1, 0.0), (0.2, 0.0), (5.0, 0.0), (9.0, 0.0), (9.5, 0.0), (20.0, 0.0)],
        );
        let mut s = BrushSettings {
            sample_stride: 3,
            ..BrushSettings::default()
        };
        assert_eq!(candidate_indices(&curve, &s), vec![0, 3, 6]);

        s.use_acceleration = false;
        assert_eq!(candidate_indices(&curve, &s).len(), 7);
    }

    #[test]
    fn test_affect_selected_filters_after_stride() {
        let mut curve = Curve::from_points("a", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        curve.keyframes[1].selected = true;
        curve.keyframes[2].selected = true;
        let s = BrushSettings {
            sample_stride: 2,
            affect_selected: true,
            ..BrushSettings::default()
        };
        assert_eq!(candidate_indices(&curve, &s), vec![2]);
    }

    #[test]
    fn test_select_while_painting() {
        let mut set = CurveSet::new();
        let id = set.add_curve(Curve::from_points("a", &[(0.0, 0.0), (100.0, 0.0)]));
        let s = BrushSettings {
            select_while_painting: true,
            ..settings(BrushMode::Smooth, 10.0, 1.0)
        };

        run(&mut set, [0.0, 0.0], &s);
        let curve = set.curve(id).unwrap();
        assert!(curve.keyframes[0].selected);
        assert!(!curve.keyframes[1].selected);
    }

    #[test]
    fn test_relax_keeps_order_and_boundaries() {
        let mut set = CurveSet::new();
        let id = set.add_curve(Curve::from_points("a", &[(0.0, 0.0), (3.0, 1.0), (4.0, 2.0), (10.0, 3.0)]));

        let report = run(&mut set, [5.0, 1.5], &settings(BrushMode::Relax, 500.0, 1.0));
        assert_eq!(report.keyframes_transformed, 4);

        let curve = set.curve(id).unwrap();
        let times = curve.times();
        assert!(curve.is_sorted());
        assert_eq!(times[0], 0.0);
        assert_eq!(times[3], 10.0);
        assert!(times[1] < 3.0 && times[2] > 4.0);
        assert_eq!(curve.values(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_noise_applies_to_boundaries() {
        let mut set = CurveSet::new();
        let id = set.add_curve(Curve::from_points("a", &[(0.0, 0.0)]));

        run(&mut set, [0.0, 0.0], &settings(BrushMode::Noise, 10.0, 0.5));
        assert_eq!(set.curve(id).unwrap().values(), vec![0.5]);
    }
}
