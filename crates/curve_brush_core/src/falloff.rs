// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brush falloff weighting.

/// Weight of a keyframe `distance` pixels from the brush center.
///
/// Quadratic falloff: `strength` at the center, `0` at the rim and beyond.
pub fn falloff_weight(distance: f32, radius: f32, strength: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let d = distance / radius;
    if d > 1.0 {
        return 0.0;
    }
    strength * (1.0 - d * d)
}

/// Euclidean distance between two region-space points
pub fn screen_distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_outside_radius() {
        assert_eq!(falloff_weight(50.01, 50.0, 1.0), 0.0);
        assert_eq!(falloff_weight(500.0, 50.0, 0.7), 0.0);
    }

    #[test]
    fn test_strength_at_center() {
        assert_eq!(falloff_weight(0.0, 50.0, 0.35), 0.35);
        assert_eq!(falloff_weight(0.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_zero_at_rim() {
        assert_eq!(falloff_weight(50.0, 50.0, 1.0), 0.0);
    }

    #[test]
    fn test_monotonic_inside_radius() {
        let mut last = f32::INFINITY;
        for step in 0..=100 {
            let w = falloff_weight(step as f32 * 0.5, 50.0, 0.8);
            assert!(w <= last);
            last = w;
        }
    }

    #[test]
    fn test_degenerate_radius() {
        assert_eq!(falloff_weight(0.0, 0.0, 1.0), 0.0);
        assert_eq!(falloff_weight(0.0, -3.0, 1.0), 0.0);
    }

    #[test]
    fn test_screen_distance() {
        assert_eq!(screen_distance([0.0, 0.0], [3.0, 4.0]), 5.0);
    }
}
