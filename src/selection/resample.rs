//! Path resampling into evenly spaced search origins.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectError};
use crate::geometry::Point;

/// How distance left over between input vertices is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleMode {
    /// Points closer than the spacing to the last accepted point are skipped
    /// and their distance is dropped. Matches selections made by older
    /// versions of the tool.
    #[default]
    Legacy,
    /// Leftover distance carries over to the next segment, so output points
    /// are exactly `spacing` apart along the polyline.
    Uniform,
}

/// Drop the repeated closing vertex of a closed path.
pub fn open_polyline(points: &[Point]) -> Vec<Point> {
    let mut out = points.to_vec();
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

/// Resample `curve` with [`ResampleMode::Legacy`].
pub fn resample(curve: &[Point], spacing: f32) -> Result<Vec<Point>> {
    resample_with_mode(curve, spacing, ResampleMode::Legacy)
}

/// Produce points along `curve` spaced `spacing` apart.
///
/// The first output point is always the first curve point. Curves with
/// fewer than two points give an empty result, which callers treat as
/// "nothing to select".
pub fn resample_with_mode(curve: &[Point], spacing: f32, mode: ResampleMode) -> Result<Vec<Point>> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(SelectError::InvalidConfig(format!(
            "resample spacing must be positive, got {}",
            spacing
        )));
    }
    if curve.len() < 2 {
        return Ok(Vec::new());
    }

    Ok(match mode {
        ResampleMode::Legacy => resample_legacy(curve, spacing),
        ResampleMode::Uniform => resample_uniform(curve, spacing),
    })
}

fn resample_legacy(curve: &[Point], spacing: f32) -> Vec<Point> {
    let mut points = vec![curve[0]];
    let mut last = curve[0];

    for &target in &curve[1..] {
        let d = last.distance_to(&target);
        if d < spacing {
            continue;
        }
        let Some(dir) = (target - last).normalized() else {
            continue;
        };
        let step = dir * spacing;
        for _ in 0..(d / spacing).floor() as usize {
            last += step;
            points.push(last);
        }
    }

    points
}

fn resample_uniform(curve: &[Point], spacing: f32) -> Vec<Point> {
    let mut points = vec![curve[0]];
    // arc length walked since the last emitted point
    let mut carry = 0.0f32;

    for seg in curve.windows(2) {
        let (a, b) = (seg[0], seg[1]);
        let len = a.distance_to(&b);
        let Some(dir) = (b - a).normalized() else {
            continue;
        };

        let mut t = spacing - carry;
        while t <= len {
            points.push(a + dir * t);
            t += spacing;
        }
        carry = len - (t - spacing);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn pts(raw: &[(f32, f32)]) -> Vec<Point> {
        raw.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn test_straight_line() {
        let curve = pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let out = resample(&curve, 2.0).unwrap();

        assert_eq!(out.len(), 11);
        for (i, p) in out.iter().enumerate() {
            assert!((p.x - 2.0 * i as f32).abs() < EPS);
            assert!(p.y.abs() < EPS);
        }
    }

    #[test]
    fn test_close_points_skipped_without_accumulating() {
        // (1.5, 0) is too close and dropped; (3, 0) is 3.0 from the origin
        // so exactly one point lands at x=2.
        let curve = pts(&[(0.0, 0.0), (1.5, 0.0), (3.0, 0.0)]);
        let out = resample(&curve, 2.0).unwrap();
        assert_eq!(out.len(), 2);
        assert!((out[1].x - 2.0).abs() < EPS);
    }

    #[test]
    fn test_uniform_carries_leftover() {
        let curve = pts(&[(0.0, 0.0), (1.5, 0.0), (1.5, 1.5)]);
        let out = resample_with_mode(&curve, 1.0, ResampleMode::Uniform).unwrap();

        // Total arc length 3.0 -> points at 0, 1, 2, 3
        assert_eq!(out.len(), 4);
        assert!((out[2].x - 1.5).abs() < EPS && (out[2].y - 0.5).abs() < EPS);
        assert!((out[3].y - 1.5).abs() < EPS);
    }

    #[test]
    fn test_degenerate_curves() {
        assert!(resample(&[], 2.0).unwrap().is_empty());
        assert!(resample(&pts(&[(1.0, 1.0)]), 2.0).unwrap().is_empty());
        let same = pts(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        assert_eq!(resample(&same, 2.0).unwrap(), pts(&[(1.0, 1.0)]));
    }

    #[test]
    fn test_invalid_spacing() {
        let curve = pts(&[(0.0, 0.0), (5.0, 0.0)]);
        assert!(resample(&curve, 0.0).is_err());
        assert!(resample(&curve, f32::NAN).is_err());
    }

    #[test]
    fn test_open_polyline() {
        let closed = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)]);
        assert_eq!(open_polyline(&closed).len(), 3);

        let open = pts(&[(0.0, 0.0), (4.0, 0.0)]);
        assert_eq!(open_polyline(&open), open);

        let single = pts(&[(2.0, 2.0)]);
        assert_eq!(open_polyline(&single), single);
    }

    proptest! {
        #[test]
        fn prop_spacing_invariant(
            raw in prop::collection::vec((0.0f32..200.0, 0.0f32..200.0), 2..40),
            spacing in 0.5f32..8.0,
            uniform in any::<bool>(),
        ) {
            let curve = pts(&raw);
            let mode = if uniform { ResampleMode::Uniform } else { ResampleMode::Legacy };
            let out = resample_with_mode(&curve, spacing, mode).unwrap();

            prop_assert_eq!(out[0], curve[0]);
            if !uniform {
                // legacy output chains straight hops of exactly `spacing`
                for pair in out.windows(2) {
                    prop_assert!(pair[0].distance_to(&pair[1]) >= spacing - EPS);
                }
            } else {
                // uniform output may cut corners, never exceeding the arc step
                for pair in out.windows(2) {
                    prop_assert!(pair[0].distance_to(&pair[1]) <= spacing + EPS);
                }
            }
        }
    }
}
