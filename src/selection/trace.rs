//! Edge tracing across the user curve.
//!
//! For every resampled point the tracer takes the local tangent, steps half
//! the search distance to the clockwise side of the curve and walks back
//! across it one pixel at a time. The first pixel whose luminance differs
//! from the ray's starting value by more than the threshold is taken as the
//! edge. Rays that run out of distance or leave the image contribute nothing.

use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::Point;
use crate::selection::config::MagneticConfig;
use crate::selection::luminance::LuminanceField;
use crate::selection::resample::{open_polyline, resample_with_mode};

/// Result of one outline computation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutlineTrace {
    /// Resampled search origins along the user curve.
    pub path: Vec<Point>,
    /// Detected edge points in path order. Empty means no selection.
    pub boundary: Vec<Point>,
}

impl OutlineTrace {
    pub fn is_empty(&self) -> bool {
        self.boundary.is_empty()
    }
}

/// State of one search ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchRay {
    pub origin: Point,
    /// Unit step direction.
    pub direction: Point,
    /// Field samples taken so far, including the starting sample.
    pub samples: usize,
    pub start_value: Option<u8>,
}

impl SearchRay {
    /// Ray from `origin` along `direction`; `None` for a zero direction.
    pub fn new(origin: Point, direction: Point) -> Option<Self> {
        Some(Self {
            origin,
            direction: direction.normalized()?,
            samples: 0,
            start_value: None,
        })
    }

    /// Walk up to `max_distance` pixels and return the first point whose
    /// value differs from the start by more than `threshold`.
    ///
    /// Takes exactly `ceil(max_distance)` samples when nothing is found.
    pub fn walk<F>(&mut self, field: &F, max_distance: f32, threshold: i32) -> Option<Point>
    where
        F: LuminanceField + ?Sized,
    {
        if !(max_distance > 0.0) {
            return None;
        }

        let start = match field.sample(self.origin) {
            Ok(v) => v,
            Err(err) => {
                trace!(%err, "search ray starts outside the image");
                return None;
            }
        };
        self.samples = 1;
        self.start_value = Some(start);

        let mut step = 1usize;
        while (step as f32) < max_distance {
            let current = self.origin + self.direction * step as f32;
            let value = match field.sample(current) {
                Ok(v) => v,
                Err(err) => {
                    trace!(%err, step, "search ray left the image");
                    return None;
                }
            };
            self.samples += 1;

            if (value as i32 - start as i32).abs() > threshold {
                return Some(current);
            }
            step += 1;
        }

        None
    }
}

/// Walk from `origin` along `direction` looking for a luminance edge.
pub fn trace_edge<F>(
    origin: Point,
    direction: Point,
    field: &F,
    max_distance: f32,
    threshold: i32,
) -> Option<Point>
where
    F: LuminanceField + ?Sized,
{
    SearchRay::new(origin, direction)?.walk(field, max_distance, threshold)
}

/// Unit tangent of `path` at index `i`, from the previous to the next point.
///
/// At either end the missing neighbor is replaced by the point itself.
/// Returns `None` when the neighbors coincide.
pub fn tangent_at(path: &[Point], i: usize) -> Option<Point> {
    if i >= path.len() {
        return None;
    }
    let a = i.saturating_sub(1);
    let b = (i + 1).min(path.len() - 1);
    if a == b {
        return None;
    }
    (path[b] - path[a]).normalized()
}

/// Resample `curve` and trace an edge from every resampled point.
///
/// The first resampled point is skipped. Indices with a degenerate tangent
/// and rays without a hit are left out of the boundary.
pub fn compute_outline<F>(curve: &[Point], field: &F, config: &MagneticConfig) -> Result<OutlineTrace>
where
    F: LuminanceField + ?Sized,
{
    config.validate()?;

    let polyline = open_polyline(curve);
    let path = resample_with_mode(&polyline, config.accuracy, config.resample_mode)?;

    let max_distance = config.search_distance as f32;
    let half = max_distance / 2.0;
    let mut boundary = Vec::with_capacity(path.len());

    for i in 1..path.len() {
        let Some(tangent) = tangent_at(&path, i) else {
            trace!(index = i, "skipping degenerate tangent");
            continue;
        };
        let origin = path[i] + tangent.rotate_clockwise() * half;
        if let Some(hit) = trace_edge(
            origin,
            tangent.rotate_anticlockwise(),
            field,
            max_distance,
            config.threshold,
        ) {
            boundary.push(hit);
        }
    }

    debug!(
        curve = curve.len(),
        path = path.len(),
        hits = boundary.len(),
        "computed magnetic outline"
    );

    Ok(OutlineTrace { path, boundary })
}
