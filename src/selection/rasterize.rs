//! Polygon rasterization into selection masks.
//!
//! The host normally owns selection storage and implements
//! [`SelectionRasterizer`] itself. [`MaskRasterizer`] is the stand-alone
//! implementation: it tests pixel centers row by row and produces a plain
//! byte mask (255 = selected, 0 = not selected).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectError};
use crate::geometry::{Point, MAX_SELECTED, MIN_SELECTED, SELECTION_THRESHOLD};

/// Rule deciding which regions of a self-intersecting polygon are inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// How a new selection is merged with the existing one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionAction {
    #[default]
    Replace,
    Add,
    Subtract,
    Intersect,
}

/// Turns a closed boundary polygon into a persisted selection.
pub trait SelectionRasterizer {
    /// Opaque handle for the produced selection.
    type Handle;

    fn rasterize(&mut self, polygon: &[Point], rule: FillRule) -> Self::Handle;
}

/// Byte mask covering a whole image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionMask {
    pub width: usize,
    pub height: usize,
    /// Row-major mask values
    pub mask: Vec<u8>,
}

impl SelectionMask {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            mask: vec![MIN_SELECTED; width * height],
        }
    }

    pub fn is_selected(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.mask[y * self.width + x] >= SELECTION_THRESHOLD
    }

    /// Number of selected pixels
    pub fn pixel_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v >= SELECTION_THRESHOLD).count()
    }

    /// Bounds of the selected region as (x, y, width, height).
    pub fn bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut min_x = self.width;
        let mut min_y = self.height;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut any = false;

        for (i, &v) in self.mask.iter().enumerate() {
            if v >= SELECTION_THRESHOLD {
                let (x, y) = (i % self.width, i / self.width);
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
                any = true;
            }
        }

        any.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Merge `other` into this selection.
    pub fn combine(&self, other: &SelectionMask, action: SelectionAction) -> Result<SelectionMask> {
        if self.width != other.width || self.height != other.height {
            return Err(SelectError::WrongSize {
                expected: self.mask.len(),
                actual: other.mask.len(),
            });
        }

        let mask = match action {
            SelectionAction::Replace => other.mask.clone(),
            _ => self
                .mask
                .par_iter()
                .zip(other.mask.par_iter())
                .map(|(&a, &b)| match action {
                    SelectionAction::Add => a.max(b),
                    SelectionAction::Subtract => a.min(MAX_SELECTED - b),
                    SelectionAction::Intersect => a.min(b),
                    SelectionAction::Replace => b,
                })
                .collect(),
        };

        Ok(SelectionMask {
            width: self.width,
            height: self.height,
            mask,
        })
    }
}

/// Scanline rasterizer producing [`SelectionMask`]s of a fixed size.
#[derive(Clone, Copy, Debug)]
pub struct MaskRasterizer {
    pub width: usize,
    pub height: usize,
}

impl MaskRasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

impl SelectionRasterizer for MaskRasterizer {
    type Handle = SelectionMask;

    fn rasterize(&mut self, polygon: &[Point], rule: FillRule) -> SelectionMask {
        fill_polygon(polygon, self.width, self.height, rule)
    }
}

/// Fill a closed polygon, selecting every pixel whose center is inside.
///
/// Polygons with fewer than 3 vertices select nothing.
pub fn fill_polygon(polygon: &[Point], width: usize, height: usize, rule: FillRule) -> SelectionMask {
    let mut result = SelectionMask::empty(width, height);
    if polygon.len() < 3 || width == 0 || height == 0 {
        return result;
    }

    result
        .mask
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let yc = y as f32 + 0.5;
            let mut crossings = row_crossings(polygon, yc);
            if crossings.is_empty() {
                return;
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0i32;
            for (k, &(x, dir)) in crossings.iter().enumerate() {
                winding += dir;
                let inside = match rule {
                    FillRule::NonZero => winding != 0,
                    FillRule::EvenOdd => (k + 1) % 2 == 1,
                };
                let Some(&(next_x, _)) = crossings.get(k + 1) else {
                    break;
                };
                if inside {
                    fill_span(row, x, next_x);
                }
            }
        });

    result
}

/// X positions where the polygon edges cross the horizontal line `yc`,
/// with +1 for downward and -1 for upward edges.
fn row_crossings(polygon: &[Point], yc: f32) -> Vec<(f32, i32)> {
    let n = polygon.len();
    let mut crossings = Vec::new();
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let dir = if a.y <= yc && yc < b.y {
            1
        } else if b.y <= yc && yc < a.y {
            -1
        } else {
            continue;
        };
        let x = a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y);
        crossings.push((x, dir));
    }
    crossings
}

/// Select pixels whose centers lie in `[x0, x1)`.
fn fill_span(row: &mut [u8], x0: f32, x1: f32) {
    let width = row.len() as f32;
    let start = (x0 - 0.5).ceil().clamp(0.0, width) as usize;
    let end = (x1 - 0.5).ceil().clamp(0.0, width) as usize;
    if start < end {
        row[start..end].fill(MAX_SELECTED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f32, f32)]) -> Vec<Point> {
        raw.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn test_fill_rectangle() {
        let square = pts(&[(2.0, 2.0), (6.0, 2.0), (6.0, 5.0), (2.0, 5.0)]);
        let mask = fill_polygon(&square, 10, 10, FillRule::NonZero);

        assert_eq!(mask.pixel_count(), 12);
        assert_eq!(mask.bounds(), Some((2, 2, 4, 3)));
        assert!(mask.is_selected(2, 2));
        assert!(!mask.is_selected(6, 2));
    }

    #[test]
    fn test_orientation_does_not_matter() {
        let cw = pts(&[(1.0, 1.0), (7.0, 1.0), (7.0, 7.0), (1.0, 7.0)]);
        let ccw: Vec<Point> = cw.iter().rev().copied().collect();

        assert_eq!(
            fill_polygon(&cw, 8, 8, FillRule::NonZero),
            fill_polygon(&ccw, 8, 8, FillRule::NonZero)
        );
    }

    #[test]
    fn test_triangle_inside_bounds() {
        let tri = pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        let mask = fill_polygon(&tri, 10, 10, FillRule::NonZero);

        assert!(mask.is_selected(0, 0));
        assert!(mask.is_selected(4, 4));
        assert!(!mask.is_selected(6, 6));
        // Right isosceles triangle, pixel centers strictly inside: 45 of 100
        assert_eq!(mask.pixel_count(), 45);
    }

    #[test]
    fn test_fill_rules_differ_on_overlap() {
        // Two overlapping squares traced in the same direction as one polygon
        let poly = pts(&[
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 6.0),
            (0.0, 6.0),
            (0.0, 0.0),
            (2.0, 2.0),
            (8.0, 2.0),
            (8.0, 8.0),
            (2.0, 8.0),
            (2.0, 2.0),
        ]);

        let non_zero = fill_polygon(&poly, 10, 10, FillRule::NonZero);
        let even_odd = fill_polygon(&poly, 10, 10, FillRule::EvenOdd);

        assert!(non_zero.is_selected(4, 4));
        assert!(!even_odd.is_selected(4, 4));
        assert!(even_odd.is_selected(1, 1));
        assert!(even_odd.is_selected(7, 7));
    }

    #[test]
    fn test_degenerate_polygon() {
        let line = pts(&[(0.0, 0.0), (5.0, 5.0)]);
        let mask = fill_polygon(&line, 8, 8, FillRule::NonZero);
        assert_eq!(mask.pixel_count(), 0);
        assert!(mask.bounds().is_none());
    }

    #[test]
    fn test_polygon_clipped_to_image() {
        let big = pts(&[(-5.0, -5.0), (50.0, -5.0), (50.0, 50.0), (-5.0, 50.0)]);
        let mask = MaskRasterizer::new(4, 3).rasterize(&big, FillRule::NonZero);
        assert_eq!(mask.pixel_count(), 12);
    }

    #[test]
    fn test_combine_actions() {
        let a = fill_polygon(&pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]), 8, 4, FillRule::NonZero);
        let b = fill_polygon(&pts(&[(2.0, 0.0), (6.0, 0.0), (6.0, 4.0), (2.0, 4.0)]), 8, 4, FillRule::NonZero);

        assert_eq!(a.combine(&b, SelectionAction::Replace).unwrap(), b);
        assert_eq!(a.combine(&b, SelectionAction::Add).unwrap().pixel_count(), 24);
        assert_eq!(a.combine(&b, SelectionAction::Intersect).unwrap().pixel_count(), 8);

        let sub = a.combine(&b, SelectionAction::Subtract).unwrap();
        assert_eq!(sub.bounds(), Some((0, 0, 2, 4)));
    }

    #[test]
    fn test_combine_size_mismatch() {
        let a = SelectionMask::empty(4, 4);
        let b = SelectionMask::empty(5, 4);
        assert!(matches!(
            a.combine(&b, SelectionAction::Add),
            Err(SelectError::WrongSize { .. })
        ));
    }
}
