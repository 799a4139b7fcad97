//! Geometry helpers shared by the selection tools and paint ops.
//!
//! - **Point**: 2D vector/point in image pixel space
//! - **Rect**: integer pixel rectangle with inclusive right/bottom edges
//! - **Angles**: normalization and shortest angular distance
//! - **Lines**: distance to an infinite line, projection onto a vector

use std::f32::consts::PI;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Fully selected mask value.
pub const MAX_SELECTED: u8 = u8::MAX;
/// Unselected mask value.
pub const MIN_SELECTED: u8 = 0;
/// Mask values at or above this count as selected.
pub const SELECTION_THRESHOLD: u8 = 1;

/// A 2D point with sub-pixel precision.
///
/// Doubles as a free vector for tangents and search directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(&self, other: &Point) -> f32 {
        (*other - *self).length()
    }

    pub fn square_distance_to(&self, other: &Point) -> f32 {
        pow2(self.x - other.x) + pow2(self.y - other.y)
    }

    pub fn dot(&self, other: &Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return None;
        }
        Some(Point::new(self.x / len, self.y / len))
    }

    /// Rotate by 90 degrees clockwise in image coordinates: `(y, -x)`.
    pub fn rotate_clockwise(&self) -> Point {
        Point::new(self.y, -self.x)
    }

    /// Rotate by 90 degrees anti-clockwise in image coordinates: `(-y, x)`.
    pub fn rotate_anticlockwise(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Pixel containing this point (floor of both coordinates).
    pub fn to_pixel(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Integer pixel rectangle. `right()` and `bottom()` are inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow by `offset` on every side.
    pub fn grown(&self, offset: i32) -> Rect {
        Rect::new(
            self.x - offset,
            self.y - offset,
            self.width + 2 * offset,
            self.height + 2 * offset,
        )
    }

    /// Overlap of two rects; empty (zero size) when they do not touch.
    pub fn intersected(&self, other: &Rect) -> Rect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return Rect::default();
        }
        Rect::new(left, top, right - left + 1, bottom - top + 1)
    }

    /// Translate `self` so it lies inside `bounds` where possible.
    ///
    /// Right/bottom are pulled in first, then left/top, so a rect larger
    /// than `bounds` ends up aligned to the top-left corner.
    pub fn ensure_in(&self, bounds: &Rect) -> Rect {
        let mut rc = *self;
        if rc.right() > bounds.right() {
            rc = rc.translated(bounds.right() - rc.right(), 0);
        }
        if rc.left() < bounds.left() {
            rc = rc.translated(bounds.left() - rc.left(), 0);
        }
        if rc.bottom() > bounds.bottom() {
            rc = rc.translated(0, bounds.bottom() - rc.bottom());
        }
        if rc.top() < bounds.top() {
            rc = rc.translated(0, bounds.top() - rc.top());
        }
        rc
    }
}

#[inline]
pub fn pow2(x: f32) -> f32 {
    x * x
}

pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * PI / 180.0
}

pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * 180.0 / PI
}

/// Convert `a` to the `[0, 2π)` range.
pub fn normalize_angle(a: f32) -> f32 {
    let a = a.rem_euclid(2.0 * PI);
    // rem_euclid may round up to exactly 2π for tiny negative inputs
    if a >= 2.0 * PI {
        0.0
    } else {
        a
    }
}

/// Convert `a` to the `[0, 360)` range.
pub fn normalize_angle_degrees(a: f32) -> f32 {
    let a = a.rem_euclid(360.0);
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Smallest absolute angle between `a` and `b`, in `[0, π]`.
pub fn shortest_angular_distance(a: f32, b: f32) -> f32 {
    let dist = (a - b).abs() % (2.0 * PI);
    if dist > PI {
        2.0 * PI - dist
    } else {
        dist
    }
}

/// Step `a` by `inc` toward whichever side ends up closer to `direction`.
pub fn increment_in_direction(a: f32, inc: f32, direction: f32) -> f32 {
    let b1 = a + inc;
    let b2 = a - inc;
    if shortest_angular_distance(b1, direction) < shortest_angular_distance(b2, direction) {
        b1
    } else {
        b2
    }
}

/// Distance from `m` to the infinite line through `p1` and `p2`.
///
/// Degenerates to the distance between `m` and `p1` when the points coincide.
pub fn distance_to_line(m: Point, p1: Point, p2: Point) -> f32 {
    let d = p2 - p1;
    let len = d.length();
    if len <= f32::EPSILON {
        return m.distance_to(&p1);
    }
    // |cross(d, m - p1)| / |d|
    let v = m - p1;
    (d.x * v.y - d.y * v.x).abs() / len
}

/// Project `v` onto the direction of `base`.
pub fn project_on_vector(base: Point, v: Point) -> Point {
    let length_sq = base.dot(&base);
    if length_sq <= f32::EPSILON {
        return Point::ZERO;
    }
    base * (base.dot(&v) / length_sq)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_rotations_are_perpendicular() {
        let v = Point::new(1.0, 0.0);
        assert_eq!(v.rotate_clockwise(), Point::new(0.0, -1.0));
        assert_eq!(v.rotate_anticlockwise(), Point::new(0.0, 1.0));
        assert_eq!(v.rotate_clockwise().rotate_anticlockwise(), v);
    }

    #[test]
    fn test_normalized_zero_vector() {
        assert!(Point::ZERO.normalized().is_none());
        let n = Point::new(3.0, 4.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_to_pixel_floors_negative() {
        assert_eq!(Point::new(-0.5, 2.9).to_pixel(), (-1, 2));
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < EPS);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-4);
        assert!((normalize_angle_degrees(-90.0) - 270.0).abs() < EPS);
        assert!((normalize_angle_degrees(725.0) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_shortest_angular_distance_wraps() {
        let d = shortest_angular_distance(0.1, 2.0 * PI - 0.1);
        assert!((d - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_increment_in_direction() {
        assert!((increment_in_direction(1.0, 0.5, 2.0) - 1.5).abs() < EPS);
        assert!((increment_in_direction(1.0, 0.5, 0.0) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_distance_to_line() {
        let d = distance_to_line(Point::new(0.0, 5.0), Point::new(-1.0, 0.0), Point::new(1.0, 0.0));
        assert!((d - 5.0).abs() < EPS);
        let diag = distance_to_line(Point::new(1.0, 0.0), Point::ZERO, Point::new(1.0, 1.0));
        assert!((diag - 0.5f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_project_on_vector() {
        let p = project_on_vector(Point::new(2.0, 0.0), Point::new(3.0, 4.0));
        assert!((p.x - 3.0).abs() < EPS && p.y.abs() < EPS);
    }

    #[test]
    fn test_rect_ensure_in() {
        let bounds = Rect::new(0, 0, 100, 100);
        let rc = Rect::new(95, -3, 10, 10).ensure_in(&bounds);
        assert_eq!(rc, Rect::new(90, 0, 10, 10));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersected(&Rect::new(5, 5, 10, 10)), Rect::new(5, 5, 5, 5));
        assert!(a.intersected(&Rect::new(20, 20, 2, 2)).is_empty());
        assert_eq!(a.grown(2), Rect::new(-2, -2, 14, 14));
    }
}
