//! Integer grid vectors, padded rectangles, and line segments.
//!
//! Grid positions are integral. Rectangles use `f64` edges because hit-testing
//! and overlap checks pad them by fractional cell amounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A point or extent on the chip grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component (grows downwards).
    pub y: i32,
}

impl Vec2 {
    /// The origin.
    pub const ZERO: Vec2 = Vec2 { x: 0, y: 0 };
    /// The unit extent `{1, 1}`.
    pub const ONE: Vec2 = Vec2 { x: 1, y: 1 };

    /// Creates a vector from its components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_squared(self, other: Vec2) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Vec2) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(self, other: Vec2) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Clamps both components into `[min, max]`.
    pub fn clamp(self, min: i32, max: i32) -> Self {
        Self::new(self.x.max(min).min(max), self.y.max(min).min(max))
    }

    /// Clamps each component into the matching component range of `min`..=`max`.
    ///
    /// When `max` is smaller than `min` on an axis, `min` wins.
    pub fn clamp_vec(self, min: Vec2, max: Vec2) -> Self {
        Self::new(self.x.min(max.x).max(min.x), self.y.min(max.y).max(min.y))
    }

    /// Area of the extent, `x * y`.
    pub fn area(self) -> i64 {
        i64::from(self.x) * i64::from(self.y)
    }

    /// Returns the vector with its components exchanged.
    pub fn swap(self) -> Self {
        Self::new(self.y, self.x)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: i32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Largest width and height a chip type may have, in type units.
pub const MAX_TYPE_SIZE: Vec2 = Vec2::new(1000, 1000);

/// An axis-aligned rectangle in grid space.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Rect {
    /// A degenerate rectangle covering a single point.
    pub fn from_point(p: Vec2) -> Self {
        let (x, y) = (f64::from(p.x), f64::from(p.y));
        Self {
            left: x,
            right: x,
            top: y,
            bottom: y,
        }
    }

    /// Rectangle spanning from `tl` to `br`.
    pub fn from_corners(tl: Vec2, br: Vec2) -> Self {
        Self {
            left: f64::from(tl.x),
            right: f64::from(br.x),
            top: f64::from(tl.y),
            bottom: f64::from(br.y),
        }
    }

    /// Rectangle at `pos` with extent `size`.
    pub fn from_pos_and_size(pos: Vec2, size: Vec2) -> Self {
        Self::from_corners(pos, pos + size)
    }

    /// Grows the rectangle by `pad` on every side.
    pub fn pad(self, pad: f64) -> Self {
        Self {
            left: self.left - pad,
            right: self.right + pad,
            top: self.top - pad,
            bottom: self.bottom + pad,
        }
    }

    /// Area of the overlap between two rectangles, zero when disjoint.
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let x = (self.right.min(other.right) - self.left.max(other.left)).max(0.0);
        let y = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0);
        x * y
    }

    /// Returns `true` if the point lies inside or on the border.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// A line segment between two grid points.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Line {
    /// First endpoint.
    pub start: Vec2,
    /// Second endpoint.
    pub end: Vec2,
}

impl Line {
    /// Creates a segment from `start` to `end`.
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Returns `true` if this segment touches or crosses `other`.
    pub fn intersects(&self, other: &Line) -> bool {
        let (a, b) = (to_f(self.start), to_f(self.end));
        let (c, d) = (to_f(other.start), to_f(other.end));
        segments_intersect(a, b, c, d)
    }

    /// Returns `true` if any part of the segment lies within `rect`.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let (a, b) = (to_f(self.start), to_f(self.end));
        if rect.contains(a.0, a.1) || rect.contains(b.0, b.1) {
            return true;
        }
        let tl = (rect.left, rect.top);
        let tr = (rect.right, rect.top);
        let bl = (rect.left, rect.bottom);
        let br = (rect.right, rect.bottom);
        segments_intersect(a, b, tl, tr)
            || segments_intersect(a, b, tr, br)
            || segments_intersect(a, b, br, bl)
            || segments_intersect(a, b, bl, tl)
    }
}

fn to_f(p: Vec2) -> (f64, f64) {
    (f64::from(p.x), f64::from(p.y))
}

fn orientation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

fn segments_intersect(a: (f64, f64), b: (f64, f64), c: (f64, f64), d: (f64, f64)) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if ((o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0))
        && ((o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0))
    {
        return true;
    }

    (o1 == 0.0 && on_segment(a, b, c))
        || (o2 == 0.0 && on_segment(a, b, d))
        || (o3 == 0.0 && on_segment(c, d, a))
        || (o4 == 0.0 && on_segment(c, d, b))
}
