//! Geometric value types: points, segments and bounding boxes.
//!
//! All coordinates are `f64` document units. Arithmetic goes through
//! `glam::DVec2`; the wrappers here carry the domain operations
//! (matching, projection, overlap) the reconstruction stages need.

use std::fmt;
use std::ops::{Add, Sub};

use glam::{DVec2, dvec2};

/// Relative threshold under which two directions count as parallel when
/// solving for an intersection.
const PARALLEL_CROSS_EPS: f64 = 1e-12;

/// Round a value to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // Avoid "-0" leaking into hashes and snapshots
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// A point in document space
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// The point as a glam vector
    #[inline]
    pub fn vec(self) -> DVec2 {
        dvec2(self.x, self.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.vec().distance(other.vec())
    }

    pub fn midpoint(self, other: Point) -> Point {
        ((self.vec() + other.vec()) * 0.5).into()
    }

    /// Unit vector pointing from `self` towards `other`.
    /// Returns None when the points coincide.
    pub fn unit_towards(self, other: Point) -> Option<DVec2> {
        (other.vec() - self.vec()).try_normalize()
    }

    /// Orthogonal projection onto the infinite line through `line`.
    /// A zero-length line projects everything onto its single point.
    pub fn project_onto(self, line: &Segment) -> Point {
        match line.direction() {
            Some(dir) => {
                let t = (self.vec() - line.p0.vec()).dot(dir);
                (line.p0.vec() + dir * t).into()
            }
            None => line.p0,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn rounded(self, decimals: u32) -> Point {
        Point::new(round_to(self.x, decimals), round_to(self.y, decimals))
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Translate a point by a displacement
impl Add<DVec2> for Point {
    type Output = Point;
    fn add(self, rhs: DVec2) -> Point {
        (self.vec() + rhs).into()
    }
}

/// Subtract two points to get a displacement
impl Sub<Point> for Point {
    type Output = DVec2;
    fn sub(self, rhs: Point) -> DVec2 {
        self.vec() - rhs.vec()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Relative orientation of two nearly-collinear segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Same direction: p0 matches p0
    Parallel,
    /// Opposite direction: p0 matches p1
    Antiparallel,
}

/// A straight line segment between two points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p0: Point,
    pub p1: Point,
}

impl Segment {
    pub const fn new(p0: Point, p1: Point) -> Self {
        Segment { p0, p1 }
    }

    #[inline]
    pub fn vector(&self) -> DVec2 {
        self.p1 - self.p0
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    /// Unit direction from p0 to p1; None for zero-length segments
    pub fn direction(&self) -> Option<DVec2> {
        self.vector().try_normalize()
    }

    /// Direction angle in radians, in (-pi, pi]
    pub fn angle(&self) -> f64 {
        let v = self.vector();
        v.y.atan2(v.x)
    }

    pub fn midpoint(&self) -> Point {
        self.p0.midpoint(self.p1)
    }

    pub fn endpoints(&self) -> [Point; 2] {
        [self.p0, self.p1]
    }

    pub fn reversed(&self) -> Segment {
        Segment::new(self.p1, self.p0)
    }

    /// Angle between the two directions, in [0, pi].
    /// None if either segment has zero length.
    pub fn angle_to(&self, other: &Segment) -> Option<f64> {
        let a = self.direction()?;
        let b = other.direction()?;
        Some(a.dot(b).clamp(-1.0, 1.0).acos())
    }

    /// Parallel or antiparallel within `angle_eps` radians
    pub fn orientation(&self, other: &Segment, angle_eps: f64) -> Option<Orientation> {
        let angle = self.angle_to(other)?;
        if angle < angle_eps {
            Some(Orientation::Parallel)
        } else if std::f64::consts::PI - angle < angle_eps {
            Some(Orientation::Antiparallel)
        } else {
            None
        }
    }

    /// Distance from `p` to the infinite line through this segment
    pub fn distance_to_line(&self, p: Point) -> f64 {
        match self.direction() {
            Some(dir) => dir.perp_dot(p - self.p0).abs(),
            None => self.p0.distance(p),
        }
    }

    /// Distance from `p` to the closest point of the segment itself
    pub fn distance_to_segment(&self, p: Point) -> f64 {
        let len2 = self.vector().length_squared();
        if len2 == 0.0 {
            return self.p0.distance(p);
        }
        let t = ((p - self.p0).dot(self.vector()) / len2).clamp(0.0, 1.0);
        (self.p0 + self.vector() * t).distance(p)
    }

    /// Mean perpendicular distance of `other`'s endpoints from this line
    pub fn perpendicular_distance(&self, other: &Segment) -> f64 {
        0.5 * (self.distance_to_line(other.p0) + self.distance_to_line(other.p1))
    }

    /// Signed position of `p` along this segment's axis, in length units
    /// measured from p0
    pub fn axis_position(&self, p: Point) -> f64 {
        match self.direction() {
            Some(dir) => (p - self.p0).dot(dir),
            None => 0.0,
        }
    }

    /// Whether the projections of the two segments onto a shared axis
    /// overlap, trying both segments' axes
    pub fn overlaps(&self, other: &Segment, eps: f64) -> bool {
        self.overlaps_on_axis(other, eps) || other.overlaps_on_axis(self, eps)
    }

    fn overlaps_on_axis(&self, other: &Segment, eps: f64) -> bool {
        let len = self.length();
        let a = self.axis_position(other.p0);
        let b = self.axis_position(other.p1);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        lo.max(0.0) <= hi.min(len) + eps
    }

    /// How `other`'s endpoints pair with this segment's: `Parallel` pairs
    /// p0 with p0, `Antiparallel` pairs p0 with p1. The pairing with the
    /// smaller total separation wins; on a tie, the one holding the single
    /// closest pair.
    pub fn endpoint_pairing(&self, other: &Segment) -> Orientation {
        let straight = (self.p0.distance(other.p0), self.p1.distance(other.p1));
        let crossed = (self.p0.distance(other.p1), self.p1.distance(other.p0));
        let key = |(a, b): (f64, f64)| (a + b, a.min(b));
        let (s, c) = (key(straight), key(crossed));
        if c.0 < s.0 || (c.0 == s.0 && c.1 < s.1) {
            Orientation::Antiparallel
        } else {
            Orientation::Parallel
        }
    }

    /// `other`, reversed if needed so its p0 pairs with this p0
    pub fn aligned(&self, other: &Segment) -> Segment {
        match self.endpoint_pairing(other) {
            Orientation::Parallel => *other,
            Orientation::Antiparallel => other.reversed(),
        }
    }

    /// Intersection of the two infinite lines.
    /// None for parallel, coincident or zero-length input.
    pub fn intersection(&self, other: &Segment) -> Option<Point> {
        let d1 = self.vector();
        let d2 = other.vector();
        let cross = d1.perp_dot(d2);
        if cross.abs() <= PARALLEL_CROSS_EPS * d1.length() * d2.length() || cross == 0.0 {
            return None;
        }
        let t = (other.p0 - self.p0).perp_dot(d2) / cross;
        let p: Point = self.p0 + d1 * t;
        p.is_finite().then_some(p)
    }

    /// Parameter of the projection of `p`: 0 at p0, 1 at p1
    pub fn parameter_of(&self, p: Point) -> f64 {
        let len2 = self.vector().length_squared();
        if len2 == 0.0 {
            return 0.0;
        }
        (p - self.p0).dot(self.vector()) / len2
    }

    /// Whether `p` projects within the segment's span, widened by `slack`
    /// (as a fraction of the length) at each end
    pub fn spans(&self, p: Point, slack: f64) -> bool {
        let t = self.parameter_of(p);
        t >= -slack && t <= 1.0 + slack
    }

    pub fn rounded(&self, decimals: u32) -> Segment {
        Segment::new(self.p0.rounded(decimals), self.p1.rounded(decimals))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.p0, self.p1)
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BBox {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: Point::new(f64::MAX, f64::MAX),
            max: Point::new(f64::MIN, f64::MIN),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bb = BBox::new();
        for p in points {
            bb.expand_point(*p);
        }
        bb
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_point(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max.x - self.min.x }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max.y - self.min.y }
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }
}
