//! Classified shapes
//!
//! Each shape kind is its own type that knows how to:
//! - report its bounding box and characteristic vertices
//! - regenerate an equivalent drawing path
//! - round its coordinates
//!
//! [`Shape`] pairs the (immutable) geometry with mutable presentation
//! metadata: the renderer's style attributes and an optional id.

use enum_dispatch::enum_dispatch;
use std::fmt;

use crate::path::{PathCommand, RawPath};
use crate::types::{BBox, Point, Segment, round_to};

/// Cubic control-point distance for a quarter circle of unit radius
pub const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Style attributes carried opaquely from the renderer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
}

impl Style {
    pub fn stroked(stroke: impl Into<String>, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke.into()),
            stroke_width: Some(width),
        }
    }

    /// Fill unset attributes from an enclosing group's style
    pub fn inherit(&self, parent: &Style) -> Style {
        Style {
            fill: self.fill.clone().or_else(|| parent.fill.clone()),
            stroke: self.stroke.clone().or_else(|| parent.stroke.clone()),
            stroke_width: self.stroke_width.or(parent.stroke_width),
        }
    }
}

/// Which kind of shape the classifier produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Polygon,
    Polyline,
    Line,
    UnresolvedPath,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Line => "line",
            ShapeKind::UnresolvedPath => "unresolved",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common behavior for all shape geometries
#[enum_dispatch]
pub trait Geometry {
    fn kind(&self) -> ShapeKind;

    fn bbox(&self) -> BBox;

    /// Characteristic points (corners, vertices, endpoints)
    fn vertices(&self) -> Vec<Point>;

    /// A drawing path that classifies back to this geometry
    fn to_path(&self) -> RawPath;

    fn round_coords(&mut self, decimals: u32);
}

// ============================================================================
// Shape Types
// ============================================================================

/// A rectangle, possibly rotated, possibly with rounded corners.
/// Corners are in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub corners: [Point; 4],
    pub corner_radius: f64,
}

impl RectShape {
    pub fn new(corners: [Point; 4]) -> Self {
        Self {
            corners,
            corner_radius: 0.0,
        }
    }

    /// Axis-aligned rectangle from its minimum corner and size
    pub fn axis_aligned(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new([
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Length of the first side
    pub fn width(&self) -> f64 {
        self.corners[0].distance(self.corners[1])
    }

    /// Length of the second side
    pub fn height(&self) -> f64 {
        self.corners[1].distance(self.corners[2])
    }

    pub fn center(&self) -> Point {
        self.corners[0].midpoint(self.corners[2])
    }

    pub fn sides(&self) -> [Segment; 4] {
        std::array::from_fn(|i| Segment::new(self.corners[i], self.corners[(i + 1) % 4]))
    }
}

impl Geometry for RectShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
    }

    fn bbox(&self) -> BBox {
        BBox::from_points(&self.corners)
    }

    fn vertices(&self) -> Vec<Point> {
        self.corners.to_vec()
    }

    fn to_path(&self) -> RawPath {
        if self.corner_radius <= 0.0 {
            return RawPath::from_points(&self.corners, true);
        }
        let r = self.corner_radius;
        let sides = self.sides();
        let dirs: Vec<_> = sides.iter().map(|s| s.direction().unwrap_or_default()).collect();
        let start_of = |i: usize| self.corners[i] + dirs[i] * r;
        let mut commands = vec![PathCommand::MoveTo(start_of(0))];
        for i in 0..4 {
            let next = (i + 1) % 4;
            let corner = self.corners[next];
            let side_end = corner + dirs[i] * -r;
            let next_start = start_of(next);
            commands.push(PathCommand::LineTo(side_end));
            commands.push(PathCommand::CubicTo {
                c1: side_end + dirs[i] * (r * KAPPA),
                c2: next_start + dirs[next] * (-r * KAPPA),
                to: next_start,
            });
        }
        commands.push(PathCommand::Close);
        RawPath::new(commands)
    }

    fn round_coords(&mut self, decimals: u32) {
        for c in &mut self.corners {
            *c = c.rounded(decimals);
        }
        self.corner_radius = round_to(self.corner_radius, decimals);
    }
}

/// A circle shape
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub center: Point,
    pub radius: f64,
}

impl CircleShape {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Geometry for CircleShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn bbox(&self) -> BBox {
        let r = self.radius;
        BBox {
            min: Point::new(self.center.x - r, self.center.y - r),
            max: Point::new(self.center.x + r, self.center.y + r),
        }
    }

    fn vertices(&self) -> Vec<Point> {
        vec![self.center]
    }

    /// Four quarter arcs, starting east and turning towards +y
    fn to_path(&self) -> RawPath {
        let c = self.center;
        let r = self.radius;
        let k = r * KAPPA;
        let at = |dx: f64, dy: f64| Point::new(c.x + dx, c.y + dy);
        let arc = |c1, c2, to| PathCommand::CubicTo { c1, c2, to };
        RawPath::new(vec![
            PathCommand::MoveTo(at(r, 0.0)),
            arc(at(r, k), at(k, r), at(0.0, r)),
            arc(at(-k, r), at(-r, k), at(-r, 0.0)),
            arc(at(-r, -k), at(-k, -r), at(0.0, -r)),
            arc(at(k, -r), at(r, -k), at(r, 0.0)),
            PathCommand::Close,
        ])
    }

    fn round_coords(&mut self, decimals: u32) {
        self.center = self.center.rounded(decimals);
        self.radius = round_to(self.radius, decimals);
    }
}

/// A closed polygon; the closing edge is implicit
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub points: Vec<Point>,
}

impl PolygonShape {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Edges in drawing order, including the closing edge
    pub fn edges(&self) -> Vec<Segment> {
        let n = self.points.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n)
            .map(|i| Segment::new(self.points[i], self.points[(i + 1) % n]))
            .collect()
    }

    /// Unsigned area (shoelace formula)
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() * 0.5
    }
}

impl Geometry for PolygonShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    fn bbox(&self) -> BBox {
        BBox::from_points(&self.points)
    }

    fn vertices(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn to_path(&self) -> RawPath {
        RawPath::from_points(&self.points, true)
    }

    fn round_coords(&mut self, decimals: u32) {
        for p in &mut self.points {
            *p = p.rounded(decimals);
        }
    }
}

/// An open chain of straight segments
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineShape {
    pub points: Vec<Point>,
}

impl PolylineShape {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.points
            .windows(2)
            .map(|w| Segment::new(w[0], w[1]))
            .collect()
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

impl Geometry for PolylineShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polyline
    }

    fn bbox(&self) -> BBox {
        BBox::from_points(&self.points)
    }

    fn vertices(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn to_path(&self) -> RawPath {
        RawPath::from_points(&self.points, false)
    }

    fn round_coords(&mut self, decimals: u32) {
        for p in &mut self.points {
            *p = p.rounded(decimals);
        }
    }
}

/// A single straight line
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub segment: Segment,
}

impl LineShape {
    pub fn new(segment: Segment) -> Self {
        Self { segment }
    }
}

impl Geometry for LineShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Line
    }

    fn bbox(&self) -> BBox {
        BBox::from_points(&self.segment.endpoints())
    }

    fn vertices(&self) -> Vec<Point> {
        self.segment.endpoints().to_vec()
    }

    fn to_path(&self) -> RawPath {
        RawPath::from_points(&self.segment.endpoints(), false)
    }

    fn round_coords(&mut self, decimals: u32) {
        self.segment = self.segment.rounded(decimals);
    }
}

/// A path no fit recognized, kept verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedShape {
    pub path: RawPath,
}

impl Geometry for UnresolvedShape {
    fn kind(&self) -> ShapeKind {
        ShapeKind::UnresolvedPath
    }

    fn bbox(&self) -> BBox {
        let mut bb = BBox::new();
        for command in &self.path.commands {
            match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => bb.expand_point(p),
                // Control hull: loose but always contains the curve
                PathCommand::CubicTo { c1, c2, to } => {
                    bb.expand_point(c1);
                    bb.expand_point(c2);
                    bb.expand_point(to);
                }
                PathCommand::Close => {}
            }
        }
        bb
    }

    fn vertices(&self) -> Vec<Point> {
        self.path.end_points()
    }

    fn to_path(&self) -> RawPath {
        self.path.clone()
    }

    fn round_coords(&mut self, decimals: u32) {
        self.path = self.path.rounded(decimals);
    }
}

// ============================================================================
// Shape Enum
// ============================================================================

/// The geometry of a classified shape
#[enum_dispatch(Geometry)]
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Rectangle(RectShape),
    Circle(CircleShape),
    Polygon(PolygonShape),
    Polyline(PolylineShape),
    Line(LineShape),
    UnresolvedPath(UnresolvedShape),
}

/// A classified shape with its presentation metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: Option<String>,
    pub style: Style,
    geometry: ShapeGeometry,
}

impl Shape {
    pub fn new(geometry: impl Into<ShapeGeometry>) -> Self {
        Self {
            id: None,
            style: Style::default(),
            geometry: geometry.into(),
        }
    }

    pub fn line(p0: Point, p1: Point) -> Self {
        Self::new(LineShape::new(Segment::new(p0, p1)))
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn bbox(&self) -> BBox {
        self.geometry.bbox()
    }

    pub fn to_path(&self) -> RawPath {
        self.geometry.to_path()
    }

    /// Round every coordinate to `decimals` places
    pub fn rounded(mut self, decimals: u32) -> Self {
        self.geometry.round_coords(decimals);
        self
    }

    pub fn as_line(&self) -> Option<Segment> {
        match &self.geometry {
            ShapeGeometry::Line(l) => Some(l.segment),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&PolygonShape> {
        match &self.geometry {
            ShapeGeometry::Polygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&PolylineShape> {
        match &self.geometry {
            ShapeGeometry::Polyline(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_rect(&self) -> Option<&RectShape> {
        match &self.geometry {
            ShapeGeometry::Rectangle(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&CircleShape> {
        match &self.geometry {
            ShapeGeometry::Circle(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_area_and_edges() {
        let tri = PolygonShape::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 3.0),
        ]);
        assert_eq!(tri.area(), 6.0);
        assert_eq!(tri.edges().len(), 3);
    }

    #[test]
    fn rect_dimensions() {
        let r = RectShape::axis_aligned(1.0, 2.0, 10.0, 4.0);
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.height(), 4.0);
        assert_eq!(r.center(), Point::new(6.0, 4.0));
        assert_eq!(r.bbox().area(), 40.0);
    }

    #[test]
    fn rect_paths_have_expected_signatures() {
        let r = RectShape::axis_aligned(0.0, 0.0, 10.0, 4.0);
        insta::assert_snapshot!(r.to_path().signature(), @"MLLLZ");
        let rounded = r.with_corner_radius(1.0);
        insta::assert_snapshot!(rounded.to_path().signature(), @"MLCLCLCLCZ");
    }

    #[test]
    fn circle_path_passes_through_cardinal_points() {
        let c = CircleShape::new(Point::new(5.0, 5.0), 2.0);
        let path = c.to_path();
        insta::assert_snapshot!(path.signature(), @"MCCCCZ");
        let ends = path.end_points();
        assert_eq!(ends[0], Point::new(7.0, 5.0));
        assert_eq!(ends[2], Point::new(3.0, 5.0));
    }

    #[test]
    fn shape_dispatch_reports_kind() {
        let shapes = [
            Shape::new(RectShape::axis_aligned(0.0, 0.0, 1.0, 1.0)),
            Shape::new(CircleShape::new(Point::ORIGIN, 1.0)),
            Shape::line(Point::ORIGIN, Point::new(1.0, 0.0)),
        ];
        let kinds: Vec<_> = shapes.iter().map(Shape::kind).collect();
        assert_eq!(kinds, [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Line]);
    }

    #[test]
    fn rounding_applies_to_geometry_only() {
        let shape = Shape::line(Point::new(0.12345, 1.0), Point::new(2.0, 3.98765))
            .with_style(Style::stroked("black", 0.5))
            .rounded(2);
        assert_eq!(
            shape.as_line(),
            Some(Segment::new(Point::new(0.12, 1.0), Point::new(2.0, 3.99)))
        );
        assert_eq!(shape.style.stroke_width, Some(0.5));
    }
}
