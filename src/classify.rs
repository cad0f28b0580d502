//! Primitive classification.
//!
//! A raw drawing path is matched against a fixed sequence of fits, and the
//! first one that succeeds decides the shape:
//!
//! 1. rectangle (four straight sides meeting at right angles)
//! 2. rounded box (four sides joined by four circular corner arcs)
//! 3. circle (closed run of cubic arcs)
//! 4. polyline family: a single straight run becomes a [`LineShape`], a
//!    closed run a [`PolygonShape`] (or a line again when the polygon is
//!    only a thick stroke), an open run a [`PolylineShape`]
//! 5. anything else is kept verbatim as an [`UnresolvedShape`]
//!
//! Classification never fails. Results carry the input style and have
//! their coordinates rounded to the configured number of decimals.

use std::collections::HashSet;

use crate::config::Config;
use crate::geometry::{dedup_points, farthest_pair, fit_circle, merge_straight_runs, simplify_ring};
use crate::path::{Piece, RawPath, Signature};
use crate::shapes::{
    CircleShape, Geometry, LineShape, PolygonShape, PolylineShape, RectShape, Shape, ShapeGeometry,
    Style, UnresolvedShape,
};
use crate::types::{BBox, Orientation, Point, Segment};

/// A raw path as it arrives from the renderer, before classification
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledPath {
    pub id: Option<String>,
    pub style: Style,
    pub path: RawPath,
}

impl StyledPath {
    pub fn new(path: RawPath) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Diagonal of the points' bounding box, used to scale closure tolerances
fn extent(points: &[Point]) -> f64 {
    let bb = BBox::from_points(points);
    if bb.is_empty() {
        return 0.0;
    }
    bb.width().hypot(bb.height())
}

fn relative_mismatch(a: f64, b: f64) -> f64 {
    let larger = a.max(b);
    if larger <= 0.0 {
        return 0.0;
    }
    (a - b).abs() / larger
}

pub struct Classifier<'a> {
    config: &'a Config,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Classify one path, copying `style` onto the result
    pub fn classify(&self, path: &RawPath, style: &Style) -> Shape {
        let signature = path.signature();
        let geometry = self
            .fit_rectangle(path, &signature)
            .or_else(|| self.fit_rounded_box(path, &signature))
            .or_else(|| self.fit_circle(path, &signature))
            .or_else(|| self.fit_polyline(path, &signature))
            .unwrap_or_else(|| {
                crate::log::trace!(%signature, "no fit, keeping path verbatim");
                UnresolvedShape { path: path.clone() }.into()
            });
        Shape::new(geometry)
            .with_style(style.clone())
            .rounded(self.config.decimal_places)
    }

    pub fn classify_styled(&self, input: &StyledPath) -> Shape {
        self.classify(&input.path, &input.style)
            .with_id(input.id.clone())
    }

    /// Classify a batch, dropping paths whose geometric hash was already
    /// seen. The first occurrence wins.
    pub fn classify_all(&self, inputs: &[StyledPath]) -> Vec<Shape> {
        let mut seen = HashSet::new();
        let mut shapes = Vec::with_capacity(inputs.len());
        for input in inputs {
            if !seen.insert(input.path.geometric_hash(self.config.decimal_places)) {
                crate::log::trace!(id = ?input.id, "dropping redundant path");
                continue;
            }
            shapes.push(self.classify_styled(input));
        }
        crate::log::debug!(
            paths = inputs.len(),
            shapes = shapes.len(),
            duplicates = inputs.len() - shapes.len(),
            "classified paths"
        );
        shapes
    }

    /// Run an already classified shape through the classifier again.
    /// Classified shapes are fixed points of this operation.
    pub fn reclassify(&self, shape: &Shape) -> Shape {
        self.classify(&shape.to_path(), &shape.style)
            .with_id(shape.id.clone())
    }

    // ========================================================================
    // Fits
    // ========================================================================

    fn fit_rectangle(&self, path: &RawPath, signature: &Signature) -> Option<ShapeGeometry> {
        if !signature.is_rect_candidate() {
            return None;
        }
        let eps = self.config.rect_eps;
        let mut points = path.end_points();
        if points.len() == 5 {
            if points[0].distance(points[4]) > eps * extent(&points) {
                return None;
            }
            points.pop();
        }
        let corners: [Point; 4] = points.try_into().ok()?;
        let sides: [Segment; 4] =
            std::array::from_fn(|i| Segment::new(corners[i], corners[(i + 1) % 4]));

        for i in 0..4 {
            let a = sides[i].direction()?;
            let b = sides[(i + 1) % 4].direction()?;
            if a.dot(b).abs() > eps {
                return None;
            }
        }
        if relative_mismatch(sides[0].length(), sides[2].length()) > eps
            || relative_mismatch(sides[1].length(), sides[3].length()) > eps
        {
            return None;
        }
        Some(RectShape::new(corners).into())
    }

    fn fit_rounded_box(&self, path: &RawPath, signature: &Signature) -> Option<ShapeGeometry> {
        if !signature.is_rounded_box_candidate() {
            return None;
        }
        let eps = self.config.rounded_box_eps;
        let mut sides = Vec::with_capacity(5);
        let mut arcs = Vec::with_capacity(4);
        for piece in path.pieces() {
            match piece {
                Piece::Line(s) if s.length() > 0.0 => sides.push(s),
                Piece::Line(_) => {}
                Piece::Cubic(c) => arcs.push(c),
            }
        }

        // Drawing started part-way along a side: splice its two halves
        if sides.len() == 5 {
            let last = sides.pop()?;
            let first = sides[0];
            if last.p1.distance(first.p0) > eps * first.length().max(last.length())
                || last.orientation(&first, eps) != Some(Orientation::Parallel)
            {
                return None;
            }
            sides[0] = Segment::new(last.p0, first.p1);
        }
        if sides.len() != 4 || arcs.len() != 4 {
            return None;
        }

        let mut directions = Vec::with_capacity(4);
        for side in &sides {
            directions.push(side.direction()?);
        }
        for i in 0..4 {
            if directions[i].dot(directions[(i + 1) % 4]).abs() > eps {
                return None;
            }
        }

        // Corner k sits where the side before it meets side k
        let mut corners = [Point::ORIGIN; 4];
        for (k, corner) in corners.iter_mut().enumerate() {
            *corner = sides[(k + 3) % 4].intersection(&sides[k])?;
        }

        let mut insets = Vec::with_capacity(8);
        for (k, corner) in corners.iter().enumerate() {
            insets.push(corner.distance(sides[(k + 3) % 4].p1));
            insets.push(corner.distance(sides[k].p0));
        }
        let radius = insets.iter().sum::<f64>() / insets.len() as f64;
        if radius <= 0.0 || insets.iter().any(|d| (d - radius).abs() > eps * radius) {
            return None;
        }

        let rect = RectShape::new(corners).with_corner_radius(radius);
        if radius > 0.5 * rect.width().min(rect.height()) * (1.0 + eps) {
            return None;
        }

        let centers: Vec<Point> = (0..4)
            .map(|k| sides[(k + 3) % 4].p1 + directions[k] * radius)
            .collect();
        for arc in &arcs {
            let mid = arc.eval(0.5);
            let fits = centers
                .iter()
                .any(|c| (mid.distance(*c) - radius).abs() <= eps * radius);
            if !fits {
                crate::log::trace!("corner arc is not circular");
                return None;
            }
        }
        Some(rect.into())
    }

    fn fit_circle(&self, path: &RawPath, signature: &Signature) -> Option<ShapeGeometry> {
        if !signature.is_circle_candidate() {
            return None;
        }
        let eps = self.config.circle_eps;
        let mut points = path.end_points();
        let first = *points.first()?;
        let last = *points.last()?;
        // Open arcs are not circles
        if points.len() < 4 || first.distance(last) > eps * extent(&points) {
            return None;
        }
        points.pop();

        let (center, radius) = fit_circle(&points)?;
        let off = |p: Point| (p.distance(center) - radius).abs() > eps * radius;
        if points.iter().any(|p| off(*p)) {
            return None;
        }
        for piece in path.pieces() {
            if let Piece::Cubic(c) = piece {
                if off(c.eval(0.5)) {
                    return None;
                }
            }
        }
        Some(CircleShape::new(center, radius).into())
    }

    fn fit_polyline(&self, path: &RawPath, signature: &Signature) -> Option<ShapeGeometry> {
        if !signature.is_single_subpath() {
            return None;
        }
        let max_width = self.config.max_width;
        let mut vertices = Vec::new();
        for piece in path.pieces() {
            let (from, to) = match piece {
                Piece::Line(s) => (s.p0, s.p1),
                Piece::Cubic(c) if c.chord_deviation() <= max_width => (c.p0, c.p3),
                Piece::Cubic(_) => {
                    crate::log::trace!(%signature, "curved piece, not a polyline");
                    return None;
                }
            };
            if vertices.is_empty() {
                vertices.push(from);
            }
            vertices.push(to);
        }

        let resolution = 10f64.powi(-(self.config.decimal_places as i32));
        let mut vertices = dedup_points(&vertices, resolution);
        let returns = vertices.len() > 3
            && vertices
                .first()
                .zip(vertices.last())
                .is_some_and(|(a, b)| a.distance(*b) <= resolution);

        if !signature.is_closed() && !returns {
            if vertices.len() < 2 {
                return None;
            }
            let straight = merge_straight_runs(&vertices, self.config.max_angle);
            if let [p0, p1] = straight[..] {
                return Some(LineShape::new(Segment::new(p0, p1)).into());
            }
            return Some(PolylineShape::new(vertices).into());
        }

        if vertices.len() > 1
            && vertices
                .first()
                .zip(vertices.last())
                .is_some_and(|(a, b)| a.distance(*b) <= resolution)
        {
            vertices.pop();
        }
        match vertices.len() {
            0 | 1 => None,
            2 => Some(LineShape::new(Segment::new(vertices[0], vertices[1])).into()),
            _ => {
                let ring = simplify_ring(&vertices, self.config.rect_eps);
                if ring.len() < 3 {
                    let (i, j) = farthest_pair(&vertices)?;
                    return Some(LineShape::new(Segment::new(vertices[i], vertices[j])).into());
                }
                let polygon = PolygonShape::new(ring);
                if let Some(centerline) = self.narrow_line(&polygon) {
                    crate::log::trace!(%centerline, "polygon collapsed to a line");
                    return Some(LineShape::new(centerline).into());
                }
                Some(polygon.into())
            }
        }
    }

    /// Centerline of a polygon that is really a thick stroke
    fn narrow_line(&self, polygon: &PolygonShape) -> Option<Segment> {
        let max_width = self.config.max_width;
        let points = &polygon.points;
        let edges = polygon.edges();

        match points.len() {
            4 => {
                for (a, b) in [(0, 2), (1, 3)] {
                    let (long_a, long_b) = (edges[a], edges[b]);
                    let short_ok = edges[(a + 1) % 4].length() <= max_width
                        && edges[(b + 1) % 4].length() <= max_width;
                    let long_ok = long_a.length().min(long_b.length()) > max_width;
                    if short_ok
                        && long_ok
                        && long_a.orientation(&long_b, self.config.max_angle)
                            == Some(Orientation::Antiparallel)
                    {
                        // long_a runs A -> B and long_b runs C -> D, with B
                        // next to C and D next to A
                        return Some(Segment::new(
                            long_a.p0.midpoint(long_b.p1),
                            long_a.p1.midpoint(long_b.p0),
                        ));
                    }
                }
            }
            3 => {
                let mut order = [0usize, 1, 2];
                order.sort_by(|&i, &j| edges[i].length().total_cmp(&edges[j].length()));
                let short = edges[order[0]];
                if short.length() <= max_width && 2.0 * short.length() < edges[order[1]].length() {
                    let apex = points[(order[0] + 2) % 3];
                    return Some(Segment::new(apex, short.midpoint()));
                }
            }
            _ => {}
        }

        let bbox_area = polygon.bbox().area();
        let degenerate =
            bbox_area <= 0.0 || polygon.area() / bbox_area < self.config.degenerate_area_ratio;
        if !degenerate {
            return None;
        }
        let (i, j) = farthest_pair(points)?;
        let axis = Segment::new(points[i], points[j]);
        points
            .iter()
            .all(|p| axis.distance_to_line(*p) <= max_width)
            .then_some(axis)
    }
}
