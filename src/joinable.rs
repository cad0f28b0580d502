//! The joinable model.
//!
//! Anything that can take part in a junction is a [`Joinable`]: plain
//! lines, double lines, hashed wedges, polygons and text. Each exposes
//! anchor points with a capture radius and a priority, and optionally a
//! backbone segment. Two joinables touch when any pair of their anchors is
//! closer than the sum of the two radii.

use crate::config::Config;
use crate::defaults;
use crate::errors::JoinError;
use crate::hatch::HatchedTriangle;
use crate::primitive::TextRun;
use crate::tramline::TramLine;
use crate::types::{Orientation, Point, Segment};

/// An anchor: where a joinable can connect, how far it reaches, and how
/// strongly it claims the connection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinPoint {
    pub point: Point,
    pub radius: f64,
    pub priority: f64,
}

impl JoinPoint {
    pub fn new(point: Point, radius: f64, priority: f64) -> Self {
        Self {
            point,
            radius,
            priority,
        }
    }

    /// Whether the two capture discs overlap
    pub fn touches(&self, other: &JoinPoint) -> bool {
        self.point.distance(other.point) < self.radius + other.radius
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Joinable {
    Line { id: String, segment: Segment },
    Polygon { id: String, points: Vec<Point> },
    HatchedTriangle(HatchedTriangle),
    TramLine(TramLine),
    Text { id: String, run: TextRun },
}

impl Joinable {
    pub fn id(&self) -> &str {
        match self {
            Joinable::Line { id, .. }
            | Joinable::Polygon { id, .. }
            | Joinable::Text { id, .. } => id,
            Joinable::HatchedTriangle(wedge) => &wedge.id,
            Joinable::TramLine(tramline) => &tramline.id,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Joinable::Line { .. } => "line",
            Joinable::Polygon { .. } => "polygon",
            Joinable::HatchedTriangle(_) => "hatched triangle",
            Joinable::TramLine(_) => "tramline",
            Joinable::Text { .. } => "text",
        }
    }

    /// Tie-break weight when two anchors compete; higher wins
    pub fn priority(&self) -> f64 {
        match self {
            Joinable::Line { .. } => defaults::LINE_PRIORITY,
            Joinable::Polygon { .. } => defaults::POLYGON_PRIORITY,
            Joinable::HatchedTriangle(_) => defaults::HATCHED_TRIANGLE_PRIORITY,
            Joinable::TramLine(_) => defaults::TRAMLINE_PRIORITY,
            Joinable::Text { .. } => defaults::TEXT_PRIORITY,
        }
    }

    pub fn anchor_points(&self, config: &Config) -> Vec<JoinPoint> {
        let priority = self.priority();
        let at = |point: Point, radius: f64| JoinPoint::new(point, radius, priority);
        match self {
            Joinable::Line { segment, .. } => segment
                .endpoints()
                .into_iter()
                .map(|p| at(p, config.line_anchor_radius))
                .collect(),
            Joinable::Polygon { points, .. } => {
                let n = points.len();
                let mut anchors: Vec<JoinPoint> = points
                    .iter()
                    .map(|p| at(*p, config.polygon_anchor_radius))
                    .collect();
                if n >= 2 {
                    anchors.extend((0..n).map(|i| {
                        let mid = points[i].midpoint(points[(i + 1) % n]);
                        at(mid, config.polygon_anchor_radius)
                    }));
                }
                anchors
            }
            Joinable::HatchedTriangle(wedge) => {
                let base = wedge.base();
                vec![
                    at(wedge.apex(), config.line_anchor_radius),
                    at(
                        base.midpoint(),
                        config.line_anchor_radius.max(0.5 * base.length()),
                    ),
                ]
            }
            Joinable::TramLine(tramline) => {
                let radius = 0.5 * tramline.separation() + config.line_anchor_radius;
                tramline
                    .endpoints()
                    .into_iter()
                    .map(|p| at(p, radius))
                    .collect()
            }
            Joinable::Text { run, .. } => {
                if !run.has_glyph() {
                    return Vec::new();
                }
                vec![at(run.position, run.glyph_radius * config.text_radius_factor)]
            }
        }
    }

    /// The segment this joinable runs along, if it has one
    pub fn backbone(&self) -> Option<Segment> {
        match self {
            Joinable::Line { segment, .. } => Some(*segment),
            Joinable::HatchedTriangle(wedge) => Some(wedge.backbone()),
            Joinable::TramLine(tramline) => Some(tramline.backbone()),
            Joinable::Polygon { .. } | Joinable::Text { .. } => None,
        }
    }

    /// Like [`Joinable::backbone`], for callers that rely on one existing
    pub fn require_backbone(&self) -> Result<Segment, JoinError> {
        self.backbone().ok_or_else(|| JoinError::NoBackbone {
            id: self.id().to_string(),
            kind: self.kind_name(),
        })
    }

    /// Where the two joinables meet. See [`intersection_with`].
    pub fn intersection_with(&self, other: &Joinable, config: &Config) -> Option<Point> {
        intersection_with(self, other, config)
    }

    /// The anchor the two joinables share. See [`common_point`].
    pub fn common_point(&self, other: &Joinable, config: &Config) -> Option<JoinPoint> {
        common_point(self, other, config)
    }
}

/// The higher-priority anchor, or on equal priority one at the midpoint
/// with the larger radius
fn resolve(a: &JoinPoint, b: &JoinPoint) -> JoinPoint {
    if a.priority > b.priority {
        *a
    } else if b.priority > a.priority {
        *b
    } else {
        JoinPoint::new(a.point.midpoint(b.point), a.radius.max(b.radius), a.priority)
    }
}

/// Find the shared anchor of two joinables.
///
/// Every pair of touching anchors is a candidate. The candidate whose
/// higher priority is largest wins, then the closest one; the coordinates
/// of the resolved point settle exact ties so that the result does not
/// depend on argument order.
pub fn common_point(a: &Joinable, b: &Joinable, config: &Config) -> Option<JoinPoint> {
    let anchors_b = b.anchor_points(config);
    let mut best: Option<(f64, f64, JoinPoint)> = None;
    for pa in a.anchor_points(config) {
        for pb in &anchors_b {
            if !pa.touches(pb) {
                continue;
            }
            let priority = pa.priority.max(pb.priority);
            let distance = pa.point.distance(pb.point);
            let candidate = resolve(&pa, pb);
            let better = best.is_none_or(|(p, d, current)| {
                let key = (candidate.point.x, candidate.point.y);
                let current_key = (current.point.x, current.point.y);
                priority > p
                    || (priority == p && distance < d)
                    || (priority == p && distance == d && key < current_key)
            });
            if better {
                best = Some((priority, distance, candidate));
            }
        }
    }
    best.map(|(_, _, point)| point)
}

/// Where two joinables meet.
///
/// - Two backbones: the intersection of their lines. When the lines are
///   parallel, or the intersection lies outside both backbones, the
///   midpoint of the closest endpoint pair stands in for it. The result is
///   rejected when it lies more than `relative_distance_to_intersection`
///   backbone lengths from both ends of either backbone.
/// - One backbone: the other side's anchor nearest that backbone, pulled
///   halfway towards their common point when they have one.
/// - No backbones: None.
pub fn intersection_with(a: &Joinable, b: &Joinable, config: &Config) -> Option<Point> {
    match (a.backbone(), b.backbone()) {
        (Some(ba), Some(bb)) => backbone_intersection(&ba, &bb, config),
        (Some(backbone), None) => anchor_towards_backbone(b, a, &backbone, config),
        (None, Some(backbone)) => anchor_towards_backbone(a, b, &backbone, config),
        (None, None) => None,
    }
}

fn backbone_intersection(a: &Segment, b: &Segment, config: &Config) -> Option<Point> {
    let slack = config.intersection_slack;
    let point = a
        .intersection(b)
        .filter(|p| a.spans(*p, slack) || b.spans(*p, slack))
        .unwrap_or_else(|| closest_endpoint_midpoint(a, b));

    let limit = config.relative_distance_to_intersection;
    let too_far = |s: &Segment| {
        let reach = limit * s.length();
        s.p0.distance(point) > reach && s.p1.distance(point) > reach
    };
    if too_far(a) || too_far(b) {
        crate::log::trace!(%point, "intersection too far from backbones");
        return None;
    }
    Some(point)
}

/// Midpoint of the closer endpoint pair, under the endpoint pairing with
/// the smaller total separation
fn closest_endpoint_midpoint(a: &Segment, b: &Segment) -> Point {
    let pairs = match a.endpoint_pairing(b) {
        Orientation::Parallel => [(a.p0, b.p0), (a.p1, b.p1)],
        Orientation::Antiparallel => [(a.p0, b.p1), (a.p1, b.p0)],
    };
    let [first, second] = pairs;
    let (p, q) = if first.0.distance(first.1) <= second.0.distance(second.1) {
        first
    } else {
        second
    };
    p.midpoint(q)
}

fn anchor_towards_backbone(
    point_side: &Joinable,
    backbone_side: &Joinable,
    backbone: &Segment,
    config: &Config,
) -> Option<Point> {
    let nearest = point_side
        .anchor_points(config)
        .into_iter()
        .min_by(|x, y| {
            backbone
                .distance_to_segment(x.point)
                .total_cmp(&backbone.distance_to_segment(y.point))
        })?;
    match common_point(point_side, backbone_side, config) {
        Some(shared) => Some(nearest.point.midpoint(shared.point)),
        None => Some(nearest.point),
    }
}
