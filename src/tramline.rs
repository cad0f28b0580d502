//! Double-line detection.
//!
//! Two lines of comparable length that run side by side, close together and
//! overlapping along their axis, are drawn as one double line (a double
//! bond, a table rule drawn twice). They are replaced by a single
//! [`TramLine`] whose backbone runs down the middle.

use crate::config::Config;
use crate::shapes::{Shape, Style};
use crate::types::{Point, Segment};

/// A composite of two parallel lines. The second line is stored aligned
/// with the first: `lines[0].p0` pairs with `lines[1].p0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TramLine {
    pub id: String,
    pub style: Style,
    lines: [Segment; 2],
    source_ids: [Option<String>; 2],
}

impl TramLine {
    pub fn new(id: impl Into<String>, first: Segment, second: Segment) -> Self {
        Self {
            id: id.into(),
            style: Style::default(),
            lines: [first, first.aligned(&second)],
            source_ids: [None, None],
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_source_ids(mut self, first: Option<String>, second: Option<String>) -> Self {
        self.source_ids = [first, second];
        self
    }

    pub fn lines(&self) -> &[Segment; 2] {
        &self.lines
    }

    /// Ids of the two lines this was built from
    pub fn source_ids(&self) -> &[Option<String>; 2] {
        &self.source_ids
    }

    /// Midpoints of the two matched endpoint pairs
    pub fn endpoints(&self) -> [Point; 2] {
        let [a, b] = self.lines;
        [a.p0.midpoint(b.p0), a.p1.midpoint(b.p1)]
    }

    pub fn backbone(&self) -> Segment {
        let [p0, p1] = self.endpoints();
        Segment::new(p0, p1)
    }

    /// Perpendicular distance between the two lines, measured from the
    /// longer one
    pub fn separation(&self) -> f64 {
        let [a, b] = self.lines;
        if a.length() >= b.length() {
            a.perpendicular_distance(&b)
        } else {
            b.perpendicular_distance(&a)
        }
    }
}

/// Whether two lines form a double line under `config`
pub fn is_tramline_pair(a: &Segment, b: &Segment, config: &Config) -> bool {
    let (la, lb) = (a.length(), b.length());
    let longer = la.max(lb);
    if longer <= 0.0 || la.min(lb) / longer <= config.min_relative_line_length {
        return false;
    }
    if a.orientation(b, config.angle_eps).is_none() {
        return false;
    }
    let separation = if la >= lb {
        a.perpendicular_distance(b)
    } else {
        b.perpendicular_distance(a)
    };
    let window = config.min_separation_factor * longer..config.max_separation_factor * longer;
    if separation <= window.start || separation >= window.end {
        return false;
    }
    a.overlaps(b, config.overlap_eps)
}

/// Result of [`detect_tramlines`]: the pairs found and every input shape
/// that was not consumed, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TramlineDetection {
    pub tramlines: Vec<TramLine>,
    pub remaining: Vec<Shape>,
}

/// Pair up lines into tramlines. Pairs are tried in index order and the
/// first acceptable partner of a line wins; each line joins at most one
/// tramline. Shapes that are not lines pass through untouched.
pub fn detect_tramlines(lines: Vec<Shape>, config: &Config) -> TramlineDetection {
    let segments: Vec<Option<Segment>> = lines.iter().map(Shape::as_line).collect();
    let mut consumed = vec![false; lines.len()];
    let mut tramlines = Vec::new();

    for i in 0..segments.len() {
        let Some(a) = segments[i] else { continue };
        if consumed[i] {
            continue;
        }
        for j in i + 1..segments.len() {
            let Some(b) = segments[j] else { continue };
            if consumed[j] || !is_tramline_pair(&a, &b, config) {
                continue;
            }
            consumed[i] = true;
            consumed[j] = true;
            let tramline = TramLine::new(format!("tramline{}", tramlines.len()), a, b)
                .with_style(lines[i].style.clone())
                .with_source_ids(lines[i].id.clone(), lines[j].id.clone());
            crate::log::trace!(id = %tramline.id, i, j, "paired lines");
            tramlines.push(tramline);
            break;
        }
    }

    let remaining: Vec<Shape> = lines
        .into_iter()
        .zip(consumed)
        .filter_map(|(shape, used)| (!used).then_some(shape))
        .collect();
    crate::log::debug!(
        tramlines = tramlines.len(),
        remaining = remaining.len(),
        "tramline detection"
    );
    TramlineDetection {
        tramlines,
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        Shape::line(Point::new(x0, y0), Point::new(x1, y1))
    }

    fn loose() -> Config {
        Config::default().with_angle_eps(0.3)
    }

    #[test]
    fn double_line_becomes_one_tramline() {
        let lines = vec![line(0.0, 0.0, 10.0, 0.0), line(0.0, 1.5, 10.0, 1.5)];
        let found = detect_tramlines(lines, &loose());
        assert_eq!(found.tramlines.len(), 1);
        assert!(found.remaining.is_empty());
        assert_eq!(
            found.tramlines[0].backbone(),
            Segment::new(Point::new(0.0, 0.75), Point::new(10.0, 0.75))
        );
    }

    #[test]
    fn backbone_uses_matched_endpoints() {
        // Second line drawn the other way round
        let tramline = TramLine::new(
            "t",
            Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
            Segment::new(Point::new(9.0, 2.0), Point::new(1.0, 2.0)),
        );
        let [a, b] = *tramline.lines();
        assert_eq!(b, Segment::new(Point::new(1.0, 2.0), Point::new(9.0, 2.0)));
        assert_eq!(tramline.endpoints(), [a.p0.midpoint(b.p0), a.p1.midpoint(b.p1)]);
        assert_eq!(tramline.endpoints()[0], Point::new(0.5, 1.0));
        assert_eq!(tramline.separation(), 2.0);
    }

    #[test]
    fn lines_too_far_apart_stay_lines() {
        let lines = vec![line(0.0, 0.0, 10.0, 0.0), line(0.0, 4.0, 10.0, 4.0)];
        let found = detect_tramlines(lines, &loose());
        assert!(found.tramlines.is_empty());
        assert_eq!(found.remaining.len(), 2);
    }

    #[test]
    fn lines_too_close_stay_lines() {
        let lines = vec![line(0.0, 0.0, 10.0, 0.0), line(0.0, 0.5, 10.0, 0.5)];
        assert!(detect_tramlines(lines, &loose()).tramlines.is_empty());
    }

    #[test]
    fn unequal_lengths_are_rejected() {
        let lines = vec![line(0.0, 0.0, 10.0, 0.0), line(0.0, 1.5, 4.0, 1.5)];
        assert!(detect_tramlines(lines, &loose()).tramlines.is_empty());
    }

    #[test]
    fn disjoint_projections_are_rejected() {
        let lines = vec![line(0.0, 0.0, 10.0, 0.0), line(12.0, 1.5, 22.0, 1.5)];
        assert!(detect_tramlines(lines, &loose()).tramlines.is_empty());
    }

    #[test]
    fn first_pairing_in_index_order_wins() {
        // A triple line: the middle line pairs with the first, the third
        // is left over
        let lines = vec![
            line(0.0, 0.0, 10.0, 0.0),
            line(0.0, 1.5, 10.0, 1.5),
            line(0.0, 3.0, 10.0, 3.0),
        ];
        let found = detect_tramlines(lines, &loose());
        assert_eq!(found.tramlines.len(), 1);
        assert_eq!(found.remaining.len(), 1);
        assert_eq!(found.remaining[0].as_line().map(|s| s.p0.y), Some(3.0));
    }

    #[test]
    fn non_lines_pass_through() {
        let square = Shape::new(crate::shapes::RectShape::axis_aligned(0.0, 0.0, 1.0, 1.0));
        let found = detect_tramlines(vec![square.clone()], &loose());
        assert_eq!(found.remaining, vec![square]);
    }
}
