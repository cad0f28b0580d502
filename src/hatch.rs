//! Hashed-wedge detection.
//!
//! A hashed wedge (the stereo bond of chemical drawings) is rendered as a
//! ladder of short parallel strokes that grow steadily from the narrow end
//! to the wide end. Each ladder is replaced by one [`HatchedTriangle`].

use crate::config::Config;
use crate::shapes::{Shape, Style};
use crate::types::{Point, Segment};

/// A ladder of parallel strokes forming a wedge. Strokes are ordered from
/// the shortest to the longest.
#[derive(Debug, Clone, PartialEq)]
pub struct HatchedTriangle {
    pub id: String,
    pub style: Style,
    strokes: Vec<Segment>,
    source_ids: Vec<Option<String>>,
}

impl HatchedTriangle {
    /// `strokes` must be ordered shortest first
    fn new(id: String, strokes: Vec<Segment>) -> Self {
        Self {
            id,
            style: Style::default(),
            strokes,
            source_ids: Vec::new(),
        }
    }

    pub fn strokes(&self) -> &[Segment] {
        &self.strokes
    }

    pub fn source_ids(&self) -> &[Option<String>] {
        &self.source_ids
    }

    /// The narrow end: midpoint of the shortest stroke
    pub fn apex(&self) -> Point {
        self.strokes.first().map_or(Point::ORIGIN, Segment::midpoint)
    }

    /// The longest stroke, closing the wide end
    pub fn base(&self) -> Segment {
        self.strokes
            .last()
            .copied()
            .unwrap_or(Segment::new(Point::ORIGIN, Point::ORIGIN))
    }

    /// From the apex to the middle of the base
    pub fn backbone(&self) -> Segment {
        Segment::new(self.apex(), self.base().midpoint())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HatchDetection {
    pub hatched: Vec<HatchedTriangle>,
    pub remaining: Vec<Shape>,
}

/// A candidate stroke with its offset along the ladder's axis
struct Rung {
    index: usize,
    offset: f64,
    length: f64,
}

/// The rungs around `seed` that could belong to its ladder: parallel
/// strokes whose midpoints sit on the seed's normal axis, split at the
/// first gap wider than `hatch_max_gap` on either side of the seed
fn ladder_around(
    seed: usize,
    segments: &[Option<Segment>],
    consumed: &[bool],
    config: &Config,
) -> Vec<Rung> {
    let Some(seed_segment) = segments[seed] else {
        return Vec::new();
    };
    let Some(direction) = seed_segment.direction() else {
        return Vec::new();
    };
    let origin = seed_segment.midpoint();

    let mut rungs: Vec<Rung> = segments
        .iter()
        .enumerate()
        .filter(|(index, _)| !consumed[*index])
        .filter_map(|(index, segment)| {
            let segment = (*segment)?;
            seed_segment.orientation(&segment, config.angle_eps)?;
            let offset_from_seed = segment.midpoint() - origin;
            if offset_from_seed.dot(direction).abs() > config.hatch_axis_tolerance {
                return None;
            }
            Some(Rung {
                index,
                offset: direction.perp_dot(offset_from_seed),
                length: segment.length(),
            })
        })
        .collect();
    rungs.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    let Some(at) = rungs.iter().position(|r| r.index == seed) else {
        return Vec::new();
    };
    let wide = |k: usize| rungs[k + 1].offset - rungs[k].offset > config.hatch_max_gap;
    let start = (0..at).rev().find(|&k| wide(k)).map_or(0, |k| k + 1);
    let end = (at..rungs.len().saturating_sub(1))
        .find(|&k| wide(k))
        .map_or(rungs.len(), |k| k + 1);
    rungs.truncate(end);
    rungs.drain(..start);
    rungs
}

/// Evenly spaced, long enough, and growing or shrinking by at least
/// `hatch_min_growth` of the longest stroke at every rung
fn is_wedge(rungs: &[Rung], config: &Config) -> bool {
    if rungs.len() < config.hatch_min_lines.max(2) {
        return false;
    }
    let gaps: Vec<f64> = rungs.windows(2).map(|w| w[1].offset - w[0].offset).collect();
    let min_gap = gaps.iter().copied().fold(f64::INFINITY, f64::min);
    let max_gap = gaps.iter().copied().fold(0.0, f64::max);
    if min_gap <= 0.0 || max_gap > config.hatch_max_gap || max_gap > 2.0 * min_gap {
        return false;
    }
    let longest = rungs.iter().map(|r| r.length).fold(0.0, f64::max);
    let step = config.hatch_min_growth * longest;
    let growing = rungs.windows(2).all(|w| w[1].length - w[0].length > step);
    let shrinking = rungs.windows(2).all(|w| w[0].length - w[1].length > step);
    growing || shrinking
}

/// Replace hashed-wedge ladders among `lines` by hatched triangles. Seeds
/// are tried in index order; a stroke belongs to at most one wedge.
pub fn detect_hatches(lines: Vec<Shape>, config: &Config) -> HatchDetection {
    let segments: Vec<Option<Segment>> = lines.iter().map(Shape::as_line).collect();
    let mut consumed = vec![false; lines.len()];
    let mut hatched = Vec::new();

    for seed in 0..segments.len() {
        if consumed[seed] || segments[seed].is_none() {
            continue;
        }
        let mut rungs = ladder_around(seed, &segments, &consumed, config);
        if !is_wedge(&rungs, config) {
            continue;
        }
        if rungs.first().map(|r| r.length) > rungs.last().map(|r| r.length) {
            rungs.reverse();
        }
        let strokes: Vec<Segment> = rungs.iter().filter_map(|r| segments[r.index]).collect();
        let mut wedge = HatchedTriangle::new(format!("hatch{}", hatched.len()), strokes);
        wedge.style = lines[seed].style.clone();
        wedge.source_ids = rungs.iter().map(|r| lines[r.index].id.clone()).collect();
        for rung in &rungs {
            consumed[rung.index] = true;
        }
        crate::log::trace!(id = %wedge.id, strokes = rungs.len(), "found hashed wedge");
        hatched.push(wedge);
    }

    let remaining: Vec<Shape> = lines
        .into_iter()
        .zip(consumed)
        .filter_map(|(shape, used)| (!used).then_some(shape))
        .collect();
    crate::log::debug!(
        hatched = hatched.len(),
        remaining = remaining.len(),
        "hatch detection"
    );
    HatchDetection { hatched, remaining }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Vertical strokes centered on the x axis
    fn stroke(x: f64, length: f64) -> Shape {
        Shape::line(Point::new(x, -0.5 * length), Point::new(x, 0.5 * length))
    }

    #[test]
    fn growing_ladder_is_a_wedge() {
        let lines = vec![
            stroke(0.0, 0.5),
            stroke(1.0, 1.0),
            stroke(2.0, 1.5),
            stroke(3.0, 2.0),
        ];
        let found = detect_hatches(lines, &Config::default());
        assert_eq!(found.hatched.len(), 1);
        assert!(found.remaining.is_empty());

        let wedge = &found.hatched[0];
        assert_eq!(wedge.apex(), Point::new(0.0, 0.0));
        assert_eq!(wedge.base().length(), 2.0);
        assert_eq!(
            wedge.backbone(),
            Segment::new(Point::new(0.0, 0.0), Point::new(3.0, 0.0))
        );
    }

    #[test]
    fn strokes_in_any_order_are_sorted_shortest_first() {
        let lines = vec![
            stroke(2.0, 1.5),
            stroke(0.0, 0.5),
            stroke(3.0, 2.0),
            stroke(1.0, 1.0),
        ];
        let found = detect_hatches(lines, &Config::default());
        let lengths: Vec<f64> = found.hatched[0]
            .strokes()
            .iter()
            .map(Segment::length)
            .collect();
        assert_eq!(lengths, vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn equal_strokes_are_not_a_wedge() {
        let lines = vec![stroke(0.0, 1.0), stroke(1.0, 1.0), stroke(2.0, 1.0)];
        let found = detect_hatches(lines, &Config::default());
        assert!(found.hatched.is_empty());
        assert_eq!(found.remaining.len(), 3);
    }

    #[test]
    fn strokes_differing_by_noise_are_not_a_wedge() {
        let lines = vec![stroke(0.0, 5.0), stroke(1.0, 5.001), stroke(2.0, 5.002)];
        let found = detect_hatches(lines, &Config::default());
        assert!(found.hatched.is_empty());
        assert_eq!(found.remaining.len(), 3);
    }

    #[test]
    fn two_strokes_are_too_few() {
        let lines = vec![stroke(0.0, 0.5), stroke(1.0, 1.0)];
        assert!(detect_hatches(lines, &Config::default()).hatched.is_empty());
    }

    #[test]
    fn uneven_spacing_is_rejected() {
        let lines = vec![stroke(0.0, 0.5), stroke(0.3, 1.0), stroke(2.3, 1.5)];
        assert!(detect_hatches(lines, &Config::default()).hatched.is_empty());
    }

    #[test]
    fn distant_parallel_line_does_not_break_the_ladder() {
        let lines = vec![
            stroke(0.0, 0.5),
            stroke(1.0, 1.0),
            stroke(2.0, 1.5),
            stroke(30.0, 0.2),
        ];
        let found = detect_hatches(lines, &Config::default());
        assert_eq!(found.hatched.len(), 1);
        assert_eq!(found.hatched[0].strokes().len(), 3);
        assert_eq!(found.remaining.len(), 1);
    }
}
