//! Junction building.
//!
//! Every pair of joinables that shares a common point yields a raw
//! junction. Raw junctions that sit on top of each other are then merged,
//! so that three bonds meeting at one atom end up as one junction with
//! three members instead of three pairwise ones.

use std::collections::BTreeSet;

use crate::config::Config;
use crate::joinable::{JoinPoint, Joinable, common_point, intersection_with};
use crate::types::Point;

/// A meeting place of two or more joinables
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    /// Indices into the joinable list the junction was built from
    pub members: BTreeSet<usize>,
    /// Representative location: the mean of every merged raw junction
    pub coordinate: Point,
    /// The common point that created this junction
    pub join_point: JoinPoint,
    weight: usize,
}

impl Junction {
    pub fn new(a: usize, b: usize, coordinate: Point, join_point: JoinPoint) -> Self {
        Self {
            members: BTreeSet::from([a, b]),
            coordinate,
            join_point,
            weight: 1,
        }
    }

    pub fn contains(&self, member: usize) -> bool {
        self.members.contains(&member)
    }

    /// Number of raw junctions merged into this one
    pub fn weight(&self) -> usize {
        self.weight
    }

    /// Take over `other`'s members; the coordinate becomes the running
    /// mean over both sets of raw junctions. The join point is kept.
    pub fn absorb(&mut self, other: Junction) {
        let total = self.weight + other.weight;
        let sum = self.coordinate.vec() * self.weight as f64
            + other.coordinate.vec() * other.weight as f64;
        self.coordinate = (sum / total as f64).into();
        self.weight = total;
        self.members.extend(other.members);
    }
}

/// One raw junction per pair of joinables with a common point. The
/// coordinate is the intersection of the pair when that lies within the
/// join radius, the join point otherwise.
pub fn raw_junctions(joinables: &[Joinable], config: &Config) -> Vec<Junction> {
    let mut junctions = Vec::new();
    for i in 0..joinables.len() {
        for j in i + 1..joinables.len() {
            let (a, b) = (&joinables[i], &joinables[j]);
            let Some(join_point) = common_point(a, b, config) else {
                continue;
            };
            let coordinate = intersection_with(a, b, config)
                .filter(|p| p.distance(join_point.point) <= join_point.radius)
                .unwrap_or(join_point.point);
            crate::log::trace!(a = a.id(), b = b.id(), %coordinate, "raw junction");
            junctions.push(Junction::new(i, j, coordinate, join_point));
        }
    }
    junctions
}

/// Merge coincident junctions.
///
/// Walking from the last junction down to the second, each one is absorbed
/// into the lower-indexed junction whose join point is nearest, provided
/// it lies within `junction_merge_epsilon`; equally near candidates go to
/// the lowest index. Because absorption only ever flows towards lower
/// indices, a chain of pairwise-close junctions collapses into the first.
pub fn merge_junctions(raw: Vec<Junction>, config: &Config) -> Vec<Junction> {
    let epsilon = config.junction_merge_epsilon;
    let mut slots: Vec<Option<Junction>> = raw.into_iter().map(Some).collect();

    for labile in (1..slots.len()).rev() {
        let Some(probe) = slots[labile].as_ref().map(|j| j.join_point.point) else {
            continue;
        };
        let target = slots[..labile]
            .iter()
            .enumerate()
            .filter_map(|(k, slot)| {
                let distance = slot.as_ref()?.join_point.point.distance(probe);
                (distance <= epsilon).then_some((k, distance))
            })
            .min_by(|x, y| x.1.total_cmp(&y.1).then(x.0.cmp(&y.0)));
        let Some((fixed, _)) = target else {
            continue;
        };
        if let Some(absorbed) = slots[labile].take() {
            if let Some(host) = slots[fixed].as_mut() {
                host.absorb(absorbed);
            }
        }
    }

    slots.into_iter().flatten().collect()
}

/// Raw junctions followed by the merge pass
pub fn build_junctions(joinables: &[Joinable], config: &Config) -> Vec<Junction> {
    let raw = raw_junctions(joinables, config);
    let raw_count = raw.len();
    let merged = merge_junctions(raw, config);
    crate::log::debug!(raw = raw_count, merged = merged.len(), "junctions");
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::TextRun;
    use crate::types::Segment;

    fn line(id: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Joinable {
        Joinable::Line {
            id: id.to_string(),
            segment: Segment::new(Point::new(x0, y0), Point::new(x1, y1)),
        }
    }

    fn raw_at(a: usize, b: usize, x: f64) -> Junction {
        let point = Point::new(x, 0.0);
        Junction::new(a, b, point, JoinPoint::new(point, 1.0, 1.0))
    }

    #[test]
    fn three_lines_meeting_make_one_junction() {
        let config = Config::default();
        let joinables = vec![
            line("a", 0.0, 0.0, 10.0, 0.0),
            line("b", 0.0, 0.0, 0.0, 10.0),
            line("c", 0.0, 0.0, -7.0, -7.0),
        ];
        let junctions = build_junctions(&joinables, &config);
        assert_eq!(junctions.len(), 1);
        assert_eq!(junctions[0].members, BTreeSet::from([0, 1, 2]));
        assert_eq!(junctions[0].coordinate, Point::new(0.0, 0.0));
    }

    #[test]
    fn coordinate_is_refined_by_the_intersection() {
        let config = Config::default();
        // The first line overshoots the second, which stops short of it
        let joinables = vec![line("a", 0.0, 0.0, 10.3, 0.0), line("b", 10.0, 0.5, 10.0, 10.0)];
        let junctions = build_junctions(&joinables, &config);
        assert_eq!(junctions.len(), 1);
        assert!(junctions[0].coordinate.distance(Point::new(10.0, 0.0)) < 1e-9);
        assert!(junctions[0].join_point.point.distance(Point::new(10.15, 0.25)) < 1e-9);
    }

    #[test]
    fn text_too_far_from_line_makes_no_junction() {
        let config = Config::default();
        let joinables = vec![
            line("a", 0.0, 0.0, 10.0, 0.0),
            Joinable::Text {
                id: "t".into(),
                run: TextRun {
                    position: Point::new(15.0, 0.0),
                    content: "N".into(),
                    glyph_radius: 1.0,
                },
            },
        ];
        assert!(build_junctions(&joinables, &config).is_empty());
    }

    #[test]
    fn merge_is_transitive_along_a_chain() {
        // 0-1 and 1-2 are within epsilon, 0-2 is not
        let config = Config::default().with_junction_merge_epsilon(2.0);
        let raw = vec![raw_at(0, 1, 0.0), raw_at(2, 3, 1.5), raw_at(4, 5, 3.0)];
        let merged = merge_junctions(raw, &config);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].members, BTreeSet::from([0, 1, 2, 3, 4, 5]));
        assert_eq!(merged[0].weight(), 3);
        assert_eq!(merged[0].coordinate, Point::new(1.5, 0.0));
        assert_eq!(merged[0].join_point.point, Point::new(0.0, 0.0));
    }

    #[test]
    fn labile_joins_the_nearest_fixed() {
        let config = Config::default().with_junction_merge_epsilon(2.0);
        let raw = vec![raw_at(0, 1, 0.0), raw_at(2, 3, 3.0), raw_at(4, 5, 1.8)];
        let merged = merge_junctions(raw, &config);
        // 1.8 is within reach of both; 3.0 is nearer
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].members, BTreeSet::from([2, 3, 4, 5]));
    }

    #[test]
    fn equidistant_candidates_go_to_the_lowest_index() {
        let config = Config::default().with_junction_merge_epsilon(2.0);
        let raw = vec![raw_at(0, 1, 0.0), raw_at(2, 3, 3.0), raw_at(4, 5, 1.5)];
        let merged = merge_junctions(raw, &config);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].members, BTreeSet::from([0, 1, 4, 5]));
    }

    #[test]
    fn distant_junctions_stay_apart() {
        let config = Config::default();
        let raw = vec![raw_at(0, 1, 0.0), raw_at(2, 3, 10.0)];
        assert_eq!(merge_junctions(raw, &config).len(), 2);
    }
}
