//! Geometry functions: circle fits, turn angles and straight-run merging

use glam::{DMat3, DVec2, dvec3};

use crate::types::{Point, Segment};

/// Circle through three points. None when they are (nearly) collinear.
pub fn circle_through(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.perp_dot(ac);
    let scale = ab.length_squared().max(ac.length_squared());
    if scale == 0.0 || d.abs() <= 1e-12 * scale {
        return None;
    }
    let ab2 = ab.length_squared();
    let ac2 = ac.length_squared();
    let offset = DVec2::new(ac.y * ab2 - ab.y * ac2, ab.x * ac2 - ac.x * ab2) / d;
    let center = a + offset;
    Some((center, offset.length()))
}

/// Algebraic least-squares circle fit (Kasa). Coordinates are centered on
/// their mean before solving to keep the normal equations well conditioned.
/// Exactly three points use the direct construction.
pub fn fit_circle(points: &[Point]) -> Option<(Point, f64)> {
    match points.len() {
        0..=2 => return None,
        3 => return circle_through(points[0], points[1], points[2]),
        _ => {}
    }

    let n = points.len() as f64;
    let mean = points.iter().fold(DVec2::ZERO, |acc, p| acc + p.vec()) / n;

    let (mut sxx, mut sxy, mut syy, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    let (mut sxz, mut syz, mut sz) = (0.0, 0.0, 0.0);
    for p in points {
        let v = p.vec() - mean;
        let z = v.length_squared();
        sxx += v.x * v.x;
        sxy += v.x * v.y;
        syy += v.y * v.y;
        sx += v.x;
        sy += v.y;
        sxz += v.x * z;
        syz += v.y * z;
        sz += z;
    }

    // Columns of the symmetric normal matrix for x^2 + y^2 + D x + E y + F = 0
    let normal = DMat3::from_cols(dvec3(sxx, sxy, sx), dvec3(sxy, syy, sy), dvec3(sx, sy, n));
    let det = normal.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return None;
    }
    let solution = normal.inverse() * dvec3(-sxz, -syz, -sz);
    let (d, e, f) = (solution.x, solution.y, solution.z);
    let local_center = DVec2::new(-d * 0.5, -e * 0.5);
    let r2 = local_center.length_squared() - f;
    if !(r2 > 0.0) {
        return None;
    }
    let center: Point = (local_center + mean).into();
    center.is_finite().then_some((center, r2.sqrt()))
}

/// Absolute turning angle at `b` when walking a -> b -> c, in [0, pi].
/// Zero-length legs count as no turn.
pub fn turn_angle(a: Point, b: Point, c: Point) -> f64 {
    Segment::new(a, b)
        .angle_to(&Segment::new(b, c))
        .unwrap_or(0.0)
}

/// Drop consecutive duplicate points
pub fn dedup_points(points: &[Point], eps: f64) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| last.distance(*p) > eps) {
            out.push(*p);
        }
    }
    out
}

/// Remove interior vertices where the chain turns by less than
/// `max_angle`. The turn is measured against the start of the current run,
/// so a slow curve cannot creep through as a sequence of small turns.
pub fn merge_straight_runs(points: &[Point], max_angle: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    let mut run_start = points[0];
    for i in 1..points.len() - 1 {
        let candidate = points[i];
        let next = points[i + 1];
        let run = Segment::new(run_start, candidate);
        let ahead = Segment::new(run_start, next);
        let straight = turn_angle(run_start, candidate, next) < max_angle
            && run.angle_to(&ahead).unwrap_or(0.0) < max_angle;
        if !straight {
            out.push(candidate);
            run_start = candidate;
        }
    }
    if let Some(last) = points.last() {
        out.push(*last);
    }
    out
}

/// Remove vertices of a closed ring where it turns by less than `eps`.
/// Repeats until stable; stops once fewer than three vertices remain.
pub fn simplify_ring(points: &[Point], eps: f64) -> Vec<Point> {
    let mut ring = points.to_vec();
    loop {
        let n = ring.len();
        if n < 3 {
            return ring;
        }
        let flat =
            (0..n).find(|&i| turn_angle(ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]) < eps);
        match flat {
            Some(i) => {
                ring.remove(i);
            }
            None => return ring,
        }
    }
}

/// The two points farthest apart, by index
pub fn farthest_pair(points: &[Point]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            let d = points[i].distance(points[j]);
            if best.is_none_or(|(_, _, b)| d > b) {
                best = Some((i, j, d));
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_through_three_points() {
        let (c, r) = circle_through(
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(-1.0, 0.0),
        )
        .unwrap();
        assert!(c.distance(Point::ORIGIN) < 1e-12);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_points_have_no_circle() {
        assert!(
            circle_through(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0))
                .is_none()
        );
    }

    #[test]
    fn least_squares_recovers_offset_circle() {
        let center = Point::new(100.0, -40.0);
        let points: Vec<Point> = (0..8)
            .map(|i| {
                let a = i as f64 * std::f64::consts::FRAC_PI_4;
                Point::new(center.x + 3.0 * a.cos(), center.y + 3.0 * a.sin())
            })
            .collect();
        let (c, r) = fit_circle(&points).unwrap();
        assert!(c.distance(center) < 1e-9);
        assert!((r - 3.0).abs() < 1e-9);
    }

    #[test]
    fn turn_angles() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!(turn_angle(a, b, Point::new(2.0, 0.0)).abs() < 1e-12);
        let right = turn_angle(a, b, Point::new(1.0, 1.0));
        assert!((right - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn merge_collapses_nearly_straight_chain() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.05),
            Point::new(10.0, 0.0),
        ];
        assert_eq!(
            merge_straight_runs(&points, 0.15),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
        );
    }

    #[test]
    fn merge_keeps_real_corners() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        assert_eq!(merge_straight_runs(&points, 0.15).len(), 3);
    }

    #[test]
    fn ring_simplification_drops_collinear_vertices() {
        let ring = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let simplified = simplify_ring(&ring, 0.01);
        assert_eq!(simplified.len(), 4);
        assert!(!simplified.contains(&Point::new(5.0, 0.0)));
    }

    #[test]
    fn flat_ring_collapses() {
        let ring = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)];
        assert_eq!(simplify_ring(&ring, 0.01).len(), 2);
    }

    #[test]
    fn dedup_and_farthest_pair() {
        let points = dedup_points(
            &[
                Point::new(0.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(3.0, 0.0),
                Point::new(1.0, 1.0),
            ],
            1e-9,
        );
        assert_eq!(points.len(), 3);
        assert_eq!(farthest_pair(&points), Some((0, 1)));
    }
}
