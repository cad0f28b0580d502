use std::collections::BTreeSet;

use inktopo::shapes::{CircleShape, Geometry};
use inktopo::{Config, Joinable, Point, Primitive, Reconstruction, Segment, reconstruct};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Primitive {
    Primitive::line(p(x0, y0), p(x1, y1))
}

// =============================================================================
// Double lines
// =============================================================================

#[test]
fn double_line_becomes_a_single_tramline() {
    let tree = Primitive::group(vec![line(0.0, 0.0, 10.0, 0.0), line(0.0, 1.5, 10.0, 1.5)]);
    let config = Config::default().with_angle_eps(0.3);
    let mut reconstruction = reconstruct(tree, config).unwrap();
    assert_eq!(reconstruction.tramlines().len(), 1);
    assert!(reconstruction.remaining_lines().is_empty());
}

#[test]
fn tramline_anchors_sit_between_matched_endpoints() {
    // Drawn in opposite directions, slightly staggered
    let tree = Primitive::group(vec![line(0.0, 0.0, 10.0, 0.0), line(10.5, 2.0, 0.5, 2.0)]);
    let mut reconstruction = reconstruct(tree, Config::default()).unwrap();
    let tramline = reconstruction.tramlines()[0].clone();
    let [a, b] = [
        Segment::new(p(0.0, 0.0), p(10.0, 0.0)),
        Segment::new(p(10.5, 2.0), p(0.5, 2.0)),
    ];

    let matched = [a.p0.midpoint(b.p1), a.p1.midpoint(b.p0)];
    let crossed = [a.p0.midpoint(b.p0), a.p1.midpoint(b.p1)];
    let config = reconstruction.config().clone();
    let anchors: Vec<Point> = Joinable::TramLine(tramline)
        .anchor_points(&config)
        .into_iter()
        .map(|jp| jp.point)
        .collect();

    assert_eq!(anchors, matched.to_vec());
    for (anchor, (good, bad)) in anchors.iter().zip(matched.iter().zip(crossed.iter())) {
        assert!(anchor.distance(*good) < anchor.distance(*bad));
    }
}

// =============================================================================
// Junctions
// =============================================================================

#[test]
fn three_lines_meeting_give_one_junction() {
    let tree = Primitive::group(vec![
        line(0.0, 0.0, 10.0, 0.0),
        line(0.0, 0.0, 0.0, 10.0),
        line(0.0, 0.0, -7.0, -7.0),
    ]);
    let mut reconstruction = reconstruct(tree, Config::default()).unwrap();
    let junctions = reconstruction.junctions().to_vec();
    assert_eq!(junctions.len(), 1);
    assert_eq!(junctions[0].members.len(), 3);
}

#[test]
fn text_beyond_reach_of_a_line_gives_no_junction() {
    let tree = Primitive::group(vec![
        line(0.0, 0.0, 10.0, 0.0),
        Primitive::text(p(14.0, 0.0), "Cl", 1.0),
    ]);
    let mut reconstruction = reconstruct(tree, Config::default()).unwrap();
    assert!(reconstruction.junctions().is_empty());
}

#[test]
fn scattered_endpoints_merge_transitively() {
    // Pairwise common points at x = 0.4, 0.8 and 1.2 all collapse together
    let tree = Primitive::group(vec![
        line(-10.0, 0.0, 0.0, 0.0),
        line(0.8, 0.0, 0.8, 10.0),
        line(1.6, 0.0, 11.6, -10.0),
    ]);
    let mut reconstruction = reconstruct(tree, Config::default()).unwrap();
    assert_eq!(reconstruction.raw_junctions().len(), 3);
    let junctions = reconstruction.junctions().to_vec();
    assert_eq!(junctions.len(), 1);
    assert_eq!(junctions[0].members, BTreeSet::from([0, 1, 2]));
}

#[test]
fn junction_members_resolve_to_joinables() {
    let tree = Primitive::group(vec![
        line(0.0, 0.0, 10.0, 0.0).with_id("bond"),
        Primitive::text(p(10.8, 0.0), "OH", 0.6).with_id("label"),
    ]);
    let mut reconstruction = reconstruct(tree, Config::default()).unwrap();
    let junction = reconstruction.junctions()[0].clone();
    let ids: Vec<String> = reconstruction
        .members_of(&junction)
        .into_iter()
        .map(|j| j.id().to_string())
        .collect();
    assert_eq!(ids, vec!["bond", "label"]);
    // Text outranks the line, so the junction sits on the label
    assert_eq!(junction.join_point.point, p(10.8, 0.0));
}

// =============================================================================
// Whole pipeline
// =============================================================================

fn drawing() -> Primitive {
    let rect = "M50 50 H60 V55 H50 Z";
    let circle = CircleShape::new(p(80.0, 80.0), 3.0).to_path();
    let stroke = |x: f64, length: f64| line(x, -0.5 * length, x, 0.5 * length);

    Primitive::group(vec![
        Primitive::path_data(rect).unwrap().with_id("frame"),
        Primitive::path_data(rect).unwrap().with_id("frame-again"),
        Primitive::path(circle),
        Primitive::group(vec![
            stroke(0.0, 0.5),
            stroke(1.0, 1.0),
            stroke(2.0, 1.5),
            stroke(3.0, 2.0),
        ]),
        line(10.0, 20.0, 20.0, 20.0),
        line(10.0, 21.5, 20.0, 21.5),
        line(20.5, 20.75, 28.0, 28.0).with_id("bond"),
        Primitive::polyline(vec![p(40.0, 0.0), p(45.0, 5.0), p(50.0, 0.0)]).with_id("zig"),
        Primitive::text(p(28.5, 28.5), "N", 0.5).with_id("n"),
        Primitive::polygon(vec![p(60.0, 0.0), p(70.0, 0.0), p(65.0, 8.0)]),
    ])
}

#[test]
fn pipeline_summary() {
    let mut reconstruction = Reconstruction::new(drawing(), Config::default()).unwrap();
    insta::assert_snapshot!(reconstruction.summary(), @r"
    leaves:            13
    shapes:            11
      lines/polygons/texts/others: 9/1/1/2
    hatched triangles: 1
    tramlines:         1
    joinables:         7
    junctions:         3 (from 3 raw)
    ");
}

#[test]
fn pipeline_keeps_first_of_duplicate_paths() {
    let mut reconstruction = Reconstruction::new(drawing(), Config::default()).unwrap();
    let ids: Vec<Option<String>> = reconstruction
        .partition()
        .others
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(ids, vec![Some("frame".to_string()), None]);
}

#[test]
fn pipeline_wedge_and_bond_junctions() {
    let mut reconstruction = Reconstruction::new(drawing(), Config::default()).unwrap();
    let wedge = reconstruction.hatched_triangles()[0].clone();
    assert_eq!(wedge.apex(), p(0.0, 0.0));

    let junctions = reconstruction.junctions().to_vec();
    let mut member_ids: Vec<Vec<String>> = junctions
        .iter()
        .map(|j| {
            reconstruction
                .members_of(j)
                .into_iter()
                .map(|m| m.id().to_string())
                .collect()
        })
        .collect();
    member_ids.sort();
    assert_eq!(
        member_ids,
        vec![
            vec!["bond".to_string(), "n".to_string()],
            vec!["bond".to_string(), "tramline0".to_string()],
            vec!["zig.0".to_string(), "zig.1".to_string()],
        ]
    );
}
