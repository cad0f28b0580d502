//! The reconstruction pipeline.
//!
//! [`Reconstruction`] owns a primitive tree and runs the stages on demand:
//!
//! ```text
//! flatten -> classify -> partition -> hatches -> tramlines -> joinables -> junctions
//! ```
//!
//! Each stage runs at most once; asking for a later stage runs every
//! earlier stage it depends on, and asking again returns the stored result.

use std::fmt;

use crate::classify::{Classifier, StyledPath};
use crate::config::Config;
use crate::errors::ConfigError;
use crate::hatch::{HatchDetection, HatchedTriangle, detect_hatches};
use crate::joinable::Joinable;
use crate::junction::{Junction, merge_junctions, raw_junctions};
use crate::primitive::Primitive;
use crate::shapes::{Shape, ShapeKind};
use crate::tramline::{TramLine, TramlineDetection, detect_tramlines};

/// Classified shapes sorted by what the later stages do with them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Lines, including those split out of short open polylines
    pub lines: Vec<Shape>,
    pub polygons: Vec<Shape>,
    /// Text leaves of the primitive tree
    pub texts: Vec<Primitive>,
    /// Everything else: rectangles, circles, long polylines, unresolved paths
    pub others: Vec<Shape>,
}

/// Sort shapes into lines, polygons and the rest. Open polylines with
/// fewer than `min_lines_in_polyline` segments are split into their lines.
pub fn partition(shapes: Vec<Shape>, texts: Vec<Primitive>, config: &Config) -> Partition {
    let mut out = Partition {
        texts,
        ..Default::default()
    };
    for shape in shapes {
        match shape.kind() {
            ShapeKind::Line => out.lines.push(shape),
            ShapeKind::Polygon => out.polygons.push(shape),
            ShapeKind::Polyline
                if shape
                    .as_polyline()
                    .is_some_and(|p| p.segment_count() < config.min_lines_in_polyline) =>
            {
                out.lines.extend(explode_polyline(&shape));
            }
            _ => out.others.push(shape),
        }
    }
    out
}

/// One line shape per non-degenerate segment, ids suffixed with the
/// segment index
fn explode_polyline(shape: &Shape) -> Vec<Shape> {
    let Some(polyline) = shape.as_polyline() else {
        return Vec::new();
    };
    polyline
        .segments()
        .into_iter()
        .enumerate()
        .filter(|(_, segment)| segment.length() > 0.0)
        .map(|(k, segment)| {
            Shape::line(segment.p0, segment.p1)
                .with_style(shape.style.clone())
                .with_id(shape.id.as_ref().map(|id| format!("{id}.{k}")))
        })
        .collect()
}

/// Build the joinables, in a fixed order: lines, tramlines, hatched
/// triangles, polygons, texts. Unnamed items get an id from their kind and
/// position in their own list.
pub fn collect_joinables(
    lines: &[Shape],
    tramlines: &[TramLine],
    hatched: &[HatchedTriangle],
    polygons: &[Shape],
    texts: &[Primitive],
) -> Vec<Joinable> {
    let name = |id: &Option<String>, kind: &str, i: usize| {
        id.clone().unwrap_or_else(|| format!("{kind}{i}"))
    };
    let mut joinables = Vec::new();
    for (i, shape) in lines.iter().enumerate() {
        if let Some(segment) = shape.as_line() {
            joinables.push(Joinable::Line {
                id: name(&shape.id, "line", i),
                segment,
            });
        }
    }
    joinables.extend(tramlines.iter().cloned().map(Joinable::TramLine));
    joinables.extend(hatched.iter().cloned().map(Joinable::HatchedTriangle));
    for (i, shape) in polygons.iter().enumerate() {
        if let Some(polygon) = shape.as_polygon() {
            joinables.push(Joinable::Polygon {
                id: name(&shape.id, "polygon", i),
                points: polygon.points.clone(),
            });
        }
    }
    for (i, leaf) in texts.iter().enumerate() {
        if let Some(run) = leaf.as_text() {
            if !run.has_glyph() {
                crate::log::warn!(id = ?leaf.id, "text without a glyph never joins");
            }
            joinables.push(Joinable::Text {
                id: name(&leaf.id, "text", i),
                run: run.clone(),
            });
        }
    }
    joinables
}

/// A primitive tree and the memoized results of every stage run on it
#[derive(Debug, Clone)]
pub struct Reconstruction {
    config: Config,
    root: Primitive,
    leaves: Option<Vec<Primitive>>,
    shapes: Option<Vec<Shape>>,
    partition: Option<Partition>,
    hatches: Option<HatchDetection>,
    tramlines: Option<TramlineDetection>,
    joinables: Option<Vec<Joinable>>,
    raw_junctions: Option<Vec<Junction>>,
    junctions: Option<Vec<Junction>>,
}

impl Reconstruction {
    pub fn new(root: Primitive, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            root,
            leaves: None,
            shapes: None,
            partition: None,
            hatches: None,
            tramlines: None,
            joinables: None,
            raw_junctions: None,
            junctions: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> &Primitive {
        &self.root
    }

    // ========================================================================
    // Stages
    // ========================================================================

    /// Leaf primitives, depth-first
    pub fn leaves(&mut self) -> &[Primitive] {
        let leaves = match self.leaves.take() {
            Some(leaves) => leaves,
            None => {
                let leaves = self.root.flatten();
                crate::log::debug!(leaves = leaves.len(), "flattened primitive tree");
                leaves
            }
        };
        self.leaves.insert(leaves)
    }

    /// Every ink leaf, deduplicated and classified
    pub fn shapes(&mut self) -> &[Shape] {
        let shapes = match self.shapes.take() {
            Some(shapes) => shapes,
            None => {
                let inputs: Vec<StyledPath> = self
                    .leaves()
                    .iter()
                    .filter_map(Primitive::to_styled_path)
                    .collect();
                Classifier::new(&self.config).classify_all(&inputs)
            }
        };
        self.shapes.insert(shapes)
    }

    pub fn partition(&mut self) -> &Partition {
        let stage = match self.partition.take() {
            Some(stage) => stage,
            None => {
                let shapes = self.shapes().to_vec();
                let texts: Vec<Primitive> = self
                    .leaves()
                    .iter()
                    .filter(|leaf| leaf.as_text().is_some())
                    .cloned()
                    .collect();
                let stage = partition(shapes, texts, &self.config);
                crate::log::debug!(
                    lines = stage.lines.len(),
                    polygons = stage.polygons.len(),
                    texts = stage.texts.len(),
                    others = stage.others.len(),
                    "partitioned shapes"
                );
                stage
            }
        };
        self.partition.insert(stage)
    }

    fn hatch_stage(&mut self) -> &HatchDetection {
        let stage = match self.hatches.take() {
            Some(stage) => stage,
            None => {
                let lines = self.partition().lines.clone();
                detect_hatches(lines, &self.config)
            }
        };
        self.hatches.insert(stage)
    }

    fn tramline_stage(&mut self) -> &TramlineDetection {
        let stage = match self.tramlines.take() {
            Some(stage) => stage,
            None => {
                let lines = self.hatch_stage().remaining.clone();
                detect_tramlines(lines, &self.config)
            }
        };
        self.tramlines.insert(stage)
    }

    pub fn hatched_triangles(&mut self) -> &[HatchedTriangle] {
        &self.hatch_stage().hatched
    }

    pub fn tramlines(&mut self) -> &[TramLine] {
        &self.tramline_stage().tramlines
    }

    /// Lines left over once wedges and double lines took theirs
    pub fn remaining_lines(&mut self) -> &[Shape] {
        &self.tramline_stage().remaining
    }

    pub fn joinables(&mut self) -> &[Joinable] {
        let joinables = match self.joinables.take() {
            Some(joinables) => joinables,
            None => {
                let lines = self.remaining_lines().to_vec();
                let tramlines = self.tramlines().to_vec();
                let hatched = self.hatched_triangles().to_vec();
                let Partition {
                    polygons, texts, ..
                } = self.partition().clone();
                let joinables = collect_joinables(&lines, &tramlines, &hatched, &polygons, &texts);
                crate::log::debug!(joinables = joinables.len(), "built joinables");
                joinables
            }
        };
        self.joinables.insert(joinables)
    }

    /// Pairwise junctions, before merging
    pub fn raw_junctions(&mut self) -> &[Junction] {
        let junctions = match self.raw_junctions.take() {
            Some(junctions) => junctions,
            None => {
                let config = self.config.clone();
                raw_junctions(self.joinables(), &config)
            }
        };
        self.raw_junctions.insert(junctions)
    }

    /// Merged junctions: the end product of the pipeline
    pub fn junctions(&mut self) -> &[Junction] {
        let junctions = match self.junctions.take() {
            Some(junctions) => junctions,
            None => {
                let raw = self.raw_junctions().to_vec();
                let raw_count = raw.len();
                let merged = merge_junctions(raw, &self.config);
                crate::log::debug!(raw = raw_count, merged = merged.len(), "merged junctions");
                merged
            }
        };
        self.junctions.insert(junctions)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn shapes_of_kind(&mut self, kind: ShapeKind) -> Vec<&Shape> {
        self.shapes().iter().filter(|s| s.kind() == kind).collect()
    }

    /// Joinables taking part in a junction
    pub fn members_of<'a>(&'a mut self, junction: &Junction) -> Vec<&'a Joinable> {
        let joinables = self.joinables();
        junction
            .members
            .iter()
            .filter_map(|&i| joinables.get(i))
            .collect()
    }

    /// Run every stage and count what each produced
    pub fn summary(&mut self) -> Summary {
        Summary {
            leaves: self.leaves().len(),
            shapes: self.shapes().len(),
            lines: self.partition().lines.len(),
            polygons: self.partition().polygons.len(),
            texts: self.partition().texts.len(),
            others: self.partition().others.len(),
            hatched_triangles: self.hatched_triangles().len(),
            tramlines: self.tramlines().len(),
            joinables: self.joinables().len(),
            raw_junctions: self.raw_junctions().len(),
            junctions: self.junctions().len(),
        }
    }
}

/// Per-stage counts of a finished reconstruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub leaves: usize,
    pub shapes: usize,
    pub lines: usize,
    pub polygons: usize,
    pub texts: usize,
    pub others: usize,
    pub hatched_triangles: usize,
    pub tramlines: usize,
    pub joinables: usize,
    pub raw_junctions: usize,
    pub junctions: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "leaves:            {}", self.leaves)?;
        writeln!(f, "shapes:            {}", self.shapes)?;
        writeln!(
            f,
            "  lines/polygons/texts/others: {}/{}/{}/{}",
            self.lines, self.polygons, self.texts, self.others
        )?;
        writeln!(f, "hatched triangles: {}", self.hatched_triangles)?;
        writeln!(f, "tramlines:         {}", self.tramlines)?;
        writeln!(f, "joinables:         {}", self.joinables)?;
        write!(
            f,
            "junctions:         {} (from {} raw)",
            self.junctions, self.raw_junctions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn short_polylines_are_exploded() {
        let config = Config::default();
        let shape = Shape::new(crate::shapes::PolylineShape::new(vec![
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
        ]))
        .with_id(Some("zig".into()));
        let out = partition(vec![shape], Vec::new(), &config);
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[1].id.as_deref(), Some("zig.1"));
        assert!(out.others.is_empty());
    }

    #[test]
    fn long_polylines_are_kept() {
        let config = Config::default();
        let points: Vec<Point> = (0..10)
            .map(|i| p(i as f64, if i % 2 == 0 { 0.0 } else { 3.0 }))
            .collect();
        let shape = Shape::new(crate::shapes::PolylineShape::new(points));
        let out = partition(vec![shape], Vec::new(), &config);
        assert!(out.lines.is_empty());
        assert_eq!(out.others.len(), 1);
    }

    #[test]
    fn stages_are_memoized() {
        let tree = Primitive::group(vec![
            Primitive::line(p(0.0, 0.0), p(10.0, 0.0)),
            Primitive::line(p(10.0, 0.0), p(10.0, 10.0)),
        ]);
        let mut reconstruction = Reconstruction::new(tree, Config::default()).unwrap();
        let first = reconstruction.junctions().to_vec();
        assert_eq!(first.len(), 1);
        assert_eq!(reconstruction.junctions(), first.as_slice());
        assert!(reconstruction.shapes.is_some());
        assert!(reconstruction.tramlines.is_some());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = Config::default().with_separation_factors(0.4, 0.1);
        let err = Reconstruction::new(Primitive::group(Vec::new()), config).unwrap_err();
        assert!(matches!(err, ConfigError::SeparationRange { .. }));
    }

    #[test]
    fn unnamed_joinables_get_kind_ids() {
        let lines = vec![Shape::line(p(0.0, 0.0), p(1.0, 0.0))];
        let texts = vec![Primitive::text(p(5.0, 5.0), "N", 1.0).with_id("n1")];
        let joinables = collect_joinables(&lines, &[], &[], &[], &texts);
        let ids: Vec<&str> = joinables.iter().map(Joinable::id).collect();
        assert_eq!(ids, vec!["line0", "n1"]);
    }
}
