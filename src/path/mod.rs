//! Raw drawing paths as emitted by a document renderer.
//!
//! This module is organized into submodules:
//! - `signature`: the command-sequence string used to pick fit heuristics
//! - `parse`: SVG path-data text to absolute commands
//!
//! All commands are stored in absolute coordinates. A path may contain
//! several subpaths; the classifier only recovers shapes from paths with a
//! single leading moveto.

pub mod parse;
pub mod signature;

pub use parse::parse_path_data;
pub use signature::Signature;

use std::fmt::Write as _;

use crate::types::{Point, Segment, round_to};

/// One drawing command in absolute coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    Close,
}

impl PathCommand {
    /// Signature letter for this command
    pub fn letter(&self) -> char {
        match self {
            PathCommand::MoveTo(_) => 'M',
            PathCommand::LineTo(_) => 'L',
            PathCommand::CubicTo { .. } => 'C',
            PathCommand::Close => 'Z',
        }
    }

    /// Where the pen ends up after this command (None for close)
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicTo { to, .. } => Some(to),
            PathCommand::Close => None,
        }
    }

    fn rounded(&self, decimals: u32) -> PathCommand {
        match *self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(p.rounded(decimals)),
            PathCommand::LineTo(p) => PathCommand::LineTo(p.rounded(decimals)),
            PathCommand::CubicTo { c1, c2, to } => PathCommand::CubicTo {
                c1: c1.rounded(decimals),
                c2: c2.rounded(decimals),
                to: to.rounded(decimals),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// A cubic Bezier segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub c1: Point,
    pub c2: Point,
    pub p3: Point,
}

impl CubicBezier {
    /// Evaluate the curve at parameter `t` in [0, 1]
    pub fn eval(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let v = self.p0.vec() * (u * u * u)
            + self.c1.vec() * (3.0 * u * u * t)
            + self.c2.vec() * (3.0 * u * t * t)
            + self.p3.vec() * (t * t * t);
        v.into()
    }

    pub fn chord(&self) -> Segment {
        Segment::new(self.p0, self.p3)
    }

    /// Largest distance of a control point from the chord. The curve lies
    /// within the control hull, so this bounds its deviation from straight.
    pub fn chord_deviation(&self) -> f64 {
        let chord = self.chord();
        chord
            .distance_to_segment(self.c1)
            .max(chord.distance_to_segment(self.c2))
    }
}

/// A drawn piece of a path, with its start point resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Piece {
    Line(Segment),
    Cubic(CubicBezier),
}

/// An unclassified drawing path
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPath {
    pub commands: Vec<PathCommand>,
}

impl RawPath {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Build an open or closed path through `points` with straight lines
    pub fn from_points(points: &[Point], closed: bool) -> Self {
        let mut commands = Vec::with_capacity(points.len() + 1);
        for (i, p) in points.iter().enumerate() {
            commands.push(if i == 0 {
                PathCommand::MoveTo(*p)
            } else {
                PathCommand::LineTo(*p)
            });
        }
        if closed && !commands.is_empty() {
            commands.push(PathCommand::Close);
        }
        Self { commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn signature(&self) -> Signature {
        Signature::of(&self.commands)
    }

    /// True if the path ends with a closepath
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Command end points in drawing order (the "vertices" of the path)
    pub fn end_points(&self) -> Vec<Point> {
        self.commands.iter().filter_map(PathCommand::end_point).collect()
    }

    /// Resolve commands into drawn pieces. A closepath contributes the
    /// straight piece back to the subpath start when that has length.
    pub fn pieces(&self) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut current: Option<Point> = None;
        let mut subpath_start: Option<Point> = None;
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    current = Some(p);
                    subpath_start = Some(p);
                }
                PathCommand::LineTo(p) => {
                    if let Some(from) = current {
                        pieces.push(Piece::Line(Segment::new(from, p)));
                    }
                    current = Some(p);
                }
                PathCommand::CubicTo { c1, c2, to } => {
                    if let Some(p0) = current {
                        pieces.push(Piece::Cubic(CubicBezier { p0, c1, c2, p3: to }));
                    }
                    current = Some(to);
                }
                PathCommand::Close => {
                    if let (Some(from), Some(start)) = (current, subpath_start) {
                        if from != start {
                            pieces.push(Piece::Line(Segment::new(from, start)));
                        }
                    }
                    current = subpath_start;
                }
            }
        }
        pieces
    }

    /// Normalized absolute command string, used to spot paths that are
    /// redundant renders of the same ink
    pub fn geometric_hash(&self, decimals: u32) -> String {
        let mut out = String::new();
        for command in &self.commands {
            out.push(command.letter());
            let coords: Vec<Point> = match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
                PathCommand::CubicTo { c1, c2, to } => vec![c1, c2, to],
                PathCommand::Close => Vec::new(),
            };
            for (i, p) in coords.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{},{}", round_to(p.x, decimals), round_to(p.y, decimals));
            }
        }
        out
    }

    pub fn rounded(&self, decimals: u32) -> RawPath {
        RawPath {
            commands: self.commands.iter().map(|c| c.rounded(decimals)).collect(),
        }
    }
}
