//! Renderer output: a tree of primitives.
//!
//! Groups nest; every other kind is a leaf. Leaves that draw ink become
//! [`StyledPath`]s for the classifier, text runs go straight to the
//! joinable model.

use crate::classify::StyledPath;
use crate::errors::PathDataError;
use crate::path::{RawPath, parse_path_data};
use crate::shapes::Style;
use crate::types::Point;

/// A run of text, reduced to what joining needs: where its first glyph
/// sits and how large that glyph is
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Centroid of the first glyph
    pub position: Point,
    pub content: String,
    /// Radius of the first glyph's bounding circle
    pub glyph_radius: f64,
}

impl TextRun {
    /// A run with no characters has no first glyph and never joins
    pub fn has_glyph(&self) -> bool {
        !self.content.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveKind {
    Line { p0: Point, p1: Point },
    Polygon(Vec<Point>),
    Polyline(Vec<Point>),
    Text(TextRun),
    Path(RawPath),
    Group(Vec<Primitive>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub id: Option<String>,
    pub style: Style,
    pub kind: PrimitiveKind,
}

impl Primitive {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            id: None,
            style: Style::default(),
            kind,
        }
    }

    pub fn line(p0: Point, p1: Point) -> Self {
        Self::new(PrimitiveKind::Line { p0, p1 })
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        Self::new(PrimitiveKind::Polygon(points))
    }

    pub fn polyline(points: Vec<Point>) -> Self {
        Self::new(PrimitiveKind::Polyline(points))
    }

    pub fn text(position: Point, content: impl Into<String>, glyph_radius: f64) -> Self {
        Self::new(PrimitiveKind::Text(TextRun {
            position,
            content: content.into(),
            glyph_radius,
        }))
    }

    pub fn path(path: RawPath) -> Self {
        Self::new(PrimitiveKind::Path(path))
    }

    /// A raw path given as SVG path-data text
    pub fn path_data(d: &str) -> Result<Self, PathDataError> {
        Ok(Self::path(parse_path_data(d)?))
    }

    pub fn group(children: Vec<Primitive>) -> Self {
        Self::new(PrimitiveKind::Group(children))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, PrimitiveKind::Group(_))
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match &self.kind {
            PrimitiveKind::Text(run) => Some(run),
            _ => None,
        }
    }

    /// The drawing path of an ink leaf; None for text and groups
    pub fn to_styled_path(&self) -> Option<StyledPath> {
        let path = match &self.kind {
            PrimitiveKind::Line { p0, p1 } => RawPath::from_points(&[*p0, *p1], false),
            PrimitiveKind::Polygon(points) => RawPath::from_points(points, true),
            PrimitiveKind::Polyline(points) => RawPath::from_points(points, false),
            PrimitiveKind::Path(path) => path.clone(),
            PrimitiveKind::Text(_) | PrimitiveKind::Group(_) => return None,
        };
        Some(StyledPath {
            id: self.id.clone(),
            style: self.style.clone(),
            path,
        })
    }

    /// Leaves in depth-first order. Unset style attributes are inherited
    /// from enclosing groups.
    pub fn flatten(&self) -> Vec<Primitive> {
        let mut leaves = Vec::new();
        self.flatten_into(&Style::default(), &mut leaves);
        leaves
    }

    fn flatten_into(&self, inherited: &Style, leaves: &mut Vec<Primitive>) {
        let style = self.style.inherit(inherited);
        match &self.kind {
            PrimitiveKind::Group(children) => {
                for child in children {
                    child.flatten_into(&style, leaves);
                }
            }
            kind => leaves.push(Primitive {
                id: self.id.clone(),
                style,
                kind: kind.clone(),
            }),
        }
    }
}
