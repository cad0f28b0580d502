//! Reconstruct diagram topology from flattened vector graphics.
//!
//! Document renderers hand out drawings as a flat soup of line segments,
//! polygons, raw drawing paths and positioned text. This crate recovers
//! the structure that was lost on the way: which paths are really
//! rectangles, circles or lines, which parallel lines form a double line,
//! which stroke ladders form a hashed wedge, and where everything meets.
//!
//! ```
//! use inktopo::{Config, Point, Primitive, reconstruct};
//!
//! let tree = Primitive::group(vec![
//!     Primitive::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
//!     Primitive::line(Point::new(0.0, 0.0), Point::new(0.0, 10.0)),
//!     Primitive::text(Point::new(10.8, 0.0), "OH", 0.6),
//! ]);
//! let mut reconstruction = reconstruct(tree, Config::default())?;
//! assert_eq!(reconstruction.junctions().len(), 2);
//! # Ok::<(), miette::Report>(())
//! ```

pub mod classify;
pub mod config;
pub mod defaults;
pub mod errors;
pub mod geometry;
pub mod hatch;
pub mod joinable;
pub mod junction;
pub mod log;
pub mod path;
pub mod pipeline;
pub mod primitive;
pub mod shapes;
pub mod tramline;
pub mod types;

pub use classify::{Classifier, StyledPath};
pub use config::Config;
pub use errors::{ConfigError, JoinError, PathDataError};
pub use hatch::HatchedTriangle;
pub use joinable::{JoinPoint, Joinable, common_point, intersection_with};
pub use junction::{Junction, build_junctions};
pub use path::{PathCommand, RawPath, parse_path_data};
pub use pipeline::{Reconstruction, Summary};
pub use primitive::{Primitive, PrimitiveKind, TextRun};
pub use shapes::{Shape, ShapeKind, Style};
pub use tramline::TramLine;
pub use types::{Point, Segment};

/// Run the whole pipeline over a primitive tree.
///
/// Fails only on an invalid configuration. The returned reconstruction has
/// every stage computed.
pub fn reconstruct(root: Primitive, config: Config) -> miette::Result<Reconstruction> {
    let mut reconstruction = Reconstruction::new(root, config)?;
    reconstruction.junctions();
    Ok(reconstruction)
}

/// Classify one SVG path-data string.
pub fn classify_path_data(d: &str, config: &Config) -> miette::Result<Shape> {
    config.validate()?;
    let path = parse_path_data(d)?;
    Ok(Classifier::new(config).classify(&path, &Style::default()))
}
