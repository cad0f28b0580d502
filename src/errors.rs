//! Error types with diagnostics using miette
//!
//! Geometry never fails: degenerate input degrades to a lower-fidelity
//! result. The errors here cover the three places where failing loudly is
//! correct: malformed path-data text, an invalid configuration, and a
//! caller asking a joinable for something it cannot have.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Path Data Errors
// ============================================================================

/// Errors raised while parsing an SVG path-data string
#[derive(Error, Diagnostic, Debug)]
pub enum PathDataError {
    #[error("malformed path data")]
    #[diagnostic(code(inktopo::path::syntax))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("{expected}")]
        span: SourceSpan,
        expected: String,
    },

    #[error("path data must start with a moveto")]
    #[diagnostic(
        code(inktopo::path::missing_moveto),
        help("begin the path with `M x y` or `m dx dy`")
    )]
    MissingMoveTo {
        #[source_code]
        src: NamedSource<String>,
        #[label("first command")]
        span: SourceSpan,
    },

    #[error("wrong number of coordinates for `{command}`: got {got}")]
    #[diagnostic(
        code(inktopo::path::arity),
        help("`{command}` takes coordinates in groups of {group}")
    )]
    Arity {
        command: char,
        got: usize,
        group: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("this command")]
        span: SourceSpan,
    },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors that occur when validating or editing a [`crate::Config`]
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("parameter `{name}` must be finite, got {value}")]
    #[diagnostic(code(inktopo::config::not_finite))]
    NotFinite { name: &'static str, value: f64 },

    #[error("parameter `{name}` must not be negative, got {value}")]
    #[diagnostic(code(inktopo::config::negative))]
    Negative { name: &'static str, value: f64 },

    #[error("separation range is empty: min {min} >= max {max}")]
    #[diagnostic(
        code(inktopo::config::separation_range),
        help("min_separation_factor must be strictly below max_separation_factor")
    )]
    SeparationRange { min: f64, max: f64 },

    #[error("decimal_places must be at most {max}, got {value}")]
    #[diagnostic(code(inktopo::config::decimal_places))]
    DecimalPlaces { value: u32, max: u32 },

    #[error("unknown parameter `{name}`")]
    #[diagnostic(code(inktopo::config::unknown_parameter))]
    UnknownParameter {
        name: String,
        #[help]
        suggestion: Option<String>,
    },
}

// ============================================================================
// Join Errors
// ============================================================================

/// Contract violations on the joinable model
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum JoinError {
    #[error("{kind} joinable `{id}` has no backbone")]
    #[diagnostic(
        code(inktopo::join::no_backbone),
        help(
            "only lines, tramlines and hatched triangles carry a backbone; \
             use `backbone()` to check"
        )
    )]
    NoBackbone { id: String, kind: &'static str },
}
