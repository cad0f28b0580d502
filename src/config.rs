//! Tunable reconstruction parameters.
//!
//! Every tolerance the stages use lives in one [`Config`]. Parameters are
//! plain public fields, and are also reachable by name through
//! [`Config::get`] / [`Config::set`] so callers can drive them from their
//! own settings files or command lines.

use crate::defaults;
use crate::errors::ConfigError;

/// Conversion from the `f64` used by the named-parameter table.
trait Parameter: Sized {
    fn from_f64(name: &'static str, value: f64) -> Result<Self, ConfigError>;
}

impl Parameter for f64 {
    fn from_f64(name: &'static str, value: f64) -> Result<Self, ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite { name, value });
        }
        Ok(value)
    }
}

macro_rules! integer_parameter {
    ($($ty:ty),*) => {
        $(
            impl Parameter for $ty {
                fn from_f64(name: &'static str, value: f64) -> Result<Self, ConfigError> {
                    if !value.is_finite() {
                        return Err(ConfigError::NotFinite { name, value });
                    }
                    if value < 0.0 {
                        return Err(ConfigError::Negative { name, value });
                    }
                    Ok(value.round() as $ty)
                }
            }
        )*
    };
}

integer_parameter!(usize, u32);

macro_rules! parameters {
    ($( $(#[$doc:meta])* $name:ident : $ty:ty = $default:expr ),* $(,)?) => {
        /// Reconstruction tolerances. See `defaults.rs` for the values.
        #[derive(Debug, Clone, PartialEq)]
        pub struct Config {
            $( $(#[$doc])* pub $name: $ty, )*
        }

        impl Default for Config {
            fn default() -> Self {
                Self { $( $name: $default, )* }
            }
        }

        impl Config {
            /// Names accepted by [`Config::get`] and [`Config::set`]
            pub const NAMES: &'static [&'static str] = &[$( stringify!($name) ),*];

            /// Read a parameter by name
            pub fn get(&self, name: &str) -> Result<f64, ConfigError> {
                match name {
                    $( stringify!($name) => Ok(self.$name as f64), )*
                    _ => Err(unknown_parameter(name)),
                }
            }

            /// Set a parameter by name. The whole config is re-validated and
            /// left untouched if the new value is rejected.
            pub fn set(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
                let mut next = self.clone();
                match name {
                    $( stringify!($name) => {
                        next.$name = <$ty as Parameter>::from_f64(stringify!($name), value)?;
                    } )*
                    _ => return Err(unknown_parameter(name)),
                }
                next.validate()?;
                *self = next;
                Ok(())
            }

            fn float_parameters(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
                [$( (stringify!($name), self.$name as f64) ),*].into_iter()
            }
        }
    };
}

parameters! {
    /// Corner cosine and relative side mismatch allowed for a rectangle
    rect_eps: f64 = defaults::RECT_EPS,
    /// Looser tolerance for rectangles with arc corners
    rounded_box_eps: f64 = defaults::ROUNDED_BOX_EPS,
    /// Relative radius deviation allowed for a circle fit
    circle_eps: f64 = defaults::CIRCLE_EPS,
    /// Angle (radians) under which two lines are parallel for tramlines
    angle_eps: f64 = defaults::ANGLE_EPS,
    /// Turn angle (radians) under which a polyline vertex is "straight"
    max_angle: f64 = defaults::MAX_ANGLE,
    /// Width under which a shape is effectively a single line
    max_width: f64 = defaults::MAX_WIDTH,
    /// Polygon/bounding-box area ratio under which a polygon is degenerate
    degenerate_area_ratio: f64 = defaults::DEGENERATE_AREA_RATIO,
    /// Lower tramline separation, as a fraction of the longer line
    min_separation_factor: f64 = defaults::MIN_SEPARATION_FACTOR,
    /// Upper tramline separation, as a fraction of the longer line
    max_separation_factor: f64 = defaults::MAX_SEPARATION_FACTOR,
    /// Shorter/longer length ratio a tramline pair must exceed
    min_relative_line_length: f64 = defaults::MIN_RELATIVE_LINE_LENGTH,
    /// Slack when testing whether tramline projections overlap
    overlap_eps: f64 = defaults::OVERLAP_EPS,
    /// Fractional slack when testing whether an intersection lies on a backbone
    intersection_slack: f64 = defaults::INTERSECTION_SLACK,
    /// Intersections farther than this many backbone lengths are rejected
    relative_distance_to_intersection: f64 = defaults::RELATIVE_DISTANCE_TO_INTERSECTION,
    /// Distance under which two raw junctions merge
    junction_merge_epsilon: f64 = defaults::JUNCTION_MERGE_EPSILON,
    /// Capture radius of a line endpoint
    line_anchor_radius: f64 = defaults::LINE_ANCHOR_RADIUS,
    /// Capture radius of a polygon vertex or edge midpoint
    polygon_anchor_radius: f64 = defaults::POLYGON_ANCHOR_RADIUS,
    /// Text capture radius as a multiple of the first glyph's radius
    text_radius_factor: f64 = defaults::TEXT_RADIUS_FACTOR,
    /// Minimum number of strokes in a hashed wedge
    hatch_min_lines: usize = defaults::HATCH_MIN_LINES,
    /// Largest spacing between consecutive hatch strokes
    hatch_max_gap: f64 = defaults::HATCH_MAX_GAP,
    /// How far a hatch stroke's midpoint may sit off the wedge axis
    hatch_axis_tolerance: f64 = defaults::HATCH_AXIS_TOLERANCE,
    /// Smallest length step between hatch strokes, relative to the longest
    hatch_min_growth: f64 = defaults::HATCH_MIN_GROWTH,
    /// Open polylines with fewer segments are split into lines
    min_lines_in_polyline: usize = defaults::MIN_LINES_IN_POLYLINE,
    /// Decimal places kept on classified coordinates
    decimal_places: u32 = defaults::DECIMAL_PLACES,
}

fn unknown_parameter(name: &str) -> ConfigError {
    let stem: String = name.chars().take(4).collect();
    let suggestion = Config::NAMES
        .iter()
        .find(|candidate| !stem.is_empty() && candidate.starts_with(&stem))
        .map(|candidate| format!("did you mean `{candidate}`?"));
    ConfigError::UnknownParameter {
        name: name.to_string(),
        suggestion,
    }
}

impl Config {
    /// Check every parameter is finite and non-negative, the tramline
    /// separation window is non-empty, and rounding stays representable
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.float_parameters() {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        if self.min_separation_factor >= self.max_separation_factor {
            return Err(ConfigError::SeparationRange {
                min: self.min_separation_factor,
                max: self.max_separation_factor,
            });
        }
        if self.decimal_places > defaults::MAX_DECIMAL_PLACES {
            return Err(ConfigError::DecimalPlaces {
                value: self.decimal_places,
                max: defaults::MAX_DECIMAL_PLACES,
            });
        }
        Ok(())
    }

    /// Builder-style setter for the tramline angle tolerance
    pub fn with_angle_eps(mut self, radians: f64) -> Self {
        self.angle_eps = radians;
        self
    }

    /// Builder-style setter for the tramline separation window
    pub fn with_separation_factors(mut self, min: f64, max: f64) -> Self {
        self.min_separation_factor = min;
        self.max_separation_factor = max;
        self
    }

    /// Builder-style setter for the rectangle tolerance
    pub fn with_rect_eps(mut self, eps: f64) -> Self {
        self.rect_eps = eps;
        self
    }

    /// Builder-style setter for the junction merge distance
    pub fn with_junction_merge_epsilon(mut self, eps: f64) -> Self {
        self.junction_merge_epsilon = eps;
        self
    }
}
