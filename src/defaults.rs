//! Default tolerances and priorities (document units, radians)

// Classifier
pub const RECT_EPS: f64 = 0.01;
pub const ROUNDED_BOX_EPS: f64 = 0.1;
pub const CIRCLE_EPS: f64 = 0.05;
pub const MAX_ANGLE: f64 = 0.15;
pub const MAX_WIDTH: f64 = 1.0;
pub const DEGENERATE_AREA_RATIO: f64 = 0.05;
pub const MIN_LINES_IN_POLYLINE: usize = 8;
pub const DECIMAL_PLACES: u32 = 3;
/// Beyond this, `10^places` no longer rounds meaningfully in f64
pub const MAX_DECIMAL_PLACES: u32 = 15;

// Tramlines
pub const ANGLE_EPS: f64 = 0.05;
pub const MIN_SEPARATION_FACTOR: f64 = 0.1;
pub const MAX_SEPARATION_FACTOR: f64 = 0.35;
pub const MIN_RELATIVE_LINE_LENGTH: f64 = 0.5;
pub const OVERLAP_EPS: f64 = 0.01;

// Hatched wedges
pub const HATCH_MIN_LINES: usize = 3;
pub const HATCH_MAX_GAP: f64 = 3.0;
pub const HATCH_AXIS_TOLERANCE: f64 = 1.0;
pub const HATCH_MIN_GROWTH: f64 = 0.01;

// Joining
pub const INTERSECTION_SLACK: f64 = 1e-6;
pub const RELATIVE_DISTANCE_TO_INTERSECTION: f64 = 1.5;
pub const JUNCTION_MERGE_EPSILON: f64 = 2.0;
pub const LINE_ANCHOR_RADIUS: f64 = 1.0;
pub const POLYGON_ANCHOR_RADIUS: f64 = 1.0;
pub const TEXT_RADIUS_FACTOR: f64 = 1.5;

// Join priorities: higher wins tie-breaks
pub const LINE_PRIORITY: f64 = 1.0;
pub const HATCHED_TRIANGLE_PRIORITY: f64 = 2.9;
pub const POLYGON_PRIORITY: f64 = 3.0;
pub const TRAMLINE_PRIORITY: f64 = 5.0;
pub const TEXT_PRIORITY: f64 = 10.0;
