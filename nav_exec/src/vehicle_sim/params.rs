//! Vehicle simulation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the vehicle simulation
#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    /// Target speed of the vehicle while following a path
    pub target_speed_ms: f64,

    /// Acceleration rate used while following a path
    pub accel_ms2: f64,

    /// Deceleration rate used when there is no path to follow
    pub decel_ms2: f64,

    /// Distance to the target waypoint below which it is considered reached
    pub waypoint_tolerance_m: f64,
}
