//! Wire types for the routing service response.
//!
//! Only the fields consumed by the route client are decoded, everything else in the
//! response is ignored. Optional fields default rather than failing the decode.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Top level routing service response.
#[derive(Deserialize)]
pub struct RouteResponse {
    /// Status code reported by the service, `"Ok"` on success
    pub code: Option<String>,

    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Deserialize)]
pub struct Route {
    /// Total route distance in meters
    #[serde(default)]
    pub distance: f64,

    /// Total route duration in seconds
    #[serde(default)]
    pub duration: f64,

    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One maneuver segment of a route leg.
#[derive(Deserialize)]
pub struct Step {
    /// Distance covered by this step in meters
    #[serde(default)]
    pub distance: f64,

    /// Name of the street the step is on
    #[serde(default)]
    pub name: String,

    pub geometry: Option<Geometry>,

    pub maneuver: Option<Maneuver>,
}

/// GeoJSON geometry of a step.
#[derive(Deserialize)]
pub struct Geometry {
    /// Coordinate pairs in `[longitude, latitude]` order (GeoJSON convention, the reverse
    /// of the request URL's encoding)
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
pub struct Maneuver {
    pub instruction: Option<String>,
}
