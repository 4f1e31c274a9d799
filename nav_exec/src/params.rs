//! # Navigation Executable Parameters
//!
//! This module provides parameters for the navigation executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
pub struct NavExecParams {
    /// Latitude of the local frame origin in degrees
    pub origin_lat_deg: f64,

    /// Longitude of the local frame origin in degrees
    pub origin_lon_deg: f64,

    /// Base URL of the road-network routing service
    pub route_server_url: String,

    /// Latitude of the route start point in degrees
    pub start_lat_deg: f64,

    /// Longitude of the route start point in degrees
    pub start_lon_deg: f64,

    /// Latitude of the route end point in degrees
    pub end_lat_deg: f64,

    /// Longitude of the route end point in degrees
    pub end_lon_deg: f64,
}
