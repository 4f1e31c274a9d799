//! # Route
//!
//! This module defines the waypoint route types produced by the route client. A route is an
//! ordered sequence of GPS waypoints annotated with navigation metadata, in drive order.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use crate::coord_frame::CoordFrame;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// One point along a route.
///
/// Waypoints are created during response decoding and are immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteWaypoint {
    /// Latitude of the waypoint in degrees
    pub lat_deg: f64,

    /// Longitude of the waypoint in degrees
    pub lon_deg: f64,

    /// Turn instruction to execute at this waypoint, empty if there is none
    pub instruction: String,

    /// Distance to the next waypoint in meters.
    ///
    /// This is the waypoint's equal share of its parent step's distance, not a geodesic
    /// segment length.
    pub dist_to_next_m: f64,

    /// Name of the street this waypoint is on, empty if unknown
    pub street_name: String,
}

/// A route between two GPS points.
///
/// The waypoint sequence is in drive order and must not be reordered or deduplicated. The
/// default value (no waypoints, zero totals) is the canonical empty route.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteInfo {
    /// The waypoints making up the route, in drive order
    pub waypoints: Vec<RouteWaypoint>,

    /// Total distance of the route in meters
    pub total_distance_m: f64,

    /// Total duration of the route in seconds
    pub total_duration_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl RouteInfo {
    /// True if the route contains no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Get the number of waypoints in the route.
    pub fn get_num_waypoints(&self) -> usize {
        self.waypoints.len()
    }

    /// Map the route's waypoints into the local frame defined by the given coordinate
    /// frame, preserving drive order.
    ///
    /// The frame is borrowed from the caller, the route itself holds no frame state.
    pub fn local_points(&self, frame: &CoordFrame) -> Vec<Vector2<f64>> {
        self.waypoints
            .iter()
            .map(|wp| frame.gps_to_local(wp.lat_deg, wp.lon_deg))
            .collect()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_local_points() {
        let frame = CoordFrame::default();

        let route = RouteInfo {
            waypoints: vec![
                RouteWaypoint {
                    lat_deg: 33.5731,
                    lon_deg: -7.5898,
                    instruction: String::new(),
                    dist_to_next_m: 0.0,
                    street_name: String::new(),
                },
                RouteWaypoint {
                    lat_deg: 33.5741,
                    lon_deg: -7.5888,
                    instruction: String::new(),
                    dist_to_next_m: 0.0,
                    street_name: String::new(),
                },
            ],
            total_distance_m: 150.0,
            total_duration_s: 12.0,
        };

        let points_m = route.local_points(&frame);

        assert_eq!(points_m.len(), 2);

        // First waypoint is the origin
        assert!(points_m[0].norm() < 1e-12);

        // Second is north east of it
        assert!(points_m[1][0] > 0.0);
        assert!(points_m[1][1] > 0.0);
    }

    #[test]
    fn test_default_is_empty() {
        let route = RouteInfo::default();

        assert!(route.is_empty());
        assert_eq!(route.get_num_waypoints(), 0);
        assert_eq!(route.total_distance_m, 0.0);
        assert_eq!(route.total_duration_s, 0.0);
    }
}
