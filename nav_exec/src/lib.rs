//! # Navigation library.
//!
//! This library allows other crates in the workspace to access items defined inside the
//! navigation crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Coordinate frame module - converts between GPS and the vehicle-local planar frame
pub mod coord_frame;

/// Navigation executable parameters
pub mod params;

/// Route - the waypoint sequences produced by the route client
pub mod route;

/// Route client - requests road-network routes from the external routing service
pub mod route_client;

/// Vehicle simulation module - kinematic waypoint follower used to exercise the navigation
/// stack without the physical vehicle
pub mod vehicle_sim;
