//! Main navigation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session and logging
//!     - Load parameters
//!     - Request a route between the configured start and end points
//!     - Convert the route's waypoints into the local frame
//!     - Simulate the vehicle following the local path
//!
//! The route request and the coordinate conversion are independent of each other, this
//! executable is the point where the two are composed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use nav_lib::{
    coord_frame::CoordFrame,
    params::NavExecParams,
    route_client::RouteClient,
    vehicle_sim::{self, StepStatus, VehicleSim},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle of the follow loop.
const CYCLE_PERIOD_S: f64 = 0.02;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("nav_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("EVA Navigation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: NavExecParams =
        util::params::load("nav_exec.toml").wrap_err("Could not load exec params")?;

    let sim_params: vehicle_sim::Params =
        util::params::load("vehicle_sim.toml").wrap_err("Could not load vehicle sim params")?;

    info!("Exec parameters loaded");

    // ---- MODULE INIT ----

    let coord_frame = CoordFrame::new(exec_params.origin_lat_deg, exec_params.origin_lon_deg)
        .wrap_err("Failed to initialise the coordinate frame")?;

    info!(
        "Local frame origin set to ({}, {})",
        exec_params.origin_lat_deg, exec_params.origin_lon_deg
    );

    let mut route_client = RouteClient::new().wrap_err("Failed to initialise the route client")?;
    route_client.set_server_url(&exec_params.route_server_url);

    // ---- ROUTE REQUEST ----

    info!(
        "Requesting route from ({}, {}) to ({}, {})",
        exec_params.start_lat_deg,
        exec_params.start_lon_deg,
        exec_params.end_lat_deg,
        exec_params.end_lon_deg
    );

    let route = route_client
        .get_route(
            exec_params.start_lat_deg,
            exec_params.start_lon_deg,
            exec_params.end_lat_deg,
            exec_params.end_lon_deg,
        )
        .wrap_err("Route request failed")?;

    if route.is_empty() {
        info!("The routing service returned an empty route, nothing to follow");
        return Ok(());
    }

    info!(
        "Route received: {} waypoints, {:.1} m, {:.1} s",
        route.get_num_waypoints(),
        route.total_distance_m,
        route.total_duration_s
    );

    // Keep the route in the session for later analysis
    session.save("route_info.json", &route);

    // ---- LOCAL FRAME CONVERSION ----

    let path_m = route.local_points(&coord_frame);
    session.save("local_path.json", &path_m);

    // ---- FOLLOW SIMULATION ----

    info!("Begining follow simulation\n");

    let mut sim = VehicleSim::new(sim_params);
    sim.set_path(path_m);

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        match sim.step(CYCLE_PERIOD_S) {
            StepStatus::WaypointReached { remaining } => {
                info!("Waypoint reached, {} waypoints remaining", remaining);
            }
            StepStatus::DestinationReached => {
                info!("Destination reached!");
                break;
            }
            _ => (),
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
            }
        }
    }

    info!(
        "Final vehicle position: ({:.2}, {:.2}) m",
        sim.position_m()[0],
        sim.position_m()[1]
    );

    Ok(())
}
