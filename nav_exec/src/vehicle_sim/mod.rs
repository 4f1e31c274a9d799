//! # Vehicle simulation module
//!
//! This module provides a kinematic simulation of the vehicle following a waypoint path in
//! the local frame. It is used to exercise the navigation stack without the physical
//! vehicle.
//!
//! The simulated vehicle accelerates towards its target speed while it has a path to
//! follow, moves directly towards the current target waypoint each step, and consumes
//! waypoints in order as it comes within the configured tolerance of each one. Once the
//! last waypoint is reached the vehicle stops and reports the destination as reached.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
pub use params::Params;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic simulation of the vehicle.
pub struct VehicleSim {
    params: Params,

    /// Current position of the vehicle in the local frame
    position_m: Vector2<f64>,

    /// Current speed of the vehicle
    speed_ms: f64,

    /// The path being followed
    path_m: Vec<Vector2<f64>>,

    /// Index into `path_m` of the current target waypoint
    target_index: usize,

    /// Whether the vehicle is currently following `path_m`
    following: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The outcome of one simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepStatus {
    /// No path is being followed
    Idle,

    /// Moving towards the current target waypoint
    Following,

    /// The current target waypoint was reached this step
    WaypointReached {
        /// Number of waypoints still to visit
        remaining: usize,
    },

    /// The final waypoint was reached this step, the vehicle has stopped
    DestinationReached,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleSim {
    /// Create a new simulated vehicle at rest at the local frame origin.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            position_m: Vector2::zeros(),
            speed_ms: 0.0,
            path_m: Vec::new(),
            target_index: 0,
            following: false,
        }
    }

    /// Adopt a new path to follow.
    ///
    /// The vehicle snaps to the first point of the path and starts following from there. An
    /// empty path stops the vehicle instead.
    pub fn set_path(&mut self, path_m: Vec<Vector2<f64>>) {
        match path_m.first() {
            Some(&start_m) => {
                self.position_m = start_m;
                self.path_m = path_m;
                self.target_index = 0;
                self.following = true;
            }
            None => {
                self.path_m = Vec::new();
                self.target_index = 0;
                self.following = false;
            }
        }
    }

    /// Advance the simulation by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f64) -> StepStatus {
        // Accelerate towards the target speed while following, decelerate to rest otherwise
        if self.following {
            self.speed_ms += self.params.accel_ms2 * dt_s;
        } else {
            self.speed_ms -= self.params.decel_ms2 * dt_s;
        }
        self.speed_ms = clamp(self.speed_ms, 0.0, self.params.target_speed_ms);

        if !self.following {
            return StepStatus::Idle;
        }

        let target_m = self.path_m[self.target_index];
        let to_target_m = target_m - self.position_m;
        let dist_m = to_target_m.norm();

        if dist_m < self.params.waypoint_tolerance_m {
            // Target reached, move on to the next waypoint
            self.target_index += 1;

            if self.target_index >= self.path_m.len() {
                self.following = false;
                self.speed_ms = 0.0;
                StepStatus::DestinationReached
            } else {
                StepStatus::WaypointReached {
                    remaining: self.path_m.len() - self.target_index,
                }
            }
        } else {
            // Move towards the target
            let move_dist_m = self.speed_ms * dt_s;
            self.position_m += (move_dist_m / dist_m) * to_target_m;

            StepStatus::Following
        }
    }

    /// Get the current position of the vehicle in the local frame.
    pub fn position_m(&self) -> Vector2<f64> {
        self.position_m
    }

    /// Get the current speed of the vehicle.
    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }

    /// Get the current velocity of the vehicle in the local frame.
    ///
    /// The velocity points at the current target waypoint with magnitude equal to the
    /// current speed, or is zero when the vehicle has nothing to follow.
    pub fn velocity_ms(&self) -> Vector2<f64> {
        if !self.following {
            return Vector2::zeros();
        }

        let to_target_m = self.path_m[self.target_index] - self.position_m;
        let dist_m = to_target_m.norm();

        if dist_m > 0.0 {
            (self.speed_ms / dist_m) * to_target_m
        } else {
            Vector2::zeros()
        }
    }

    /// Whether the vehicle is currently following a path.
    pub fn is_following(&self) -> bool {
        self.following
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn test_params() -> Params {
        Params {
            target_speed_ms: 15.0,
            accel_ms2: 2.5,
            decel_ms2: 5.0,
            waypoint_tolerance_m: 2.0,
        }
    }

    #[test]
    fn test_set_path_snaps_to_start() {
        let mut sim = VehicleSim::new(test_params());

        sim.set_path(vec![Vector2::new(10.0, 5.0), Vector2::new(50.0, 5.0)]);

        assert_eq!(sim.position_m(), Vector2::new(10.0, 5.0));
        assert!(sim.is_following());

        // An empty path stops the vehicle
        sim.set_path(Vec::new());
        assert!(!sim.is_following());
    }

    #[test]
    fn test_idle_without_path() {
        let mut sim = VehicleSim::new(test_params());

        assert_eq!(sim.step(0.02), StepStatus::Idle);
        assert_eq!(sim.speed_ms(), 0.0);
        assert_eq!(sim.velocity_ms(), Vector2::zeros());
    }

    #[test]
    fn test_follows_path_to_destination() {
        let mut sim = VehicleSim::new(test_params());

        sim.set_path(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(50.0, 0.0),
            Vector2::new(50.0, 50.0),
        ]);

        let mut waypoints_reached = 0;
        let mut destination_reached = false;

        // At 15 m/s the ~100 m path takes well under 2000 steps of 20 ms
        for _ in 0..2000 {
            match sim.step(0.02) {
                StepStatus::WaypointReached { .. } => waypoints_reached += 1,
                StepStatus::DestinationReached => {
                    destination_reached = true;
                    break;
                }
                _ => (),
            }

            // Speed never exceeds the target
            assert!(sim.speed_ms() <= test_params().target_speed_ms);
        }

        assert!(destination_reached);
        assert_eq!(waypoints_reached, 2);
        assert!(!sim.is_following());
        assert_eq!(sim.speed_ms(), 0.0);

        // The vehicle stopped within tolerance of the final waypoint
        assert!((sim.position_m() - Vector2::new(50.0, 50.0)).norm() < 2.0);
    }

    #[test]
    fn test_waypoints_consumed_in_order() {
        let mut sim = VehicleSim::new(test_params());

        sim.set_path(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(10.0, 0.0),
            Vector2::new(20.0, 0.0),
        ]);

        let mut remaining_seen = Vec::new();

        for _ in 0..2000 {
            match sim.step(0.02) {
                StepStatus::WaypointReached { remaining } => remaining_seen.push(remaining),
                StepStatus::DestinationReached => break,
                _ => (),
            }
        }

        assert_eq!(remaining_seen, vec![2, 1]);
    }

    #[test]
    fn test_decelerates_to_rest_after_destination() {
        let mut sim = VehicleSim::new(test_params());

        sim.set_path(vec![Vector2::new(0.0, 0.0), Vector2::new(30.0, 0.0)]);

        for _ in 0..2000 {
            if sim.step(0.02) == StepStatus::DestinationReached {
                break;
            }
        }

        // Once stopped the vehicle stays at rest
        assert_eq!(sim.step(0.02), StepStatus::Idle);
        assert_eq!(sim.speed_ms(), 0.0);
    }
}
