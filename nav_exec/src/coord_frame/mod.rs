//! # Coordinate frame module
//!
//! This module converts between geographic (GPS) coordinates and the vehicle-local planar
//! frame used by the motion and odometry stack.
//!
//! The local frame is a flat, meters-based Cartesian frame centred on a configurable GPS
//! origin, using an equirectangular approximation: one degree of latitude is a fixed number
//! of meters, and one degree of longitude is scaled by the cosine of the origin latitude.
//! The approximation is valid over short ranges (tens of kilometers) around the origin, and
//! degrades towards the poles where the longitude scale collapses.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Meters per degree of latitude, constant over the whole globe under the flat-earth
/// approximation.
const M_PER_DEG_LAT: f64 = 111320.0;

/// Minimum accepted longitude scale in meters per degree. An origin whose scale falls below
/// this cannot be inverted meaningfully, so it is rejected at construction rather than
/// producing a frame whose `local_to_gps` blows up.
const MIN_M_PER_DEG_LON: f64 = 1e-6;

/// Default origin latitude in degrees (Casablanca deployment area).
const DEFAULT_ORIGIN_LAT_DEG: f64 = 33.5731;

/// Default origin longitude in degrees (Casablanca deployment area).
const DEFAULT_ORIGIN_LON_DEG: f64 = -7.5898;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A local planar coordinate frame centred on a GPS origin.
///
/// The frame owns its origin and the scale factors derived from it. Changing the origin with
/// [`CoordFrame::set_origin`] recomputes the scale factors, it does not retroactively change
/// any positions already converted.
#[derive(Clone, Debug)]
pub struct CoordFrame {
    /// Latitude of the origin in degrees
    origin_lat_deg: f64,

    /// Longitude of the origin in degrees
    origin_lon_deg: f64,

    /// Meters per degree of latitude at the origin
    m_per_deg_lat: f64,

    /// Meters per degree of longitude at the origin
    m_per_deg_lon: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors associated with constructing a coordinate frame.
#[derive(Debug, Error)]
pub enum CoordFrameError {
    #[error("Origin latitude {0} deg is outside the valid range [-90, 90]")]
    InvalidLatitude(f64),

    #[error("Origin longitude {0} deg is outside the valid range [-180, 180]")]
    InvalidLongitude(f64),

    #[error("Origin latitude {0} deg produces a degenerate longitude scale")]
    DegenerateOrigin(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl CoordFrame {
    /// Create a new frame centred on the given origin.
    ///
    /// The origin must be a valid GPS coordinate, and must not sit so close to a pole that
    /// the longitude scale degenerates.
    pub fn new(origin_lat_deg: f64, origin_lon_deg: f64) -> Result<Self, CoordFrameError> {
        let (m_per_deg_lat, m_per_deg_lon) = get_scale_factors(origin_lat_deg, origin_lon_deg)?;

        Ok(Self {
            origin_lat_deg,
            origin_lon_deg,
            m_per_deg_lat,
            m_per_deg_lon,
        })
    }

    /// Convert a GPS coordinate into the local frame.
    ///
    /// Pure function of the current origin, no side effects. The input is not validated,
    /// points far from the origin simply accumulate the approximation error.
    pub fn gps_to_local(&self, lat_deg: f64, lon_deg: f64) -> Vector2<f64> {
        Vector2::new(
            (lon_deg - self.origin_lon_deg) * self.m_per_deg_lon,
            (lat_deg - self.origin_lat_deg) * self.m_per_deg_lat,
        )
    }

    /// Convert a local frame position back into a GPS `(latitude, longitude)` pair in
    /// degrees.
    ///
    /// This is the exact algebraic inverse of [`CoordFrame::gps_to_local`] for any origin
    /// accepted at construction.
    pub fn local_to_gps(&self, position_m: &Vector2<f64>) -> (f64, f64) {
        (
            self.origin_lat_deg + position_m[1] / self.m_per_deg_lat,
            self.origin_lon_deg + position_m[0] / self.m_per_deg_lon,
        )
    }

    /// Replace the origin, recomputing the scale factors.
    ///
    /// On error the frame is left unchanged.
    pub fn set_origin(&mut self, lat_deg: f64, lon_deg: f64) -> Result<(), CoordFrameError> {
        let (m_per_deg_lat, m_per_deg_lon) = get_scale_factors(lat_deg, lon_deg)?;

        self.origin_lat_deg = lat_deg;
        self.origin_lon_deg = lon_deg;
        self.m_per_deg_lat = m_per_deg_lat;
        self.m_per_deg_lon = m_per_deg_lon;

        Ok(())
    }

    /// Get the current origin as a `(latitude, longitude)` pair in degrees.
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_lat_deg, self.origin_lon_deg)
    }
}

impl Default for CoordFrame {
    fn default() -> Self {
        // The default origin is statically known to be valid
        Self {
            origin_lat_deg: DEFAULT_ORIGIN_LAT_DEG,
            origin_lon_deg: DEFAULT_ORIGIN_LON_DEG,
            m_per_deg_lat: M_PER_DEG_LAT,
            m_per_deg_lon: M_PER_DEG_LAT * DEFAULT_ORIGIN_LAT_DEG.to_radians().cos(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Validate an origin and compute the per-degree meter scales at it.
fn get_scale_factors(lat_deg: f64, lon_deg: f64) -> Result<(f64, f64), CoordFrameError> {
    if !lat_deg.is_finite() || lat_deg.abs() > 90.0 {
        return Err(CoordFrameError::InvalidLatitude(lat_deg));
    }
    if !lon_deg.is_finite() || lon_deg.abs() > 180.0 {
        return Err(CoordFrameError::InvalidLongitude(lon_deg));
    }

    let m_per_deg_lon = M_PER_DEG_LAT * lat_deg.to_radians().cos();

    if m_per_deg_lon < MIN_M_PER_DEG_LON {
        return Err(CoordFrameError::DegenerateOrigin(lat_deg));
    }

    Ok((M_PER_DEG_LAT, m_per_deg_lon))
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_origin_maps_to_zero() {
        let origins = [(33.5731, -7.5898), (0.0, 0.0), (-45.2, 170.55)];

        for &(lat_deg, lon_deg) in origins.iter() {
            let frame = CoordFrame::new(lat_deg, lon_deg).unwrap();
            let local = frame.gps_to_local(lat_deg, lon_deg);

            assert!(local[0].abs() < 1e-12);
            assert!(local[1].abs() < 1e-12);
        }
    }

    #[test]
    fn test_round_trip() {
        let frame = CoordFrame::default();

        let points = [
            (33.5741, -7.5888),
            (33.5731, -7.5898),
            (33.4901, -7.7123),
            (33.6523, -7.4216),
        ];

        for &(lat_deg, lon_deg) in points.iter() {
            let local = frame.gps_to_local(lat_deg, lon_deg);
            let (rt_lat_deg, rt_lon_deg) = frame.local_to_gps(&local);

            assert!((rt_lat_deg - lat_deg).abs() < 1e-9);
            assert!((rt_lon_deg - lon_deg).abs() < 1e-9);
        }
    }

    #[test]
    fn test_local_offsets() {
        // A point ~150 m north east of the default origin. One millidegree of latitude is
        // 111.32 m, one millidegree of longitude is scaled by cos(33.5731 deg).
        let frame = CoordFrame::default();
        let local = frame.gps_to_local(33.5741, -7.5888);

        assert!((local[0] - 92.8).abs() < 0.1);
        assert!((local[1] - 111.3).abs() < 0.1);
    }

    #[test]
    fn test_set_origin() {
        let mut frame = CoordFrame::default();

        let before = frame.gps_to_local(33.5741, -7.5888);

        frame.set_origin(33.5741, -7.5888).unwrap();

        // Results computed before the origin change are unaffected by it
        assert!((before[0] - 92.8).abs() < 0.1);
        assert!((before[1] - 111.3).abs() < 0.1);

        // New conversions use the new origin
        let after = frame.gps_to_local(33.5741, -7.5888);
        assert!(after[0].abs() < 1e-12);
        assert!(after[1].abs() < 1e-12);

        assert_eq!(frame.origin(), (33.5741, -7.5888));
    }

    #[test]
    fn test_origin_validation() {
        assert!(matches!(
            CoordFrame::new(90.1, 0.0),
            Err(CoordFrameError::InvalidLatitude(_))
        ));
        assert!(matches!(
            CoordFrame::new(0.0, -180.5),
            Err(CoordFrameError::InvalidLongitude(_))
        ));
        assert!(matches!(
            CoordFrame::new(90.0, 0.0),
            Err(CoordFrameError::DegenerateOrigin(_))
        ));
        assert!(matches!(
            CoordFrame::new(-90.0, 0.0),
            Err(CoordFrameError::DegenerateOrigin(_))
        ));

        // A rejected set_origin leaves the frame unchanged
        let mut frame = CoordFrame::default();
        assert!(frame.set_origin(100.0, 0.0).is_err());
        assert_eq!(frame.origin(), (33.5731, -7.5898));
    }
}
