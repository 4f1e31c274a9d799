//! # Route client
//!
//! This module provides the client used to obtain road-network routes between two GPS points
//! from the external routing service, decoding the response into a flat [`RouteInfo`]
//! waypoint sequence.
//!
//! The network transport is injected through the [`Transport`] trait so the decoding logic
//! can be exercised without a live service. [`HttpTransport`] is the production
//! implementation, holding the process's one HTTP client for the lifetime of the route
//! client.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod response;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, warn};
use std::time::Duration;

// Internal
use self::response::RouteResponse;
use crate::route::{RouteInfo, RouteWaypoint};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Base URL of the public demonstration routing endpoint, used unless overridden with
/// [`RouteClient::set_server_url`].
pub const DEFAULT_SERVER_URL: &str = "http://router.project-osrm.org";

/// Timeout applied to each route request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The transport capability used to fetch a raw response body from a URL.
pub trait Transport {
    /// Fetch the body at the given URL.
    ///
    /// Implementations must return the body for any response the server produced, reserving
    /// errors for transport level failures (connection, timeout). Service level errors are
    /// reported inside the body and handled by the decoder.
    fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Production [`Transport`] implementation over HTTP.
///
/// The inner client is created once and reused for every request, redirects are followed
/// automatically.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

/// Client for the external road-network routing service.
pub struct RouteClient<T> {
    server_url: String,
    transport: T,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors associated with the transport capability.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Errors associated with obtaining a route.
#[derive(thiserror::Error, Debug)]
pub enum RouteError {
    #[error("Could not fetch the route: {0}")]
    Transport(#[from] TransportError),

    #[error("The routing service returned code \"{code}\"")]
    Response { code: String },

    #[error("Could not parse the response from the routing service: {0}")]
    Parse(#[from] serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl HttpTransport {
    /// Create a new HTTP transport with the standard request timeout.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        // The body is returned whatever the HTTP status, the routing service reports its
        // errors inside the body
        Ok(self.client.get(url).send()?.text()?)
    }
}

impl RouteClient<HttpTransport> {
    /// Create a new client over HTTP, targeting the default public routing endpoint.
    pub fn new() -> Result<Self, RouteError> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> RouteClient<T> {
    /// Create a new client over the given transport, targeting the default public routing
    /// endpoint.
    pub fn with_transport(transport: T) -> Self {
        Self {
            server_url: String::from(DEFAULT_SERVER_URL),
            transport,
        }
    }

    /// Set the base URL of the routing service.
    pub fn set_server_url(&mut self, url: &str) {
        self.server_url = String::from(url);
    }

    /// Get a route between the two given GPS points.
    ///
    /// On success the returned route's waypoints are in drive order and still in GPS
    /// coordinates, mapping into the local frame is up to the caller. A successful response
    /// containing no route decodes to the empty [`RouteInfo`], which is distinct from the
    /// failure cases reported as [`RouteError`].
    pub fn get_route(
        &self,
        start_lat_deg: f64,
        start_lon_deg: f64,
        end_lat_deg: f64,
        end_lon_deg: f64,
    ) -> Result<RouteInfo, RouteError> {
        let url = self.build_url(start_lat_deg, start_lon_deg, end_lat_deg, end_lon_deg);

        debug!("Requesting route from {}", url);

        let body = self.transport.fetch(&url)?;

        decode_response(&body)
    }

    /// Get a route between the two given GPS points, degrading any failure to the empty
    /// route.
    ///
    /// This preserves the legacy contract in which a failed request and an empty route are
    /// indistinguishable: the failure is logged with context and the canonical empty
    /// [`RouteInfo`] is returned. Callers which need to tell the two apart should use
    /// [`RouteClient::get_route`] instead.
    pub fn get_route_or_empty(
        &self,
        start_lat_deg: f64,
        start_lon_deg: f64,
        end_lat_deg: f64,
        end_lon_deg: f64,
    ) -> RouteInfo {
        match self.get_route(start_lat_deg, start_lon_deg, end_lat_deg, end_lon_deg) {
            Ok(route) => route,
            Err(e) => {
                warn!("Route request failed, returning the empty route: {}", e);
                RouteInfo::default()
            }
        }
    }

    /// Build the request URL for a route between the two given points.
    ///
    /// The service's wire convention is `longitude,latitude` pairs, the reverse of the usual
    /// GPS order.
    fn build_url(
        &self,
        start_lat_deg: f64,
        start_lon_deg: f64,
        end_lat_deg: f64,
        end_lon_deg: f64,
    ) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?steps=true&geometries=geojson&overview=full",
            self.server_url, start_lon_deg, start_lat_deg, end_lon_deg, end_lat_deg
        )
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Decode a raw routing service response body into a [`RouteInfo`].
fn decode_response(body: &str) -> Result<RouteInfo, RouteError> {
    let resp: RouteResponse = serde_json::from_str(body)?;

    // The service reports success through the code field
    match resp.code.as_deref() {
        Some("Ok") => (),
        code => {
            return Err(RouteError::Response {
                code: String::from(code.unwrap_or("unknown")),
            })
        }
    }

    let mut route_info = RouteInfo::default();

    // A successful response with no routes is a legitimate empty route
    let route = match resp.routes.into_iter().next() {
        Some(r) => r,
        None => return Ok(route_info),
    };

    route_info.total_distance_m = route.distance;
    route_info.total_duration_s = route.duration;

    // Expand the steps of the first leg into a flat waypoint sequence, preserving step order
    // then within-step coordinate order
    if let Some(leg) = route.legs.into_iter().next() {
        for step in leg.steps {
            let geometry = match step.geometry {
                Some(g) => g,
                None => continue,
            };

            if geometry.coordinates.is_empty() {
                continue;
            }

            // Each point in the step gets an equal share of the step's distance
            let dist_to_next_m = step.distance / geometry.coordinates.len() as f64;

            let instruction = step
                .maneuver
                .and_then(|m| m.instruction)
                .unwrap_or_default();

            for coord in geometry.coordinates {
                route_info.waypoints.push(RouteWaypoint {
                    // Geometry coordinates are in longitude, latitude order
                    lon_deg: coord[0],
                    lat_deg: coord[1],
                    instruction: instruction.clone(),
                    dist_to_next_m,
                    street_name: step.name.clone(),
                });
            }
        }
    }

    Ok(route_info)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Transport which always returns the same canned body.
    struct StaticTransport(&'static str);

    impl Transport for StaticTransport {
        fn fetch(&self, _url: &str) -> Result<String, TransportError> {
            Ok(String::from(self.0))
        }
    }

    /// Transport which always fails.
    struct DownTransport;

    impl Transport for DownTransport {
        fn fetch(&self, _url: &str) -> Result<String, TransportError> {
            Err(TransportError::Unavailable(String::from(
                "no network in test",
            )))
        }
    }

    /// A well formed response with one route, one leg and two steps of two coordinates
    /// each.
    const TWO_STEP_BODY: &str = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 150.0,
            "duration": 12.5,
            "legs": [{
                "steps": [
                    {
                        "distance": 100.0,
                        "name": "Boulevard Zerktouni",
                        "geometry": {
                            "coordinates": [[-7.5898, 33.5731], [-7.5893, 33.5736]]
                        },
                        "maneuver": {"instruction": "Head northeast"}
                    },
                    {
                        "distance": 50.0,
                        "name": "",
                        "geometry": {
                            "coordinates": [[-7.5893, 33.5736], [-7.5888, 33.5741]]
                        },
                        "maneuver": {"type": "arrive"}
                    }
                ]
            }]
        }]
    }"#;

    #[test]
    fn test_build_url() {
        let client = RouteClient::with_transport(DownTransport);

        let url = client.build_url(33.5731, -7.5898, 33.5741, -7.5888);

        // Longitude precedes latitude in the request path
        assert_eq!(
            url,
            "http://router.project-osrm.org/route/v1/driving/\
             -7.5898,33.5731;-7.5888,33.5741\
             ?steps=true&geometries=geojson&overview=full"
        );
    }

    #[test]
    fn test_decode_two_step_response() {
        let route = decode_response(TWO_STEP_BODY).unwrap();

        assert_eq!(route.total_distance_m, 150.0);
        assert_eq!(route.total_duration_s, 12.5);
        assert_eq!(route.get_num_waypoints(), 4);

        // Waypoints are in step order then coordinate order, with latitude and longitude
        // unswapped from the geometry's longitude-first pairs
        assert_eq!(route.waypoints[0].lat_deg, 33.5731);
        assert_eq!(route.waypoints[0].lon_deg, -7.5898);
        assert_eq!(route.waypoints[3].lat_deg, 33.5741);
        assert_eq!(route.waypoints[3].lon_deg, -7.5888);

        // Each step's distance is split equally between its two points
        assert_eq!(route.waypoints[0].dist_to_next_m, 50.0);
        assert_eq!(route.waypoints[1].dist_to_next_m, 50.0);
        assert_eq!(route.waypoints[2].dist_to_next_m, 25.0);
        assert_eq!(route.waypoints[3].dist_to_next_m, 25.0);

        // Metadata comes from the parent step, defaulting to empty
        assert_eq!(route.waypoints[0].street_name, "Boulevard Zerktouni");
        assert_eq!(route.waypoints[0].instruction, "Head northeast");
        assert_eq!(route.waypoints[2].street_name, "");
        assert_eq!(route.waypoints[2].instruction, "");
    }

    #[test]
    fn test_decode_error_code() {
        let err = decode_response(r#"{"code": "NoRoute"}"#).unwrap_err();

        match err {
            RouteError::Response { code } => assert_eq!(code, "NoRoute"),
            e => panic!("Unexpected error: {:?}", e),
        }
    }

    #[test]
    fn test_decode_missing_code() {
        let err = decode_response(r#"{"routes": []}"#).unwrap_err();

        match err {
            RouteError::Response { code } => assert_eq!(code, "unknown"),
            e => panic!("Unexpected error: {:?}", e),
        }
    }

    #[test]
    fn test_decode_unparsable_body() {
        let err = decode_response("<html>502 Bad Gateway</html>").unwrap_err();

        assert!(matches!(err, RouteError::Parse(_)));
    }

    #[test]
    fn test_decode_empty_routes() {
        let route = decode_response(r#"{"code": "Ok", "routes": []}"#).unwrap();

        assert!(route.is_empty());
        assert_eq!(route.total_distance_m, 0.0);
        assert_eq!(route.total_duration_s, 0.0);
    }

    #[test]
    fn test_get_route_via_transport() {
        let client = RouteClient::with_transport(StaticTransport(TWO_STEP_BODY));

        let route = client.get_route(33.5731, -7.5898, 33.5741, -7.5888).unwrap();

        assert_eq!(route.get_num_waypoints(), 4);
    }

    #[test]
    fn test_get_route_transport_failure() {
        let client = RouteClient::with_transport(DownTransport);

        let err = client
            .get_route(33.5731, -7.5898, 33.5741, -7.5888)
            .unwrap_err();

        assert!(matches!(err, RouteError::Transport(_)));
    }

    #[test]
    fn test_get_route_or_empty_degrades() {
        let client = RouteClient::with_transport(DownTransport);

        let route = client.get_route_or_empty(33.5731, -7.5898, 33.5741, -7.5888);

        assert!(route.is_empty());
        assert_eq!(route.total_distance_m, 0.0);
        assert_eq!(route.total_duration_s, 0.0);
    }
}
