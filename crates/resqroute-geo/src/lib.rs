//! # resqroute-geo
//!
//! Geographic helpers and the client-side proximity simulations.
//!
//! ## Modules
//!
//! - `distance`: great-circle distance on a spherical Earth
//! - `route`: linear interpolation along a polyline
//! - `approach`: distance-to-notification rules for an approaching vehicle
//! - `simulation`: the approach animation as a cancellable task
//! - `geofence`: a mock fleet around the user with timed notifications

pub mod approach;
pub mod distance;
pub mod geofence;
pub mod route;
pub mod simulation;

pub use approach::{ApproachTracker, ApproachUpdate, Direction, ProximityTier};
pub use distance::{EARTH_RADIUS_METERS, GeoPoint, haversine_meters};
pub use geofence::{GeofenceEvent, GeofenceSimulator, MockVehicle, VehicleKind};
pub use route::RoutePath;
pub use simulation::{ApproachFrame, ApproachSimulation, SimulationOutcome};
