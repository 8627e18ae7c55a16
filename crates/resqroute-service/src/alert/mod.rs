//! Emergency alerts.

pub mod service;

pub use service::{
    AlertService, AlertView, CreateAlertInput, DEFAULT_NEARBY_RADIUS_METERS, NearbyAlert,
    UpdateAlertInput,
};
