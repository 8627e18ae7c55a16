//! Alert (dispatch) domain entities.

pub mod kind;
pub mod model;

pub use kind::{AlertPriority, AlertStatus, AlertType};
pub use model::{Alert, AlertFilter, Coordinates, CreateAlert, UpdateAlert};
