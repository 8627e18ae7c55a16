//! Well-known activity action names.
//!
//! The `action` column is free-form so clients may record their own; these
//! are the ones the server writes.

pub const USER_CREATED: &str = "user_created";
pub const LOGIN: &str = "login";
pub const LOGOUT: &str = "logout";
pub const ROLE_CHANGED: &str = "role_changed";
pub const USER_DELETED: &str = "user_deleted";
pub const PROFILE_UPDATED: &str = "profile_updated";
pub const ALERT_CREATED: &str = "alert_created";
pub const ALERT_UPDATED: &str = "alert_updated";
pub const ALERT_RESOLVED: &str = "alert_resolved";
pub const ALERT_DELETED: &str = "alert_deleted";
pub const FCM_REGISTERED: &str = "fcm_registered";
