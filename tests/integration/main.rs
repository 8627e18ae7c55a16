//! HTTP-level integration tests against in-memory stores and a recording
//! push provider.

mod helpers;

mod alerts_test;
mod auth_test;
mod fcm_test;
mod reports_test;
mod users_test;
