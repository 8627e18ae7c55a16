//! Account sign-up and login.

pub mod service;

pub use service::{AuthService, AuthSession, LoginInput, LoginScope, SignupInput, normalize_email};
