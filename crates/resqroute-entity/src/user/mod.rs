//! User domain entities.

pub mod model;
pub mod role;

pub use model::{CreateUser, UpdateProfile, User, UserRef};
pub use role::UserRole;
