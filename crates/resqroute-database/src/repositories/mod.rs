//! PostgreSQL repository implementations.

pub mod activity;
pub mod alert;
pub mod user;

pub use activity::ActivityRepository;
pub use alert::AlertRepository;
pub use user::UserRepository;
