//! Firebase Cloud Messaging HTTP v1 provider.

pub mod client;
pub mod credentials;
pub mod token;

pub use client::FcmClient;
pub use credentials::ServiceAccountKey;
pub use token::AccessTokenSource;
