#![doc = include_str!("../README.md")]

pub mod auth;
pub mod error;
pub mod listings;
pub mod types;
pub mod web;

// Re-exports for convenient access
pub use auth::{AuthApi, AuthClient, AuthUser, ServiceConfig};
pub use error::Error;
pub use listings::{Listing, ListingsClient, ListingsProvider, ListingsSource};
pub use types::UserId;
pub use web::{AppConfig, AppError, CookieKey, Session};
