//! Web front end: four routes over the hosted service.
//!
//! - `GET /` renders listings (anonymous-friendly)
//! - `GET /login` / `POST /login` request a magic link by email
//! - `GET /auth/callback` completes sign-in from the emailed link
//! - `GET /logout` ends the local session
//!
//! Sessions live in a private (encrypted, tamper-evident) cookie; there is
//! no server-side session table. Expected failures become a notice code in
//! a redirect, rendered as a flash message by the target page.
//!
//! ```rust,ignore
//! use stayfinder::web::{AppConfig, router};
//!
//! let config = AppConfig::from_env()?;
//! let app = router(config);
//! ```

mod config;
mod cookies;
mod error;
mod pages;
mod routes;
mod state;
mod types;

pub use config::AppConfig;
pub use error::AppError;
pub use routes::router;
pub use types::Session;

/// Re-export cookie key type for builder API.
pub use axum_extra::extract::cookie::Key as CookieKey;
