use std::path::PathBuf;

use axum_extra::extract::cookie::Key;
use url::Url;

use super::error::AppError;
use crate::auth::{AuthClient, ServiceConfig};
use crate::listings::ListingsClient;

const DEFAULT_REDIRECT_URL: &str = "http://localhost:8080/auth/callback";
const DEFAULT_SNAPSHOT_PATH: &str = "data/property_listings.json";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Shared settings used by both config and router state.
#[derive(Clone)]
pub(crate) struct Settings {
    pub(crate) cookie_key: Key,
    pub(crate) secure_cookies: bool,
    pub(crate) magic_link_redirect: Url,
    pub(crate) maps_api_key: Option<String>,
}

impl Settings {
    fn defaults() -> Self {
        Self {
            cookie_key: Key::generate(),
            secure_cookies: true,
            magic_link_redirect: DEFAULT_REDIRECT_URL
                .parse()
                .expect("valid default URL"),
            maps_api_key: None,
        }
    }
}

/// Application configuration.
///
/// Required clients are constructor parameters — no runtime "missing field"
/// errors. Use [`from_env()`](AppConfig::from_env) for convention-based
/// setup, or [`new()`](AppConfig::new) with `with_*` methods for full
/// control.
pub struct AppConfig {
    pub(super) auth: AuthClient,
    pub(super) listings: ListingsClient,
    pub(super) snapshot_path: PathBuf,
    pub(super) listen_addr: String,
    pub(super) settings: Settings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("snapshot_path", &self.snapshot_path)
            .field("listen_addr", &self.listen_addr)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Create config with the required clients.
    ///
    /// All optional fields use sensible defaults. Override with `with_*` methods.
    #[must_use]
    pub fn new(auth: AuthClient, listings: ListingsClient) -> Self {
        Self {
            auth,
            listings,
            snapshot_path: DEFAULT_SNAPSHOT_PATH.into(),
            listen_addr: DEFAULT_LISTEN_ADDR.into(),
            settings: Settings::defaults(),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `STAYFINDER_SERVICE_URL`: hosted service base URL
    /// - `STAYFINDER_ANON_KEY`: public API key
    ///
    /// # Optional env vars
    /// - `STAYFINDER_SERVICE_ROLE_KEY`: elevated-privilege key for listings reads
    /// - `STAYFINDER_MAPS_API_KEY`: maps display key for the index page
    /// - `STAYFINDER_REDIRECT_URL`: magic-link redirect target
    /// - `STAYFINDER_COOKIE_KEY`: session cookie secret (>= 64 bytes)
    /// - `STAYFINDER_SNAPSHOT_PATH`: listings snapshot file
    /// - `STAYFINDER_LISTEN`: bind address
    /// - `STAYFINDER_DEV`: `"1"` or `"true"` disables the Secure cookie attribute
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if required env vars are missing or URLs
    /// are invalid.
    pub fn from_env() -> Result<Self, AppError> {
        let service_url = require_env("STAYFINDER_SERVICE_URL")?;
        let service_url: Url = service_url
            .parse()
            .map_err(|e| AppError::Config(format!("STAYFINDER_SERVICE_URL: {e}")))?;
        let anon_key = require_env("STAYFINDER_ANON_KEY")?;

        let service_role_key = optional_env("STAYFINDER_SERVICE_ROLE_KEY");
        let maps_api_key = optional_env("STAYFINDER_MAPS_API_KEY");

        let magic_link_redirect = match optional_env("STAYFINDER_REDIRECT_URL") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("STAYFINDER_REDIRECT_URL: {e}")))?,
            None => DEFAULT_REDIRECT_URL.parse().expect("valid default URL"),
        };

        let dev = matches!(
            std::env::var("STAYFINDER_DEV").as_deref(),
            Ok("1") | Ok("true"),
        );

        let cookie_key = match optional_env("STAYFINDER_COOKIE_KEY") {
            Some(k) => Key::try_from(k.as_bytes()).map_err(|_| {
                AppError::Config(
                    "STAYFINDER_COOKIE_KEY is set but invalid (must be at least 64 bytes). \
                     Remove the env var to use an ephemeral key, or provide a valid key."
                        .into(),
                )
            })?,
            None => Key::generate(),
        };

        let service = ServiceConfig::new(&service_url, anon_key.clone())
            .map_err(|e| AppError::Config(format!("STAYFINDER_SERVICE_URL: {e}")))?;

        // Elevated-privilege key for listings reads when configured, the
        // public key otherwise.
        let listings_key = service_role_key.unwrap_or_else(|| anon_key.clone());
        let listings = ListingsClient::new(&service_url, listings_key)
            .map_err(|e| AppError::Config(format!("STAYFINDER_SERVICE_URL: {e}")))?;

        let mut config = Self::new(AuthClient::new(service), listings)
            .with_cookie_key(cookie_key)
            .with_secure_cookies(!dev)
            .with_magic_link_redirect(magic_link_redirect);

        if let Some(key) = maps_api_key {
            config = config.with_maps_api_key(key);
        }
        if let Some(path) = optional_env("STAYFINDER_SNAPSHOT_PATH") {
            config = config.with_snapshot_path(path);
        }
        if let Some(addr) = optional_env("STAYFINDER_LISTEN") {
            config = config.with_listen_addr(addr);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_cookie_key(mut self, key: Key) -> Self {
        self.settings.cookie_key = key;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_magic_link_redirect(mut self, url: Url) -> Self {
        self.settings.magic_link_redirect = url;
        self
    }

    #[must_use]
    pub fn with_maps_api_key(mut self, key: impl Into<String>) -> Self {
        self.settings.maps_api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    #[must_use]
    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Address the server binary binds to.
    #[must_use]
    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }
}

fn require_env(name: &'static str) -> Result<String, AppError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Config(format!("{name} is required")))
}

fn optional_env(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: &[&str] = &[
        "STAYFINDER_SERVICE_URL",
        "STAYFINDER_ANON_KEY",
        "STAYFINDER_SERVICE_ROLE_KEY",
        "STAYFINDER_MAPS_API_KEY",
        "STAYFINDER_REDIRECT_URL",
        "STAYFINDER_COOKIE_KEY",
        "STAYFINDER_SNAPSHOT_PATH",
        "STAYFINDER_LISTEN",
        "STAYFINDER_DEV",
    ];

    fn with_clean_env<F: FnOnce()>(overrides: &[(&str, &str)], f: F) {
        let vars: Vec<(&str, Option<&str>)> = VARS
            .iter()
            .map(|&name| {
                let set = overrides.iter().find(|(k, _)| *k == name);
                (name, set.map(|(_, v)| *v))
            })
            .collect();
        temp_env::with_vars(vars, f);
    }

    #[test]
    fn missing_service_url_is_fatal() {
        with_clean_env(&[("STAYFINDER_ANON_KEY", "anon")], || {
            let error = AppConfig::from_env().unwrap_err();
            assert!(error.to_string().contains("STAYFINDER_SERVICE_URL"));
        });
    }

    #[test]
    fn missing_anon_key_is_fatal() {
        with_clean_env(
            &[("STAYFINDER_SERVICE_URL", "https://svc.example.co")],
            || {
                let error = AppConfig::from_env().unwrap_err();
                assert!(error.to_string().contains("STAYFINDER_ANON_KEY"));
            },
        );
    }

    #[test]
    fn minimal_env_uses_defaults() {
        with_clean_env(
            &[
                ("STAYFINDER_SERVICE_URL", "https://svc.example.co"),
                ("STAYFINDER_ANON_KEY", "anon"),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert_eq!(config.listen_addr(), DEFAULT_LISTEN_ADDR);
                assert_eq!(
                    config.snapshot_path,
                    PathBuf::from(DEFAULT_SNAPSHOT_PATH)
                );
                assert!(config.settings.secure_cookies);
                assert_eq!(
                    config.settings.magic_link_redirect.as_str(),
                    DEFAULT_REDIRECT_URL
                );
                assert!(config.settings.maps_api_key.is_none());
            },
        );
    }

    #[test]
    fn dev_switch_disables_secure_cookies() {
        with_clean_env(
            &[
                ("STAYFINDER_SERVICE_URL", "https://svc.example.co"),
                ("STAYFINDER_ANON_KEY", "anon"),
                ("STAYFINDER_DEV", "1"),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert!(!config.settings.secure_cookies);
            },
        );
    }

    #[test]
    fn short_cookie_key_is_rejected() {
        with_clean_env(
            &[
                ("STAYFINDER_SERVICE_URL", "https://svc.example.co"),
                ("STAYFINDER_ANON_KEY", "anon"),
                ("STAYFINDER_COOKIE_KEY", "too-short"),
            ],
            || {
                let error = AppConfig::from_env().unwrap_err();
                assert!(error.to_string().contains("STAYFINDER_COOKIE_KEY"));
            },
        );
    }

    #[test]
    fn invalid_service_url_is_fatal() {
        with_clean_env(
            &[
                ("STAYFINDER_SERVICE_URL", "not a url"),
                ("STAYFINDER_ANON_KEY", "anon"),
            ],
            || {
                assert!(AppConfig::from_env().is_err());
            },
        );
    }
}
