use std::future::Future;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ensure_success, Error};
use crate::types::UserId;

/// Hosted auth service configuration.
///
/// Required fields are constructor parameters — no runtime "missing field" errors.
///
/// ```rust,ignore
/// use stayfinder::ServiceConfig;
///
/// let config = ServiceConfig::new(&"https://myproject.example.co".parse()?, "anon-key")?;
/// // Optional overrides via chaining:
/// let config = config
///     .with_otp_url("https://auth.example.com/otp".parse()?);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ServiceConfig {
    pub(crate) api_key: String,
    pub(crate) otp_url: Url,
    pub(crate) user_url: Url,
    pub(crate) logout_url: Url,
}

impl ServiceConfig {
    /// Create a configuration for the service at `base_url`.
    ///
    /// The three auth endpoints are derived from the base URL and can be
    /// overridden individually.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if an endpoint cannot be derived from the base.
    pub fn new(base_url: &Url, api_key: impl Into<String>) -> Result<Self, url::ParseError> {
        let root = base_url.as_str().trim_end_matches('/');
        Ok(Self {
            api_key: api_key.into(),
            otp_url: format!("{root}/auth/v1/otp").parse()?,
            user_url: format!("{root}/auth/v1/user").parse()?,
            logout_url: format!("{root}/auth/v1/logout").parse()?,
        })
    }

    /// Override the magic-link issuance endpoint.
    #[must_use]
    pub fn with_otp_url(mut self, url: Url) -> Self {
        self.otp_url = url;
        self
    }

    /// Override the identity lookup endpoint.
    #[must_use]
    pub fn with_user_url(mut self, url: Url) -> Self {
        self.user_url = url;
        self
    }

    /// Override the session revocation endpoint.
    #[must_use]
    pub fn with_logout_url(mut self, url: Url) -> Self {
        self.logout_url = url;
        self
    }

    /// Service API key sent with every request.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Magic-link issuance endpoint URL.
    #[must_use]
    pub fn otp_url(&self) -> &Url {
        &self.otp_url
    }

    /// Identity lookup endpoint URL.
    #[must_use]
    pub fn user_url(&self) -> &Url {
        &self.user_url
    }

    /// Session revocation endpoint URL.
    #[must_use]
    pub fn logout_url(&self) -> &Url {
        &self.logout_url
    }
}

/// Identity returned by the hosted service for a validated access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

/// Remote operations the sign-in flow depends on.
///
/// Implemented by [`AuthClient`] against the hosted service; tests provide
/// their own implementations to simulate remote outcomes.
pub trait AuthApi: Send + Sync + 'static {
    /// Ask the service to email a one-time sign-in link.
    fn request_link(
        &self,
        email: &str,
        redirect_to: &Url,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Fetch the identity behind an access token.
    ///
    /// A success means the service accepted the token; the returned identity
    /// is what a session may be established from.
    fn fetch_user(
        &self,
        access_token: &str,
    ) -> impl Future<Output = Result<AuthUser, Error>> + Send;

    /// Revoke the remote session behind an access token.
    fn revoke(&self, access_token: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Auth API client for the hosted service.
pub struct AuthClient {
    config: ServiceConfig,
    http: reqwest::Client,
}

impl AuthClient {
    /// Create a new auth client.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }
}

impl AuthApi for AuthClient {
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Remote`] if
    /// the service rejects the request. Whether the address has an account
    /// is not observable from the outcome.
    async fn request_link(&self, email: &str, redirect_to: &Url) -> Result<(), Error> {
        let body = serde_json::json!({
            "email": email,
            "create_user": true,
        });

        let response = self
            .http
            .post(self.config.otp_url.clone())
            .header("apikey", &self.config.api_key)
            .query(&[("redirect_to", redirect_to.as_str())])
            .json(&body)
            .send()
            .await?;

        ensure_success(response, "magic link request").await?;
        Ok(())
    }

    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, Error> {
        let response = self
            .http
            .get(self.config.user_url.clone())
            .header("apikey", &self.config.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = ensure_success(response, "identity lookup").await?;
        response.json::<AuthUser>().await.map_err(Into::into)
    }

    async fn revoke(&self, access_token: &str) -> Result<(), Error> {
        let response = self
            .http
            .post(self.config.logout_url.clone())
            .header("apikey", &self.config.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        ensure_success(response, "sign out").await?;
        Ok(())
    }
}
