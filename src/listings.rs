use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use url::Url;

use crate::error::{ensure_success, Error};

/// A property record as returned by the remote store.
///
/// Attributes are opaque to this application; records are rendered as-is and
/// never mutated.
pub type Listing = Map<String, Value>;

/// Remote listings fetch, behind a seam so tests can simulate outcomes.
pub trait ListingsSource: Send + Sync + 'static {
    /// Select-all against the listings collection.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Listing>, Error>> + Send;
}

/// REST client for the hosted listings store.
pub struct ListingsClient {
    http: reqwest::Client,
    table_url: Url,
    api_key: String,
}

impl ListingsClient {
    /// Create a client for the `property_listings` collection at `base_url`.
    ///
    /// `api_key` should be the elevated-privilege key when one is configured,
    /// the public key otherwise.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the collection URL cannot be derived.
    pub fn new(base_url: &Url, api_key: impl Into<String>) -> Result<Self, url::ParseError> {
        let root = base_url.as_str().trim_end_matches('/');
        Ok(Self {
            http: reqwest::Client::new(),
            table_url: format!("{root}/rest/v1/property_listings").parse()?,
            api_key: api_key.into(),
        })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }
}

impl ListingsSource for ListingsClient {
    async fn fetch_all(&self) -> Result<Vec<Listing>, Error> {
        let response = self
            .http
            .get(self.table_url.clone())
            .query(&[("select", "*")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let response = ensure_success(response, "listings fetch").await?;
        response.json::<Vec<Listing>>().await.map_err(Into::into)
    }
}

/// Listings with a local snapshot fallback.
///
/// The remote store is authoritative; the snapshot is a resilience measure
/// for when it is unreachable and may be stale. The two are never merged.
pub struct ListingsProvider<L> {
    remote: L,
    snapshot_path: PathBuf,
}

impl<L: ListingsSource> ListingsProvider<L> {
    pub fn new(remote: L, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            remote,
            snapshot_path: snapshot_path.into(),
        }
    }

    /// The remote collection, or the bundled snapshot when the remote fetch
    /// fails.
    ///
    /// # Errors
    ///
    /// Fails only when the remote fetch fails *and* the snapshot cannot be
    /// read or parsed.
    pub async fn get_listings(&self) -> Result<Vec<Listing>, Error> {
        match self.remote.fetch_all().await {
            Ok(listings) => Ok(listings),
            Err(error) => {
                tracing::warn!(
                    %error,
                    snapshot = %self.snapshot_path.display(),
                    "remote listings fetch failed, serving snapshot"
                );
                read_snapshot(&self.snapshot_path)
            }
        }
    }
}

fn read_snapshot(path: &Path) -> Result<Vec<Listing>, Error> {
    let raw = fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}
