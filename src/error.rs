#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Non-success response from the hosted service.
    #[error("{operation} failed: {detail}")]
    Remote {
        operation: &'static str,
        status: Option<u16>,
        detail: String,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("snapshot read error: {0}")]
    Snapshot(#[from] std::io::Error),
    #[error("snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Checks HTTP response status; returns the response on success or an error with details.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<reqwest::Response, Error> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let detail = response.text().await.unwrap_or_default();
    Err(Error::Remote {
        operation,
        status: Some(status),
        detail,
    })
}
