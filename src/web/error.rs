use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

/// Route-boundary failures of the sign-in flow.
///
/// Expected failure modes become a notice plus a redirect, never an
/// unhandled fault. Remote error detail is logged server-side only; the
/// visitor sees a fixed message keyed by the redirect code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Callback reached without a complete token pair.
    #[error("invalid or expired magic link")]
    InvalidLink,

    /// Remote service rejected the callback token pair.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Magic-link issuance failed.
    #[error("magic link delivery failed: {0}")]
    LinkDelivery(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Anything the visitor cannot recover from on this request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidLink => {
                Redirect::to("/login?error=invalid_link").into_response()
            }
            Self::AuthenticationFailed(ref detail) => {
                tracing::error!(detail = %detail, "magic link authentication failed");
                Redirect::to("/login?error=auth_failed").into_response()
            }
            Self::LinkDelivery(ref detail) => {
                tracing::error!(detail = %detail, "magic link delivery failed");
                Redirect::to("/login?error=link_delivery_failed").into_response()
            }
            Self::Config(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "unrecoverable request failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}
