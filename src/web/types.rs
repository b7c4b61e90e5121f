use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Authenticated visitor state held in the session cookie.
///
/// Written only after the callback token pair has been validated against the
/// remote service; never constructed from unvalidated input. The tokens
/// re-authenticate later calls to the service on the visitor's behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
}
