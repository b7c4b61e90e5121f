use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Remote-service user identifier (opaque string).
///
/// The hosted auth service owns the format; nothing in this crate parses it.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
