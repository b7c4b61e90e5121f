use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use super::config::Settings;
use crate::auth::AuthApi;
use crate::listings::{ListingsProvider, ListingsSource};

/// Shared state for route handlers.
pub(super) struct AppState<A, L> {
    pub(super) auth: Arc<A>,
    pub(super) listings: Arc<ListingsProvider<L>>,
    pub(super) settings: Settings,
}

// Manual Clone: avoid derive adding `A: Clone, L: Clone` bounds.
impl<A, L> Clone for AppState<A, L> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            listings: self.listings.clone(),
            settings: self.settings.clone(),
        }
    }
}

// PrivateCookieJar requires Key to be extractable from state
impl<A: AuthApi, L: ListingsSource> FromRef<AppState<A, L>> for Key {
    fn from_ref(state: &AppState<A, L>) -> Self {
        state.settings.cookie_key.clone()
    }
}
