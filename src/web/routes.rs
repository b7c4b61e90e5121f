use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;

use super::config::{AppConfig, Settings};
use super::cookies;
use super::error::AppError;
use super::pages;
use super::state::AppState;
use super::types::Session;
use crate::auth::AuthApi;
use crate::listings::{ListingsProvider, ListingsSource};

/// Build the application router.
pub fn router(config: AppConfig) -> Router {
    let AppConfig {
        auth,
        listings,
        snapshot_path,
        settings,
        ..
    } = config;
    router_with(settings, auth, ListingsProvider::new(listings, snapshot_path))
}

pub(crate) fn router_with<A, L>(
    settings: Settings,
    auth: A,
    listings: ListingsProvider<L>,
) -> Router
where
    A: AuthApi,
    L: ListingsSource,
{
    let state = AppState {
        auth: Arc::new(auth),
        listings: Arc::new(listings),
        settings,
    };

    Router::new()
        .route("/", get(index::<A, L>))
        .route("/login", get(login_form).post(request_link::<A, L>))
        .route("/auth/callback", get(auth_callback::<A, L>))
        .route("/logout", get(logout::<A, L>))
        .with_state(state)
}

/// Notice/error codes carried across redirects.
#[derive(Deserialize)]
struct FlashParams {
    notice: Option<String>,
    error: Option<String>,
}

// ── Index ──────────────────────────────────────────────────────────

async fn index<A: AuthApi, L: ListingsSource>(
    State(state): State<AppState<A, L>>,
    jar: PrivateCookieJar,
    Query(flash): Query<FlashParams>,
) -> Result<Html<String>, AppError> {
    let listings = state
        .listings
        .get_listings()
        .await
        .map_err(|e| AppError::Internal(format!("listings unavailable: {e}")))?;

    let session = cookies::read_session(&jar);

    Ok(pages::index(
        &listings,
        session.as_ref(),
        state.settings.maps_api_key.as_deref(),
        flash.notice.as_deref(),
        flash.error.as_deref(),
    ))
}

// ── Login ──────────────────────────────────────────────────────────

async fn login_form(Query(flash): Query<FlashParams>) -> Html<String> {
    pages::login(flash.notice.as_deref(), flash.error.as_deref())
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    email: String,
}

async fn request_link<A: AuthApi, L: ListingsSource>(
    State(state): State<AppState<A, L>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim();
    if email.is_empty() {
        return Redirect::to("/login?error=email_required").into_response();
    }

    // The visible outcome is identical whether or not the address has an
    // account; only the remote service knows.
    match state
        .auth
        .request_link(email, &state.settings.magic_link_redirect)
        .await
    {
        Ok(()) => Redirect::to("/?notice=link_sent").into_response(),
        Err(error) => AppError::LinkDelivery(error.to_string()).into_response(),
    }
}

// ── Callback ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CallbackParams {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

async fn auth_callback<A: AuthApi, L: ListingsSource>(
    State(state): State<AppState<A, L>>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(PrivateCookieJar, Redirect), AppError> {
    let access = params.access_token.filter(|t| !t.is_empty());
    let refresh = params.refresh_token.filter(|t| !t.is_empty());
    let (Some(access_token), Some(refresh_token)) = (access, refresh) else {
        return Err(AppError::InvalidLink);
    };

    // Validate the pair against the service before anything is persisted.
    let user = state
        .auth
        .fetch_user(&access_token)
        .await
        .map_err(|e| AppError::AuthenticationFailed(e.to_string()))?;

    let session = Session {
        user_id: user.id,
        email: user.email,
        access_token,
        refresh_token,
    };

    let jar = cookies::write_session(jar, &session, state.settings.secure_cookies)
        .map_err(|e| AppError::Internal(format!("session encoding failed: {e}")))?;

    tracing::info!(user_id = %session.user_id, "magic link sign-in succeeded");

    Ok((jar, Redirect::to("/?notice=logged_in")))
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout<A: AuthApi, L: ListingsSource>(
    State(state): State<AppState<A, L>>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    if let Some(session) = cookies::read_session(&jar) {
        // Best effort: local sign-out must not depend on the remote service
        // being reachable. The remote token then lives until natural expiry.
        if let Err(error) = state.auth.revoke(&session.access_token).await {
            tracing::warn!(%error, "remote sign-out failed during logout");
        }
    }

    (cookies::clear_session(jar), Redirect::to("/?notice=logged_out"))
}
