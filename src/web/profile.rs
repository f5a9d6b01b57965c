//! Profile routes and handlers
//!
//! Every form on the profile page posts to one of these routes, which runs
//! the matching feed operation and redirects back to `GET /profile`.

use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::pages::{left_page, profile_page, PageConfig};
use super::session::{
    create_logout_cookie, create_session_cookie, get_access_token, get_session_token,
    ProfileSession, SharedSessionStore,
};
use crate::api::SharedApiConnector;
use crate::models::SightingId;
use crate::views::{FeedController, FeedMode};

/// Shared state for profile handlers
#[derive(Clone)]
pub struct ProfileState {
    pub connector: SharedApiConnector,
    pub sessions: SharedSessionStore,
    pub pages: Arc<PageConfig>,
}

pub fn profile_router(state: ProfileState) -> Router {
    Router::new()
        .route("/profile", get(profile))
        .route("/profile/feed/:mode", post(select_mode))
        .route("/profile/page/next", post(next_page))
        .route("/profile/page/previous", post(previous_page))
        .route("/profile/admin/make", post(make_admin))
        .route("/profile/admin/remove", post(remove_admin))
        .route("/profile/cards/:id/toggle", post(toggle_card))
        .route("/profile/cards/:id/approve", post(approve))
        .route("/profile/cards/:id/reject", post(reject))
        .route("/logout", get(logout))
        .with_state(state)
}

fn back_to_profile() -> Response {
    Redirect::to("/profile").into_response()
}

/// Look up the caller's session or send them to the profile to mount one.
/// A session whose access token no longer matches the browser's is dropped
/// so the profile remounts with the new credentials.
async fn require_session(
    headers: &HeaderMap,
    state: &ProfileState,
) -> Result<Arc<ProfileSession>, Response> {
    let token = get_session_token(headers).ok_or_else(back_to_profile)?;
    let session = state
        .sessions
        .get_session(&token)
        .await
        .ok_or_else(back_to_profile)?;

    if session.token_changed(get_access_token(headers).as_deref()) {
        info!("Access token changed, dropping session");
        state.sessions.remove_session(&token).await;
        return Err(back_to_profile());
    }
    Ok(session)
}

/// GET /profile - Render the feed, mounting a new one on first visit or
/// after the access token changed
async fn profile(headers: HeaderMap, State(state): State<ProfileState>) -> Response {
    let access_token = get_access_token(&headers);

    if let Some(token) = get_session_token(&headers) {
        if let Some(session) = state.sessions.get_session(&token).await {
            if !session.token_changed(access_token.as_deref()) {
                return Html(profile_page(&session.feed.snapshot(), &state.pages)).into_response();
            }
            info!("Access token changed, remounting profile");
            state.sessions.remove_session(&token).await;
        }
    }

    let api = state.connector.connect(access_token.clone());
    let feed = Arc::new(FeedController::new(api));
    if let Err(e) = feed.mount().await {
        warn!("Profile mounted with errors: {}", e);
    }

    let ttl = state.sessions.ttl_for(access_token.as_deref());
    let token = state.sessions.create_session(feed.clone(), access_token).await;
    info!("Mounted profile for new session");

    (
        [(SET_COOKIE, create_session_cookie(&token, ttl))],
        Html(profile_page(&feed.snapshot(), &state.pages)),
    )
        .into_response()
}

/// POST /profile/feed/:mode - Switch between own sightings and approvals
async fn select_mode(
    Path(mode): Path<String>,
    headers: HeaderMap,
    State(state): State<ProfileState>,
) -> Response {
    let Some(mode) = FeedMode::from_slug(&mode) else {
        return (StatusCode::NOT_FOUND, "Unknown feed").into_response();
    };
    let session = match require_session(&headers, &state).await {
        Ok(s) => s,
        Err(redirect) => return redirect,
    };

    if let Err(e) = session.feed.select_mode(mode).await {
        warn!("Switching feed to {} failed: {}", mode, e);
    }
    back_to_profile()
}

/// POST /profile/page/next
async fn next_page(headers: HeaderMap, State(state): State<ProfileState>) -> Response {
    let session = match require_session(&headers, &state).await {
        Ok(s) => s,
        Err(redirect) => return redirect,
    };

    if let Err(e) = session.feed.next_page().await {
        warn!("Loading next page failed: {}", e);
    }
    back_to_profile()
}

/// POST /profile/page/previous
async fn previous_page(headers: HeaderMap, State(state): State<ProfileState>) -> Response {
    let session = match require_session(&headers, &state).await {
        Ok(s) => s,
        Err(redirect) => return redirect,
    };

    if let Err(e) = session.feed.previous_page().await {
        warn!("Loading previous page failed: {}", e);
    }
    back_to_profile()
}

/// POST /profile/admin/make
async fn make_admin(headers: HeaderMap, State(state): State<ProfileState>) -> Response {
    let session = match require_session(&headers, &state).await {
        Ok(s) => s,
        Err(redirect) => return redirect,
    };

    if let Err(e) = session.feed.make_admin().await {
        warn!("Make admin failed: {}", e);
    }
    back_to_profile()
}

/// POST /profile/admin/remove
async fn remove_admin(headers: HeaderMap, State(state): State<ProfileState>) -> Response {
    let session = match require_session(&headers, &state).await {
        Ok(s) => s,
        Err(redirect) => return redirect,
    };

    if let Err(e) = session.feed.remove_admin().await {
        warn!("Remove admin failed: {}", e);
    }
    back_to_profile()
}

/// POST /profile/cards/:id/toggle - Expand or collapse card details
async fn toggle_card(
    Path(id): Path<SightingId>,
    headers: HeaderMap,
    State(state): State<ProfileState>,
) -> Response {
    let session = match require_session(&headers, &state).await {
        Ok(s) => s,
        Err(redirect) => return redirect,
    };

    if let Err(e) = session.feed.toggle_card(id) {
        debug!("Toggle ignored: {}", e);
    }
    back_to_profile()
}

/// POST /profile/cards/:id/approve
async fn approve(
    Path(id): Path<SightingId>,
    headers: HeaderMap,
    State(state): State<ProfileState>,
) -> Response {
    let session = match require_session(&headers, &state).await {
        Ok(s) => s,
        Err(redirect) => return redirect,
    };

    if let Err(e) = session.feed.approve(id).await {
        warn!("Approving sighting {} failed: {}", id, e);
    }
    back_to_profile()
}

/// POST /profile/cards/:id/reject
async fn reject(
    Path(id): Path<SightingId>,
    headers: HeaderMap,
    State(state): State<ProfileState>,
) -> Response {
    let session = match require_session(&headers, &state).await {
        Ok(s) => s,
        Err(redirect) => return redirect,
    };

    if let Err(e) = session.feed.reject(id).await {
        warn!("Rejecting sighting {} failed: {}", id, e);
    }
    back_to_profile()
}

/// GET /logout - Drop the session and its feed state
async fn logout(headers: HeaderMap, State(state): State<ProfileState>) -> impl IntoResponse {
    if let Some(token) = get_session_token(&headers) {
        state.sessions.remove_session(&token).await;
    }

    ([(SET_COOKIE, create_logout_cookie())], Html(left_page()))
}
