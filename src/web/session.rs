//! Browser sessions for the profile page
//!
//! Each session owns one [`FeedController`]; it lives until the cookie
//! expires or the user leaves the profile.

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::views::FeedController;

pub const SESSION_COOKIE: &str = "ws_session";
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Sessions mounted without an access token expire sooner
pub const ANONYMOUS_SESSION_TTL: Duration = Duration::from_secs(600);

/// Session data for one browser
pub struct ProfileSession {
    pub feed: Arc<FeedController>,
    /// Access token the feed's API client was built with
    pub access_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl ProfileSession {
    pub fn new(feed: Arc<FeedController>, access_token: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(1));

        Self {
            feed,
            access_token,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Whether the browser now presents a different access token
    pub fn token_changed(&self, access_token: Option<&str>) -> bool {
        self.access_token.as_deref() != access_token
    }
}

/// Session store - maps session tokens to session data
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<ProfileSession>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Lifetime of a session mounted with the given access token
    pub fn ttl_for(&self, access_token: Option<&str>) -> Duration {
        match access_token {
            Some(_) => self.ttl,
            None => self.ttl.min(ANONYMOUS_SESSION_TTL),
        }
    }

    /// Create a new session and return the token
    pub async fn create_session(
        &self,
        feed: Arc<FeedController>,
        access_token: Option<String>,
    ) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let ttl = self.ttl_for(access_token.as_deref());
        let session = Arc::new(ProfileSession::new(feed, access_token, ttl));

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            sessions.retain(|_, s| !s.is_expired());
        }
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, s)| s.expires_at)
                .map(|(token, _)| token.clone())
            else {
                break;
            };
            debug!("Session limit reached, evicting {}", oldest);
            sessions.remove(&oldest);
        }
        sessions.insert(token.clone(), session);
        token
    }

    /// Get session by token (returns None if expired or not found)
    pub async fn get_session(&self, token: &str) -> Option<Arc<ProfileSession>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|s| !s.is_expired())
            .cloned()
    }

    pub async fn remove_session(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Drop expired sessions, returning how many were removed
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

pub type SharedSessionStore = Arc<SessionStore>;

pub fn create_session_store(ttl: Duration, max_sessions: usize) -> SharedSessionStore {
    Arc::new(SessionStore::new(ttl, max_sessions))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            cookie
                .trim()
                .strip_prefix(&prefix)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
}

/// Extract session token from cookies
pub fn get_session_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE)
}

/// Bearer token for the REST API, from the Authorization header or the
/// cookie set by the identity provider
pub fn get_access_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| cookie_value(headers, ACCESS_TOKEN_COOKIE))
}

/// Create a session cookie
pub fn create_session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl.as_secs()
    )
}

/// Create a logout cookie (clears the session)
pub fn create_logout_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
