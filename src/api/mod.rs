//! Client side of the Whale Spotting REST API
//!
//! The profile view only talks to the backend through [`ApiClient`], so the
//! view logic can be driven by a fake in tests.

mod http;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Sighting, SightingId, User};

pub use http::{HttpApiClient, HttpConnector};

/// Operations the profile view consumes from the backend
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn fetch_current_user(&self) -> Result<User>;

    /// Sightings reported by the current user, one page at a time
    async fn fetch_current_user_sightings(&self, page: u32) -> Result<Vec<Sighting>>;

    /// Unconfirmed sightings awaiting review (admin only)
    async fn fetch_pending_sightings(&self, page: u32) -> Result<Vec<Sighting>>;

    async fn check_admin(&self) -> Result<bool>;

    async fn make_admin(&self) -> Result<()>;

    async fn remove_admin(&self) -> Result<()>;

    async fn confirm_sighting(&self, id: SightingId) -> Result<()>;

    async fn delete_sighting(&self, id: SightingId) -> Result<()>;
}

pub type SharedApiClient = Arc<dyn ApiClient>;

/// Builds an API client for a browser session
pub trait ApiConnector: Send + Sync {
    fn connect(&self, access_token: Option<String>) -> SharedApiClient;
}

pub type SharedApiConnector = Arc<dyn ApiConnector>;
