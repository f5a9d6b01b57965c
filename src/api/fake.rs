//! Recording in-memory [`ApiClient`] for tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Notify;

use super::{ApiClient, ApiConnector, SharedApiClient};
use crate::error::{Result, WhaleError};
use crate::models::{Sighting, SightingId, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiCall {
    FetchCurrentUser,
    FetchCurrentUserSightings(u32),
    FetchPendingSightings(u32),
    CheckAdmin,
    MakeAdmin,
    RemoveAdmin,
    ConfirmSighting(SightingId),
    DeleteSighting(SightingId),
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<ApiCall>>,
    user: Mutex<Option<User>>,
    admin: Mutex<bool>,
    own_pages: Mutex<HashMap<u32, Vec<Sighting>>>,
    pending_pages: Mutex<HashMap<u32, Vec<Sighting>>>,
    failing: Mutex<HashSet<ApiCall>>,
    gates: Mutex<HashMap<ApiCall, Arc<Notify>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        *self.user.lock() = Some(user);
        self
    }

    pub fn with_admin(self, admin: bool) -> Self {
        *self.admin.lock() = admin;
        self
    }

    pub fn with_own_page(self, page: u32, sightings: Vec<Sighting>) -> Self {
        self.own_pages.lock().insert(page, sightings);
        self
    }

    pub fn with_pending_page(self, page: u32, sightings: Vec<Sighting>) -> Self {
        self.pending_pages.lock().insert(page, sightings);
        self
    }

    /// Make the given call answer with a 500
    pub fn failing(self, call: ApiCall) -> Self {
        self.failing.lock().insert(call);
        self
    }

    /// Hold the given call until the returned handle is notified
    pub fn gate(&self, call: ApiCall) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().insert(call, notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: ApiCall) -> usize {
        self.calls.lock().iter().filter(|c| **c == call).count()
    }

    async fn record(&self, call: ApiCall) -> Result<()> {
        self.calls.lock().push(call);

        let gate = self.gates.lock().get(&call).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().contains(&call) {
            return Err(WhaleError::Api {
                endpoint: format!("{:?}", call),
                status: 500,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn fetch_current_user(&self) -> Result<User> {
        self.record(ApiCall::FetchCurrentUser).await?;
        self.user.lock().clone().ok_or(WhaleError::Unauthorized {
            endpoint: "/api/users/current".to_string(),
            status: 401,
        })
    }

    async fn fetch_current_user_sightings(&self, page: u32) -> Result<Vec<Sighting>> {
        self.record(ApiCall::FetchCurrentUserSightings(page)).await?;
        Ok(self.own_pages.lock().get(&page).cloned().unwrap_or_default())
    }

    async fn fetch_pending_sightings(&self, page: u32) -> Result<Vec<Sighting>> {
        self.record(ApiCall::FetchPendingSightings(page)).await?;
        Ok(self
            .pending_pages
            .lock()
            .get(&page)
            .cloned()
            .unwrap_or_default())
    }

    async fn check_admin(&self) -> Result<bool> {
        self.record(ApiCall::CheckAdmin).await?;
        Ok(*self.admin.lock())
    }

    async fn make_admin(&self) -> Result<()> {
        self.record(ApiCall::MakeAdmin).await?;
        *self.admin.lock() = true;
        Ok(())
    }

    async fn remove_admin(&self) -> Result<()> {
        self.record(ApiCall::RemoveAdmin).await?;
        *self.admin.lock() = false;
        Ok(())
    }

    async fn confirm_sighting(&self, id: SightingId) -> Result<()> {
        self.record(ApiCall::ConfirmSighting(id)).await
    }

    async fn delete_sighting(&self, id: SightingId) -> Result<()> {
        self.record(ApiCall::DeleteSighting(id)).await
    }
}

/// Connector that hands every session the same fake
pub struct FakeConnector {
    pub api: Arc<FakeApi>,
    connected: Mutex<Vec<Option<String>>>,
}

impl FakeConnector {
    pub fn new(api: Arc<FakeApi>) -> Self {
        Self {
            api,
            connected: Mutex::new(Vec::new()),
        }
    }

    /// Access tokens passed to `connect`, in order
    pub fn connected(&self) -> Vec<Option<String>> {
        self.connected.lock().clone()
    }
}

impl ApiConnector for FakeConnector {
    fn connect(&self, access_token: Option<String>) -> SharedApiClient {
        self.connected.lock().push(access_token);
        self.api.clone()
    }
}
