//! Runs feed transitions against the API
//!
//! The state lock is only held while the reducer runs, never across a
//! request, so overlapping operations on one feed are fine: whichever fetch
//! was issued last wins.

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::card::ReviewCommand;
use super::feed::{FeedEvent, FeedMode, FeedRequest, FeedState};
use crate::api::SharedApiClient;
use crate::error::{Result, WhaleError};
use crate::models::SightingId;

pub struct FeedController {
    api: SharedApiClient,
    state: Mutex<FeedState>,
}

impl FeedController {
    pub fn new(api: SharedApiClient) -> Self {
        Self {
            api,
            state: Mutex::new(FeedState::new()),
        }
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> FeedState {
        self.state.lock().clone()
    }

    /// Reset the view and load user, admin status and the first page
    pub async fn mount(&self) -> Result<()> {
        let request = self.state.lock().apply(FeedEvent::Mounted);

        let (user, admin, feed) = futures::join!(
            self.api.fetch_current_user(),
            self.api.check_admin(),
            self.run(request)
        );

        let mut first_error = None;
        match user {
            Ok(user) => {
                self.state.lock().apply(FeedEvent::UserLoaded(user));
            }
            Err(e) => {
                warn!("Failed to load current user: {}", e);
                first_error = Some(e);
            }
        }
        match admin {
            Ok(is_admin) => {
                self.state.lock().apply(FeedEvent::AdminStatusLoaded(is_admin));
            }
            Err(e) => {
                warn!("Failed to check admin status: {}", e);
                first_error = first_error.or(Some(e));
            }
        }

        match (first_error, feed) {
            (Some(e), _) | (None, Err(e)) => Err(e),
            (None, Ok(())) => Ok(()),
        }
    }

    pub async fn select_mode(&self, mode: FeedMode) -> Result<()> {
        let request = self.state.lock().apply(FeedEvent::ModeSelected(mode));
        self.run(request).await
    }

    pub async fn next_page(&self) -> Result<()> {
        let request = self.state.lock().apply(FeedEvent::NextPage);
        self.run(request).await
    }

    pub async fn previous_page(&self) -> Result<()> {
        let request = self.state.lock().apply(FeedEvent::PreviousPage);
        self.run(request).await
    }

    pub fn toggle_card(&self, id: SightingId) -> Result<()> {
        let mut state = self.state.lock();
        if !state.is_displayed(id) {
            return Err(WhaleError::SightingNotDisplayed { id });
        }
        state.apply(FeedEvent::CardToggled(id));
        Ok(())
    }

    pub async fn approve(&self, id: SightingId) -> Result<()> {
        self.review(ReviewCommand::Approve(id)).await
    }

    pub async fn reject(&self, id: SightingId) -> Result<()> {
        self.review(ReviewCommand::Reject(id)).await
    }

    pub async fn make_admin(&self) -> Result<()> {
        self.api.make_admin().await?;
        info!("Granted admin role");
        self.state.lock().apply(FeedEvent::AdminGranted);
        Ok(())
    }

    pub async fn remove_admin(&self) -> Result<()> {
        self.api.remove_admin().await?;
        info!("Removed admin role");
        let request = self.state.lock().apply(FeedEvent::AdminRevoked);
        self.run(request).await
    }

    /// Hide the card, run the command, bring the card back if it failed
    async fn review(&self, command: ReviewCommand) -> Result<()> {
        let id = command.sighting_id();
        {
            let mut state = self.state.lock();
            if !state.is_admin {
                return Err(WhaleError::NotAdmin);
            }
            if !state.is_displayed(id) {
                return Err(WhaleError::SightingNotDisplayed { id });
            }
            // Resubmitted form for a card that was already reviewed
            if state.card(id).dismissed {
                debug!("Sighting {} already reviewed, skipping {:?}", id, command);
                return Ok(());
            }
            state.apply(FeedEvent::CardDismissed(id));
        }

        if let Err(e) = command.execute(self.api.as_ref()).await {
            warn!("{:?} failed: {}", command, e);
            let mut state = self.state.lock();
            state.apply(FeedEvent::CardRestored(id));
            state.apply(FeedEvent::ActionFailed(e.user_message()));
            return Err(e);
        }
        Ok(())
    }

    async fn run(&self, request: Option<FeedRequest>) -> Result<()> {
        let Some(request) = request else {
            return Ok(());
        };

        let result = match request.mode {
            FeedMode::Sightings => self.api.fetch_current_user_sightings(request.page).await,
            FeedMode::Approvals => self.api.fetch_pending_sightings(request.page).await,
        };

        match result {
            Ok(sightings) => {
                self.state.lock().apply(FeedEvent::SightingsLoaded {
                    token: request.token,
                    sightings,
                });
                Ok(())
            }
            Err(e) => {
                // Previous list stays on screen
                warn!(
                    "Failed to load {} page {}: {}",
                    request.mode, request.page, e
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{ApiCall, FakeApi};
    use crate::models::fixtures;
    use crate::models::{Rank, Species};
    use std::sync::Arc;

    fn controller(api: &Arc<FakeApi>) -> FeedController {
        FeedController::new(api.clone())
    }

    fn pending_page() -> Vec<crate::models::Sighting> {
        vec![
            fixtures::sighting(10, Species::Orca, false),
            fixtures::sighting(11, Species::Minke, false),
        ]
    }

    #[tokio::test]
    async fn test_mount_fetches_user_and_first_page_once() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("test", 2))
                .with_own_page(1, vec![fixtures::sighting(1, Species::Minke, true)]),
        );
        let feed = controller(&api);

        feed.mount().await.unwrap();

        assert_eq!(api.count(ApiCall::FetchCurrentUserSightings(1)), 1);
        assert_eq!(api.count(ApiCall::FetchCurrentUser), 1);
        assert_eq!(api.count(ApiCall::CheckAdmin), 1);
        assert_eq!(api.calls().len(), 3);

        let state = feed.snapshot();
        assert_eq!(state.current_user.unwrap().username, "test");
        assert_eq!(state.rank, Rank::Intermediate);
        assert_eq!(state.sightings.len(), 1);
        assert!(!state.is_admin);
    }

    #[tokio::test]
    async fn test_toggle_to_approvals_fetches_pending_once() {
        let api = Arc::new(
            FakeApi::new()
                .with_admin(true)
                .with_pending_page(1, pending_page()),
        );
        let feed = controller(&api);
        feed.mount().await.unwrap_err(); // no user configured

        feed.select_mode(FeedMode::Approvals).await.unwrap();

        assert_eq!(api.count(ApiCall::FetchPendingSightings(1)), 1);
        let state = feed.snapshot();
        assert_eq!(state.heading(), "Your Approvals");
        assert_eq!(state.sightings.len(), 2);
    }

    #[tokio::test]
    async fn test_next_page_loads_new_records() {
        let api = Arc::new(
            FakeApi::new()
                .with_admin(true)
                .with_pending_page(1, vec![fixtures::sighting(1, Species::Orca, false)])
                .with_pending_page(2, vec![fixtures::sighting(2, Species::Minke, false)]),
        );
        let feed = controller(&api);
        let _ = feed.mount().await;
        feed.select_mode(FeedMode::Approvals).await.unwrap();
        assert_eq!(feed.snapshot().sightings[0].species, Species::Orca);

        feed.next_page().await.unwrap();
        assert_eq!(api.count(ApiCall::FetchPendingSightings(2)), 1);
        let state = feed.snapshot();
        assert_eq!(state.page, 2);
        assert_eq!(state.sightings[0].species, Species::Minke);
    }

    #[tokio::test]
    async fn test_superseded_fetch_does_not_overwrite() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("test", 0))
                .with_own_page(2, vec![fixtures::sighting(2, Species::Orca, true)])
                .with_own_page(3, vec![fixtures::sighting(3, Species::Minke, true)]),
        );
        let feed = Arc::new(controller(&api));
        feed.mount().await.unwrap();

        let gate = api.gate(ApiCall::FetchCurrentUserSightings(2));
        let slow = tokio::spawn({
            let feed = feed.clone();
            async move { feed.next_page().await }
        });
        while api.count(ApiCall::FetchCurrentUserSightings(2)) == 0 {
            tokio::task::yield_now().await;
        }

        feed.next_page().await.unwrap();
        gate.notify_one();
        slow.await.unwrap().unwrap();

        let state = feed.snapshot();
        assert_eq!(state.page, 3);
        assert_eq!(state.sightings.len(), 1);
        assert_eq!(state.sightings[0].id, 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_list() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("test", 1))
                .with_own_page(1, vec![fixtures::sighting(1, Species::Minke, true)])
                .failing(ApiCall::FetchCurrentUserSightings(2)),
        );
        let feed = controller(&api);
        feed.mount().await.unwrap();

        assert!(feed.next_page().await.is_err());
        let state = feed.snapshot();
        assert_eq!(state.page, 2);
        assert_eq!(state.sightings[0].id, 1);
    }

    #[tokio::test]
    async fn test_make_admin_applies_on_success_only() {
        let api = Arc::new(FakeApi::new().with_user(fixtures::user("test", 0)));
        let feed = controller(&api);
        feed.mount().await.unwrap();

        feed.make_admin().await.unwrap();
        assert!(feed.snapshot().is_admin);

        let failing = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("test", 0))
                .failing(ApiCall::MakeAdmin),
        );
        let feed = controller(&failing);
        feed.mount().await.unwrap();
        assert!(feed.make_admin().await.is_err());
        assert!(!feed.snapshot().is_admin);
    }

    #[tokio::test]
    async fn test_remove_admin_returns_to_own_sightings() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("test", 5))
                .with_admin(true)
                .with_pending_page(1, pending_page()),
        );
        let feed = controller(&api);
        feed.mount().await.unwrap();
        feed.select_mode(FeedMode::Approvals).await.unwrap();

        feed.remove_admin().await.unwrap();

        let state = feed.snapshot();
        assert!(!state.is_admin);
        assert_eq!(state.mode, FeedMode::Sightings);
        assert_eq!(api.count(ApiCall::FetchCurrentUserSightings(1)), 2);
        assert!(state.sightings.is_empty());
    }

    #[tokio::test]
    async fn test_approve_hides_card() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("admin", 9))
                .with_admin(true)
                .with_pending_page(1, pending_page()),
        );
        let feed = controller(&api);
        feed.mount().await.unwrap();
        feed.select_mode(FeedMode::Approvals).await.unwrap();

        feed.approve(10).await.unwrap();
        feed.reject(11).await.unwrap();

        let state = feed.snapshot();
        assert!(state.card(10).dismissed);
        assert!(state.card(11).dismissed);
        assert_eq!(api.count(ApiCall::ConfirmSighting(10)), 1);
        assert_eq!(api.count(ApiCall::DeleteSighting(11)), 1);
    }

    #[tokio::test]
    async fn test_failed_approve_restores_card() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("admin", 9))
                .with_admin(true)
                .with_pending_page(1, pending_page())
                .failing(ApiCall::ConfirmSighting(10)),
        );
        let feed = controller(&api);
        feed.mount().await.unwrap();
        feed.select_mode(FeedMode::Approvals).await.unwrap();

        assert!(feed.approve(10).await.is_err());

        let state = feed.snapshot();
        assert!(!state.card(10).dismissed);
        assert!(state.notice.is_some());
    }

    #[tokio::test]
    async fn test_repeated_reject_is_sent_once() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("admin", 9))
                .with_admin(true)
                .with_pending_page(1, pending_page()),
        );
        let feed = controller(&api);
        feed.mount().await.unwrap();
        feed.select_mode(FeedMode::Approvals).await.unwrap();

        feed.reject(11).await.unwrap();
        feed.reject(11).await.unwrap();
        feed.approve(11).await.unwrap();

        let state = feed.snapshot();
        assert_eq!(api.count(ApiCall::DeleteSighting(11)), 1);
        assert_eq!(api.count(ApiCall::ConfirmSighting(11)), 0);
        assert!(state.card(11).dismissed);
        assert!(state.notice.is_none());
    }

    #[tokio::test]
    async fn test_review_requires_admin() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("test", 1))
                .with_own_page(1, vec![fixtures::sighting(1, Species::Minke, false)]),
        );
        let feed = controller(&api);
        feed.mount().await.unwrap();

        assert!(matches!(feed.approve(1).await, Err(WhaleError::NotAdmin)));
        assert_eq!(api.count(ApiCall::ConfirmSighting(1)), 0);
        assert!(!feed.snapshot().card(1).dismissed);
    }

    #[tokio::test]
    async fn test_toggle_card() {
        let api = Arc::new(
            FakeApi::new()
                .with_user(fixtures::user("test", 1))
                .with_own_page(1, vec![fixtures::sighting(1, Species::Minke, true)]),
        );
        let feed = controller(&api);
        feed.mount().await.unwrap();

        feed.toggle_card(1).unwrap();
        assert!(feed.snapshot().card(1).expanded);
        feed.toggle_card(1).unwrap();
        assert!(!feed.snapshot().card(1).expanded);

        assert!(feed.toggle_card(99).is_err());
    }
}
