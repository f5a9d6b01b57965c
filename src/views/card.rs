//! A single sighting card: summary, expandable details and review buttons

use tracing::info;

use super::{hidden_attr, html_escape};
use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Sighting, SightingId};

/// Local state of one card, starts collapsed and visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    pub expanded: bool,
    pub dismissed: bool,
}

impl CardState {
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Hide the card ahead of a review command completing
    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn restore(&mut self) {
        self.dismissed = false;
    }

    pub fn detail_class(&self) -> &'static str {
        if self.expanded {
            "second-column open"
        } else {
            "second-column closed"
        }
    }
}

/// Admin decision on a pending sighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    Approve(SightingId),
    Reject(SightingId),
}

impl ReviewCommand {
    pub fn sighting_id(&self) -> SightingId {
        match self {
            ReviewCommand::Approve(id) | ReviewCommand::Reject(id) => *id,
        }
    }

    pub async fn execute(&self, api: &dyn ApiClient) -> Result<()> {
        match self {
            ReviewCommand::Approve(id) => {
                api.confirm_sighting(*id).await?;
                info!("Approved sighting {}", id);
            }
            ReviewCommand::Reject(id) => {
                api.delete_sighting(*id).await?;
                info!("Rejected sighting {}", id);
            }
        }
        Ok(())
    }
}

pub struct SightingCard<'a> {
    sighting: &'a Sighting,
    admin: bool,
    state: CardState,
}

impl<'a> SightingCard<'a> {
    pub fn new(sighting: &'a Sighting, admin: bool, state: CardState) -> Self {
        Self {
            sighting,
            admin,
            state,
        }
    }

    pub fn shows_pending(&self) -> bool {
        self.sighting.is_pending()
    }

    pub fn shows_review_controls(&self) -> bool {
        self.sighting.is_pending() && self.admin
    }

    /// Render the card; `actions` is the path prefix card forms post to,
    /// `assets` the prefix for species images.
    pub fn render(&self, actions: &str, assets: &str) -> String {
        let s = self.sighting;
        let action_base = format!("{}/{}", actions, s.id);

        let pending = if self.shows_pending() {
            r#"<div class="pending" data-testid="pending"> PENDING </div>"#
        } else {
            ""
        };

        let orca_type = s.orca_type.map(|t| t.display_text()).unwrap_or_default();

        let review = if self.shows_review_controls() {
            format!(
                r#"
    <div class="buttons-container">
        <form method="post" action="{base}/reject">
            <button type="submit" class="btn reject min-width-25" data-testid="reject-button">Reject</button>
        </form>
        <form method="post" action="{base}/approve">
            <button type="submit" class="btn primary min-width-25" data-testid="approve-button">Approve</button>
        </form>
    </div>"#,
                base = action_base
            )
        } else {
            String::new()
        };

        format!(
            r#"<div class="sighting-card" data-testid="sighting-card"{dismissed}>
    <div class="card-component" data-testid="card-component">
        {pending}
        <form method="post" action="{base}/toggle" class="card-info">
            <button type="submit" class="card-summary" data-testid="card">
                <img class="species-image" data-testid="speciesImage" src="{assets}/species/{slug}.jpg" alt="{species}">
                <span class="first-column">
                    <span>Sighted At: {date}</span>
                    <span>Species: {species}</span>
                    <span>Location: {location}</span>
                    <span>Quantity: {quantity}</span>
                    <span>Reported By: {username}</span>
                </span>
            </button>
        </form>
        <div data-testid="second-column" class="{detail_class}">
            <div data-testid="orca-type"{orca_type_hidden}>Orca type: {orca_type}</div>
            <div data-testid="orca-pod"{orca_pod_hidden}>Orca pod: {orca_pod}</div>
            <div>Longitude: {longitude}</div>
            <div>Latitude: {latitude}</div>
            <div>Description: {description}</div>
        </div>
    </div>{review}
</div>"#,
            dismissed = hidden_attr(self.state.dismissed),
            pending = pending,
            base = action_base,
            assets = assets,
            slug = s.species.image_slug(),
            species = html_escape(s.species.display_text()),
            date = html_escape(&s.sighted_on()),
            location = html_escape(&s.location),
            quantity = s.quantity,
            username = html_escape(&s.username),
            detail_class = self.state.detail_class(),
            orca_type_hidden = hidden_attr(!s.shows_orca_type()),
            orca_type = html_escape(orca_type),
            orca_pod_hidden = hidden_attr(!s.shows_orca_pod()),
            orca_pod = html_escape(&s.orca_pod),
            longitude = s.longitude,
            latitude = s.latitude,
            description = html_escape(&s.description),
            review = review,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{ApiCall, FakeApi};
    use crate::models::fixtures;
    use crate::models::{OrcaType, Species};
    use crate::views::testing::{count, is_hidden, tag};

    fn render(sighting: &Sighting, admin: bool, state: CardState) -> String {
        SightingCard::new(sighting, admin, state).render("/profile/cards", "/assets")
    }

    #[test]
    fn test_renders_card() {
        let sighting = fixtures::sighting(1, Species::CaliforniaSeaLion, true);
        let html = render(&sighting, false, CardState::default());

        assert_eq!(count(&html, "card-component"), 1);
        assert!(html.contains("Sighted At: 2021/09/14"));
        assert!(html.contains("Species: california sea lion"));
        assert!(html.contains("Reported By: FakeUser"));
        assert!(tag(&html, "speciesImage")
            .unwrap()
            .contains("/assets/species/california-sea-lion.jpg"));
    }

    #[test]
    fn test_pending_marker_follows_confirmed_flag() {
        let confirmed = fixtures::sighting(1, Species::Minke, true);
        assert_eq!(count(&render(&confirmed, true, CardState::default()), "pending"), 0);

        let unconfirmed = fixtures::sighting(2, Species::Minke, false);
        assert_eq!(count(&render(&unconfirmed, false, CardState::default()), "pending"), 1);
    }

    #[test]
    fn test_toggle_switches_detail_class() {
        let sighting = fixtures::orca(2, OrcaType::Offshore, "", false);
        let mut state = CardState::default();

        let html = render(&sighting, false, state);
        assert!(tag(&html, "second-column").unwrap().contains("second-column closed"));

        state.toggle();
        let html = render(&sighting, false, state);
        assert!(tag(&html, "second-column").unwrap().contains("second-column open"));

        state.toggle();
        assert_eq!(state, CardState::default());
    }

    #[test]
    fn test_review_controls_need_admin_and_pending() {
        let pending = fixtures::sighting(1, Species::Orca, false);
        let confirmed = fixtures::sighting(2, Species::Orca, true);

        let html = render(&pending, true, CardState::default());
        assert_eq!(count(&html, "approve-button"), 1);
        assert_eq!(count(&html, "reject-button"), 1);
        assert!(html.contains(r#"action="/profile/cards/1/approve""#));
        assert!(html.contains(r#"action="/profile/cards/1/reject""#));

        assert_eq!(count(&render(&pending, false, CardState::default()), "approve-button"), 0);
        assert_eq!(count(&render(&confirmed, true, CardState::default()), "approve-button"), 0);
    }

    #[test]
    fn test_orca_type_hidden_for_other_species() {
        let sighting = fixtures::sighting(1, Species::CaliforniaSeaLion, true);
        let html = render(&sighting, true, CardState::default());
        assert!(is_hidden(&html, "orca-type"));
        assert!(is_hidden(&html, "orca-pod"));
    }

    #[test]
    fn test_orca_pod_hidden_unless_southern_resident() {
        let sighting = fixtures::orca(2, OrcaType::Offshore, "", false);
        let html = render(&sighting, true, CardState::default());
        assert!(!is_hidden(&html, "orca-type"));
        assert!(is_hidden(&html, "orca-pod"));
    }

    #[test]
    fn test_southern_resident_shows_type_and_pod() {
        let sighting = fixtures::orca(2, OrcaType::SouthernResident, "j", false);
        let html = render(&sighting, true, CardState::default());
        assert!(!is_hidden(&html, "orca-type"));
        assert!(!is_hidden(&html, "orca-pod"));
        assert!(html.contains("Orca type: Southern Resident"));
        assert!(html.contains("Orca pod: j"));
    }

    #[test]
    fn test_dismissed_card_is_hidden() {
        let sighting = fixtures::sighting(1, Species::Minke, false);
        let mut state = CardState::default();
        state.dismiss();
        assert!(is_hidden(&render(&sighting, true, state), "sighting-card"));
        state.restore();
        assert!(!is_hidden(&render(&sighting, true, state), "sighting-card"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut sighting = fixtures::sighting(1, Species::Minke, true);
        sighting.description = "<script>alert(1)</script>".to_string();
        let html = render(&sighting, false, CardState::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_review_commands_call_api() {
        let api = FakeApi::new();
        ReviewCommand::Approve(4).execute(&api).await.unwrap();
        ReviewCommand::Reject(5).execute(&api).await.unwrap();
        assert_eq!(
            api.calls(),
            vec![ApiCall::ConfirmSighting(4), ApiCall::DeleteSighting(5)]
        );
    }

    #[tokio::test]
    async fn test_review_command_propagates_failure() {
        let api = FakeApi::new().failing(ApiCall::ConfirmSighting(4));
        assert!(ReviewCommand::Approve(4).execute(&api).await.is_err());
    }
}
