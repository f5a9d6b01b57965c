//! Feed state for the profile page and its reducer
//!
//! `FeedState::apply` is the only way state changes. It never performs I/O;
//! when a transition needs data it returns a [`FeedRequest`] for the caller
//! to run, and the response comes back as [`FeedEvent::SightingsLoaded`].

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use super::card::CardState;
use crate::models::{Rank, Sighting, SightingId, User};

/// Which collection the feed shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeedMode {
    #[default]
    Sightings,
    Approvals,
}

impl FeedMode {
    pub fn label(self) -> &'static str {
        match self {
            FeedMode::Sightings => "Sightings",
            FeedMode::Approvals => "Approvals",
        }
    }

    /// Path segment used by the mode toggle forms
    pub fn slug(self) -> &'static str {
        match self {
            FeedMode::Sightings => "sightings",
            FeedMode::Approvals => "approvals",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "sightings" => Some(FeedMode::Sightings),
            "approvals" => Some(FeedMode::Approvals),
            _ => None,
        }
    }
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies one issued feed fetch; later tokens compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(u64);

/// A feed fetch the caller has to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    pub token: RequestToken,
    pub mode: FeedMode,
    pub page: u32,
}

#[derive(Debug, Clone)]
pub enum FeedEvent {
    Mounted,
    ModeSelected(FeedMode),
    NextPage,
    PreviousPage,
    SightingsLoaded {
        token: RequestToken,
        sightings: Vec<Sighting>,
    },
    UserLoaded(User),
    AdminStatusLoaded(bool),
    AdminGranted,
    AdminRevoked,
    CardToggled(SightingId),
    CardDismissed(SightingId),
    CardRestored(SightingId),
    ActionFailed(String),
}

#[derive(Debug, Clone)]
pub struct FeedState {
    pub mode: FeedMode,
    pub page: u32,
    pub is_admin: bool,
    pub sightings: Vec<Sighting>,
    pub current_user: Option<User>,
    pub rank: Rank,
    /// Message from the last failed action, cleared by the next transition
    pub notice: Option<String>,
    cards: HashMap<SightingId, CardState>,
    issued: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            mode: FeedMode::Sightings,
            page: 1,
            is_admin: false,
            sightings: Vec::new(),
            current_user: None,
            rank: Rank::Newbie,
            notice: None,
            cards: HashMap::new(),
            issued: 0,
        }
    }
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of the most recently issued fetch
    pub fn latest_token(&self) -> RequestToken {
        RequestToken(self.issued)
    }

    pub fn card(&self, id: SightingId) -> CardState {
        self.cards.get(&id).copied().unwrap_or_default()
    }

    pub fn is_displayed(&self, id: SightingId) -> bool {
        self.sightings.iter().any(|s| s.id == id)
    }

    /// Page nav is dropped when the first page came back empty
    pub fn shows_page_nav(&self) -> bool {
        !(self.sightings.is_empty() && self.page == 1)
    }

    pub fn shows_empty_state(&self) -> bool {
        self.sightings.is_empty() && self.page == 1
    }

    pub fn heading(&self) -> String {
        format!("Your {}", self.mode)
    }

    /// Apply one event, returning the fetch it requires, if any
    pub fn apply(&mut self, event: FeedEvent) -> Option<FeedRequest> {
        match event {
            FeedEvent::Mounted => {
                // Tokens keep counting so fetches from before a remount stay stale
                let issued = self.issued;
                *self = FeedState::default();
                self.issued = issued;
                Some(self.issue())
            }
            FeedEvent::ModeSelected(mode) => {
                if mode == self.mode {
                    return None;
                }
                if mode == FeedMode::Approvals && !self.is_admin {
                    debug!("Ignoring approvals toggle for non-admin");
                    return None;
                }
                // Page is kept across mode switches
                self.mode = mode;
                Some(self.issue())
            }
            FeedEvent::NextPage => {
                let Some(page) = self.page.checked_add(1) else {
                    return None;
                };
                self.page = page;
                Some(self.issue())
            }
            FeedEvent::PreviousPage => {
                if self.page <= 1 {
                    return None;
                }
                self.page -= 1;
                Some(self.issue())
            }
            FeedEvent::SightingsLoaded { token, sightings } => {
                if token != self.latest_token() {
                    debug!(
                        "Discarding stale feed response {:?} (latest {:?})",
                        token,
                        self.latest_token()
                    );
                    return None;
                }
                self.sightings = sightings;
                self.cards.clear();
                None
            }
            FeedEvent::UserLoaded(user) => {
                self.current_user = Some(user);
                self.assign_rank();
                None
            }
            FeedEvent::AdminStatusLoaded(is_admin) => {
                self.is_admin = is_admin;
                None
            }
            FeedEvent::AdminGranted => {
                self.is_admin = true;
                None
            }
            FeedEvent::AdminRevoked => {
                self.is_admin = false;
                if self.mode == FeedMode::Sightings {
                    return None;
                }
                self.mode = FeedMode::Sightings;
                Some(self.issue())
            }
            FeedEvent::CardToggled(id) => {
                self.cards.entry(id).or_default().toggle();
                None
            }
            FeedEvent::CardDismissed(id) => {
                self.cards.entry(id).or_default().dismiss();
                None
            }
            FeedEvent::CardRestored(id) => {
                self.cards.entry(id).or_default().restore();
                None
            }
            FeedEvent::ActionFailed(message) => {
                self.notice = Some(message);
                None
            }
        }
    }

    /// Start a fetch for the current (mode, page)
    fn issue(&mut self) -> FeedRequest {
        self.issued += 1;
        self.notice = None;
        self.assign_rank();
        FeedRequest {
            token: RequestToken(self.issued),
            mode: self.mode,
            page: self.page,
        }
    }

    fn assign_rank(&mut self) {
        self.rank = self
            .current_user
            .as_ref()
            .map(User::rank)
            .unwrap_or(Rank::Newbie);
    }
}
