//! View models for the profile page
//!
//! Everything here is plain state plus HTML rendering; the web layer only
//! wires form posts to [`FeedController`] operations.

pub mod card;
pub mod controller;
pub mod feed;
pub mod page_nav;

pub use card::{CardState, ReviewCommand, SightingCard};
pub use controller::FeedController;
pub use feed::{FeedEvent, FeedMode, FeedRequest, FeedState, RequestToken};
pub use page_nav::PageNav;

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// ` hidden` attribute fragment when `hidden` is set
pub(crate) fn hidden_attr(hidden: bool) -> &'static str {
    if hidden {
        " hidden"
    } else {
        ""
    }
}
