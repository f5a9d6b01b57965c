//! Web frontend serving the profile page
//!
//! Pages are rendered on the server; the sightings data itself comes from the
//! REST API through the session's [`crate::api::ApiClient`].

mod pages;
mod profile;
mod server;
mod session;

pub use server::start_web_server;
