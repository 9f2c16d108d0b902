//! Navidrome admin API access.

mod auth;
mod client;
mod types;

pub use auth::AdminAuthenticator;
pub use client::NavidromeClient;
pub use types::{AdminToken, NewUser};
