//! Navidrome Registration Proxy - public self-service signup for Navidrome.
//!
//! This proxy accepts anonymous signup requests and:
//! - Re-validates username, email and password server-side
//! - Logs in to Navidrome as the administrator for each request
//! - Creates a non-admin Navidrome user on the caller's behalf
//! - Caps attempts per client within a fixed window

pub mod api;
pub mod config;
pub mod error;
pub mod limiter;
pub mod navidrome;

pub use config::Config;
pub use error::{ProxyError, UpstreamError};
pub use limiter::{Admission, AttemptLimiter};
pub use navidrome::{AdminAuthenticator, AdminToken, NavidromeClient, NewUser};
