//! Form client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    /// Transport failure or an unreadable reply.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}
