//! Error types shared across the core crate.

use thiserror::Error;

/// Failures from the durable slot store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Failures of a single review call.
///
/// `Display` is exactly the text shown in the review panel, so the controller
/// can mirror `err.to_string()` into the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// The service answered with a non-2xx status.
    #[error("Server error: {0}")]
    Server(u16),
    /// No usable response: connection failure or an unreadable body.
    #[error("Network error: {0}")]
    Network(String),
}

/// Reasons a review request is refused before any transition happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviewRejected {
    #[error("Please add some code first.")]
    EmptySource,
}
