//! Core library for revivr: session persistence and the review request lifecycle.
//!
//! The binary crate owns the terminal; everything here is UI-agnostic so it can
//! be driven from the event loop, from headless callers, and from tests.

pub mod client;
pub mod db;
pub mod error;
pub mod review;
pub mod schema;
pub mod session;
pub mod store;
pub mod types;

pub use client::{HttpReviewClient, ReviewClient};
pub use error::{ReviewError, ReviewRejected, StoreError};
pub use review::{PendingReview, RequestToken, ReviewController};
pub use session::Session;
pub use store::{MemoryStore, SlotStore};
pub use types::{Language, RequestStatus, ReviewPayload, ReviewReply, SessionState};
