//! The review request lifecycle.
//!
//! [`ReviewController`] owns the [`RequestStatus`] of the current cycle. The UI
//! drives it in two halves, [`ReviewController::begin`] and
//! [`ReviewController::complete`], with the network call running on its own
//! task in between. [`ReviewController::request_review`] runs a whole cycle
//! inline for headless callers.
//!
//! Every issued request carries a [`RequestToken`]. Only a completion carrying
//! the latest token settles the cycle; anything older is dropped.

use crate::client::ReviewClient;
use crate::error::{ReviewError, ReviewRejected};
use crate::session::Session;
use crate::store::SlotStore;
use crate::types::{Language, RequestStatus, ReviewPayload, ReviewReply};

/// Review text used when the service answers without any feedback.
pub const NO_FEEDBACK: &str = "No feedback received.";

/// Identifies one issued review request. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A request that has moved the controller to `InFlight` and still needs sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReview {
    pub token: RequestToken,
    pub payload: ReviewPayload,
}

#[derive(Debug, Default)]
pub struct ReviewController {
    status: RequestStatus,
    issued: u64,
}

impl ReviewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn is_in_flight(&self) -> bool {
        self.status.is_in_flight()
    }

    /// Token of the most recently issued request, if any.
    pub fn latest_token(&self) -> Option<RequestToken> {
        (self.issued > 0).then_some(RequestToken(self.issued))
    }

    /// Starts a cycle: checks the source, moves to `InFlight`, issues a token.
    ///
    /// Whitespace-only source is rejected with no state change. The caller is
    /// responsible for clearing the displayed review text and sending the
    /// payload.
    pub fn begin(
        &mut self,
        source_text: &str,
        language: Language,
    ) -> Result<PendingReview, ReviewRejected> {
        if source_text.trim().is_empty() {
            return Err(ReviewRejected::EmptySource);
        }

        self.issued += 1;
        let token = RequestToken(self.issued);
        self.status = RequestStatus::InFlight;
        tracing::info!(token = token.get(), %language, "review request started");

        Ok(PendingReview {
            token,
            payload: ReviewPayload {
                code: source_text.to_owned(),
                language,
            },
        })
    }

    /// Settles the cycle identified by `token`.
    ///
    /// Returns the text the session should now show as its review: the
    /// feedback, [`NO_FEEDBACK`], or the error message. Returns `None` for a
    /// stale token, leaving the status untouched.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<ReviewReply, ReviewError>,
    ) -> Option<String> {
        if self.latest_token() != Some(token) || !self.is_in_flight() {
            tracing::debug!(token = token.get(), "dropping stale review response");
            return None;
        }

        let text = match outcome {
            Ok(reply) => {
                let text = reply.review.unwrap_or_else(|| NO_FEEDBACK.to_owned());
                tracing::info!(token = token.get(), review_len = text.len(), "review received");
                self.status = RequestStatus::Succeeded(text.clone());
                text
            }
            Err(err) => {
                match &err {
                    ReviewError::Network(detail) => {
                        tracing::error!(token = token.get(), %detail, "review request failed")
                    }
                    ReviewError::Server(code) => {
                        tracing::warn!(token = token.get(), code, "review service rejected request")
                    }
                }
                let text = err.to_string();
                self.status = RequestStatus::Failed(text.clone());
                text
            }
        };
        Some(text)
    }

    /// Runs one full review cycle for `session` against `client`.
    ///
    /// Clears the session's review text when the request starts and mirrors
    /// the outcome into it when the request settles. Storage failures are
    /// logged; the cycle still settles.
    pub async fn request_review<S, C>(
        &mut self,
        session: &mut Session<S>,
        client: &C,
    ) -> Result<&RequestStatus, ReviewRejected>
    where
        S: SlotStore,
        C: ReviewClient + ?Sized,
    {
        let state = session.state();
        let pending = self.begin(&state.source_text, state.language)?;

        if let Err(e) = session.set_review_text(String::new()) {
            tracing::warn!(error = %e, "failed to persist cleared review");
        }

        let outcome = client.review(&pending.payload).await;

        if let Some(text) = self.complete(pending.token, outcome) {
            if let Err(e) = session.set_review_text(text) {
                tracing::warn!(error = %e, "failed to persist review");
            }
        }
        Ok(&self.status)
    }
}
