//! Review service clients.
//!
//! [`ReviewClient`] is the seam the controller talks to. [`HttpReviewClient`]
//! is the production implementation: one JSON POST per review.

use async_trait::async_trait;

use crate::error::ReviewError;
use crate::types::{ReviewPayload, ReviewReply};

/// Something that can turn a payload into review feedback.
#[async_trait]
pub trait ReviewClient: Send + Sync {
    /// Performs one review call. Never retries.
    async fn review(&self, payload: &ReviewPayload) -> Result<ReviewReply, ReviewError>;
}

/// POSTs `{code, language}` to `{base_url}/review`.
#[derive(Debug, Clone)]
pub struct HttpReviewClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpReviewClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: review_endpoint(base_url),
        }
    }
}

/// Joins the configured base URL with the `/review` path.
pub fn review_endpoint(base_url: &str) -> String {
    format!("{}/review", base_url.trim_end_matches('/'))
}

/// Extracts the `review` string from a 2xx response body.
///
/// A missing, null, non-string, or empty `review` yields `None`.
pub fn parse_reply(body: &serde_json::Value) -> ReviewReply {
    let review = body
        .get("review")
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);
    ReviewReply { review }
}

#[async_trait]
impl ReviewClient for HttpReviewClient {
    async fn review(&self, payload: &ReviewPayload) -> Result<ReviewReply, ReviewError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            language = %payload.language,
            code_len = payload.code.len(),
            "sending review request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| ReviewError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReviewError::Server(status.as_u16()));
        }

        // A body that is not JSON fails the same way a dropped connection does.
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ReviewError::Network(e.to_string()))?;

        Ok(parse_reply(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(review_endpoint("http://api.test"), "http://api.test/review");
        assert_eq!(review_endpoint("http://api.test/"), "http://api.test/review");
        assert_eq!(review_endpoint("http://api.test/v1//"), "http://api.test/v1/review");
    }

    #[test]
    fn reply_uses_review_string() {
        let reply = parse_reply(&json!({ "review": "Looks good" }));
        assert_eq!(reply.review.as_deref(), Some("Looks good"));
    }

    #[test]
    fn unusable_review_field_is_absent() {
        assert_eq!(parse_reply(&json!({})).review, None);
        assert_eq!(parse_reply(&json!({ "review": null })).review, None);
        assert_eq!(parse_reply(&json!({ "review": "" })).review, None);
        assert_eq!(parse_reply(&json!({ "review": 42 })).review, None);
        assert_eq!(parse_reply(&json!(["review"])).review, None);
    }
}
