use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Source language selected for the editor and sent with each review request.
///
/// Exactly five values exist. The lowercase identifier (`as_str`) is both the
/// persisted slot value and the wire value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Jsx,
    Python,
    TypeScript,
    Java,
}

impl Language {
    /// All languages in selector order.
    pub const ALL: [Language; 5] = [
        Language::JavaScript,
        Language::Jsx,
        Language::Python,
        Language::TypeScript,
        Language::Java,
    ];

    /// Stable identifier used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Jsx => "jsx",
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::Java => "java",
        }
    }

    /// Human-readable selector label.
    pub fn label(self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Jsx => "React (JSX)",
            Language::Python => "Python",
            Language::TypeScript => "TypeScript",
            Language::Java => "Java",
        }
    }

    /// File extension used to pick a syntax definition for highlighting.
    pub fn extension(self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::Jsx => "jsx",
            Language::Python => "py",
            Language::TypeScript => "ts",
            Language::Java => "java",
        }
    }

    /// Returns the language after `self` in selector order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Returns the language before `self` in selector order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the five language identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| UnknownLanguage(s.to_owned()))
    }
}

/// The durable triple mirrored to storage on every mutation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub source_text: String,
    pub language: Language,
    /// Last review text, or the error message of the last failed cycle.
    pub review_text: String,
}

/// Lifecycle of one review request cycle.
///
/// `Succeeded` and `Failed` are terminal for a cycle but a new request always
/// moves back to `InFlight`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded(String),
    Failed(String),
}

impl RequestStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestStatus::InFlight)
    }

    /// Short label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Idle => "idle",
            RequestStatus::InFlight => "analyzing",
            RequestStatus::Succeeded(_) => "reviewed",
            RequestStatus::Failed(_) => "failed",
        }
    }
}

/// JSON body of `POST {base}/review`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewPayload {
    pub code: String,
    pub language: Language,
}

/// What a review service answered with on a 2xx response.
///
/// `review` is `None` when the body had no usable `review` string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewReply {
    pub review: Option<String>,
}
