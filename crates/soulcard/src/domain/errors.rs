//! Domain Errors
//!
//! Layered error types: transport failures from the completion client,
//! pipeline failures (parse, validation, transcript shape) and the single
//! user-facing [`FeatureError`] every orchestrator returns.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::entities::TurnRole;

/// Failures of one chat-completion exchange
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("Completion client is not configured: {0}")]
    Config(String),

    #[error("No response from upstream within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Upstream returned HTTP {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Request was cancelled")]
    Cancelled,
}

/// Normalized text was not valid JSON
#[derive(Debug, Error)]
#[error("Response is not valid JSON: {source}")]
pub struct ParseError {
    /// Leading part of the offending text, for logs only
    pub excerpt: String,
    #[source]
    pub source: serde_json::Error,
}

impl ParseError {
    const EXCERPT_CHARS: usize = 120;

    pub fn new(text: &str, source: serde_json::Error) -> Self {
        Self {
            excerpt: text.chars().take(Self::EXCERPT_CHARS).collect(),
            source,
        }
    }
}

/// One violated schema constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct Violation {
    /// Dotted field path, e.g. `stats.humor` or `tags[1]`
    pub path: String,
    pub reason: String,
}

/// Every constraint a parsed object failed, in field order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub schema: &'static str,
    pub violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn new(schema: &'static str) -> Self {
        Self {
            schema,
            violations: Vec::new(),
        }
    }

    pub fn push(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(Violation {
            path: path.into(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether any violation is reported at `path`
    pub fn mentions(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed validation: ", self.schema)?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Transcript shape violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("Turn {position} must be a {expected:?} turn")]
    OutOfOrder { position: usize, expected: TurnRole },

    #[error("Message must not be empty")]
    EmptyTurn,

    #[error("Conversation already has {max} user turns")]
    TooManyTurns { max: usize },

    #[error("Conversation needs at least one user turn")]
    NoUserTurns,
}

/// Anything that can go wrong between prompt and typed result
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Category of a user-facing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Timeout,
    InsufficientBalance,
    Unauthorized,
    RateLimited,
    NotFound,
    Upstream,
    Network,
    MalformedResponse,
    Parse,
    Validation,
    Cancelled,
    InvalidInput,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Timeout => "timeout",
            ErrorKind::InsufficientBalance => "insufficient_balance",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Network => "network",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::Parse => "parse",
            ErrorKind::Validation => "validation",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::InvalidInput => "invalid_input",
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout
                | ErrorKind::RateLimited
                | ErrorKind::Network
                | ErrorKind::Parse
                | ErrorKind::Validation
                | ErrorKind::Upstream
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing capability an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    NoteCard,
    Diagnosis,
    Personality,
    FortuneCard,
    DailyFortune,
    Chat,
}

impl Feature {
    pub fn label(&self) -> &'static str {
        match self {
            Feature::NoteCard => "生成卡片",
            Feature::Diagnosis => "情绪诊断",
            Feature::Personality => "生成人格卡片",
            Feature::FortuneCard => "生成运势卡片",
            Feature::DailyFortune => "生成今日运势",
            Feature::Chat => "聊天",
        }
    }
}

/// The only error an orchestrator returns: a kind plus a localized message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FeatureError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FeatureError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
