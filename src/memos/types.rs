//! Shared types used by the Memos client and the MCP surface.

use std::{fmt, str::FromStr};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned while interacting with the Memos server.
#[derive(Debug, Error)]
pub enum MemosError {
    /// Connection settings were unusable.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Base URL failed to parse or normalize.
    #[error("Invalid Memos URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before a complete response was read.
    #[error("{operation} failed in transport: {source}")]
    Http {
        /// Operation that was attempted.
        operation: &'static str,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// Server answered with a success status but a body that is not the expected JSON.
    #[error("{operation} returned an undecodable body ({status}): {message}")]
    Decode {
        /// Operation that was attempted.
        operation: &'static str,
        /// HTTP status returned by Memos.
        status: StatusCode,
        /// Parser error describing the mismatch.
        message: String,
    },
    /// Token was missing or rejected.
    #[error("{operation} was not authorized ({status}): {message}")]
    Unauthorized {
        /// Operation that was attempted.
        operation: &'static str,
        /// HTTP status returned by Memos.
        status: StatusCode,
        /// Message supplied by the server.
        message: String,
    },
    /// Requested entity does not exist.
    #[error("{operation} found nothing ({status}): {message}")]
    NotFound {
        /// Operation that was attempted.
        operation: &'static str,
        /// HTTP status returned by Memos.
        status: StatusCode,
        /// Message supplied by the server.
        message: String,
    },
    /// Memos responded with some other non-success status.
    #[error("Unexpected Memos response to {operation} ({status}): {message}")]
    UnexpectedStatus {
        /// Operation that was attempted.
        operation: &'static str,
        /// HTTP status returned by Memos.
        status: StatusCode,
        /// Message supplied by the server.
        message: String,
    },
}

impl MemosError {
    /// Classify a failing HTTP status for the given operation.
    pub fn from_status(operation: &'static str, status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized {
                operation,
                status,
                message,
            },
            StatusCode::NOT_FOUND => Self::NotFound {
                operation,
                status,
                message,
            },
            _ => Self::UnexpectedStatus {
                operation,
                status,
                message,
            },
        }
    }

    /// Short machine-readable label for the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::InvalidUrl(_) => "configuration",
            Self::Http { .. } => "transport",
            Self::Decode { .. } => "decode",
            Self::Unauthorized { .. } => "unauthorized",
            Self::NotFound { .. } => "not_found",
            Self::UnexpectedStatus { .. } => "unexpected_status",
        }
    }

    /// HTTP status attached to the failure, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { status, .. }
            | Self::NotFound { status, .. }
            | Self::UnexpectedStatus { status, .. }
            | Self::Decode { status, .. } => Some(*status),
            Self::Http { source, .. } => source.status(),
            Self::Config(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Operation name attached to the failure, if known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Unauthorized { operation, .. }
            | Self::NotFound { operation, .. }
            | Self::UnexpectedStatus { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Http { operation, .. } => Some(*operation),
            Self::Config(_) | Self::InvalidUrl(_) => None,
        }
    }
}

/// Access classification attached to a memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Visible to anyone, including anonymous visitors.
    #[default]
    Public,
    /// Visible to signed-in users of the workspace.
    Protected,
    /// Visible to the creator only.
    Private,
}

impl Visibility {
    /// Every supported value, in the order presented to clients.
    pub const ALL: [Visibility; 3] = [Self::Public, Self::Protected, Self::Private];

    /// Wire representation used by the Memos API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Protected => "PROTECTED",
            Self::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PUBLIC" => Ok(Self::Public),
            "PROTECTED" => Ok(Self::Protected),
            "PRIVATE" => Ok(Self::Private),
            _ => Err(()),
        }
    }
}

/// Memo as returned by the Memos API. Unpopulated fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Memo {
    /// Resource name in the form `memos/{id}`.
    pub name: String,
    /// Stable user-facing identifier.
    pub uid: String,
    /// Resource name of the creator (`users/{id}`).
    pub creator: String,
    /// Row state, normally `NORMAL` or `ARCHIVED`.
    pub row_status: String,
    /// Creation timestamp (RFC3339).
    pub create_time: Option<String>,
    /// Last update timestamp (RFC3339).
    pub update_time: Option<String>,
    /// Display timestamp (RFC3339).
    pub display_time: Option<String>,
    /// Markdown content.
    pub content: String,
    /// Visibility as reported by the server.
    pub visibility: String,
    /// Tags extracted from the content.
    pub tags: Vec<String>,
    /// Whether the memo is pinned.
    pub pinned: bool,
    /// Plain-text snippet of the content.
    pub snippet: String,
}

/// Condensed memo representation used in listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoSummary {
    /// Resource name in the form `memos/{id}`.
    pub name: String,
    /// Markdown content.
    pub content: String,
    /// Visibility as reported by the server.
    pub visibility: String,
    /// Tags extracted from the content.
    pub tags: Vec<String>,
    /// Creation timestamp (RFC3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    /// Whether the memo is pinned.
    pub pinned: bool,
}

impl From<&Memo> for MemoSummary {
    fn from(memo: &Memo) -> Self {
        Self {
            name: memo.name.clone(),
            content: memo.content.clone(),
            visibility: memo.visibility.clone(),
            tags: memo.tags.clone(),
            create_time: memo.create_time.clone(),
            pinned: memo.pinned,
        }
    }
}

/// Parameters for a keyword search.
#[derive(Debug, Clone, Default)]
pub struct MemoQuery {
    /// Keyword matched against memo content.
    pub keyword: String,
    /// Optional page size forwarded to the server.
    pub limit: Option<u32>,
}

/// Public workspace metadata, used to check reachability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceProfile {
    /// Resource name of the workspace owner.
    pub owner: String,
    /// Server version string.
    pub version: String,
    /// Server mode (`prod`, `dev`, `demo`).
    pub mode: String,
}

/// Body sent when creating a memo.
#[derive(Serialize)]
pub(crate) struct CreateMemoBody<'a> {
    pub(crate) content: &'a str,
    pub(crate) visibility: Visibility,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ListMemosResponse {
    pub(crate) memos: Vec<Memo>,
    #[allow(dead_code)]
    pub(crate) next_page_token: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ListMemoTagsResponse {
    pub(crate) tag_amounts: BTreeMap<String, i64>,
}

#[derive(Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
}
