//! Memos REST API integration.

pub mod api;
pub mod client;
pub mod filters;
pub mod types;

pub use api::MemosApi;
pub use client::MemosClient;
pub use filters::{ALL_MEMOS_PARENT, normalize_memo_name, normalize_parent};
pub use types::{Memo, MemoQuery, MemoSummary, MemosError, Visibility, WorkspaceProfile};
