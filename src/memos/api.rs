//! Trait seam between the MCP surface and the Memos transport.

use std::collections::BTreeSet;

use async_trait::async_trait;

use super::types::{Memo, MemoQuery, MemosError, Visibility, WorkspaceProfile};

/// Operations the MCP tools need from a Memos server.
///
/// [`MemosClient`](super::MemosClient) is the HTTP implementation; tests substitute their own.
#[async_trait]
pub trait MemosApi: Send + Sync {
    /// Search non-archived memos whose content contains the query keyword, in server order.
    async fn search_memos(&self, query: &MemoQuery) -> Result<Vec<Memo>, MemosError>;

    /// Create a memo and return the server's representation of it.
    async fn create_memo(&self, content: &str, visibility: Visibility) -> Result<Memo, MemosError>;

    /// Fetch a single memo by resource name (`memos/{id}`).
    async fn get_memo(&self, name: &str) -> Result<Memo, MemosError>;

    /// List tags under `parent` for memos with the given visibility.
    async fn list_memo_tags(
        &self,
        parent: &str,
        visibility: Visibility,
    ) -> Result<BTreeSet<String>, MemosError>;

    /// Fetch public workspace metadata.
    async fn workspace_profile(&self) -> Result<WorkspaceProfile, MemosError>;
}
