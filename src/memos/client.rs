//! HTTP client wrapper for interacting with the Memos REST API.

use std::collections::BTreeSet;

use crate::config::Config;
use crate::memos::{
    api::MemosApi,
    filters::{content_search_filter, visibility_filter},
    types::{
        CreateMemoBody, ErrorBody, ListMemoTagsResponse, ListMemosResponse, Memo, MemoQuery,
        MemosError, Visibility, WorkspaceProfile,
    },
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, header::AUTHORIZATION};
use serde::de::DeserializeOwned;

const API_PREFIX: &str = "api/v1";

/// Lightweight HTTP client for Memos operations.
pub struct MemosClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) authorization: Option<String>,
}

impl MemosClient {
    /// Construct a client for the server described by `config`.
    pub fn new(config: &Config) -> Result<Self, MemosError> {
        config.validate()?;
        let client = Client::builder()
            .user_agent(concat!("memos-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| MemosError::Http {
                operation: "initialize client",
                source,
            })?;

        let base_url = normalize_base_url(&config.base_url()).map_err(MemosError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            has_token = config.has_token(),
            "Initialized Memos HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            authorization: config.authorization(),
        })
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format_endpoint(&self.base_url, path);
        let mut req = self.client.request(method, url);
        if let Some(authorization) = &self.authorization {
            req = req.header(AUTHORIZATION, authorization);
        }
        req
    }

    /// Send `req` and decode a successful JSON body, tagging every failure with `operation`.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        req: RequestBuilder,
    ) -> Result<T, MemosError> {
        let result = async move {
            let response = req
                .send()
                .await
                .map_err(|source| MemosError::Http { operation, source })?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|source| MemosError::Http { operation, source })?;
            if !status.is_success() {
                return Err(MemosError::from_status(
                    operation,
                    status,
                    extract_message(&body),
                ));
            }
            serde_json::from_str(&body).map_err(|err| MemosError::Decode {
                operation,
                status,
                message: err.to_string(),
            })
        }
        .await;

        if let Err(error) = &result {
            tracing::error!(operation, kind = error.kind(), error = %error, "Memos request failed");
        }
        result
    }
}

#[async_trait]
impl MemosApi for MemosClient {
    async fn search_memos(&self, query: &MemoQuery) -> Result<Vec<Memo>, MemosError> {
        let filter = content_search_filter(&query.keyword);
        let mut req = self
            .request(Method::GET, &format!("{API_PREFIX}/memos"))
            .query(&[("filter", filter.as_str())]);
        if let Some(limit) = query.limit {
            req = req.query(&[("pageSize", limit)]);
        }

        let ListMemosResponse { memos, .. } = self.execute("search memos", req).await?;
        tracing::debug!(keyword = %query.keyword, hits = memos.len(), "Memo search completed");
        Ok(memos)
    }

    async fn create_memo(&self, content: &str, visibility: Visibility) -> Result<Memo, MemosError> {
        let req = self
            .request(Method::POST, &format!("{API_PREFIX}/memos"))
            .json(&CreateMemoBody {
                content,
                visibility,
            });

        let memo: Memo = self.execute("create memo", req).await?;
        tracing::info!(name = %memo.name, %visibility, "Memo created");
        Ok(memo)
    }

    async fn get_memo(&self, name: &str) -> Result<Memo, MemosError> {
        let req = self.request(Method::GET, &format!("{API_PREFIX}/{name}"));
        self.execute("get memo", req).await
    }

    async fn list_memo_tags(
        &self,
        parent: &str,
        visibility: Visibility,
    ) -> Result<BTreeSet<String>, MemosError> {
        let req = self
            .request(Method::GET, &format!("{API_PREFIX}/{parent}/tags"))
            .query(&[("filter", visibility_filter(visibility))]);

        let ListMemoTagsResponse { tag_amounts } = self.execute("list memo tags", req).await?;
        Ok(tag_amounts.into_keys().collect())
    }

    async fn workspace_profile(&self) -> Result<WorkspaceProfile, MemosError> {
        let req = self.request(Method::GET, &format!("{API_PREFIX}/workspace/profile"));
        self.execute("workspace profile", req).await
    }
}

/// Pull the human-readable message out of an error body, falling back to the raw text.
fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message }) if !message.trim().is_empty() => message,
        _ => body.trim().to_string(),
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use reqwest::StatusCode;
    use serde_json::json;

    fn client_for(server: &MockServer, token: &str) -> MemosClient {
        MemosClient::new(&Config::new("127.0.0.1", server.port(), token)).expect("client")
    }

    #[tokio::test]
    async fn search_memos_sends_filter_and_preserves_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/memos")
                    .query_param(
                        "filter",
                        "row_status == 'NORMAL' && content_search == ['rust']",
                    )
                    .query_param("pageSize", "5")
                    .header("authorization", "Bearer tok");
                then.status(200).json_body(json!({
                    "memos": [
                        { "name": "memos/2", "content": "rust second" },
                        { "name": "memos/1", "content": "rust first" }
                    ],
                    "nextPageToken": ""
                }));
            })
            .await;

        let client = client_for(&server, "tok");
        let memos = client
            .search_memos(&MemoQuery {
                keyword: "rust".into(),
                limit: Some(5),
            })
            .await
            .expect("search");

        mock.assert_async().await;
        let names: Vec<_> = memos.iter().map(|memo| memo.name.as_str()).collect();
        assert_eq!(names, ["memos/2", "memos/1"]);
    }

    #[tokio::test]
    async fn search_memos_treats_missing_array_as_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/memos");
                then.status(200).json_body(json!({}));
            })
            .await;

        let memos = client_for(&server, "")
            .search_memos(&MemoQuery {
                keyword: "nothing".into(),
                limit: None,
            })
            .await
            .expect("search");
        assert!(memos.is_empty());
    }

    #[tokio::test]
    async fn create_memo_posts_content_and_visibility() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/memos")
                    .json_body(json!({ "content": "hello", "visibility": "PROTECTED" }));
                then.status(200).json_body(json!({
                    "name": "memos/42",
                    "content": "hello",
                    "visibility": "PROTECTED"
                }));
            })
            .await;

        let memo = client_for(&server, "tok")
            .create_memo("hello", Visibility::Protected)
            .await
            .expect("create");

        mock.assert_async().await;
        assert_eq!(memo.name, "memos/42");
        assert_eq!(memo.visibility, "PROTECTED");
    }

    #[tokio::test]
    async fn list_memo_tags_returns_sorted_keys() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/memos/-/tags")
                    .query_param("filter", "visibilities == ['PUBLIC']");
                then.status(200).json_body(json!({
                    "tagAmounts": { "work": 3, "idea": 1 }
                }));
            })
            .await;

        let tags = client_for(&server, "tok")
            .list_memo_tags("memos/-", Visibility::Public)
            .await
            .expect("tags");

        mock.assert_async().await;
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), ["idea", "work"]);
    }

    #[tokio::test]
    async fn get_memo_maps_not_found_with_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/memos/404");
                then.status(404)
                    .json_body(json!({ "code": 5, "message": "memo not found", "details": [] }));
            })
            .await;

        let error = client_for(&server, "tok")
            .get_memo("memos/404")
            .await
            .expect_err("missing memo");

        match error {
            MemosError::NotFound {
                operation,
                status,
                message,
            } => {
                assert_eq!(operation, "get memo");
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "memo not found");
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_token_sends_no_authorization_header() {
        let server = MockServer::start_async().await;
        let anonymous = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/workspace/profile")
                    .header_missing("authorization");
                then.status(200)
                    .json_body(json!({ "owner": "users/1", "version": "0.22.0", "mode": "prod" }));
            })
            .await;

        let profile = client_for(&server, "  ")
            .workspace_profile()
            .await
            .expect("profile");

        anonymous.assert_async().await;
        assert_eq!(profile.version, "0.22.0");
    }

    #[tokio::test]
    async fn rejected_token_maps_to_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/memos/-/tags");
                then.status(401).body("unauthenticated");
            })
            .await;

        let error = client_for(&server, "wrong")
            .list_memo_tags("memos/-", Visibility::Public)
            .await
            .expect_err("unauthorized");

        assert_eq!(error.kind(), "unauthorized");
        assert_eq!(error.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(error.to_string().contains("unauthenticated"));
    }

    #[tokio::test]
    async fn html_success_body_maps_to_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/memos/5");
                then.status(200)
                    .header("content-type", "text/html")
                    .body("<html><body>Sign in</body></html>");
            })
            .await;

        let error = client_for(&server, "tok")
            .get_memo("memos/5")
            .await
            .expect_err("html is not a memo");

        assert_eq!(error.kind(), "decode");
        assert_eq!(error.operation(), Some("get memo"));
        assert_eq!(error.status(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn refused_connection_keeps_operation() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };

        let error = MemosClient::new(&Config::new("127.0.0.1", port, ""))
            .expect("client")
            .search_memos(&MemoQuery {
                keyword: "rust".into(),
                limit: None,
            })
            .await
            .expect_err("nothing listens");

        assert_eq!(error.kind(), "transport");
        assert_eq!(error.operation(), Some("search memos"));
        assert!(error.status().is_none());
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        let result = MemosClient::new(&Config::new("", 8080, ""));
        assert!(matches!(result, Err(MemosError::Config(_))));
    }

    #[test]
    fn extract_message_prefers_json_message() {
        assert_eq!(
            extract_message(r#"{"code":16,"message":"invalid token"}"#),
            "invalid token"
        );
        assert_eq!(extract_message(" plain failure \n"), "plain failure");
    }
}
