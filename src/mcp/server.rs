//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    config::Config,
    mcp::{
        format::{
            APPLICATION_JSON, HealthSnapshot, SettingsSnapshot, json_resource_contents,
            serialize_json, visibilities_payload,
        },
        handlers::{
            create::handle_create, get::handle_get, search::handle_search,
            tags::handle_list_tags,
        },
        registry, schemas,
    },
    memos::{MemosApi, MemosClient, MemosError, normalize_memo_name},
};
use anyhow::Context;
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, JsonObject,
        ListResourceTemplatesResult, ListResourcesResult, ListToolsResult, RawResource,
        RawResourceTemplate, ReadResourceRequestParam, ReadResourceResult, Resource,
        ResourceTemplate, ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
    },
    service::ServiceExt,
    transport::stdio,
};

const VISIBILITIES_URI: &str = "mcp://memos/visibilities";
const SETTINGS_URI: &str = "mcp://memos/settings";
const HEALTH_URI: &str = "mcp://memos/health";
const MEMO_TEMPLATE_URI: &str = "mcp://memo/{id}";
const MEMO_PREFIX: &str = "mcp://memo/";

/// MCP server exposing Memos operations as tools and resources.
#[derive(Clone)]
pub struct MemosMcpServer {
    config: Arc<Config>,
    memos: Arc<dyn MemosApi>,
    registry: Arc<registry::Registry>,
}

impl MemosMcpServer {
    /// Create a server backed by an HTTP client for the configured Memos instance.
    pub fn new(config: Config) -> Result<Self, MemosError> {
        let client = MemosClient::new(&config)?;
        Ok(Self::with_api(config, Arc::new(client)))
    }

    /// Create a server backed by an arbitrary [`MemosApi`] implementation.
    pub fn with_api(config: Config, memos: Arc<dyn MemosApi>) -> Self {
        let mut registry = registry::Registry::new();
        registry.register_resource(VISIBILITIES_URI, resource_visibilities);
        registry.register_resource(SETTINGS_URI, resource_settings);
        registry.register_resource(HEALTH_URI, resource_health);

        registry.register_tool("search_memo", tool_search);
        registry.register_tool("create_memo", tool_create);
        registry.register_tool("get_memo", tool_get);
        registry.register_tool("list_memo_tags", tool_list_tags);

        Self {
            config: Arc::new(config),
            memos,
            registry: Arc::new(registry),
        }
    }

    /// Connection settings the server was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn describe_tools(&self) -> Vec<Tool> {
        vec![
            describe_tool(
                "search_memo",
                "Search Memos",
                "Search memos whose content contains the given key words.",
                schemas::search_input_schema(),
                ToolAnnotations::with_title("Search Memos")
                    .read_only(true)
                    .idempotent(true)
                    .open_world(true),
            ),
            describe_tool(
                "create_memo",
                "Create Memo",
                "Create a new memo with the given content and visibility.",
                schemas::create_input_schema(),
                ToolAnnotations::with_title("Create Memo")
                    .destructive(false)
                    .idempotent(false)
                    .open_world(true),
            ),
            describe_tool(
                "get_memo",
                "Get Memo",
                "Get the full content of a memo by name (memos/{id}).",
                schemas::get_input_schema(),
                ToolAnnotations::with_title("Get Memo")
                    .read_only(true)
                    .idempotent(true)
                    .open_world(true),
            ),
            describe_tool(
                "list_memo_tags",
                "List Memo Tags",
                "List all existing memo tags.",
                schemas::list_tags_input_schema(),
                ToolAnnotations::with_title("List Memo Tags")
                    .read_only(true)
                    .idempotent(true)
                    .open_world(true),
            ),
        ]
    }

    fn describe_resources(&self) -> Vec<Resource> {
        let mut visibilities = RawResource::new(VISIBILITIES_URI, "visibilities");
        visibilities.description = Some("Supported memo visibility values and the default".into());
        visibilities.mime_type = Some(APPLICATION_JSON.into());

        let mut settings = RawResource::new(SETTINGS_URI, "settings");
        settings.description = Some("Memos server address and whether a token is set".into());
        settings.mime_type = Some(APPLICATION_JSON.into());

        let mut health = RawResource::new(HEALTH_URI, "health");
        health.description = Some("Memos server reachability and workspace profile".into());
        health.mime_type = Some(APPLICATION_JSON.into());

        vec![
            visibilities.no_annotation(),
            settings.no_annotation(),
            health.no_annotation(),
        ]
    }

    fn describe_resource_templates(&self) -> Vec<ResourceTemplate> {
        let memo_template = RawResourceTemplate {
            uri_template: MEMO_TEMPLATE_URI.into(),
            name: "memo".into(),
            title: Some("Memo".into()),
            description: Some("Read a single memo: replace {id} and call readResource".into()),
            mime_type: Some(APPLICATION_JSON.into()),
        };

        vec![memo_template.no_annotation()]
    }

    async fn read_memo_resource(&self, uri: &str, id: &str) -> Result<ReadResourceResult, McpError> {
        let name = normalize_memo_name(id).ok_or_else(|| {
            McpError::invalid_params("Memo identifier missing in resource URI", None)
        })?;
        let memo = self.memos.get_memo(&name).await.map_err(|err| match err {
            MemosError::NotFound { .. } => McpError::resource_not_found(err.to_string(), None),
            other => McpError::internal_error(other.to_string(), None),
        })?;
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(uri, serialize_json(&memo, uri))],
        })
    }
}

fn describe_tool(
    name: &'static str,
    title: &str,
    description: &'static str,
    input_schema: JsonObject,
    annotations: ToolAnnotations,
) -> Tool {
    Tool {
        name: Cow::Borrowed(name),
        title: Some(title.to_string()),
        description: Some(Cow::Borrowed(description)),
        input_schema: Arc::new(input_schema),
        output_schema: None,
        annotations: Some(annotations),
        icons: None,
    }
}

fn resource_visibilities(
    _server: &MemosMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                VISIBILITIES_URI,
                visibilities_payload(),
            )],
        })
    })
}

fn resource_settings(
    server: &MemosMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let config = server.config.clone();
    Box::pin(async move {
        let payload = SettingsSnapshot {
            host: config.host.clone(),
            port: config.port,
            base_url: config.base_url(),
            token_configured: config.has_token(),
        };
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                SETTINGS_URI,
                serialize_json(&payload, SETTINGS_URI),
            )],
        })
    })
}

fn resource_health(
    server: &MemosMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let config = server.config.clone();
    let memos = server.memos.clone();
    Box::pin(async move {
        let profile = memos.workspace_profile().await;
        let payload = HealthSnapshot::from_profile(config.base_url(), profile);
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                HEALTH_URI,
                serialize_json(&payload, HEALTH_URI),
            )],
        })
    })
}

fn tool_search(server: &MemosMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let memos = server.memos.clone();
    Box::pin(async move { handle_search(memos.as_ref(), request.arguments).await })
}

fn tool_create(server: &MemosMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let memos = server.memos.clone();
    Box::pin(async move { handle_create(memos.as_ref(), request.arguments).await })
}

fn tool_get(server: &MemosMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let memos = server.memos.clone();
    Box::pin(async move { handle_get(memos.as_ref(), request.arguments).await })
}

fn tool_list_tags(server: &MemosMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let memos = server.memos.clone();
    Box::pin(async move { handle_list_tags(memos.as_ref(), request.arguments).await })
}

impl ServerHandler for MemosMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "memos-mcp".to_string();
        implementation.title = Some("Memos MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to read and write memos on a Memos instance. Search by key words, fetch a memo by name (memos/{id}), create memos with a visibility, and list existing tags.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = self.describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_resource_templates(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_
    {
        let templates = self.describe_resource_templates();
        std::future::ready(Ok(ListResourceTemplatesResult::with_all_items(templates)))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = request.uri.clone();
            if let Some(handler) = self.registry.resource(uri.as_str()) {
                return handler(self, request).await;
            }

            if let Some(id) = uri.strip_prefix(MEMO_PREFIX) {
                return self.read_memo_resource(&uri, id).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown resource URI: {uri}"),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            tracing::debug!(tool = %request.name, "Tool invoked");
            if let Some(handler) = self.registry.tool(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}

/// Serve the Memos tools over stdin/stdout until the host disconnects.
pub async fn serve_stdio(config: Config) -> anyhow::Result<()> {
    let server = MemosMcpServer::new(config).context("failed to initialize Memos client")?;
    tracing::info!(
        base_url = %server.config().base_url(),
        "Serving Memos MCP over stdio"
    );

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_tool() {
        let server = MemosMcpServer::new(Config::default()).expect("server");
        assert_eq!(
            server.registry.tool_names(),
            ["create_memo", "get_memo", "list_memo_tags", "search_memo"]
        );
        let described: Vec<_> = server
            .describe_tools()
            .into_iter()
            .map(|tool| tool.name.into_owned())
            .collect();
        assert_eq!(described.len(), 4);
        for name in server.registry.tool_names() {
            assert!(described.iter().any(|tool| tool == name));
        }
    }

    #[test]
    fn new_fails_fast_on_invalid_config() {
        assert!(MemosMcpServer::new(Config::new("localhost", 0, "")).is_err());
    }
}
