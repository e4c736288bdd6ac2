//! rmcp `ServerHandler` exposing every catalog operation as an MCP tool.

use content_ops_core::ContentOps;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, Implementation,
    InitializeRequestParams, InitializeResult, ListToolsResult, PaginatedRequestParams,
    ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

const SUPPORTED_PROTOCOL_VERSIONS: [ProtocolVersion; 3] = [
    ProtocolVersion::V_2024_11_05,
    ProtocolVersion::V_2025_03_26,
    ProtocolVersion::V_2025_06_18,
];

#[derive(Clone)]
pub struct ContentOpsServer {
    ops: ContentOps,
}

impl ContentOpsServer {
    #[must_use]
    pub fn new(ops: ContentOps) -> Self {
        Self { ops }
    }
}

impl ServerHandler for ContentOpsServer {
    async fn initialize(
        &self,
        request: InitializeRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, ErrorData> {
        if !SUPPORTED_PROTOCOL_VERSIONS.contains(&request.protocol_version) {
            warn!(
                client = %request.client_info.name,
                protocol_version = %request.protocol_version,
                "rejecting unsupported protocol version"
            );
            let supported: Vec<String> = SUPPORTED_PROTOCOL_VERSIONS
                .iter()
                .map(ToString::to_string)
                .collect();
            return Err(ErrorData::invalid_params(
                format!(
                    "unsupported protocol version '{}'",
                    request.protocol_version
                ),
                Some(json!({ "supported": supported })),
            ));
        }

        info!(
            client = %request.client_info.name,
            protocol_version = %request.protocol_version,
            "session initialized"
        );
        Ok(self.get_info())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.ops.list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(tool = %request.name, "tools/call");
        let arguments = request.arguments.map_or(Value::Null, Value::Object);
        let outcome = self.ops.call(&request.name, arguments).await;

        let is_error = outcome.is_error();
        let content = vec![Content::text(outcome.into_value().to_string())];
        Ok(if is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        })
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Content operations".to_string()),
                ..Default::default()
            },
            instructions: Some(format!(
                "Tenant, brand, source, prompt, worker and generation operations ({} catalog). \
                 Every tool returns the remote JSON body, or an envelope with status 'error'.",
                self.ops.catalog().profile()
            )),
        }
    }
}
