//! MCP server handler for the dungeon tools.
//!
//! `rmcp` owns the protocol: framing, `initialize` negotiation, pings and
//! notifications. This handler only lists the derived tool definitions and
//! routes `tools/call` into [`dungeon_core::execute_tool`].

use dungeon_core::{
    execute_tool, DungeonTools, GameSession, ToolCall, ToolDefinition, ToolError, ToolOutput,
};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const SERVER_NAME: &str = "mcp-dungeon";
pub const SERVER_VERSION: &str = "0.0.0";

/// Serves one shared [`GameSession`] to every MCP client.
#[derive(Clone)]
pub struct DungeonMcp {
    session: Arc<GameSession>,
}

impl DungeonMcp {
    pub fn new(session: Arc<GameSession>) -> Self {
        Self { session }
    }

    /// Every dungeon tool as advertised over MCP.
    pub fn tools() -> Vec<Tool> {
        DungeonTools::all().into_iter().map(to_mcp_tool).collect()
    }

    /// Validate and run one tool call.
    ///
    /// An unknown tool is a protocol error; bad arguments come back as a tool
    /// result flagged as an error.
    pub fn call(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = arguments.map(Value::Object).unwrap_or(Value::Null);

        let output = match ToolCall::parse(name, arguments) {
            Ok(call) => execute_tool(&self.session, call),
            Err(e @ ToolError::UnknownTool(_)) => {
                tracing::warn!(tool = %name, "Unknown tool requested");
                return Err(ErrorData::invalid_params(e.to_string(), None));
            }
            Err(e) => {
                tracing::info!(tool = %name, error = %e, "Rejected tool arguments");
                ToolOutput::error(e.to_string())
            }
        };

        let content = vec![Content::text(output.text)];
        Ok(if output.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        })
    }
}

fn to_mcp_tool(definition: ToolDefinition) -> Tool {
    let schema = match definition.input_schema {
        Value::Object(schema) => schema,
        _ => Map::new(),
    };

    let mut tool = Tool::new(definition.name, definition.description, Arc::new(schema));
    tool.annotations = Some(ToolAnnotations {
        read_only_hint: Some(definition.read_only),
        ..Default::default()
    });
    tool
}

impl ServerHandler for DungeonMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(format!(
                "Dungeon crawler for {}. Inspect rooms, move between connected rooms, \
                 display the map and roll dice.",
                self.session.dungeon().name
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(Self::tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.call(&request.name, request.arguments)
    }
}
