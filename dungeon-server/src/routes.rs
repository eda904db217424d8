//! HTTP routes.

use crate::mcp::DungeonMcp;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use dungeon_core::GameSession;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router for a loaded session.
///
/// `/mcp` runs stateless: every request gets a handler over the same shared
/// session, so moves persist across requests without MCP session ids.
pub fn router(session: Arc<GameSession>) -> Router {
    let handler = DungeonMcp::new(Arc::clone(&session));
    let mcp = StreamableHttpService::new(
        move || Ok(handler.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    Router::new()
        .nest_service("/mcp", mcp)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(session)
}

async fn health(State(session): State<Arc<GameSession>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "dungeon_name": session.dungeon().name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use dungeon_core::testing::crystal_caverns;
    use dungeon_core::Player;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(GameSession::new(crystal_caverns(), Player::default())))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// First JSON-RPC message in an event-stream body.
    async fn rpc_message(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        body.lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .filter_map(|data| serde_json::from_str::<Value>(data.trim()).ok())
            .find(|message| message.get("jsonrpc").is_some())
            .unwrap_or_else(|| panic!("no JSON-RPC message in {body:?}"))
    }

    fn post_mcp(body: Value) -> Request<Body> {
        Request::post("/mcp")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json, text/event-stream")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn call_tool(id: u64, name: &str, arguments: Value) -> Request<Body> {
        post_mcp(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        }))
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["dungeon_name"], "Crystal Caverns");
    }

    #[tokio::test]
    async fn test_initialize_does_not_echo_unknown_version() {
        let response = app()
            .oneshot(post_mcp(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "1999-01-01",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "1.0"}
                }
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let message = rpc_message(response).await;
        assert_eq!(message["result"]["serverInfo"]["name"], "mcp-dungeon");
        assert_ne!(message["result"]["protocolVersion"], "1999-01-01");
        assert!(message["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notification_is_accepted() {
        let response = app()
            .oneshot(post_mcp(
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_tools_list_over_http() {
        let response = app()
            .oneshot(post_mcp(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})))
            .await
            .unwrap();

        let message = rpc_message(response).await;
        let tools = message["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 7);
        assert_eq!(tools[0]["name"], "say_hello");
    }

    #[tokio::test]
    async fn test_display_map_over_http() {
        let response = app()
            .oneshot(call_tool(3, "display_dungeon_map", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let message = rpc_message(response).await;
        let text = message["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("=== Crystal Caverns Map ==="));
        assert!(text.contains("Player: Bob at entrance_cave [1, 0]"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let response = app()
            .oneshot(
                Request::post("/mcp")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::ACCEPT, "application/json, text/event-stream")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error(), "{}", response.status());
    }

    #[tokio::test]
    async fn test_moves_persist_across_requests() {
        let app = app();
        let target = json!({"target_room": "north_passage"});

        let first = rpc_message(
            app.clone()
                .oneshot(call_tool(4, "move_to_room_by_name", target.clone()))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(
            first["result"]["content"][0]["text"],
            "Player Bob moved to north_passage at coordinates [1, 1]"
        );

        let second = rpc_message(
            app.oneshot(call_tool(5, "move_to_room_by_name", target))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(
            second["result"]["content"][0]["text"],
            "Player is already in room 'north_passage'"
        );
    }
}
