//! `POST /mcp`: JSON-RPC dispatch onto the game coordinator.

use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::protocol::jsonrpc::InitializeResult;
use crate::protocol::{
    tool_definitions, JsonRpcRequest, JsonRpcResponse, McpMethod, RpcErrorCode, ToolCall,
    ToolCallParams, ToolResult,
};
use crate::state::app_state::AppState;

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Failed to encode response: {e}")))
}

fn reply(response: JsonRpcResponse) -> HttpResponse {
    HttpResponse::Ok().json(response)
}

pub async fn mcp(
    app_state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Unparseable JSON-RPC body");
            return Ok(reply(JsonRpcResponse::error(
                Value::Null,
                RpcErrorCode::ParseError,
                format!("Parse error: {e}"),
            )));
        }
    };
    let id_hint = raw.get("id").cloned().unwrap_or(Value::Null);
    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(e) => {
            return Ok(reply(JsonRpcResponse::error(
                id_hint,
                RpcErrorCode::InvalidRequest,
                format!("Invalid request: {e}"),
            )));
        }
    };

    if request.is_notification() {
        debug!(method = %request.method, "Notification acknowledged");
        return Ok(HttpResponse::NoContent().finish());
    }

    let id = request.response_id();
    let response = match McpMethod::from_name(&request.method) {
        McpMethod::Initialize => JsonRpcResponse::result(id, to_json(&InitializeResult::current())?),
        McpMethod::ToolsList => JsonRpcResponse::result(
            id,
            json!({"tools": to_json(&tool_definitions())?, "nextCursor": null}),
        ),
        McpMethod::ToolsCall => call_tool(&app_state, id, request.params_or_empty())?,
        McpMethod::AdvanceRound if app_state.config.admin_enabled => {
            advance_round(&app_state, id)?
        }
        McpMethod::AdvanceRound | McpMethod::Unknown(_) => JsonRpcResponse::error(
            id,
            RpcErrorCode::MethodNotFound,
            format!("Method not found: {}", request.method),
        ),
    };

    Ok(reply(response))
}

fn call_tool(state: &AppState, id: Value, params: Value) -> Result<JsonRpcResponse, AppError> {
    let params: ToolCallParams = match serde_json::from_value(params) {
        Ok(params) => params,
        Err(e) => {
            return Ok(JsonRpcResponse::error(
                id,
                RpcErrorCode::InvalidParams,
                format!("Invalid tools/call params: {e}"),
            ))
        }
    };
    let call = match ToolCall::parse(&params.name, params.arguments) {
        Ok(call) => call,
        Err(e) => return Ok(JsonRpcResponse::error(id, RpcErrorCode::InvalidParams, e.to_string())),
    };

    let result = match call.execute(&state.coordinator) {
        Ok(status) => ToolResult::success(&status)
            .map_err(|e| AppError::internal(format!("Failed to encode status: {e}")))?,
        Err(err) => {
            let err = AppError::from(err);
            info!(tool = call.name(), code = %err.code(), "Tool call rejected");
            ToolResult::failure(&err)
        }
    };

    Ok(JsonRpcResponse::result(id, to_json(&result)?))
}

fn advance_round(state: &AppState, id: Value) -> Result<JsonRpcResponse, AppError> {
    match state.coordinator.advance_round() {
        Ok(scoreboard) => Ok(JsonRpcResponse::result(id, to_json(&scoreboard)?)),
        Err(err) => {
            let err = AppError::from(err);
            warn!(code = %err.code(), "Forced rollover failed");
            Ok(
                JsonRpcResponse::error(id, RpcErrorCode::ServerError, err.detail())
                    .with_error_data(json!({"code": err.code()})),
            )
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/mcp", web::post().to(mcp));
}
