pub mod jsonrpc;
pub mod tools;

pub use jsonrpc::{JsonRpcRequest, JsonRpcResponse, McpMethod, RpcErrorCode};
pub use tools::{tool_definitions, ToolCall, ToolCallError, ToolCallParams, ToolResult};
