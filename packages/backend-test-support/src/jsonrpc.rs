//! JSON-RPC request builders and result accessors for `/mcp` tests.

use serde_json::{json, Value};

pub fn rpc_request(id: impl Into<Value>, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id.into(), "method": method, "params": params})
}

pub fn notification(method: &str) -> Value {
    json!({"jsonrpc": "2.0", "method": method})
}

pub fn tool_call(id: impl Into<Value>, tool: &str, arguments: Value) -> Value {
    rpc_request(id, "tools/call", json!({"name": tool, "arguments": arguments}))
}

/// The structured payload of a successful tool result.
///
/// Panics if the response is an error or the tool reported `isError`.
pub fn tool_payload(response: &Value) -> &Value {
    let result = response
        .get("result")
        .unwrap_or_else(|| panic!("expected a result, got {response}"));
    assert_eq!(result["isError"], false, "tool reported an error: {result}");
    let content = result["content"]
        .as_array()
        .unwrap_or_else(|| panic!("result has no content array: {result}"));
    content
        .iter()
        .find(|item| item["type"] == "json")
        .map(|item| &item["json"])
        .unwrap_or_else(|| panic!("result has no json content: {result}"))
}

/// Assert a tool result with `isError: true` carrying `expected_code`.
pub fn assert_tool_error(response: &Value, expected_code: &str) {
    let result = response
        .get("result")
        .unwrap_or_else(|| panic!("expected a result, got {response}"));
    assert_eq!(result["isError"], true, "tool did not fail: {result}");

    let content = result["content"].as_array().cloned().unwrap_or_default();
    let text = content
        .iter()
        .find(|item| item["type"] == "text")
        .and_then(|item| item["text"].as_str())
        .unwrap_or_default();
    assert!(text.starts_with("Error: "), "unexpected error text: {text}");

    let code = content
        .iter()
        .find(|item| item["type"] == "json")
        .map(|item| item["json"]["code"].clone())
        .unwrap_or(Value::Null);
    assert_eq!(code, expected_code, "wrong error code in {result}");
}

/// Assert a JSON-RPC error envelope with the given numeric code.
pub fn assert_rpc_error(response: &Value, expected_code: i64) {
    assert!(response.get("result").is_none(), "unexpected result: {response}");
    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["error"]["code"], expected_code, "in {response}");
}
