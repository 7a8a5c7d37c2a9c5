#![allow(dead_code)]

use keephub::app::App;
use keephub::node::{ExecutionInput, NodeItem};
use keephub::services::credentials::AuthConfig;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use wiremock::MockServer;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const TOKEN: &str = "test-token";
pub const USER_ID: &str = "507f1f77bcf86cd799439011";
pub const SUBMISSION_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d9";
pub const FORM_ID: &str = "507f191e810c19729de860ea";

/// App talking to the mock server with a fixed bearer token.
pub fn bearer_app(server: &MockServer) -> App {
    App::with_auth(AuthConfig::bearer(server.uri(), TOKEN)).expect("app")
}

/// App that logs in against the mock server's `/authentication`.
pub fn login_app(server: &MockServer) -> App {
    App::with_auth(AuthConfig::login(server.uri(), "jane", "secret")).expect("app")
}

pub fn request(resource: &str, operation: &str, parameters: Value) -> ExecutionInput {
    serde_json::from_value(json!({
        "resource": resource,
        "operation": operation,
        "parameters": parameters,
    }))
    .expect("execution input")
}

/// Request with one input item per entry of `per_item`, each carrying its
/// own parameters.
pub fn batch(
    resource: &str,
    operation: &str,
    per_item: Vec<Value>,
    continue_on_fail: bool,
) -> ExecutionInput {
    let items: Vec<Value> = per_item
        .into_iter()
        .map(|parameters| json!({"json": {}, "parameters": parameters}))
        .collect();
    serde_json::from_value(json!({
        "resource": resource,
        "operation": operation,
        "items": items,
        "continueOnFail": continue_on_fail,
    }))
    .expect("execution input")
}

pub fn payloads(items: &[NodeItem]) -> Vec<Value> {
    items.iter().map(|item| item.json.clone()).collect()
}
