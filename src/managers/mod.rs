//! One manager per Keephub resource. Each exposes `handle_action`, which
//! runs one operation for one input item and returns the JSON payloads of
//! the output items it produced.

pub mod content;
pub mod form_submission;
pub mod orgchart;
pub mod storage;
pub mod task;
pub mod user;

use crate::errors::NodeError;
use crate::node::NodeParameters;
use crate::services::api_client::{resource_path, ApiCall, KeephubClient};
use crate::services::session::ExecutionContext;
use crate::utils::nested::{apply_assignments, Assignment};
use serde_json::{Map, Value};

/// `updateFields.assignments` as typed assignments.
pub(crate) fn read_assignments(params: &NodeParameters<'_>) -> Result<Vec<Assignment>, NodeError> {
    let update_fields = params.collection("updateFields");
    let assignments = match update_fields.get("assignments") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => serde_json::from_value::<Vec<Assignment>>(raw.clone()).map_err(|err| {
            NodeError::invalid_input("Invalid update fields").with_description(err.to_string())
        })?,
    };
    if assignments.is_empty() {
        return Err(NodeError::invalid_input("No fields to update"));
    }
    Ok(assignments)
}

/// Fetches the current document, applies the assignments on top of it and
/// sends the whole document back with PATCH.
pub(crate) async fn update_document(
    client: &KeephubClient,
    ctx: &mut ExecutionContext,
    collection: &str,
    id: &str,
    assignments: &[Assignment],
) -> Result<Value, NodeError> {
    let path = resource_path(collection, id);
    let current = client.get(ctx, path.clone()).await?;
    let mut document = match current {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    apply_assignments(&mut document, assignments);
    client
        .request(ctx, ApiCall::patch(path).with_body(Value::Object(document)))
        .await
}
