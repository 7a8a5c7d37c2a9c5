use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One output item: the JSON payload plus the index of the input item it was
/// produced from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeItem {
    pub json: Value,
    pub paired_item: PairedItem,
}

impl NodeItem {
    pub fn new(json: Value, index: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item: index },
        }
    }

    /// The `{error: message}` item emitted in place of a failed input when
    /// the host continues on failure.
    pub fn error(message: &str, index: usize) -> Self {
        Self::new(serde_json::json!({ "error": message }), index)
    }

    pub fn is_error(&self) -> bool {
        self.json
            .as_object()
            .map(|obj| obj.len() == 1 && obj.contains_key("error"))
            .unwrap_or(false)
    }
}

/// One input item. `parameters` holds the values the host evaluated for this
/// item and overrides node-level parameters of the same name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputItem {
    #[serde(default)]
    pub json: Value,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}
