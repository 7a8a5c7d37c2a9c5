use crate::constants::pagination::{DEFAULT_LIMIT, DEFAULT_SKIP, DEFAULT_SORT_ORDER};
use crate::utils::query::ListOptions;
use serde_json::{Map, Value};

/// Parameter lookup for one input item: the item's own values first, then
/// the node-level values.
#[derive(Debug, Clone, Copy)]
pub struct NodeParameters<'a> {
    node: &'a Map<String, Value>,
    item: &'a Map<String, Value>,
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl<'a> NodeParameters<'a> {
    pub fn new(node: &'a Map<String, Value>, item: &'a Map<String, Value>) -> Self {
        Self { node, item }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.item
            .get(name)
            .or_else(|| self.node.get(name))
            .filter(|v| !v.is_null())
    }

    /// Non-negative integer; missing, malformed or negative values fall back
    /// to `default`.
    pub fn u64_or(&self, name: &str, default: u64) -> u64 {
        self.get(name)
            .and_then(as_number)
            .filter(|n| *n >= 0.0)
            .map(|n| n as u64)
            .unwrap_or(default)
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// A nested collection such as `options` or `updateFields`; an absent or
    /// non-object value reads as empty.
    pub fn collection(&self, name: &str) -> Map<String, Value> {
        self.get(name)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// `options{limit, skip, sortBy, sortOrder}`. Zero or missing limit and
    /// sort order fall back to their defaults.
    pub fn list_options(&self, default_sort_by: Option<&str>, default_sort_order: i64) -> ListOptions {
        let options = self.collection("options");
        let number = |key: &str| options.get(key).and_then(as_number);
        let limit = number("limit")
            .filter(|n| *n > 0.0)
            .map(|n| n as u64)
            .unwrap_or(DEFAULT_LIMIT);
        let skip = number("skip")
            .filter(|n| *n > 0.0)
            .map(|n| n as u64)
            .unwrap_or(DEFAULT_SKIP);
        let sort_order = number("sortOrder")
            .filter(|n| *n != 0.0)
            .map(|n| n as i64)
            .unwrap_or(default_sort_order);
        let sort_by = options
            .get("sortBy")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or(default_sort_by)
            .map(str::to_string);
        ListOptions {
            limit,
            skip,
            sort_by,
            sort_order,
        }
    }

    pub fn default_list_options(&self) -> ListOptions {
        self.list_options(None, DEFAULT_SORT_ORDER)
    }
}
