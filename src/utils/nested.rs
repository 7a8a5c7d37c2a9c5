use crate::constants::api::LEGACY_ASSIGNMENT_PREFIX;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One `{name, value}` pair from an update-by-id assignment list.
#[derive(Debug, Clone, Deserialize)]
pub struct Assignment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

/// Older workflows address fields as `[0].json.title.en`; only the part after
/// the prefix names the document field.
pub fn normalize_assignment_path(name: &str) -> &str {
    name.strip_prefix(LEGACY_ASSIGNMENT_PREFIX).unwrap_or(name)
}

/// Assigns `value` at a dotted `path`, creating intermediate objects. Any
/// intermediate that is missing or not an object is replaced by `{}`.
pub fn set_nested_value(target: &mut Map<String, Value>, path: &str, value: Value) {
    let keys: Vec<&str> = path.split('.').collect();
    let (last, parents) = match keys.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = target;
    for key in parents {
        let slot = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        current = map;
    }
    current.insert(last.to_string(), value);
}

/// Applies every assignment to `document` in order. Blank names are skipped.
/// Returns how many assignments were applied.
pub fn apply_assignments(document: &mut Map<String, Value>, assignments: &[Assignment]) -> usize {
    let mut applied = 0;
    for assignment in assignments {
        let path = normalize_assignment_path(&assignment.name);
        if path.trim().is_empty() {
            continue;
        }
        set_nested_value(document, path, assignment.value.clone());
        applied += 1;
    }
    applied
}
