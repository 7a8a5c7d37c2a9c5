use serde_json::Value;

/// Items of a lookup that may answer with an array, a `{data: [...]}` page,
/// or a single object. Anything else becomes a one-element list.
pub fn items_or_single(response: Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        Value::Object(mut map) if map.get("data").map(Value::is_array).unwrap_or(false) => {
            match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        other => vec![other],
    }
}

/// Items of a paginated listing. A response without an array or a `data`
/// array yields no items.
pub fn page_items(response: Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Array-or-single without unwrapping `data`, as the plain user filters
/// return.
pub fn array_or_single(response: Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn items_or_single_handles_all_shapes() {
        assert_eq!(items_or_single(json!([1, 2])), vec![json!(1), json!(2)]);
        assert_eq!(
            items_or_single(json!({"total": 1, "data": [{"a": 1}]})),
            vec![json!({"a": 1})]
        );
        assert_eq!(items_or_single(json!({"a": 1})), vec![json!({"a": 1})]);
    }

    #[test]
    fn page_items_defaults_to_empty() {
        assert!(page_items(json!({"total": 0})).is_empty());
        assert!(page_items(json!({"data": "nope"})).is_empty());
        assert!(page_items(Value::Null).is_empty());
        assert_eq!(page_items(json!({"data": [1]})), vec![json!(1)]);
    }

    #[test]
    fn array_or_single_keeps_pages_whole() {
        let page = json!({"data": [1]});
        assert_eq!(array_or_single(page.clone()), vec![page]);
    }
}
