use crate::constants::limits::SUGGESTION_LIMIT;
use crate::errors::NodeError;
use crate::utils::suggest::suggest;

pub fn unknown_operation_error(resource: &str, operation: &str, known: &[&str]) -> NodeError {
    let suggestions = suggest(operation, known, SUGGESTION_LIMIT);
    let mut parts = Vec::new();
    if !suggestions.is_empty() {
        parts.push(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    if !known.is_empty() {
        parts.push(format!("Use one of: {}.", known.join(", ")));
    }

    let mut err = NodeError::unknown_operation(format!(
        "Unknown operation \"{}\" for resource \"{}\"",
        operation, resource
    ));
    if !parts.is_empty() {
        err = err.with_description(parts.join(" "));
    }
    err.with_details(serde_json::json!({
        "resource": resource,
        "operation": operation,
        "known_operations": known,
        "did_you_mean": suggestions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NodeErrorKind;

    #[test]
    fn message_names_operation_and_resource() {
        let err = unknown_operation_error("user", "getByIdd", &["getById", "findByGroup"]);
        assert_eq!(err.kind, NodeErrorKind::UnknownOperation);
        assert_eq!(err.message, "Unknown operation \"getByIdd\" for resource \"user\"");
        let description = err.description.unwrap();
        assert!(description.starts_with("Did you mean: getById?"));
    }
}
