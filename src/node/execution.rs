use crate::node::item::InputItem;
use crate::services::credentials::CredentialConfig;
use serde::Deserialize;
use serde_json::{Map, Value};

fn single_empty_item() -> Vec<InputItem> {
    vec![InputItem::default()]
}

/// One execution request from the host: which operation to run, with which
/// credentials, over which items.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInput {
    #[serde(default)]
    pub credentials: Option<CredentialConfig>,
    pub resource: String,
    pub operation: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Absent means a single empty item; an explicit empty list runs nothing.
    #[serde(default = "single_empty_item")]
    pub items: Vec<InputItem>,
    #[serde(default)]
    pub continue_on_fail: bool,
    /// Node-level credential selector (`bearerToken` or `apiCredentials`).
    #[serde(default)]
    pub authentication: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn items_default_to_one_empty_item() {
        let input: ExecutionInput = serde_json::from_value(json!({
            "resource": "user",
            "operation": "getById",
            "parameters": {"userId": "507f1f77bcf86cd799439011"}
        }))
        .unwrap();
        assert_eq!(input.items.len(), 1);
        assert!(!input.continue_on_fail);
        assert!(input.credentials.is_none());
    }

    #[test]
    fn reads_per_item_parameters_and_credentials() {
        let input: ExecutionInput = serde_json::from_value(json!({
            "credentials": {
                "type": "keephubBearerApi",
                "clientUrl": "acme.keephub.io",
                "bearerToken": "tok"
            },
            "resource": "user",
            "operation": "getById",
            "items": [{"json": {"a": 1}, "parameters": {"userId": "x"}}, {}],
            "continueOnFail": true
        }))
        .unwrap();
        assert_eq!(input.items.len(), 2);
        assert_eq!(input.items[0].parameters["userId"], "x");
        assert!(input.continue_on_fail);
        assert!(input.credentials.is_some());
    }
}
