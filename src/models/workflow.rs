use serde::Serialize;

/// Body for the generic `/workflow` action endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAction {
    pub action: &'static str,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl WorkflowAction {
    pub fn approve_content(content_id: &str, content_type: &str) -> Self {
        Self {
            action: "approveContent",
            reference: content_id.to_string(),
            content_type: Some(content_type.to_string()),
            value: None,
        }
    }

    pub fn approve_task(task_id: &str, comment: &str) -> Self {
        Self {
            action: "approveTaskAnswer",
            reference: task_id.to_string(),
            content_type: None,
            value: Some(comment.to_string()),
        }
    }

    pub fn reject_task(task_id: &str, reason: &str) -> Self {
        Self {
            action: "rejectTaskAnswer",
            reference: task_id.to_string(),
            content_type: None,
            value: Some(reason.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUrlRequest {
    pub sign_type: &'static str,
    pub origin: String,
    pub origin_id: String,
    pub storage_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<bool>,
}
