use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeErrorKind {
    InvalidInput,
    InvalidHost,
    AuthenticationFailed,
    ApiRequest,
    UnknownOperation,
    Internal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeError {
    pub kind: NodeErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl NodeError {
    pub fn new(kind: NodeErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            description: None,
            item_index: None,
            status_code: None,
            raw_response: None,
            details: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Tags the error with the input item it was raised for, unless a
    /// handler already did.
    pub fn with_item_index(mut self, index: usize) -> Self {
        if self.item_index.is_none() {
            self.item_index = Some(index);
        }
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(NodeErrorKind::InvalidInput, "INVALID_INPUT", message)
    }

    pub fn invalid_host(input: &str) -> Self {
        Self::new(
            NodeErrorKind::InvalidHost,
            "INVALID_HOST",
            format!("Invalid client URL: {}", input),
        )
        .with_details(serde_json::json!({ "input": input }))
    }

    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::new(
            NodeErrorKind::AuthenticationFailed,
            "AUTHENTICATION_FAILED",
            message,
        )
    }

    pub fn api_request(
        status_code: Option<u16>,
        message: impl Into<String>,
        raw_response: Option<Value>,
    ) -> Self {
        let mut err = Self::new(NodeErrorKind::ApiRequest, "API_REQUEST_FAILED", message);
        err.status_code = status_code;
        err.raw_response = raw_response;
        err
    }

    pub fn unknown_operation(message: impl Into<String>) -> Self {
        Self::new(NodeErrorKind::UnknownOperation, "UNKNOWN_OPERATION", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(NodeErrorKind::Internal, "INTERNAL", message)
    }

    /// Errors that end the whole execution even when the host asked to
    /// continue on per-item failures.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            NodeErrorKind::AuthenticationFailed | NodeErrorKind::UnknownOperation
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == NodeErrorKind::ApiRequest && self.status_code == Some(404)
    }

    /// Replaces the message of a remote failure with a handler-level summary,
    /// keeping the remote message as the description. Local validation errors
    /// pass through untouched.
    pub fn in_context(self, summary: &str) -> Self {
        if self.kind != NodeErrorKind::ApiRequest {
            return self;
        }
        let original = self.message.clone();
        let mut err = self;
        err.message = summary.to_string();
        err.description = Some(original);
        err
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for NodeError {}

impl From<std::io::Error> for NodeError {
    fn from(err: std::io::Error) -> Self {
        NodeError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for NodeError {
    fn from(err: serde_json::Error) -> Self {
        NodeError::invalid_input(format!("Invalid JSON: {}", err))
    }
}
