use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_name: String,
    pub password: String,
}

/// The parts of a login answer the node uses. Read field by field so an
/// oddly typed informational field never hides the token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginResponse {
    pub access_token: Option<String>,
    pub token: Option<String>,
    /// `authentication.payload.exp`, seconds since the epoch.
    pub expires_at: Option<i64>,
}

impl LoginResponse {
    pub fn from_value(body: &Value) -> Self {
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
        let expires_at = body
            .pointer("/authentication/payload/exp")
            .and_then(epoch_seconds);
        Self {
            access_token: text("accessToken"),
            token: text("token"),
            expires_at,
        }
    }

    /// `accessToken` wins over `token`; empty strings count as missing.
    pub fn into_token(self) -> Option<String> {
        self.access_token
            .filter(|t| !t.is_empty())
            .or(self.token.filter(|t| !t.is_empty()))
    }
}

fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.floor() as i64),
        _ => None,
    }
}
