use crate::errors::NodeError;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::services::credentials::{AuthConfig, TokenSource};
use crate::services::logger::Logger;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CachedToken {
    pub token: String,
    pub acquired_at: DateTime<Utc>,
    /// `exp` claim reported by the login endpoint. Informational; a cached
    /// token is never refreshed within an execution.
    pub expires_hint: Option<DateTime<Utc>>,
}

/// State scoped to one execution of the node. Created at entry, dropped at
/// exit; a login token cached here never outlives the execution.
#[derive(Debug)]
pub struct ExecutionContext {
    execution_id: Uuid,
    started_at: DateTime<Utc>,
    token: Option<CachedToken>,
    auth_calls: u32,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            started_at: Utc::now(),
            token: None,
            auth_calls: 0,
        }
    }

    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn cached_token(&self) -> Option<&CachedToken> {
        self.token.as_ref()
    }

    /// Number of login calls issued so far in this execution.
    pub fn auth_calls(&self) -> u32 {
        self.auth_calls
    }

    fn store(&mut self, token: CachedToken) -> String {
        let value = token.token.clone();
        self.token = Some(token);
        value
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct TokenAcquirer {
    logger: Logger,
    http: Client,
}

impl TokenAcquirer {
    pub fn new(logger: Logger, http: Client) -> Self {
        Self {
            logger: logger.child("auth"),
            http,
        }
    }

    /// Bearer tokens are returned verbatim. Login credentials trigger at most
    /// one authentication call per execution context.
    pub async fn token(
        &self,
        ctx: &mut ExecutionContext,
        auth: &AuthConfig,
    ) -> Result<String, NodeError> {
        let (login_name, password) = match &auth.token_source {
            TokenSource::Bearer(token) => return Ok(token.clone()),
            TokenSource::Login {
                login_name,
                password,
            } => (login_name, password),
        };
        if let Some(cached) = ctx.cached_token() {
            return Ok(cached.token.clone());
        }

        ctx.auth_calls += 1;
        let url = format!("{}{}", auth.api_base, auth.auth_endpoint);
        self.logger.debug(
            "Requesting access token",
            Some(&serde_json::json!({
                "url": url,
                "loginName": login_name,
                "executionId": ctx.execution_id().to_string(),
            })),
        );

        let body = LoginRequest {
            login_name: login_name.clone(),
            password: password.clone(),
        };
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&body)
            .send()
            .await
            .map_err(|err| auth_failure(err.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            let remote = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            self.logger.warn(
                "Authentication rejected",
                Some(&serde_json::json!({ "status": status.as_u16(), "message": remote })),
            );
            let mut err = auth_failure(remote);
            err.status_code = Some(status.as_u16());
            return Err(err);
        }

        let body = serde_json::from_str::<serde_json::Value>(&text)
            .unwrap_or(serde_json::Value::Null);
        let parsed = LoginResponse::from_value(&body);
        let expires_hint = parsed
            .expires_at
            .and_then(|exp| Utc.timestamp_opt(exp, 0).single());
        let token = parsed.into_token().ok_or_else(|| {
            NodeError::authentication_failed(
                "No access token returned from authentication endpoint",
            )
        })?;

        Ok(ctx.store(CachedToken {
            token,
            acquired_at: Utc::now(),
            expires_hint,
        }))
    }
}

fn auth_failure(description: String) -> NodeError {
    NodeError::authentication_failed("Failed to authenticate with Keephub")
        .with_description(description)
}
