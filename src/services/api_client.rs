use crate::constants::api::MUTATING_METHODS;
use crate::errors::NodeError;
use crate::services::credentials::AuthConfig;
use crate::services::logger::Logger;
use crate::services::session::{ExecutionContext, TokenAcquirer};
use crate::utils::query::{encode_component, QueryParams};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// One request against the Keephub API, relative to the derived API base.
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    pub body: Option<Value>,
}

impl ApiCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json<T: Serialize>(self, body: &T) -> Result<Self, NodeError> {
        let value = serde_json::to_value(body)
            .map_err(|err| NodeError::internal(format!("Failed to encode request body: {}", err)))?;
        Ok(self.with_body(value))
    }

    fn target(&self, api_base: &str) -> String {
        if self.query.is_empty() {
            format!("{}{}", api_base, self.path)
        } else {
            format!("{}{}?{}", api_base, self.path, self.query.encode())
        }
    }
}

/// `/collection/<id>` with the id percent-encoded.
pub fn resource_path(collection: &str, id: &str) -> String {
    format!("/{}/{}", collection, encode_component(id))
}

#[derive(Clone)]
pub struct KeephubClient {
    logger: Logger,
    http: Client,
    auth: AuthConfig,
    tokens: TokenAcquirer,
}

impl KeephubClient {
    pub fn new(logger: Logger, auth: AuthConfig) -> Result<Self, NodeError> {
        let http = Client::builder()
            .user_agent(concat!("keephub/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| NodeError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            tokens: TokenAcquirer::new(logger.clone(), http.clone()),
            logger: logger.child("api"),
            http,
            auth,
        })
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    pub fn language(&self) -> &str {
        &self.auth.language
    }

    fn build_headers(&self, token: &str) -> Result<HeaderMap, NodeError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let authorization = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            NodeError::invalid_input("Access token contains characters not allowed in an HTTP header")
        })?;
        headers.insert(AUTHORIZATION, authorization);
        let language = HeaderValue::from_str(&self.auth.language).map_err(|_| {
            NodeError::invalid_input(format!("Invalid language header value: {:?}", self.auth.language))
        })?;
        headers.insert("lang", language);
        Ok(headers)
    }

    /// Single attempt. Empty bodies decode to `null`, non-JSON bodies to a
    /// JSON string.
    pub async fn request(&self, ctx: &mut ExecutionContext, call: ApiCall) -> Result<Value, NodeError> {
        let token = self.tokens.token(ctx, &self.auth).await?;
        let url = call.target(&self.auth.api_base);
        self.logger.debug(
            "request",
            Some(&serde_json::json!({ "method": call.method.as_str(), "path": call.path })),
        );

        let mut request = self
            .http
            .request(call.method.clone(), &url)
            .headers(self.build_headers(&token)?);
        if MUTATING_METHODS.contains(&call.method.as_str()) {
            if let Some(body) = &call.body {
                request = request.json(body);
            }
        }

        let response = request.send().await.map_err(|err| {
            self.logger.warn(
                "request failed",
                Some(&serde_json::json!({ "method": call.method.as_str(), "path": call.path, "error": err.to_string() })),
            );
            NodeError::api_request(None, err.to_string(), None)
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| NodeError::api_request(Some(status.as_u16()), err.to_string(), None))?;
        let parsed = parse_body(&text);

        if !status.is_success() {
            let message = parsed
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            self.logger.warn(
                "remote error",
                Some(&serde_json::json!({
                    "method": call.method.as_str(),
                    "path": call.path,
                    "status": status.as_u16(),
                    "message": message,
                })),
            );
            return Err(NodeError::api_request(Some(status.as_u16()), message, Some(parsed)));
        }

        Ok(parsed)
    }

    /// Decodes the response into `T`; a shape mismatch is reported as a
    /// failed request carrying the raw response.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        ctx: &mut ExecutionContext,
        call: ApiCall,
    ) -> Result<T, NodeError> {
        let label = format!("{} {}", call.method.as_str(), call.path);
        let value = self.request(ctx, call).await?;
        serde_json::from_value(value.clone()).map_err(|err| {
            NodeError::api_request(None, format!("Unexpected response from {}", label), Some(value))
                .with_description(err.to_string())
        })
    }

    pub async fn get(&self, ctx: &mut ExecutionContext, path: impl Into<String>) -> Result<Value, NodeError> {
        self.request(ctx, ApiCall::get(path)).await
    }

    pub async fn delete(
        &self,
        ctx: &mut ExecutionContext,
        path: impl Into<String>,
    ) -> Result<Value, NodeError> {
        self.request(ctx, ApiCall::delete(path)).await
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
