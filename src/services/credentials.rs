use crate::constants::auth::DEFAULT_AUTH_ENDPOINT;
use crate::errors::NodeError;
use crate::services::validation::Validation;
use crate::utils::api_url::derive_api_host;
use crate::utils::text::non_blank;
use serde::Deserialize;

/// Credential records as the host stores them, tagged by credential type.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum CredentialConfig {
    /// Combined credential: one record, token or login chosen by `authType`.
    #[serde(rename = "keephubApi", rename_all = "camelCase")]
    Combined {
        client_url: String,
        #[serde(default)]
        auth_type: Option<AuthMode>,
        #[serde(default)]
        bearer_token: Option<String>,
        #[serde(default)]
        login_name: Option<String>,
        #[serde(default)]
        password: Option<String>,
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        token_endpoint: Option<String>,
    },
    #[serde(rename = "keephubBearerApi", rename_all = "camelCase")]
    Bearer {
        client_url: String,
        bearer_token: String,
        #[serde(default)]
        language: Option<String>,
    },
    #[serde(rename = "keephubLoginApi", rename_all = "camelCase")]
    Login {
        client_url: String,
        login_name: String,
        password: String,
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        auth_endpoint: Option<String>,
        #[serde(default)]
        token_endpoint: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthMode {
    BearerToken,
    ApiCredentials,
}

impl AuthMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "bearerToken" => Some(AuthMode::BearerToken),
            "apiCredentials" | "loginCredentials" => Some(AuthMode::ApiCredentials),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum TokenSource {
    Bearer(String),
    Login { login_name: String, password: String },
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Bearer(_) => f.write_str("Bearer(***)"),
            TokenSource::Login { login_name, .. } => f
                .debug_struct("Login")
                .field("login_name", login_name)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Normalized credentials: everything downstream needs, nothing it does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub api_base: String,
    pub token_source: TokenSource,
    pub language: String,
    pub auth_endpoint: String,
}

impl AuthConfig {
    pub fn bearer(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            token_source: TokenSource::Bearer(token.into()),
            language: crate::constants::auth::DEFAULT_LANGUAGE.to_string(),
            auth_endpoint: DEFAULT_AUTH_ENDPOINT.to_string(),
        }
    }

    pub fn login(
        api_base: impl Into<String>,
        login_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            token_source: TokenSource::Login {
                login_name: login_name.into(),
                password: password.into(),
            },
            language: crate::constants::auth::DEFAULT_LANGUAGE.to_string(),
            auth_endpoint: DEFAULT_AUTH_ENDPOINT.to_string(),
        }
    }

    pub fn is_login(&self) -> bool {
        matches!(self.token_source, TokenSource::Login { .. })
    }
}

fn require(value: Option<&str>, label: &str) -> Result<String, NodeError> {
    non_blank(value.unwrap_or(""))
        .map(str::to_string)
        .ok_or_else(|| NodeError::invalid_input(format!("{} cannot be empty", label)))
}

fn endpoint_or_default(candidates: &[Option<&String>]) -> String {
    candidates
        .iter()
        .flatten()
        .find_map(|value| non_blank(value))
        .unwrap_or(DEFAULT_AUTH_ENDPOINT)
        .to_string()
}

impl CredentialConfig {
    /// Credentials from `KEEPHUB_*` variables: bearer mode when a token is set,
    /// login mode otherwise.
    pub fn from_env() -> Result<Self, NodeError> {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let client_url = read("KEEPHUB_CLIENT_URL").ok_or_else(|| {
            NodeError::invalid_input("No credentials supplied and KEEPHUB_CLIENT_URL is not set")
        })?;
        let language = read("KEEPHUB_LANGUAGE");
        if let Some(bearer_token) = read("KEEPHUB_BEARER_TOKEN") {
            return Ok(CredentialConfig::Bearer {
                client_url,
                bearer_token,
                language,
            });
        }
        let login_name = read("KEEPHUB_LOGIN_NAME").ok_or_else(|| {
            NodeError::invalid_input(
                "Set KEEPHUB_BEARER_TOKEN or KEEPHUB_LOGIN_NAME and KEEPHUB_PASSWORD",
            )
        })?;
        Ok(CredentialConfig::Login {
            client_url,
            login_name,
            password: read("KEEPHUB_PASSWORD").unwrap_or_default(),
            language,
            auth_endpoint: read("KEEPHUB_AUTH_ENDPOINT"),
            token_endpoint: None,
        })
    }

    /// Resolves the credential into an `AuthConfig`. `mode_override` is the
    /// node-level `authentication` selector and only affects the combined
    /// credential.
    pub fn resolve(&self, mode_override: Option<AuthMode>) -> Result<AuthConfig, NodeError> {
        let validation = Validation::new();
        match self {
            CredentialConfig::Combined {
                client_url,
                auth_type,
                bearer_token,
                login_name,
                password,
                language,
                token_endpoint,
            } => {
                let api_base = derive_api_host(client_url)?;
                let language = validation.ensure_language(language.as_deref())?;
                let mode = mode_override
                    .or(*auth_type)
                    .unwrap_or(AuthMode::BearerToken);
                let token_source = match mode {
                    AuthMode::BearerToken => {
                        TokenSource::Bearer(require(bearer_token.as_deref(), "Bearer Token")?)
                    }
                    AuthMode::ApiCredentials => TokenSource::Login {
                        login_name: require(login_name.as_deref(), "Login Name")?,
                        password: password.clone().unwrap_or_default(),
                    },
                };
                Ok(AuthConfig {
                    api_base,
                    token_source,
                    language,
                    auth_endpoint: endpoint_or_default(&[token_endpoint.as_ref()]),
                })
            }
            CredentialConfig::Bearer {
                client_url,
                bearer_token,
                language,
            } => Ok(AuthConfig {
                api_base: derive_api_host(client_url)?,
                token_source: TokenSource::Bearer(require(Some(bearer_token), "Bearer Token")?),
                language: validation.ensure_language(language.as_deref())?,
                auth_endpoint: DEFAULT_AUTH_ENDPOINT.to_string(),
            }),
            CredentialConfig::Login {
                client_url,
                login_name,
                password,
                language,
                auth_endpoint,
                token_endpoint,
            } => Ok(AuthConfig {
                api_base: derive_api_host(client_url)?,
                token_source: TokenSource::Login {
                    login_name: require(Some(login_name), "Login Name")?,
                    password: password.clone(),
                },
                language: validation.ensure_language(language.as_deref())?,
                auth_endpoint: endpoint_or_default(&[
                    auth_endpoint.as_ref(),
                    token_endpoint.as_ref(),
                ]),
            }),
        }
    }
}
