use crate::errors::NodeError;
use crate::node::{ExecutionInput, NodeItem, Operation};
use crate::services::api_client::KeephubClient;
use crate::services::credentials::{AuthConfig, AuthMode, CredentialConfig};
use crate::services::logger::Logger;
use crate::services::node_executor::NodeExecutor;
use crate::services::validation::Validation;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub client: Arc<KeephubClient>,
    pub executor: Arc<NodeExecutor>,
}

impl App {
    /// Wires the client and executor for an already resolved auth record.
    pub fn with_auth(auth: AuthConfig) -> Result<Self, NodeError> {
        let logger = Logger::new("keephub");
        let validation = Validation::new();
        let client = Arc::new(KeephubClient::new(logger.clone(), auth)?);
        let executor = Arc::new(NodeExecutor::new(
            logger.clone(),
            validation,
            client.clone(),
        ));
        Ok(Self {
            logger,
            client,
            executor,
        })
    }

    pub fn initialize(
        credentials: &CredentialConfig,
        authentication: Option<&str>,
    ) -> Result<Self, NodeError> {
        let mode = match authentication.map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => Some(AuthMode::parse(raw).ok_or_else(|| {
                NodeError::invalid_input(format!(
                    "Unknown authentication \"{}\". Use bearerToken or apiCredentials",
                    raw
                ))
            })?),
        };
        let auth = credentials.resolve(mode)?;
        let app = Self::with_auth(auth)?;
        app.logger.debug(
            "credentials resolved",
            Some(&serde_json::json!({
                "apiBase": app.client.auth().api_base,
                "login": app.client.auth().is_login(),
                "language": app.client.language(),
            })),
        );
        Ok(app)
    }

    /// Runs a parsed request. Unknown operations fail before any credential
    /// is resolved or request is sent.
    pub async fn run(&self, input: &ExecutionInput) -> Result<Vec<NodeItem>, NodeError> {
        let operation = Operation::parse(&input.resource, &input.operation)?;
        self.executor
            .execute(
                operation,
                &input.parameters,
                &input.items,
                input.continue_on_fail,
            )
            .await
    }
}

/// Host entry point: validates the operation, resolves credentials (from the
/// request, else from the environment) and runs the items.
pub async fn execute(input: &ExecutionInput) -> Result<Vec<NodeItem>, NodeError> {
    Operation::parse(&input.resource, &input.operation)?;
    let credentials = match &input.credentials {
        Some(credentials) => credentials.clone(),
        None => CredentialConfig::from_env()?,
    };
    let app = App::initialize(&credentials, input.authentication.as_deref())?;
    app.run(input).await
}
