pub mod api_client;
pub mod credentials;
pub mod logger;
pub mod node_executor;
pub mod orgchart_traversal;
pub mod session;
pub mod validation;
