use crate::constants::storage::{ORIGINS, SIGN_TYPE};
use crate::errors::NodeError;
use crate::models::workflow::SignUrlRequest;
use crate::node::operation::StorageOperation;
use crate::node::NodeParameters;
use crate::services::api_client::{ApiCall, KeephubClient};
use crate::services::validation::Validation;
use crate::services::session::ExecutionContext;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct StorageManager {
    validation: Validation,
    client: Arc<KeephubClient>,
}

impl StorageManager {
    pub fn new(validation: Validation, client: Arc<KeephubClient>) -> Self {
        Self { validation, client }
    }

    pub async fn handle_action(
        &self,
        operation: StorageOperation,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        match operation {
            StorageOperation::GetSignedUrl => self.signed_url(ctx, params).await,
        }
    }

    async fn signed_url(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let origin = self.validation.ensure_string(params.get("origin"), "Origin")?;
        let origin = self.validation.ensure_one_of(&origin, "origin", ORIGINS)?;
        let origin_id = self
            .validation
            .ensure_string(params.get("originId"), "Origin ID")?;
        let storage_id = self
            .validation
            .ensure_string(params.get("storageId"), "Storage ID")?;
        let request = SignUrlRequest {
            sign_type: SIGN_TYPE,
            origin,
            origin_id,
            storage_id,
            attachment: params.bool_or("attachment", false).then_some(true),
        };
        let call = ApiCall::post("/signurl").with_json(&request)?;
        Ok(vec![self.client.request(ctx, call).await?])
    }
}
