use crate::errors::NodeError;
use crate::node::operation::UserOperation;
use crate::node::NodeParameters;
use crate::services::api_client::{resource_path, ApiCall, KeephubClient};
use crate::services::logger::Logger;
use crate::services::session::ExecutionContext;
use crate::services::validation::Validation;
use crate::utils::listing::{array_or_single, items_or_single};
use crate::utils::query::QueryParams;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserManager {
    logger: Logger,
    validation: Validation,
    client: Arc<KeephubClient>,
}

impl UserManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<KeephubClient>) -> Self {
        Self {
            logger: logger.child("user"),
            validation,
            client,
        }
    }

    pub async fn handle_action(
        &self,
        operation: UserOperation,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        match operation {
            UserOperation::GetById => self.get_by_id(ctx, params).await,
            UserOperation::FindByLoginName => self.find_by_login_name(ctx, params).await,
            UserOperation::FindByGroup => {
                self.find_by_filter(ctx, params, "groupId", "Group ID", "groups")
                    .await
            }
            UserOperation::FindByOrgunit => {
                self.find_by_filter(ctx, params, "orgunitId", "Orgunit ID", "orgunits")
                    .await
            }
        }
    }

    async fn get_by_id(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let user_id = self
            .validation
            .ensure_object_id(params.get("userId"), "User ID")?;
        let user = self.client.get(ctx, resource_path("users", &user_id)).await?;
        Ok(vec![user])
    }

    async fn find_by_login_name(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let login_name = self
            .validation
            .ensure_string(params.get("loginName"), "Login Name")?;
        let call = ApiCall::get("/users").with_query(QueryParams::new().param("loginName", &login_name));
        let response = self.client.request(ctx, call).await?;
        let users = items_or_single(response);
        self.logger.debug(
            "users found by login name",
            Some(&serde_json::json!({ "count": users.len() })),
        );
        Ok(users)
    }

    async fn find_by_filter(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
        parameter: &str,
        label: &str,
        filter: &str,
    ) -> Result<Vec<Value>, NodeError> {
        let value = self.validation.ensure_string(params.get(parameter), label)?;
        let call = ApiCall::get("/users").with_query(QueryParams::new().param(filter, &value));
        let response = self.client.request(ctx, call).await?;
        Ok(array_or_single(response))
    }
}
