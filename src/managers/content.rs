use crate::errors::NodeError;
use crate::managers::{read_assignments, update_document};
use crate::models::workflow::WorkflowAction;
use crate::node::operation::ContentOperation;
use crate::node::NodeParameters;
use crate::services::api_client::{resource_path, ApiCall, KeephubClient};
use crate::services::logger::Logger;
use crate::services::session::ExecutionContext;
use crate::services::validation::Validation;
use crate::utils::listing::page_items;
use crate::utils::query::QueryParams;
use serde_json::Value;
use std::sync::Arc;

/// A `/contentsview` search: which parameter holds the filter value, and the
/// field it is matched against.
struct ContentFilter {
    parameter: &'static str,
    label: &'static str,
    field: &'static str,
    subject: &'static str,
}

const BY_CONTENT_POOL: ContentFilter = ContentFilter {
    parameter: "filterContentPoolId",
    label: "Content Pool ID",
    field: "contentPool",
    subject: "content pool",
};

const BY_GROUP: ContentFilter = ContentFilter {
    parameter: "groupId",
    label: "Group ID",
    field: "groups.selection",
    subject: "group",
};

const BY_ORGUNIT: ContentFilter = ContentFilter {
    parameter: "orgunitId",
    label: "Orgunit ID",
    field: "orgchartSelection.include",
    subject: "orgunit",
};

#[derive(Clone)]
pub struct ContentManager {
    logger: Logger,
    validation: Validation,
    client: Arc<KeephubClient>,
}

impl ContentManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<KeephubClient>) -> Self {
        Self {
            logger: logger.child("content"),
            validation,
            client,
        }
    }

    pub async fn handle_action(
        &self,
        operation: ContentOperation,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        match operation {
            ContentOperation::Create => self.create(ctx, params).await,
            ContentOperation::GetById => self.get_by_id(ctx, params).await,
            ContentOperation::FindByContentPool => self.search(ctx, params, &BY_CONTENT_POOL).await,
            ContentOperation::FindByGroup => self.search(ctx, params, &BY_GROUP).await,
            ContentOperation::FindByOrgunit => self.search(ctx, params, &BY_ORGUNIT).await,
            ContentOperation::UpdateById => self.update_by_id(ctx, params).await,
            ContentOperation::Delete => self.delete(ctx, params).await,
            ContentOperation::ApproveContent => self.approve(ctx, params).await,
        }
    }

    fn content_id(&self, params: &NodeParameters<'_>) -> Result<String, NodeError> {
        self.validation
            .ensure_string(params.get("contentId"), "Content ID")
    }

    async fn create(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let body = self
            .validation
            .parse_json_parameter(params.get("contentBody"), "Content Body")?;
        let is_empty = match &body {
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Null => true,
            _ => false,
        };
        if is_empty {
            return Err(NodeError::invalid_input("Content body cannot be empty"));
        }
        let created = self
            .client
            .request(ctx, ApiCall::post("/contents").with_body(body))
            .await?;
        Ok(vec![created])
    }

    async fn get_by_id(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let content_id = self.content_id(&params)?;
        match self.client.get(ctx, resource_path("contents", &content_id)).await {
            Ok(content) => Ok(vec![content]),
            Err(err) if err.is_not_found() => {
                let remote = err.message.clone();
                let mut not_found = err;
                not_found.message = format!("Content not found with ID: {}", content_id);
                not_found.description = Some(remote);
                Err(not_found)
            }
            Err(err) => Err(err),
        }
    }

    async fn search(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
        filter: &ContentFilter,
    ) -> Result<Vec<Value>, NodeError> {
        let value = self
            .validation
            .ensure_string(params.get(filter.parameter), filter.label)?;
        let options = params.default_list_options();
        let query = options.apply_sort(options.apply(QueryParams::new()).and_eq(0, filter.field, &value));
        let response = self
            .client
            .request(ctx, ApiCall::get("/contentsview").with_query(query))
            .await
            .map_err(|err| err.in_context(&format!("Error searching content by {}", filter.subject)))?;
        let items = page_items(response);
        self.logger.debug(
            "content search",
            Some(&serde_json::json!({ "filter": filter.field, "count": items.len() })),
        );
        Ok(items)
    }

    async fn update_by_id(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let content_id = self.content_id(&params)?;
        let assignments = read_assignments(&params)?;
        let updated = update_document(&self.client, ctx, "contents", &content_id, &assignments).await?;
        Ok(vec![updated])
    }

    async fn delete(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let content_id = self.content_id(&params)?;
        let deleted = self
            .client
            .delete(ctx, resource_path("contents", &content_id))
            .await?;
        Ok(vec![deleted])
    }

    async fn approve(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let content_id = self.content_id(&params)?;
        let content_type = self
            .validation
            .ensure_string(params.get("approvalContentType"), "Content type")?;
        let call = ApiCall::post("/workflow")
            .with_json(&WorkflowAction::approve_content(&content_id, &content_type))?;
        Ok(vec![self.client.request(ctx, call).await?])
    }
}
