use crate::errors::NodeError;
use crate::models::orgchart::OrgchartNode;
use crate::node::operation::OrgchartOperation;
use crate::node::NodeParameters;
use crate::services::api_client::{resource_path, ApiCall, KeephubClient};
use crate::services::logger::Logger;
use crate::services::orgchart_traversal::{ancestors, descendants, RemoteOrgchart, ROOT_NODE_MESSAGE};
use crate::services::session::ExecutionContext;
use crate::services::validation::Validation;
use crate::utils::query::QueryParams;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct OrgchartManager {
    logger: Logger,
    validation: Validation,
    client: Arc<KeephubClient>,
}

impl OrgchartManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<KeephubClient>) -> Self {
        Self {
            logger: logger.child("orgchart"),
            validation,
            client,
        }
    }

    pub async fn handle_action(
        &self,
        operation: OrgchartOperation,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        match operation {
            OrgchartOperation::GetById => {
                let node_id = self.node_id(&params)?;
                Ok(vec![self.client.get(ctx, resource_path("orgchart", &node_id)).await?])
            }
            OrgchartOperation::GetByExternalRef => {
                let external_ref = self
                    .validation
                    .ensure_string(params.get("externalRef"), "External Reference")?;
                let call = ApiCall::get("/orgchart")
                    .with_query(QueryParams::new().param("externalRef", &external_ref));
                Ok(vec![self.client.request(ctx, call).await?])
            }
            OrgchartOperation::GetParent => self.parent(ctx, params).await,
            OrgchartOperation::GetAncestors => self.ancestors(ctx, params).await,
            OrgchartOperation::GetChildren => self.children(ctx, params).await,
        }
    }

    fn node_id(&self, params: &NodeParameters<'_>) -> Result<String, NodeError> {
        self.validation.ensure_string(params.get("nodeId"), "Node ID")
    }

    async fn parent(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let node_id = self.node_id(&params)?;
        let node: OrgchartNode = self
            .client
            .request_as(ctx, ApiCall::get(resource_path("orgchart", &node_id)))
            .await?;
        let parent_id = node
            .parent_id()
            .map(str::to_string)
            .ok_or_else(|| NodeError::invalid_input(ROOT_NODE_MESSAGE))?;
        let parent = self
            .client
            .get(ctx, resource_path("orgchart", &parent_id))
            .await?;
        Ok(vec![json!({
            "parentId": parent.get("id").cloned().unwrap_or(Value::Null),
            "parentName": parent.get("name").cloned().unwrap_or(Value::Null),
            "parent": parent,
        })])
    }

    async fn ancestors(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let node_id = self.node_id(&params)?;
        let depth_limit = params.u64_or("depthLimit", 0);
        let mut source = RemoteOrgchart::new(&self.client, ctx);
        let found = ancestors(&mut source, &node_id, depth_limit).await?;
        Ok(vec![json!({
            "nodeId": node_id,
            "ancestorsCount": found.len(),
            "ancestors": found,
        })])
    }

    async fn children(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let node_id = self.node_id(&params)?;
        let depth_limit = params.u64_or("depthLimit", 0);
        let limit = params.u64_or("limit", 0) as usize;
        let mut source = RemoteOrgchart::new(&self.client, ctx);
        let found = descendants(&mut source, &node_id, depth_limit, limit).await?;
        self.logger.debug(
            "descendants collected",
            Some(&json!({ "nodeId": node_id, "count": found.len() })),
        );
        if found.is_empty() {
            return Ok(vec![json!({
                "nodeId": node_id,
                "childrenCount": 0,
                "children": [],
                "message": "No children found for this node",
            })]);
        }
        Ok(vec![json!({
            "nodeId": node_id,
            "childrenCount": found.len(),
            "children": found,
        })])
    }
}
