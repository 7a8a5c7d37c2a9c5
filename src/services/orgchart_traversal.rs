use crate::errors::NodeError;
use crate::models::orgchart::{Ancestor, Descendant, NodeListing, OrgchartNode};
use crate::services::api_client::{resource_path, ApiCall, KeephubClient};
use crate::services::session::ExecutionContext;
use crate::utils::query::QueryParams;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};

pub const ROOT_NODE_MESSAGE: &str = "Root node detected. Root nodes have no ancestors.";

/// Read access to the organization tree, one node or one child listing per
/// call.
#[async_trait]
pub trait OrgchartSource: Send {
    async fn node(&mut self, id: &str) -> Result<OrgchartNode, NodeError>;
    async fn children(&mut self, parent_id: &str) -> Result<Vec<OrgchartNode>, NodeError>;
}

pub struct RemoteOrgchart<'a> {
    client: &'a KeephubClient,
    ctx: &'a mut ExecutionContext,
}

impl<'a> RemoteOrgchart<'a> {
    pub fn new(client: &'a KeephubClient, ctx: &'a mut ExecutionContext) -> Self {
        Self { client, ctx }
    }
}

#[async_trait]
impl<'a> OrgchartSource for RemoteOrgchart<'a> {
    async fn node(&mut self, id: &str) -> Result<OrgchartNode, NodeError> {
        self.client
            .request_as(&mut *self.ctx, ApiCall::get(resource_path("orgchart", id)))
            .await
    }

    async fn children(&mut self, parent_id: &str) -> Result<Vec<OrgchartNode>, NodeError> {
        let call = ApiCall::get("/orgchart").with_query(QueryParams::new().param("parent", parent_id));
        let listing: NodeListing = self.client.request_as(&mut *self.ctx, call).await?;
        Ok(listing.into_nodes())
    }
}

/// Walks `parent` links upward from `node_id`, nearest first. `depth_limit`
/// of 0 means unlimited. A node without a parent yields an error.
pub async fn ancestors<S: OrgchartSource + ?Sized>(
    source: &mut S,
    node_id: &str,
    depth_limit: u64,
) -> Result<Vec<Ancestor>, NodeError> {
    let start = source.node(node_id).await?;
    let mut current = start.parent_id().map(str::to_string);
    let mut collected = Vec::new();
    let mut depth = 0u64;

    while let Some(parent_id) = current {
        if depth_limit != 0 && depth >= depth_limit {
            break;
        }
        let parent = source.node(&parent_id).await?;
        collected.push(Ancestor {
            ancestor_id: parent.node_id().map(str::to_string),
            ancestor_name: parent.name.clone(),
        });
        current = parent.parent_id().map(str::to_string);
        depth += 1;
    }

    if collected.is_empty() {
        return Err(NodeError::invalid_input(ROOT_NODE_MESSAGE));
    }
    Ok(collected)
}

#[derive(Debug, Clone, Copy)]
struct WalkLimits {
    depth: u64,
    total: usize,
}

impl WalkLimits {
    fn depth_reached(&self, depth: u64) -> bool {
        self.depth > 0 && depth >= self.depth
    }

    fn total_reached(&self, collected: usize) -> bool {
        self.total > 0 && collected >= self.total
    }
}

/// Pre-order listing of the subtree under `node_id` (the node itself
/// excluded). `depth_limit` bounds each branch, `limit` the total; 0 means
/// unlimited for both.
pub async fn descendants<S: OrgchartSource + ?Sized>(
    source: &mut S,
    node_id: &str,
    depth_limit: u64,
    limit: usize,
) -> Result<Vec<Descendant>, NodeError> {
    let limits = WalkLimits {
        depth: depth_limit,
        total: limit,
    };
    let mut out = Vec::new();
    walk(source, node_id.to_string(), 0, limits, &mut out).await?;
    Ok(out)
}

fn walk<'a, S: OrgchartSource + ?Sized>(
    source: &'a mut S,
    parent_id: String,
    depth: u64,
    limits: WalkLimits,
    out: &'a mut Vec<Descendant>,
) -> BoxFuture<'a, Result<(), NodeError>> {
    async move {
        if limits.depth_reached(depth) || limits.total_reached(out.len()) {
            return Ok(());
        }
        let children = source.children(&parent_id).await?;
        for child in children {
            if limits.total_reached(out.len()) {
                break;
            }
            let child_id = child.node_id().map(str::to_string);
            out.push(Descendant {
                child_id: child_id.clone(),
                child_name: child.name.clone(),
            });
            if let Some(child_id) = child_id {
                walk(&mut *source, child_id, depth + 1, limits, &mut *out).await?;
            }
        }
        Ok(())
    }
    .boxed()
}
