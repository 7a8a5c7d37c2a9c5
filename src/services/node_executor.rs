use crate::errors::NodeError;
use crate::managers::content::ContentManager;
use crate::managers::form_submission::FormSubmissionManager;
use crate::managers::orgchart::OrgchartManager;
use crate::managers::storage::StorageManager;
use crate::managers::task::TaskManager;
use crate::managers::user::UserManager;
use crate::node::{InputItem, NodeItem, NodeParameters, Operation};
use crate::services::api_client::KeephubClient;
use crate::services::logger::Logger;
use crate::services::session::ExecutionContext;
use crate::services::validation::Validation;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Runs one operation over every input item, in order, on a fresh
/// execution context.
#[derive(Clone)]
pub struct NodeExecutor {
    logger: Logger,
    user: UserManager,
    content: ContentManager,
    task: TaskManager,
    form_submission: FormSubmissionManager,
    orgchart: OrgchartManager,
    storage: StorageManager,
}

impl NodeExecutor {
    pub fn new(logger: Logger, validation: Validation, client: Arc<KeephubClient>) -> Self {
        Self {
            user: UserManager::new(logger.clone(), validation.clone(), client.clone()),
            content: ContentManager::new(logger.clone(), validation.clone(), client.clone()),
            task: TaskManager::new(logger.clone(), validation.clone(), client.clone()),
            form_submission: FormSubmissionManager::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            ),
            orgchart: OrgchartManager::new(logger.clone(), validation.clone(), client.clone()),
            storage: StorageManager::new(validation, client),
            logger: logger.child("executor"),
        }
    }

    async fn dispatch(
        &self,
        operation: Operation,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        match operation {
            Operation::User(op) => self.user.handle_action(op, ctx, params).await,
            Operation::Content(op) => self.content.handle_action(op, ctx, params).await,
            Operation::Task(op) => self.task.handle_action(op, ctx, params).await,
            Operation::FormSubmission(op) => {
                self.form_submission.handle_action(op, ctx, params).await
            }
            Operation::Orgchart(op) => self.orgchart.handle_action(op, ctx, params).await,
            Operation::Storage(op) => self.storage.handle_action(op, ctx, params).await,
        }
    }

    /// Output items keep input order and carry the index of the item they
    /// came from. With `continue_on_fail` a failed item becomes an
    /// `{error}` item; fatal errors abort regardless.
    pub async fn execute(
        &self,
        operation: Operation,
        node_parameters: &Map<String, Value>,
        items: &[InputItem],
        continue_on_fail: bool,
    ) -> Result<Vec<NodeItem>, NodeError> {
        let mut ctx = ExecutionContext::new();
        let mut output = Vec::new();
        let mut failed = 0usize;

        self.logger.debug(
            "execution started",
            Some(&serde_json::json!({
                "executionId": ctx.execution_id().to_string(),
                "resource": operation.resource(),
                "operation": operation.name(),
                "items": items.len(),
            })),
        );

        for (index, item) in items.iter().enumerate() {
            let params = NodeParameters::new(node_parameters, &item.parameters);
            match self.dispatch(operation, &mut ctx, params).await {
                Ok(results) => {
                    output.extend(results.into_iter().map(|json| NodeItem::new(json, index)));
                }
                Err(err) => {
                    let err = err.with_item_index(index);
                    if err.is_fatal() || !continue_on_fail {
                        self.logger.error(
                            "execution aborted",
                            Some(&serde_json::json!({
                                "executionId": ctx.execution_id().to_string(),
                                "item": index,
                                "code": err.code,
                                "error": err.message,
                            })),
                        );
                        return Err(err);
                    }
                    self.logger.warn(
                        "item failed",
                        Some(&serde_json::json!({ "item": index, "code": err.code, "error": err.message })),
                    );
                    failed += 1;
                    output.push(NodeItem::error(&err.message, index));
                }
            }
        }

        self.logger.info(
            "execution finished",
            Some(&serde_json::json!({
                "executionId": ctx.execution_id().to_string(),
                "resource": operation.resource(),
                "operation": operation.name(),
                "items": items.len(),
                "outputs": output.len(),
                "failed": failed,
                "authCalls": ctx.auth_calls(),
                "durationMs": chrono::Utc::now().timestamp_millis() - ctx.started_at().timestamp_millis(),
            })),
        );
        Ok(output)
    }
}
