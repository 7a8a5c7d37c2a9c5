use crate::constants::task::{DEFAULT_ORGCHART_ROOT, DEFINE_FIELDS, DEFINE_JSON, TIMEZONE};
use crate::errors::NodeError;
use crate::managers::{read_assignments, update_document};
use crate::models::task::{TaskDeletion, TaskInstance, TaskStatus, TaskStatusCounts, TaskTemplate};
use crate::models::workflow::WorkflowAction;
use crate::node::operation::TaskOperation;
use crate::node::NodeParameters;
use crate::services::api_client::{resource_path, ApiCall, KeephubClient};
use crate::services::logger::Logger;
use crate::services::session::ExecutionContext;
use crate::services::validation::Validation;
use crate::utils::duration::parse_date_millis;
use crate::utils::listing::page_items;
use crate::utils::query::QueryParams;
use crate::utils::schedule::task_window;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct TaskManager {
    logger: Logger,
    validation: Validation,
    client: Arc<KeephubClient>,
}

/// Body of a single weekly task template addressed to the whole organization.
pub fn fields_task_body(
    language: &str,
    title: &str,
    message: &str,
    notification: bool,
    now: DateTime<Utc>,
) -> Value {
    let window = task_window(now);
    json!({
        "originLanguage": language,
        "sendPushNotification": notification,
        "orgchartSelection": {
            "include": [DEFAULT_ORGCHART_ROOT],
            "exclude": [],
        },
        "orgchartAttrSelection": [],
        "groups": [],
        "type": "single",
        "customRule": {
            "freq": "WEEKLY",
            "interval": 1,
            "dtstart": window.dtstart,
            "until": null,
        },
        "repeatEvery": 1,
        "parentRef": null,
        "template": {
            "startDate": window.start_date,
            "dueDate": window.due_date,
            "completionType": "group",
            "timezone": TIMEZONE,
            "title": { language: title },
            "attachments": { language: [] },
            "relatedTags": [],
            "form": {
                "active": true,
                "fields": [{
                    "id": "auto",
                    "required": false,
                    "element": "Paragraph",
                    "static": true,
                    "bold": false,
                    "italic": false,
                    "content": "",
                    "text": { language: message },
                    "type": "",
                    "editingFieldId": "",
                    "sectionIndex": null,
                    "insideSection": null,
                    "orderIndex": 0,
                }],
            },
            "highlighted": false,
            "templateEndDate": null,
        },
    })
}

impl TaskManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<KeephubClient>) -> Self {
        Self {
            logger: logger.child("task"),
            validation,
            client,
        }
    }

    pub async fn handle_action(
        &self,
        operation: TaskOperation,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        match operation {
            TaskOperation::GetTask => {
                let task_id = self.task_id(&params)?;
                Ok(vec![self.template(ctx, &task_id).await?])
            }
            TaskOperation::CreateTask => self.create(ctx, params).await,
            TaskOperation::UpdateById => self.update_by_id(ctx, params).await,
            TaskOperation::GetTaskStatus => self.status(ctx, params).await,
            TaskOperation::GetTaskStatusCounts => self.status_counts(ctx, params).await,
            TaskOperation::DeleteTask => self.delete(ctx, params).await,
            TaskOperation::GetTaskByOrgunit => self.by_orgunit(ctx, params).await,
            TaskOperation::GetTaskInstance => {
                let instance_id = self.instance_id(&params)?;
                let instance = self
                    .client
                    .get(ctx, resource_path("tasks", &instance_id))
                    .await?;
                Ok(vec![instance])
            }
            TaskOperation::GetTemplateByTask => self.template_by_task(ctx, params).await,
            TaskOperation::ApproveTask => self.approve(ctx, params).await,
            TaskOperation::RejectTask => self.reject(ctx, params).await,
        }
    }

    fn task_id(&self, params: &NodeParameters<'_>) -> Result<String, NodeError> {
        self.validation.ensure_string(params.get("taskId"), "Task ID")
    }

    fn instance_id(&self, params: &NodeParameters<'_>) -> Result<String, NodeError> {
        self.validation
            .ensure_string(params.get("taskInstanceId"), "Task ID")
    }

    async fn template(&self, ctx: &mut ExecutionContext, task_id: &str) -> Result<Value, NodeError> {
        self.client
            .get(ctx, resource_path("tasktemplates", task_id))
            .await
    }

    async fn typed_template(
        &self,
        ctx: &mut ExecutionContext,
        task_id: &str,
    ) -> Result<TaskTemplate, NodeError> {
        self.client
            .request_as(ctx, ApiCall::get(resource_path("tasktemplates", task_id)))
            .await
    }

    async fn create(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let requested = params
            .get("defineTaskInput")
            .and_then(Value::as_str)
            .unwrap_or(DEFINE_FIELDS);
        let mode = self.validation.ensure_one_of(
            requested,
            "task input mode",
            &[DEFINE_FIELDS, DEFINE_JSON],
        )?;
        let body = if mode == DEFINE_JSON {
            self.validation
                .parse_json_parameter(params.get("taskJsonBody"), "Task JSON Body")?
        } else {
            let title = self
                .validation
                .ensure_string(params.get("taskTitle"), "Task title")?;
            let message = self
                .validation
                .ensure_optional_string(params.get("taskMessage"))
                .unwrap_or_default();
            let notification = params.bool_or("taskNotification", false);
            fields_task_body(self.client.language(), &title, &message, notification, Utc::now())
        };
        let created = self
            .client
            .request(ctx, ApiCall::post("/tasktemplates").with_body(body))
            .await?;
        Ok(vec![created])
    }

    async fn update_by_id(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let task_id = self.task_id(&params)?;
        let assignments = read_assignments(&params)?;
        let updated =
            update_document(&self.client, ctx, "tasktemplates", &task_id, &assignments).await?;
        Ok(vec![updated])
    }

    async fn status(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let task_id = self.task_id(&params)?;
        let template = self.typed_template(ctx, &task_id).await?;
        let status = TaskStatus {
            id: template.id.clone(),
            full_progress: vec![template.first_progress()],
        };
        Ok(vec![serde_json::to_value(status)?])
    }

    async fn status_counts(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let task_id = self.task_id(&params)?;
        let template = self.typed_template(ctx, &task_id).await?;
        let counts = TaskStatusCounts::from(template.first_progress());
        Ok(vec![serde_json::to_value(counts)?])
    }

    /// Deletes the template, then its instances. There is no rollback: when
    /// the second call fails the template stays deleted and the error says so.
    async fn delete(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let task_id = self.task_id(&params)?;
        let template_path = resource_path("tasktemplates", &task_id);
        let template_deleted = self.client.delete(ctx, template_path.clone()).await?;
        let instance_deleted = match self
            .client
            .delete(ctx, format!("{}/instance", template_path))
            .await
        {
            Ok(value) => value,
            Err(err) => {
                self.logger.warn(
                    "task template deleted but instance cleanup failed",
                    Some(&json!({ "taskId": task_id, "error": err.message })),
                );
                let remote = err.message.clone();
                let mut partial = err;
                partial.message = format!(
                    "Task template {} was deleted, but deleting its instances failed",
                    task_id
                );
                partial.description = Some(remote);
                return Err(partial.with_details(json!({ "templateDeleted": template_deleted })));
            }
        };
        let deletion = TaskDeletion {
            template_deleted,
            instance_deleted,
        };
        Ok(vec![serde_json::to_value(deletion)?])
    }

    async fn by_orgunit(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let orgunit_id = self
            .validation
            .ensure_string(params.get("orgunitId"), "Orgunit ID")?;
        let options = params.default_list_options();
        let filters = params.collection("options");
        let mut query = options.apply_sort(
            options
                .apply(QueryParams::new())
                .param("filterByNode[0]", &orgunit_id),
        );
        for (option, param) in [("startDateGte", "dueDateGte"), ("startDateLte", "dueDateLte")] {
            let Some(raw) = filters.get(option).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
            else {
                continue;
            };
            let millis = parse_date_millis(raw).ok_or_else(|| {
                NodeError::invalid_input(format!("Invalid date in {}: {}", option, raw))
            })?;
            query = query.param(param, millis);
        }
        let response = self
            .client
            .request(ctx, ApiCall::get("/tasktemplates").with_query(query))
            .await
            .map_err(|err| err.in_context("Error searching tasks by orgunit"))?;
        Ok(page_items(response))
    }

    async fn template_by_task(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let instance_id = self.instance_id(&params)?;
        let raw = self
            .client
            .get(ctx, resource_path("tasks", &instance_id))
            .await?;
        let instance: TaskInstance = serde_json::from_value(raw.clone()).unwrap_or_default();
        let template_ref = instance
            .template_ref
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| {
                NodeError::api_request(
                    None,
                    format!(
                        "Task \"{}\" does not have a templateRef field in the response",
                        instance_id
                    ),
                    Some(raw),
                )
                .with_description("Ensure the task ID is correct and the task belongs to a template.")
            })?;
        Ok(vec![self.template(ctx, &template_ref).await?])
    }

    async fn approve(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let task_id = self.task_id(&params)?;
        let comment = params
            .get("approvalComment")
            .and_then(Value::as_str)
            .unwrap_or("");
        let call = ApiCall::post("/workflow").with_json(&WorkflowAction::approve_task(&task_id, comment))?;
        Ok(vec![self.client.request(ctx, call).await?])
    }

    async fn reject(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let task_id = self.task_id(&params)?;
        let reason = self
            .validation
            .ensure_string(params.get("rejectionReason"), "Rejection reason")?;
        let call = ApiCall::post("/workflow").with_json(&WorkflowAction::reject_task(&task_id, &reason))?;
        Ok(vec![self.client.request(ctx, call).await?])
    }
}
