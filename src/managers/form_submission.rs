use crate::constants::pagination::{FORM_SORT_FIELD, FORM_SORT_ORDER};
use crate::errors::NodeError;
use crate::models::form_submission::{
    ContentTimestamps, FormSubmission, OrgunitAssignment, OrgunitContext, SubmissionOrgunitPatch,
    Submitter,
};
use crate::models::orgchart::OrgchartNode;
use crate::node::operation::FormSubmissionOperation;
use crate::node::NodeParameters;
use crate::services::api_client::{resource_path, ApiCall, KeephubClient};
use crate::services::logger::Logger;
use crate::services::session::ExecutionContext;
use crate::services::validation::Validation;
use crate::utils::duration::{format_elapsed, parse_timestamp};
use crate::utils::listing::page_items;
use crate::utils::query::QueryParams;
use crate::utils::text::split_csv;
use serde_json::{json, Value};
use std::sync::Arc;

const SUBMISSION_ID_LABEL: &str = "Form Submission ID";

/// Names are passed through whatever their type; only empty ones (null,
/// `""`, `0`, `false`) fall back to "Unknown".
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Clone)]
pub struct FormSubmissionManager {
    logger: Logger,
    validation: Validation,
    client: Arc<KeephubClient>,
}

impl FormSubmissionManager {
    pub fn new(logger: Logger, validation: Validation, client: Arc<KeephubClient>) -> Self {
        Self {
            logger: logger.child("form"),
            validation,
            client,
        }
    }

    pub async fn handle_action(
        &self,
        operation: FormSubmissionOperation,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        match operation {
            FormSubmissionOperation::GetFormSubmission => self.get_submission(ctx, params).await,
            FormSubmissionOperation::GetSubmitterDetails => self.submitter_details(ctx, params).await,
            FormSubmissionOperation::GetSubmissionOrgunits => {
                self.submission_orgunits(ctx, params).await
            }
            FormSubmissionOperation::UpdateSubmissionOrgunits => {
                self.update_orgunits(ctx, params).await
            }
            FormSubmissionOperation::CalculateResponseDuration => {
                self.response_duration(ctx, params).await
            }
            FormSubmissionOperation::GetByForm => self.by_form(ctx, params).await,
        }
    }

    fn submission_id(&self, params: &NodeParameters<'_>) -> Result<String, NodeError> {
        self.validation
            .ensure_object_id(params.get("formSubmissionId"), SUBMISSION_ID_LABEL)
    }

    async fn fetch_submission(
        &self,
        ctx: &mut ExecutionContext,
        submission_id: &str,
    ) -> Result<FormSubmission, NodeError> {
        let raw = self
            .client
            .get(ctx, resource_path("formvalues", submission_id))
            .await?;
        if raw.is_null() {
            return Err(NodeError::invalid_input(format!(
                "Form submission not found: {}",
                submission_id
            )));
        }
        serde_json::from_value(raw.clone()).map_err(|err| {
            NodeError::api_request(
                None,
                format!("Unexpected response from GET /formvalues/{}", submission_id),
                Some(raw),
            )
            .with_description(err.to_string())
        })
    }

    async fn submitter_id(
        &self,
        ctx: &mut ExecutionContext,
        submission_id: &str,
    ) -> Result<String, NodeError> {
        let submission = self.fetch_submission(ctx, submission_id).await?;
        submission
            .submitter_id()
            .map(str::to_string)
            .ok_or_else(|| NodeError::invalid_input("Form submission or submitter not found"))
    }

    async fn get_submission(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let submission_id = self.submission_id(&params)?;
        let raw = self
            .client
            .get(ctx, resource_path("formvalues", &submission_id))
            .await?;
        if raw.is_null() {
            return Err(NodeError::invalid_input(format!(
                "Form submission not found: {}",
                submission_id
            )));
        }
        Ok(vec![raw])
    }

    async fn submitter_details(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let submission_id = self.submission_id(&params)?;
        let submitter_id = self.submitter_id(ctx, &submission_id).await?;
        let user = self
            .client
            .get(ctx, resource_path("users", &submitter_id))
            .await?;
        Ok(vec![user])
    }

    /// Resolves every orgunit of the submitter. A unit that cannot be fetched
    /// is reported in place instead of failing the item.
    async fn submission_orgunits(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let submission_id = self.submission_id(&params)?;
        let submitter_id = self.submitter_id(ctx, &submission_id).await?;
        let submitter: Submitter = self
            .client
            .request_as(ctx, ApiCall::get(resource_path("users", &submitter_id)))
            .await?;

        let mut orgunits = Vec::new();
        for orgunit_id in submitter.orgunits.clone().unwrap_or_default() {
            let fetched: Result<OrgchartNode, NodeError> = self
                .client
                .request_as(ctx, ApiCall::get(resource_path("orgchart", &orgunit_id)))
                .await;
            let context = match fetched {
                Ok(node) => OrgunitContext {
                    id: orgunit_id,
                    name: node
                        .name
                        .clone()
                        .filter(is_present)
                        .unwrap_or_else(|| json!("Unknown")),
                    path: node.display_path(),
                },
                Err(err) => {
                    self.logger.warn(
                        "orgunit lookup failed",
                        Some(&json!({ "orgunitId": orgunit_id, "error": err.message })),
                    );
                    OrgunitContext {
                        id: orgunit_id,
                        name: json!("Error fetching"),
                        path: String::new(),
                    }
                }
            };
            orgunits.push(context);
        }

        Ok(vec![json!({
            "_id": submitter.id,
            "name": submitter.name,
            "orgunits": orgunits,
        })])
    }

    async fn update_orgunits(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let submission_id = self.submission_id(&params)?;
        let raw_ids = self
            .validation
            .ensure_optional_string(params.get("newOrgunitId"))
            .unwrap_or_default();
        let orgunit_ids = split_csv(&raw_ids);
        if orgunit_ids.is_empty() {
            return Err(NodeError::invalid_input(
                "At least one Orgunit ID must be provided",
            ));
        }

        let submission = self.fetch_submission(ctx, &submission_id).await?;
        let patch = SubmissionOrgunitPatch {
            content_ref: submission.content_id().map(str::to_string),
            values: submission.values.clone(),
            set: OrgunitAssignment {
                orgunits_of_creator: orgunit_ids.clone(),
            },
        };
        let call = ApiCall::patch(resource_path("formvalues", &submission_id)).with_json(&patch)?;
        self.client.request(ctx, call).await?;

        Ok(vec![json!({
            "success": true,
            "message": "Updated orgunitsOfCreator",
            "orgunitsOfCreator": orgunit_ids,
        })])
    }

    async fn response_duration(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let submission_id = self.submission_id(&params)?;
        let submission = self.fetch_submission(ctx, &submission_id).await?;
        let content_id = submission
            .content_id()
            .map(str::to_string)
            .ok_or_else(|| NodeError::invalid_input("Form submission or contentRef not found"))?;
        let content: ContentTimestamps = self
            .client
            .request_as(ctx, ApiCall::get(resource_path("contents", &content_id)))
            .await?;

        let form_created = content
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| NodeError::invalid_input("Form createdAt is missing or not a valid date"))?;
        let submitted = submission
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| {
                NodeError::invalid_input("Submission createdAt is missing or not a valid date")
            })?;
        let elapsed_ms = submitted.timestamp_millis() - form_created.timestamp_millis();

        Ok(vec![json!({
            "formId": content_id,
            "formCreatedAt": content.created_at,
            "submittedAt": submission.created_at,
            "duration": {
                "timeSinceFormCreated": format_elapsed(elapsed_ms),
            },
        })])
    }

    async fn by_form(
        &self,
        ctx: &mut ExecutionContext,
        params: NodeParameters<'_>,
    ) -> Result<Vec<Value>, NodeError> {
        let content_ref = self
            .validation
            .ensure_object_id(params.get("contentRef"), "Form Content ID")?;
        let options = params.list_options(Some(FORM_SORT_FIELD), FORM_SORT_ORDER);
        let query = options
            .apply_sort(options.apply(QueryParams::new()))
            .sort("_id", 1)
            .param("contentType", "form")
            .param("widgetId", "formValues")
            .param("contentRef", &content_ref);
        let response = self
            .client
            .request(ctx, ApiCall::get("/formvalues").with_query(query))
            .await
            .map_err(|err| err.in_context("Error fetching form submissions by form"))?;
        Ok(page_items(response))
    }
}
