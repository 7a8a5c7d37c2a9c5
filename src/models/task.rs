use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Progress summary kept in `progress[0]` of a task template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskProgress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(
        rename = "orgUnitsTasksStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub org_units_tasks_status: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskTemplate {
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub progress: Option<Vec<TaskProgress>>,
}

impl TaskTemplate {
    pub fn first_progress(&self) -> TaskProgress {
        self.progress
            .as_ref()
            .and_then(|p| p.first())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    pub id: Option<Value>,
    #[serde(rename = "fullProgress")]
    pub full_progress: Vec<TaskProgress>,
}

/// Counts are emitted even when absent so the output shape stays fixed.
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatusCounts {
    pub done: Option<Value>,
    pub open: Option<Value>,
    pub approval: Option<Value>,
    pub status: Option<Value>,
}

impl From<TaskProgress> for TaskStatusCounts {
    fn from(progress: TaskProgress) -> Self {
        Self {
            done: progress.done,
            open: progress.open,
            approval: progress.approval,
            status: progress.status,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInstance {
    #[serde(default)]
    pub template_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeletion {
    pub template_deleted: Value,
    pub instance_deleted: Value,
}
