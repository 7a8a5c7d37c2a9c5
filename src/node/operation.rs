use crate::errors::NodeError;
use crate::utils::operation_errors::unknown_operation_error;

/// Declares an operation enum together with its wire names.
macro_rules! operations {
    ($name:ident { $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const NAMES: &'static [&'static str] = &[$($wire),+];

            pub fn parse(raw: &str) -> Option<Self> {
                match raw {
                    $($wire $(| $alias)* => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }
    };
}

operations!(UserOperation {
    GetById => "getById",
    FindByLoginName => "findByLoginName",
    FindByGroup => "findByGroup",
    FindByOrgunit => "findByOrgunit",
});

operations!(ContentOperation {
    Create => "create",
    GetById => "getById",
    FindByContentPool => "findByContentPool",
    FindByGroup => "findByGroup",
    FindByOrgunit => "findByOrgunit",
    UpdateById => "updateById",
    Delete => "delete",
    ApproveContent => "approveContent",
});

operations!(TaskOperation {
    GetTask => "getTask",
    CreateTask => "createTask",
    UpdateById => "updateById",
    GetTaskStatus => "getTaskStatus" | "getTaskProgress",
    GetTaskStatusCounts => "getTaskStatusCounts",
    DeleteTask => "deleteTask",
    GetTaskByOrgunit => "getTaskByOrgunit",
    GetTaskInstance => "getTaskInstance",
    GetTemplateByTask => "getTemplateByTask",
    ApproveTask => "approveTask",
    RejectTask => "rejectTask",
});

operations!(FormSubmissionOperation {
    GetFormSubmission => "getFormSubmission",
    GetSubmitterDetails => "getSubmitterDetails",
    GetSubmissionOrgunits => "getSubmissionOrgunits",
    UpdateSubmissionOrgunits => "updateSubmissionOrgunits",
    CalculateResponseDuration => "calculateResponseDuration",
    GetByForm => "getByForm",
});

operations!(OrgchartOperation {
    GetById => "getById",
    GetByExternalRef => "getByExternalRef",
    GetParent => "getParent",
    GetAncestors => "getAncestors",
    GetChildren => "getChildren",
});

operations!(StorageOperation {
    GetSignedUrl => "getSignedUrl",
});

pub const RESOURCES: &[&str] = &[
    "user",
    "content",
    "task",
    "formSubmission",
    "orgchart",
    "storage",
];

/// A validated `(resource, operation)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    User(UserOperation),
    Content(ContentOperation),
    Task(TaskOperation),
    FormSubmission(FormSubmissionOperation),
    Orgchart(OrgchartOperation),
    Storage(StorageOperation),
}

impl Operation {
    pub fn parse(resource: &str, operation: &str) -> Result<Self, NodeError> {
        let (parsed, known): (Option<Operation>, &[&str]) = match resource {
            "user" => (
                UserOperation::parse(operation).map(Operation::User),
                UserOperation::NAMES,
            ),
            "content" => (
                ContentOperation::parse(operation).map(Operation::Content),
                ContentOperation::NAMES,
            ),
            "task" => (
                TaskOperation::parse(operation).map(Operation::Task),
                TaskOperation::NAMES,
            ),
            "formSubmission" => (
                FormSubmissionOperation::parse(operation).map(Operation::FormSubmission),
                FormSubmissionOperation::NAMES,
            ),
            "orgchart" => (
                OrgchartOperation::parse(operation).map(Operation::Orgchart),
                OrgchartOperation::NAMES,
            ),
            "storage" => (
                StorageOperation::parse(operation).map(Operation::Storage),
                StorageOperation::NAMES,
            ),
            _ => {
                return Err(unknown_operation_error(resource, operation, &[]).with_description(
                    format!("Unknown resource. Use one of: {}.", RESOURCES.join(", ")),
                ))
            }
        };
        parsed.ok_or_else(|| unknown_operation_error(resource, operation, known))
    }

    pub fn resource(&self) -> &'static str {
        match self {
            Operation::User(_) => "user",
            Operation::Content(_) => "content",
            Operation::Task(_) => "task",
            Operation::FormSubmission(_) => "formSubmission",
            Operation::Orgchart(_) => "orgchart",
            Operation::Storage(_) => "storage",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::User(op) => op.as_str(),
            Operation::Content(op) => op.as_str(),
            Operation::Task(op) => op.as_str(),
            Operation::FormSubmission(op) => op.as_str(),
            Operation::Orgchart(op) => op.as_str(),
            Operation::Storage(op) => op.as_str(),
        }
    }
}
