use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A link to another document: either the bare id or the populated document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: Option<String>,
    },
}

impl Reference {
    pub fn id(&self) -> Option<&str> {
        match self {
            Reference::Id(id) => Some(id.as_str()),
            Reference::Populated { id } => id.as_deref(),
        }
        .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub created_by: Option<Reference>,
    #[serde(default)]
    pub content_ref: Option<Reference>,
    #[serde(default)]
    pub values: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl FormSubmission {
    pub fn submitter_id(&self) -> Option<&str> {
        self.created_by.as_ref().and_then(Reference::id)
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content_ref.as_ref().and_then(Reference::id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrgunitAssignment {
    #[serde(rename = "orgunitsOfCreator")]
    pub orgunits_of_creator: Vec<String>,
}

/// PATCH body that re-sends the submission values alongside the `$set`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOrgunitPatch {
    pub content_ref: Option<String>,
    pub values: Option<Value>,
    #[serde(rename = "$set")]
    pub set: OrgunitAssignment,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrgunitContext {
    pub id: String,
    pub name: Value,
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submitter {
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub orgunits: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTimestamps {
    #[serde(default)]
    pub created_at: Option<String>,
}
