use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node of the organization tree. Only `parent` links upward; there is no
/// cached list of children. Only the link fields are typed; everything else,
/// `name` included, is carried as the API sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgchartNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namepath: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrgchartNode {
    pub fn node_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.object_id.as_deref())
    }

    /// The parent id, treating an empty string as "no parent".
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref().filter(|p| !p.is_empty())
    }

    /// `namepath` without its leading separator.
    pub fn display_path(&self) -> String {
        let path = self.namepath.as_ref().and_then(Value::as_str).unwrap_or("");
        let mut chars = path.chars();
        chars.next();
        chars.as_str().to_string()
    }
}

/// Children listings come back either as a bare array or as a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NodeListing {
    Items(Vec<OrgchartNode>),
    Page {
        #[serde(default)]
        data: Vec<OrgchartNode>,
    },
}

impl NodeListing {
    pub fn into_nodes(self) -> Vec<OrgchartNode> {
        match self {
            NodeListing::Items(items) => items,
            NodeListing::Page { data } => data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ancestor {
    pub ancestor_id: Option<String>,
    pub ancestor_name: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Descendant {
    pub child_id: Option<String>,
    pub child_name: Option<Value>,
}
