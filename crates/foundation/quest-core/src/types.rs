//! Action kinds, HTTP verbs and the single-slot request/response traces

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// CRUD action categories that earn quest credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    List,
    Create,
    Update,
    Delete,
}

impl ActionKind {
    /// All kinds, in quest-board order
    pub const ALL: [ActionKind; 4] = [
        ActionKind::List,
        ActionKind::Create,
        ActionKind::Update,
        ActionKind::Delete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Quest title shown on the quest board
    pub fn quest_title(&self) -> &'static str {
        match self {
            Self::List => "List the items",
            Self::Create => "Create an item",
            Self::Update => "Update an item",
            Self::Delete => "Delete an item",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HTTP verbs the session issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(crate::Error::Validation(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

/// The most recently issued request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTrace {
    pub method: HttpMethod,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// The most recently received response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseTrace {
    /// `"<code> <reason>"`, e.g. `"404 Not Found"`
    #[serde(rename = "status")]
    pub status_line: String,
    pub data: Value,
}

/// Quest totals after a `record_action` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestProgress {
    pub is_new_credit: bool,
    pub xp: u32,
    pub completed_count: usize,
}
