use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::MemberRef;
use crate::error::ClientError;
use crate::Resource;

/// Workflow state of a task.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Pending", alias = "pending", alias = "PENDING")]
    Pending,
    #[serde(
        rename = "In Progress",
        alias = "in progress",
        alias = "in-progress",
        alias = "in_progress",
        alias = "InProgress"
    )]
    InProgress,
    #[serde(rename = "Completed", alias = "completed", alias = "COMPLETED")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of a task. Ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TaskPriority {
    #[serde(rename = "Low", alias = "low", alias = "LOW")]
    Low,
    #[default]
    #[serde(rename = "Medium", alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(rename = "High", alias = "high", alias = "HIGH")]
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[resource(kind = "task")]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    #[resource(id)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<MemberRef>,
    #[serde(default, alias = "team", skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Server fields this client does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            assigned_to: None,
            team_id: None,
            due_date: None,
            extra: Map::new(),
        }
    }

    pub fn assignee_id(&self) -> Option<&str> {
        self.assigned_to.as_ref().map(MemberRef::id)
    }

    pub fn is_assigned_to(&self, member_id: &str) -> bool {
        self.assignee_id() == Some(member_id)
    }
}

/// Payload for `POST /task`. The server assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub team_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl NewTask {
    pub fn new(team_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            team_id: team_id.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn assigned_to(mut self, member_id: impl Into<String>) -> Self {
        self.assigned_to = Some(member_id.into());
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        if self.title.trim().is_empty() {
            return Err(ClientError::Validation("task title is required".into()));
        }
        if self.team_id.trim().is_empty() {
            return Err(ClientError::Validation("task team id is required".into()));
        }
        Ok(())
    }
}

/// Partial update for `PATCH /task/:id`. Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
    pub due_date: Option<String>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn assigned_to(mut self, member_id: impl Into<String>) -> Self {
        self.assigned_to = Some(member_id.into());
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }

    /// Query pairs for the set fields, in a fixed order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let fields: [(&str, Option<String>); 6] = [
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("status", self.status.map(|s| s.as_str().to_string())),
            ("priority", self.priority.map(|p| p.as_str().to_string())),
            ("assignedTo", self.assigned_to.clone()),
            ("dueDate", self.due_date.clone()),
        ];

        fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
            .collect()
    }
}
