// JSON bodies exchanged with the Google Tasks API.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const TASK_KIND: &str = "tasks#task";
pub const TASK_LIST_KIND: &str = "tasks#taskList";

/// RFC 3339 in UTC with a `Z` suffix, the format the API uses for every timestamp.
pub fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    #[default]
    NeedsAction,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBody {
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub kind: String,
    pub updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

impl TaskBody {
    pub fn new(title: &str) -> Self {
        Self::new_at(title, Utc::now())
    }

    pub fn new_at(title: &str, now: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            status: TaskStatus::NeedsAction,
            kind: TASK_KIND.to_string(),
            updated: rfc3339(now),
            parent: None,
            deleted: false,
            completed: None,
            due: None,
            notes: None,
            hidden: false,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(rfc3339(due));
        self
    }

    pub fn completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.status = TaskStatus::Completed;
        self.completed = Some(rfc3339(at));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListBody {
    pub kind: String,
    pub title: String,
    pub updated: String,
}

impl TaskListBody {
    pub fn new(title: &str) -> Self {
        Self {
            kind: TASK_LIST_KIND.to_string(),
            title: title.to_string(),
            updated: rfc3339(Utc::now()),
        }
    }
}

/// A task list as returned by the server. Only the fields we use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskListEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListPage {
    #[serde(default)]
    pub items: Vec<TaskListEntry>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A task as returned by the server after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTask {
    pub id: String,
    #[serde(default)]
    pub title: String,
}
