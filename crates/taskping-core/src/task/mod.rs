//! Task data model.
//!
//! Tasks are owned by the remote task store; the reminder engine only ever
//! reads snapshots of them. Fields serialize in camelCase to match the HTTP
//! API's wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Default for Status {
    fn default() -> Self {
        Status::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Personal,
    Work,
    Shopping,
    Health,
    Other,
}

impl Default for Category {
    fn default() -> Self {
        Category::Personal
    }
}

/// A task snapshot as the store reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// When to deliver the reminder notification, if one is requested.
    #[serde(default)]
    pub reminder_time: Option<DateTime<Utc>>,
    /// Whether a reminder is requested at all.
    #[serde(default)]
    pub reminder_enabled: bool,
}

impl Task {
    /// A fresh pending task with default attributes.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            priority: Priority::default(),
            status: Status::default(),
            category: Category::default(),
            due_date: None,
            completed: false,
            created_at: now,
            updated_at: now,
            reminder_time: None,
            reminder_enabled: false,
        }
    }

    /// Whether the task carries a reminder request at all.
    ///
    /// Whether the request *qualifies* additionally depends on completion
    /// state and the current time; that decision belongs to the scheduler.
    pub fn wants_reminder(&self) -> bool {
        self.reminder_enabled && self.reminder_time.is_some()
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,
    pub reminder_enabled: bool,
}

/// Partial update payload (PATCH). Unset fields are left untouched by the
/// store.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_enabled: Option<bool>,
}

/// Aggregate counts over a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            match task.status {
                Status::Completed => stats.completed += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Pending => stats.pending += 1,
            }
            match task.priority {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
        }
        stats
    }
}
