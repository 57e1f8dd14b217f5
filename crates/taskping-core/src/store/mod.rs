//! Remote task store client.
//!
//! The task list is owned by a remote CRUD API; this module provides the
//! typed seam hosts call through, plus the HTTP implementation against the
//! `/api/tasks` surface. The reminder engine itself never talks to the
//! store -- hosts pass it the task snapshots these calls return.

mod http;

pub use http::HttpTaskStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::task::{Task, TaskDraft, TaskPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn as_query(&self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Pending => "pending",
            TaskFilter::Completed => "completed",
        }
    }
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, StoreError>;

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, StoreError>;

    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, StoreError>;

    async fn toggle_completed(&self, id: Uuid, completed: bool) -> Result<Task, StoreError>;

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError>;
}
