//! Task management commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use taskping_core::store::{HttpTaskStore, TaskFilter, TaskStore};
use taskping_core::task::{Category, Priority, TaskDraft, TaskPatch};
use taskping_core::Config;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority: low, medium or high
        #[arg(long)]
        priority: Option<String>,
        /// Category: personal, work, shopping, health or other
        #[arg(long)]
        category: Option<String>,
        /// Due date (RFC 3339)
        #[arg(long)]
        due: Option<DateTime<Utc>>,
        /// Reminder time (RFC 3339); enables the reminder
        #[arg(long)]
        remind_at: Option<DateTime<Utc>>,
    },
    /// List tasks
    List {
        /// Filter: all, pending or completed
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: Uuid,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New reminder time (RFC 3339); enables the reminder
        #[arg(long)]
        remind_at: Option<DateTime<Utc>>,
        /// Disable the reminder
        #[arg(long, conflicts_with = "remind_at")]
        no_remind: bool,
    },
    /// Mark a task completed
    Complete {
        /// Task ID
        id: Uuid,
    },
    /// Reopen a completed task
    Reopen {
        /// Task ID
        id: Uuid,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: Uuid,
    },
}

pub async fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = HttpTaskStore::new(&config.api.base_url, config.api.token.clone())?;

    match action {
        TaskAction::Create {
            title,
            description,
            priority,
            category,
            due,
            remind_at,
        } => {
            let draft = TaskDraft {
                title,
                description,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                category: category.as_deref().map(parse_category).transpose()?,
                due_date: due,
                reminder_time: remind_at,
                reminder_enabled: remind_at.is_some(),
            };
            let task = store.create_task(&draft).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { filter } => {
            let filter = match filter.as_str() {
                "pending" => TaskFilter::Pending,
                "completed" => TaskFilter::Completed,
                _ => TaskFilter::All,
            };
            let tasks = store.list_tasks(filter).await?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Update {
            id,
            title,
            description,
            remind_at,
            no_remind,
        } => {
            let reminder_enabled = if no_remind {
                Some(false)
            } else {
                remind_at.map(|_| true)
            };
            let patch = TaskPatch {
                title,
                description,
                completed: None,
                reminder_time: remind_at,
                reminder_enabled,
            };
            let task = store.update_task(id, &patch).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Complete { id } => {
            let task = store.toggle_completed(id, true).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Reopen { id } => {
            let task = store.toggle_completed(id, false).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            store.delete_task(id).await?;
            println!("deleted {id}");
        }
    }

    Ok(())
}

fn parse_priority(value: &str) -> Result<Priority, Box<dyn std::error::Error>> {
    match value {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        other => Err(format!("unknown priority '{other}' (expected low, medium or high)").into()),
    }
}

fn parse_category(value: &str) -> Result<Category, Box<dyn std::error::Error>> {
    match value {
        "personal" => Ok(Category::Personal),
        "work" => Ok(Category::Work),
        "shopping" => Ok(Category::Shopping),
        "health" => Ok(Category::Health),
        "other" => Ok(Category::Other),
        unknown => Err(format!(
            "unknown category '{unknown}' (expected personal, work, shopping, health or other)"
        )
        .into()),
    }
}
