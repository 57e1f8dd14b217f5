//! # Taskping Core Library
//!
//! Core business logic for Taskping, a personal task manager with local
//! reminder notifications. The task list itself lives behind a remote CRUD
//! API; this crate owns everything that happens around it:
//!
//! - **Reminder engine**: an in-memory registry of one-shot timers plus the
//!   scheduler that keeps those timers consistent with task create / edit /
//!   complete / delete / bulk-load events, coordinated with an asynchronous
//!   notification-permission flow
//! - **Task store client**: typed HTTP client for the `/api/tasks` surface
//! - **Storage**: TOML-based configuration
//!
//! Hosts (the CLI, a desktop shell) stay thin: they forward task lifecycle
//! events to [`ReminderScheduler`] and supply the platform seams -- a
//! [`NotificationSink`], a [`PermissionGate`] and a [`Clock`].

pub mod error;
pub mod reminder;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{ConfigError, CoreError, StoreError};
pub use reminder::{
    ArmOutcome, Clock, ConsoleSink, ManualClock, NotificationSink, PermissionGate,
    PermissionStatus, ReminderRegistry, ReminderScheduler, RestoreReport, StaticGate,
    SystemClock,
};
pub use storage::Config;
pub use store::{HttpTaskStore, TaskFilter, TaskStore};
pub use task::{Category, Priority, Status, Task, TaskDraft, TaskPatch, TaskStats};
