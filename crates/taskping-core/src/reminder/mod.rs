//! Reminder scheduling engine.
//!
//! Turns a task's `reminder_enabled` / `reminder_time` pair into a delivered
//! notification, staying consistent with a task list that is concurrently
//! created, edited, completed and deleted through the remote store.
//!
//! The engine is split into a dumb timer registry ([`ReminderRegistry`]) and
//! the scheduler that owns all business rules ([`ReminderScheduler`]), wired
//! to three injected seams: [`Clock`], [`PermissionGate`] and
//! [`NotificationSink`].

pub mod clock;
pub mod delivery;
pub mod permission;
pub mod registry;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use delivery::{ConsoleSink, NotificationSink};
pub use permission::{PermissionGate, PermissionStatus, StaticGate};
pub use registry::ReminderRegistry;
pub use scheduler::{ArmOutcome, Evaluation, ReminderScheduler, RestoreReport};
