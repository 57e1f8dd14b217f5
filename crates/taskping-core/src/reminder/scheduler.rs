//! Reminder scheduling orchestration.
//!
//! Translates task lifecycle events (create, update, toggle-complete,
//! delete, bulk load) into registry operations and notification deliveries.
//!
//! ## Per-task state machine
//!
//! ```text
//! NoReminder -> Scheduled -> (Fired | Cancelled)
//! Cancelled  -> Scheduled     (task reopened while still qualifying)
//! ```
//!
//! A task qualifies for scheduling when its reminder is enabled, it is not
//! completed, and its reminder time is strictly in the future. Arming a new
//! reminder first resolves the permission gate, which may suspend on a
//! user-facing prompt; the task's qualifying state is re-validated after the
//! gate resolves, so a snapshot that went stale across the prompt never arms
//! a timer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use super::clock::Clock;
use super::delivery::NotificationSink;
use super::permission::{PermissionGate, PermissionStatus};
use super::registry::ReminderRegistry;
use crate::task::Task;

/// Result of a scheduling attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmOutcome {
    /// A timer is armed to fire at the contained instant.
    Armed { fire_at: DateTime<Utc> },
    /// The task does not qualify: reminder disabled, task completed, or the
    /// reminder time is not strictly in the future. Not an error.
    NotQualified,
    /// The permission gate does not report granted (the user denied the
    /// prompt, or the platform cannot show notifications). The caller should
    /// downgrade the task's `reminder_enabled` flag in the task store.
    PermissionDenied,
}

impl ArmOutcome {
    pub fn armed(&self) -> bool {
        matches!(self, ArmOutcome::Armed { .. })
    }
}

/// Outcome of the non-suspending first phase of scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub qualifies: bool,
    /// True when arming would first need to prompt the user.
    pub needs_permission: bool,
}

/// Summary of a bulk restore pass over a loaded task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub armed: usize,
    /// Reminder-carrying tasks that could not be armed: the reminder time
    /// elapsed while the app was closed (no catch-up delivery), the task is
    /// completed, or permission is not granted.
    pub skipped: usize,
}

/// Orchestration layer between task lifecycle events and the timer registry.
pub struct ReminderScheduler {
    registry: ReminderRegistry,
    permission: Arc<dyn PermissionGate>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl ReminderScheduler {
    pub fn new(
        permission: Arc<dyn PermissionGate>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry: ReminderRegistry::new(),
            permission,
            sink,
            clock,
        }
    }

    // ── Lifecycle entry points ───────────────────────────────────────

    /// A task was created. May prompt for notification permission.
    pub async fn on_task_created(&self, task: &Task) -> ArmOutcome {
        self.arm_checked(task).await
    }

    /// A task was edited. Reschedules (cancel + schedule) while the task
    /// still qualifies, cancels otherwise. May prompt when the reminder is
    /// newly enabled and permission was never asked.
    pub async fn on_task_updated(&self, task: &Task) -> ArmOutcome {
        self.arm_checked(task).await
    }

    /// A task's completion state flipped. Completing cancels any pending
    /// reminder in the same logical step; reopening re-arms from the task's
    /// original reminder time, without prompting.
    pub fn on_task_toggled(&self, task: &Task) -> ArmOutcome {
        if task.completed {
            self.registry.cancel(task.id);
            return ArmOutcome::NotQualified;
        }
        self.arm_if_granted(task)
    }

    /// A task was deleted. Drops its registry entry, if any.
    pub fn on_task_deleted(&self, task_id: Uuid) {
        self.registry.cancel(task_id);
    }

    /// The initial task list finished loading.
    pub fn on_tasks_loaded(&self, tasks: &[Task]) -> RestoreReport {
        self.restore_all(tasks)
    }

    /// Arm every qualifying task in `tasks`. Reminders that elapsed while
    /// the app was closed are skipped silently; this path never prompts.
    pub fn restore_all(&self, tasks: &[Task]) -> RestoreReport {
        let mut report = RestoreReport::default();
        for task in tasks {
            if !task.wants_reminder() {
                continue;
            }
            if self.arm_if_granted(task).armed() {
                report.armed += 1;
            } else {
                report.skipped += 1;
            }
        }
        debug!(armed = report.armed, skipped = report.skipped, "restored reminders");
        report
    }

    /// Tear down on host shutdown. Idempotent.
    pub fn teardown_all(&self) {
        self.registry.cancel_all();
    }

    // ── Two-phase permission protocol ────────────────────────────────

    /// Phase one: decide whether `task` qualifies right now and whether
    /// arming it would require a permission prompt. Never suspends.
    pub fn evaluate(&self, task: &Task) -> Evaluation {
        let qualifies = self.qualifies(task);
        Evaluation {
            qualifies,
            needs_permission: qualifies
                && self.permission.status() == PermissionStatus::NotAsked,
        }
    }

    /// Phase two: arm after the permission gate resolved. Re-validates the
    /// task against the current clock before touching the registry, so no
    /// timer is ever armed from a snapshot that stopped qualifying while the
    /// prompt was pending.
    pub fn arm_after_permission(&self, task: &Task, granted: bool) -> ArmOutcome {
        if !granted {
            self.registry.cancel(task.id);
            return ArmOutcome::PermissionDenied;
        }
        if !self.qualifies(task) {
            self.registry.cancel(task.id);
            return ArmOutcome::NotQualified;
        }
        self.arm(task)
    }

    // ── Registry inspection (hosts and tests) ────────────────────────

    pub fn is_scheduled(&self, task_id: Uuid) -> bool {
        self.registry.contains(task_id)
    }

    pub fn scheduled_count(&self) -> usize {
        self.registry.len()
    }

    pub fn scheduled_fire_time(&self, task_id: Uuid) -> Option<DateTime<Utc>> {
        self.registry.fire_time(task_id)
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn arm_checked(&self, task: &Task) -> ArmOutcome {
        if !self.qualifies(task) {
            // Disabled, completed or past due: make sure no stale timer
            // survives the event.
            self.registry.cancel(task.id);
            return ArmOutcome::NotQualified;
        }
        let granted = self.permission.check_or_request().await;
        self.arm_after_permission(task, granted)
    }

    /// Arm without ever prompting (restore and reopen paths).
    fn arm_if_granted(&self, task: &Task) -> ArmOutcome {
        if !self.qualifies(task) {
            self.registry.cancel(task.id);
            return ArmOutcome::NotQualified;
        }
        match self.permission.status() {
            PermissionStatus::Granted => self.arm(task),
            _ => ArmOutcome::PermissionDenied,
        }
    }

    fn qualifies(&self, task: &Task) -> bool {
        !task.completed
            && task.reminder_enabled
            && task
                .reminder_time
                .is_some_and(|at| at > self.clock.now())
    }

    fn arm(&self, task: &Task) -> ArmOutcome {
        let Some(fire_at) = task.reminder_time else {
            return ArmOutcome::NotQualified;
        };
        let delay = match (fire_at - self.clock.now()).to_std() {
            Ok(delay) => delay,
            // Raced into the past between qualification and here.
            Err(_) => return ArmOutcome::NotQualified,
        };

        // Cancel-then-schedule is the only way a fire time ever changes.
        self.registry.cancel(task.id);

        let title = notification_title(&task.title);
        let body = notification_body(task.description.as_deref());
        let sink = Arc::clone(&self.sink);
        let task_id = task.id;
        self.registry.schedule(task.id, delay, fire_at, move || {
            debug!(%task_id, "reminder fired");
            if let Err(err) = sink.deliver(&title, &body) {
                // A lost notification is accepted; entries for other tasks
                // are unaffected.
                warn!(%task_id, error = %err, "notification delivery failed");
            }
        });
        debug!(%task_id, %fire_at, "reminder armed");
        ArmOutcome::Armed { fire_at }
    }
}

fn notification_title(task_title: &str) -> String {
    format!("⏰ Reminder: {task_title}")
}

fn notification_body(description: Option<&str>) -> String {
    description
        .filter(|text| !text.is_empty())
        .unwrap_or("You have a task due soon!")
        .to_string()
}
