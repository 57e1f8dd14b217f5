//! Integration tests for the reminder scheduling engine.
//!
//! Tokio's paused clock drives the timers while a manual clock drives the
//! scheduler's notion of "now"; tests advance both in lockstep, so no test
//! ever waits on the real wall clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use taskping_core::reminder::{
    ArmOutcome, ManualClock, NotificationSink, PermissionGate, PermissionStatus,
    ReminderScheduler, StaticGate,
};
use taskping_core::task::Task;

/// Records every delivered notification.
#[derive(Default)]
struct RecordingSink {
    delivered: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    fn deliveries(&self) -> Vec<(String, String)> {
        self.delivered.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn deliver(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.delivered
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }
}

/// Gate that starts unanswered and resolves every prompt with a fixed
/// answer, counting how often the user was actually prompted.
struct PromptGate {
    answer: PermissionStatus,
    state: Mutex<PermissionStatus>,
    prompts: AtomicUsize,
}

impl PromptGate {
    fn resolving_to(answer: PermissionStatus) -> Self {
        Self {
            answer,
            state: Mutex::new(PermissionStatus::NotAsked),
            prompts: AtomicUsize::new(0),
        }
    }

    fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionGate for PromptGate {
    fn status(&self) -> PermissionStatus {
        *self.state.lock().unwrap()
    }

    async fn request(&self) -> PermissionStatus {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        *self.state.lock().unwrap() = self.answer;
        self.answer
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn harness(
    gate: Arc<dyn PermissionGate>,
) -> (Arc<ManualClock>, Arc<RecordingSink>, ReminderScheduler) {
    let clock = Arc::new(ManualClock::new(t0()));
    let sink = Arc::new(RecordingSink::default());
    let scheduler = ReminderScheduler::new(gate, sink.clone(), clock.clone());
    (clock, sink, scheduler)
}

fn granted_harness() -> (Arc<ManualClock>, Arc<RecordingSink>, ReminderScheduler) {
    harness(Arc::new(StaticGate(PermissionStatus::Granted)))
}

fn reminder_task(title: &str, offset: Duration) -> Task {
    let mut task = Task::new(title);
    task.description = Some(format!("{title} details"));
    task.reminder_enabled = true;
    task.reminder_time = Some(t0() + offset);
    task
}

/// Advance both the tokio clock and the scheduler's clock by `secs`.
async fn advance(clock: &ManualClock, secs: u64) {
    clock.advance(Duration::seconds(secs as i64));
    tokio::time::sleep(StdDuration::from_secs(secs)).await;
}

#[tokio::test(start_paused = true)]
async fn fires_once_and_drops_entry() {
    let (clock, sink, scheduler) = granted_harness();
    let task = reminder_task("t1", Duration::seconds(60));

    let outcome = scheduler.on_task_created(&task).await;
    assert!(outcome.armed());
    assert!(scheduler.is_scheduled(task.id));
    assert_eq!(scheduler.scheduled_count(), 1);

    advance(&clock, 61).await;
    let deliveries = sink.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, "⏰ Reminder: t1");
    assert_eq!(deliveries[0].1, "t1 details");
    assert!(!scheduler.is_scheduled(task.id));

    // One-shot: nothing further ever fires for this scheduling instance.
    advance(&clock, 600).await;
    assert_eq!(sink.deliveries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn completing_cancels_pending_reminder() {
    let (clock, sink, scheduler) = granted_harness();
    let mut task = reminder_task("t2", Duration::seconds(120));

    assert!(scheduler.on_task_created(&task).await.armed());

    advance(&clock, 30).await;
    task.completed = true;
    assert_eq!(scheduler.on_task_toggled(&task), ArmOutcome::NotQualified);
    assert!(!scheduler.is_scheduled(task.id));

    advance(&clock, 120).await;
    assert!(sink.deliveries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn deleting_cancels_pending_reminder() {
    let (clock, sink, scheduler) = granted_harness();
    let task = reminder_task("doomed", Duration::seconds(60));

    assert!(scheduler.on_task_created(&task).await.armed());
    scheduler.on_task_deleted(task.id);
    assert_eq!(scheduler.scheduled_count(), 0);

    advance(&clock, 120).await;
    assert!(sink.deliveries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn past_due_reminder_never_arms() {
    let (_clock, _sink, scheduler) = granted_harness();
    let task = reminder_task("too late", Duration::seconds(-5));

    assert_eq!(
        scheduler.on_task_created(&task).await,
        ArmOutcome::NotQualified
    );
    assert_eq!(scheduler.scheduled_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn reschedule_fires_at_new_time_only() {
    let (clock, sink, scheduler) = granted_harness();
    let mut task = reminder_task("t4", Duration::seconds(60));

    assert!(scheduler.on_task_created(&task).await.armed());

    // Ten seconds in, move the reminder from +60s to +90s.
    advance(&clock, 10).await;
    task.reminder_time = Some(t0() + Duration::seconds(90));
    let outcome = scheduler.on_task_updated(&task).await;
    assert_eq!(
        outcome,
        ArmOutcome::Armed {
            fire_at: t0() + Duration::seconds(90)
        }
    );
    assert_eq!(scheduler.scheduled_count(), 1);
    assert_eq!(
        scheduler.scheduled_fire_time(task.id),
        Some(t0() + Duration::seconds(90))
    );

    // Nothing at the original time...
    advance(&clock, 55).await;
    assert!(sink.deliveries().is_empty());

    // ...exactly one delivery at the new one.
    advance(&clock, 30).await;
    assert_eq!(sink.deliveries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn disabling_reminder_cancels() {
    let (clock, sink, scheduler) = granted_harness();
    let mut task = reminder_task("quiet", Duration::seconds(60));

    assert!(scheduler.on_task_created(&task).await.armed());
    task.reminder_enabled = false;
    assert_eq!(
        scheduler.on_task_updated(&task).await,
        ArmOutcome::NotQualified
    );
    assert_eq!(scheduler.scheduled_count(), 0);

    advance(&clock, 120).await;
    assert!(sink.deliveries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn denied_permission_arms_nothing_and_never_reprompts() {
    let gate = Arc::new(PromptGate::resolving_to(PermissionStatus::Denied));
    let (_clock, _sink, scheduler) = harness(gate.clone());
    let task = reminder_task("t3", Duration::seconds(60));

    assert_eq!(
        scheduler.on_task_created(&task).await,
        ArmOutcome::PermissionDenied
    );
    assert_eq!(scheduler.scheduled_count(), 0);
    assert_eq!(gate.prompt_count(), 1);

    // The denial is cached; a second attempt fails without prompting again.
    assert_eq!(
        scheduler.on_task_updated(&task).await,
        ArmOutcome::PermissionDenied
    );
    assert_eq!(gate.prompt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn prompt_happens_once_across_tasks() {
    let gate = Arc::new(PromptGate::resolving_to(PermissionStatus::Granted));
    let (_clock, _sink, scheduler) = harness(gate.clone());

    let first = reminder_task("first", Duration::seconds(60));
    let second = reminder_task("second", Duration::seconds(90));
    assert!(scheduler.on_task_created(&first).await.armed());
    assert!(scheduler.on_task_created(&second).await.armed());

    assert_eq!(scheduler.scheduled_count(), 2);
    assert_eq!(gate.prompt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn restore_skips_elapsed_reminders() {
    let (_clock, _sink, scheduler) = granted_harness();
    let tasks = vec![
        reminder_task("soon", Duration::seconds(300)),
        reminder_task("later", Duration::seconds(600)),
        reminder_task("missed while closed", Duration::seconds(-60)),
        Task::new("no reminder at all"),
    ];

    let report = scheduler.on_tasks_loaded(&tasks);
    assert_eq!(report.armed, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(scheduler.scheduled_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn restore_is_idempotent() {
    let (clock, sink, scheduler) = granted_harness();
    let tasks = vec![
        reminder_task("a", Duration::seconds(300)),
        reminder_task("b", Duration::seconds(600)),
    ];

    let first = scheduler.restore_all(&tasks);
    let second = scheduler.restore_all(&tasks);
    assert_eq!(first, second);
    assert_eq!(scheduler.scheduled_count(), 2);

    // Each task still delivers exactly once.
    advance(&clock, 700).await;
    assert_eq!(sink.deliveries().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn teardown_clears_all_and_is_idempotent() {
    let (clock, sink, scheduler) = granted_harness();
    for offset in [60, 120, 180] {
        let task = reminder_task("task", Duration::seconds(offset));
        assert!(scheduler.on_task_created(&task).await.armed());
    }
    assert_eq!(scheduler.scheduled_count(), 3);

    scheduler.teardown_all();
    assert_eq!(scheduler.scheduled_count(), 0);
    scheduler.teardown_all();
    assert_eq!(scheduler.scheduled_count(), 0);

    advance(&clock, 300).await;
    assert!(sink.deliveries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reopening_rearms_from_original_time() {
    let (clock, sink, scheduler) = granted_harness();
    let mut task = reminder_task("revived", Duration::seconds(120));

    task.completed = true;
    assert_eq!(
        scheduler.on_task_created(&task).await,
        ArmOutcome::NotQualified
    );
    assert_eq!(scheduler.scheduled_count(), 0);

    // Reopened while the original reminder time is still in the future.
    task.completed = false;
    let outcome = scheduler.on_task_toggled(&task);
    assert_eq!(
        outcome,
        ArmOutcome::Armed {
            fire_at: t0() + Duration::seconds(120)
        }
    );

    advance(&clock, 121).await;
    assert_eq!(sink.deliveries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn reopening_with_elapsed_time_arms_nothing() {
    let (clock, sink, scheduler) = granted_harness();
    let mut task = reminder_task("too old to revive", Duration::seconds(30));

    task.completed = true;
    scheduler.on_task_toggled(&task);

    // The original reminder time passes while the task sits completed.
    advance(&clock, 60).await;
    task.completed = false;
    assert_eq!(scheduler.on_task_toggled(&task), ArmOutcome::NotQualified);
    assert_eq!(scheduler.scheduled_count(), 0);

    advance(&clock, 60).await;
    assert!(sink.deliveries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn at_most_one_entry_per_task_across_event_storm() {
    let (clock, _sink, scheduler) = granted_harness();
    let mut task = reminder_task("busy", Duration::seconds(600));

    assert!(scheduler.on_task_created(&task).await.armed());
    for bump in 1..=5 {
        task.reminder_time = Some(t0() + Duration::seconds(600 + bump));
        assert!(scheduler.on_task_updated(&task).await.armed());
        assert_eq!(scheduler.scheduled_count(), 1);
    }

    // Last writer wins: the final update defines the fire time.
    assert_eq!(
        scheduler.scheduled_fire_time(task.id),
        Some(t0() + Duration::seconds(605))
    );
    advance(&clock, 1).await;
    assert_eq!(scheduler.scheduled_count(), 1);
}
