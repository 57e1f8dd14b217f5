//! Timer bookkeeping for scheduled reminders.
//!
//! The registry is deliberately dumb: it arms one-shot timers and maps task
//! ids to cancellation handles. Business rules (whether a task qualifies,
//! when to reschedule) live in the scheduler, which is the single ordering
//! authority for a task id's registry operations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::AbortHandle;
use uuid::Uuid;

struct Entry {
    /// Distinguishes this entry from earlier, superseded timers for the same
    /// task id: a stale fire must never remove or trigger for its successor.
    generation: u64,
    fire_at: DateTime<Utc>,
    handle: AbortHandle,
}

/// In-memory map from task id to its pending one-shot timer.
///
/// At most one entry exists per task id. [`ReminderRegistry::schedule`] does
/// not cancel an existing entry for the same id -- the caller pre-cleans
/// with [`ReminderRegistry::cancel`].
pub struct ReminderRegistry {
    entries: Arc<Mutex<HashMap<Uuid, Entry>>>,
    next_generation: AtomicU64,
}

impl ReminderRegistry {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm a one-shot timer that runs `on_fire` after `delay`.
    ///
    /// Must be called from within a tokio runtime. The entry removes itself
    /// when the timer elapses, before `on_fire` runs, so a fired reminder
    /// needs no explicit cancel afterwards.
    pub fn schedule(
        &self,
        task_id: Uuid,
        delay: Duration,
        fire_at: DateTime<Utc>,
        on_fire: impl FnOnce() + Send + 'static,
    ) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let entries = Arc::clone(&self.entries);
        // The lock is held across spawn + insert: a near-zero delay must not
        // let the timer observe the map before its own entry lands.
        let mut map = self.lock();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let current = {
                let mut map = entries.lock().unwrap_or_else(PoisonError::into_inner);
                match map.get(&task_id) {
                    Some(entry) if entry.generation == generation => {
                        map.remove(&task_id);
                        true
                    }
                    // Superseded while in flight; the newer entry owns the id.
                    _ => false,
                }
            };
            if current {
                on_fire();
            }
        })
        .abort_handle();
        map.insert(
            task_id,
            Entry {
                generation,
                fire_at,
                handle,
            },
        );
    }

    /// Stop and remove the timer for `task_id`. No-op when absent.
    pub fn cancel(&self, task_id: Uuid) {
        if let Some(entry) = self.lock().remove(&task_id) {
            entry.handle.abort();
        }
    }

    /// Cancel every entry and clear the mapping.
    pub fn cancel_all(&self) {
        for (_, entry) in self.lock().drain() {
            entry.handle.abort();
        }
    }

    pub fn contains(&self, task_id: Uuid) -> bool {
        self.lock().contains_key(&task_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The instant the pending timer for `task_id` will fire, if one exists.
    pub fn fire_time(&self, task_id: Uuid) -> Option<DateTime<Utc>> {
        self.lock().get(&task_id).map(|entry| entry.fire_at)
    }
}

impl Default for ReminderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ReminderRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
