//! Notification delivery primitive.

/// Where fired reminders go.
///
/// Fire-and-forget from the scheduler's perspective: a failed delivery is
/// logged and the single fire is lost, nothing is retried or queued.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error>>;
}

/// Prints notifications to stdout. Used by the CLI watch mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn deliver(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error>> {
        println!("{title}\n  {body}");
        Ok(())
    }
}
