//! Watch mode: arm reminders for the current task list and deliver them to
//! the terminal until interrupted.

use std::sync::Arc;

use clap::Args;
use taskping_core::reminder::{
    ConsoleSink, PermissionStatus, ReminderScheduler, StaticGate, SystemClock,
};
use taskping_core::store::{HttpTaskStore, TaskFilter, TaskStore};
use taskping_core::Config;
use tracing::info;

#[derive(Args)]
pub struct WatchArgs {
    /// Only watch pending tasks
    #[arg(long)]
    pub pending_only: bool,
}

pub async fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if !config.notifications.enabled {
        return Err("notifications are disabled in the configuration".into());
    }

    let store = HttpTaskStore::new(&config.api.base_url, config.api.token.clone())?;
    let filter = if args.pending_only {
        TaskFilter::Pending
    } else {
        TaskFilter::All
    };
    let tasks = store.list_tasks(filter).await?;

    // The terminal has no permission prompt to go through.
    let scheduler = ReminderScheduler::new(
        Arc::new(StaticGate(PermissionStatus::Granted)),
        Arc::new(ConsoleSink),
        Arc::new(SystemClock),
    );
    let report = scheduler.on_tasks_loaded(&tasks);
    info!(armed = report.armed, skipped = report.skipped, "watching reminders");
    println!(
        "{} reminder(s) armed, {} skipped; press ctrl-c to stop",
        report.armed, report.skipped
    );

    tokio::signal::ctrl_c().await?;
    scheduler.teardown_all();
    println!("stopped");
    Ok(())
}
