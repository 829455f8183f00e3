use chrono::{DateTime, Utc};
use clap::Subcommand;
use homeboard_core::notify::dispatch;
use homeboard_core::{Event, Notification, NotificationSink};
use std::future::Future;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{read_calendar, read_persons, Session};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Refresh, scan and display notifications until interrupted
    Watch,
    /// Run one scan and print what would be notified
    Scan {
        /// Instant to scan at (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display a test notification
    Test {
        /// Notification title
        #[arg(long, default_value = "Notification de test")]
        title: String,
    },
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        NotifyAction::Watch => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(watch())?;
        }
        NotifyAction::Scan { at, json } => {
            let now = match at.as_deref() {
                Some(raw) => DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| format!("invalid instant '{raw}': {e}"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let mut session = Session::open(now)?;
            let queued = session.dashboard.scan(now);

            if json {
                println!("{}", serde_json::to_string_pretty(&queued)?);
            } else if queued.is_empty() {
                println!("nothing due");
            } else {
                for event in &queued {
                    if let Event::NotificationQueued { event_id, kind, .. } = event {
                        println!("{kind}: {event_id}");
                    }
                }
            }
        }
        NotifyAction::Test { title } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(show_test(title))?;
        }
    }
    Ok(())
}

/// Prints notifications to stdout.
struct TerminalSink {
    bell: bool,
}

impl NotificationSink for TerminalSink {
    fn show(&mut self, notification: &Notification) {
        let mut out = std::io::stdout().lock();
        let bell = if self.bell { "\x07" } else { "" };
        // A closed stdout must not stop the queue.
        writeln!(out, "{bell}{}", notification.headline()).ok();
        if let Some(description) = &notification.event.description {
            writeln!(out, "    {description}").ok();
        }
        out.flush().ok();
    }

    fn hide(&mut self, notification: &Notification) {
        debug!(id = %notification.event.id, "notification hidden");
    }
}

async fn watch() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open(Utc::now())?;
    let mut sink = TerminalSink {
        bell: session.config.notifications.bell,
    };

    let refresh_every = Duration::from_secs(session.config.sources.refresh_interval_secs.max(1));
    let scan_every = Duration::from_secs(session.config.notifications.scan_interval_secs.max(1));
    let mut refresh = tokio::time::interval(refresh_every);
    let mut scan = tokio::time::interval(scan_every);
    let mut tick = tokio::time::interval(Duration::from_secs(1));

    let shutdown = shutdown_on(tokio::signal::ctrl_c());
    tokio::pin!(shutdown);

    info!("watching for notifications, press Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = refresh.tick() => {
                let config = &session.config;
                // Keep the previous data when a source cannot be read.
                let persons = read_persons(config)
                    .unwrap_or_else(|| session.dashboard.persons().to_vec());
                let calendar = read_calendar(config)
                    .unwrap_or_else(|| session.dashboard.calendar().to_vec());
                session.dashboard.refresh(persons, calendar, Utc::now());
            }
            _ = scan.tick() => {
                session.dashboard.scan(Utc::now());
            }
            _ = tick.tick() => {
                let events = session.dashboard.tick(Utc::now());
                dispatch(&events, &mut sink);
            }
            _ = &mut shutdown => {
                info!("stopping");
                break;
            }
        }
    }
    Ok(())
}

/// Resolves once `signal` fires. A failed handler registration is logged and
/// never resolves, so the watch keeps running until killed.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn show_test(title: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open(Utc::now())?;
    let mut sink = TerminalSink {
        bell: session.config.notifications.bell,
    };

    session.dashboard.test_notification(&title, Utc::now());
    let mut tick = tokio::time::interval(Duration::from_millis(250));
    while !session.dashboard.queue().is_idle() {
        tick.tick().await;
        let events = session.dashboard.tick(Utc::now());
        dispatch(&events, &mut sink);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_follows_the_signal() {
        let fired = tokio::time::timeout(Duration::from_millis(50), shutdown_on(async { Ok(()) })).await;
        assert!(fired.is_ok());
    }

    #[tokio::test]
    async fn failed_signal_registration_keeps_running() {
        let broken = async { Err(std::io::Error::other("no signal handler")) };
        let fired = tokio::time::timeout(Duration::from_millis(50), shutdown_on(broken)).await;
        assert!(fired.is_err());
    }
}
