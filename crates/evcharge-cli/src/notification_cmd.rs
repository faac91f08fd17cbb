//! Notification subcommands, including a foreground listener for the
//! realtime hub.

use std::io::{self, Write};

use tracing::info;

use evcharge_client::EvChargeApp;
use evcharge_client::notifications::HubState;
use evcharge_core::models::Notification;

use crate::fmt::notification_line;

#[derive(clap::Subcommand, Debug)]
pub enum NotificationAction {
    /// List notifications; unread ones are marked with `*`.
    List,
    /// Mark a notification as read.
    Read { id: String },
    /// Stay connected and print pushed notifications until Ctrl-C.
    Listen,
}

pub async fn run(action: NotificationAction, app: &EvChargeApp) -> anyhow::Result<()> {
    match action {
        NotificationAction::List => list(app).await,
        NotificationAction::Read { id } => {
            app.api().mark_notification_read(&id).await.into_result()?;
            app.bus().mark_one_read();
            writeln!(io::stdout(), "Marked {id} as read")?;
            Ok(())
        }
        NotificationAction::Listen => listen(app).await,
    }
}

async fn list(app: &EvChargeApp) -> anyhow::Result<()> {
    let resp = app.api().notifications().await.into_result()?;
    let notifications: Vec<Notification> = resp.decode()?;
    let unread = notifications.iter().filter(|n| !n.is_read).count();
    app.bus().set_unread(unread);

    let mut out = io::stdout();
    if notifications.is_empty() {
        writeln!(out, "No notifications")?;
        return Ok(());
    }
    for n in &notifications {
        writeln!(out, "{}", notification_line(n))?;
    }
    writeln!(out, "{unread} unread")?;
    Ok(())
}

async fn listen(app: &EvChargeApp) -> anyhow::Result<()> {
    let mut subscription = app.bus().subscribe().await;
    let mut state = app.hub().watch_state();
    app.hub().on_foreground().await?;

    let mut out = io::stdout();
    writeln!(out, "Listening for notifications (Ctrl-C to stop)")?;
    loop {
        tokio::select! {
            Some(n) = subscription.receiver.recv() => {
                writeln!(out, "{}", notification_line(&n))?;
            }
            changed = state.changed() => {
                if changed.is_err() || *state.borrow_and_update() == HubState::Disconnected {
                    writeln!(out, "Connection closed by server")?;
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    app.bus().unsubscribe(subscription.id).await;
    app.hub().on_background().await;
    Ok(())
}
