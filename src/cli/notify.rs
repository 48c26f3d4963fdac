//! Notification CLI commands

use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::display::format_notification_list;
use crate::models::NotificationId;

use super::CliContext;

/// Notification subcommands
#[derive(Subcommand)]
pub enum NotifyCommands {
    /// List notifications, newest first
    List {
        /// Only unread notifications
        #[arg(short, long)]
        unread: bool,
    },

    /// Number of unread notifications
    Count,

    /// Mark a notification as read
    Read {
        /// Notification ID
        id: String,
    },

    /// Mark every notification as read
    ReadAll,

    /// Delete a notification
    Delete {
        /// Notification ID
        id: String,
    },
}

fn parse_id(id: &str) -> Result<NotificationId> {
    NotificationId::parse(id).map_err(|_| anyhow!("invalid notification id: {}", id))
}

/// Handle a notification command
pub fn handle_notify_command(ctx: &CliContext<'_>, cmd: NotifyCommands) -> Result<()> {
    let user = ctx.current_user()?;
    let engine = ctx.engine;

    match cmd {
        NotifyCommands::List { unread } => ctx
            .out
            .emit(engine.list_notifications(user.id, unread), |n| format_notification_list(n)),

        NotifyCommands::Count => ctx
            .out
            .emit(engine.unread_notifications(user.id), |count| format!("{} unread", count)),

        NotifyCommands::Read { id } => {
            let id = parse_id(&id)?;
            ctx.out
                .emit(engine.mark_notification_read(user.id, id), |_| "Marked as read".to_string())
        }

        NotifyCommands::ReadAll => ctx.out.emit(engine.mark_all_notifications_read(user.id), |count| {
            format!("Marked {} notification(s) as read", count)
        }),

        NotifyCommands::Delete { id } => {
            let id = parse_id(&id)?;
            ctx.out
                .emit(engine.delete_notification(user.id, id), |_| "Notification deleted".to_string())
        }
    }
}
