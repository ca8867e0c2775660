//! Audit trail commands.
//!
//! The system-wide log is admin only; the CLI queries it as the demo admin.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use openwatch_core::result::AppResult;
use openwatch_core::types::{AuditEntryId, RecordId, UserId};
use openwatch_entity::audit::{AuditAction, AuditFilter};

use super::App;
use crate::output;

/// Arguments for audit commands
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Audit subcommand
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// Audit subcommands
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// Every entry for one record, newest first
    Trail {
        /// Record id (deleted records keep their trail)
        record_id: RecordId,
    },
    /// Show one audit entry
    Show {
        /// Audit entry id
        id: AuditEntryId,
    },
    /// Search the system-wide audit log
    List {
        /// CREATE, UPDATE or DELETE
        #[arg(short, long)]
        action: Option<AuditAction>,
        /// Acting user id
        #[arg(short, long)]
        user_id: Option<UserId>,
        /// Earliest timestamp (RFC 3339)
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Latest timestamp (RFC 3339)
        #[arg(long)]
        to: Option<DateTime<Utc>>,
        /// Page number, starting at 1
        #[arg(short, long)]
        page: Option<u64>,
        /// Entries per page
        #[arg(long)]
        page_size: Option<u64>,
    },
}

/// Execute audit commands
pub async fn execute(args: &AuditArgs, app: &App) -> AppResult<()> {
    match &args.command {
        AuditCommand::Trail { record_id } => {
            let trail = app.audit.trail(*record_id).await?;
            output::print_json(&trail);
        }
        AuditCommand::Show { id } => {
            let entry = app.audit.get_entry(*id).await?;
            output::print_json(&entry);
        }
        AuditCommand::List {
            action,
            user_id,
            from,
            to,
            page,
            page_size,
        } => {
            let filter = AuditFilter {
                action: *action,
                user_id: *user_id,
                start_date: *from,
                end_date: *to,
            };
            let page = app.audit.page_request(*page, *page_size);
            let entries = app.audit.query(&app.actors.admin, &filter, page).await?;
            output::print_json(&entries);
        }
    }
    Ok(())
}
