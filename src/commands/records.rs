//! Record inspection commands.

use clap::{Args, Subcommand};

use openwatch_core::result::AppResult;
use openwatch_core::types::{RecordId, UserId};
use openwatch_entity::record::{RecordFilter, RecordStatus};

use super::App;
use crate::output;

/// Arguments for record commands
#[derive(Debug, Args)]
pub struct RecordsArgs {
    /// Record subcommand
    #[command(subcommand)]
    pub command: RecordsCommand,
}

/// Record subcommands
#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// List records, newest first
    List {
        /// Case-insensitive text to find in title or description
        #[arg(short, long)]
        search: Option<String>,
        /// Exact department
        #[arg(short, long)]
        department: Option<String>,
        /// Exact status (Active, Archived, "Under Review")
        #[arg(long)]
        status: Option<RecordStatus>,
        /// Creator user id
        #[arg(long)]
        created_by: Option<UserId>,
        /// Page number, starting at 1
        #[arg(short, long)]
        page: Option<u64>,
        /// Records per page
        #[arg(long)]
        page_size: Option<u64>,
    },
    /// Show one record
    Show {
        /// Record id
        id: RecordId,
    },
    /// Recompute a record's fingerprint and check it against its digest
    Verify {
        /// Record id
        id: RecordId,
    },
}

/// Execute record commands
pub async fn execute(args: &RecordsArgs, app: &App) -> AppResult<()> {
    match &args.command {
        RecordsCommand::List {
            search,
            department,
            status,
            created_by,
            page,
            page_size,
        } => {
            let filter = RecordFilter {
                search: search.clone(),
                department: department.clone(),
                status: *status,
                created_by: *created_by,
            };
            let page = app.records.page_request(*page, *page_size);
            let listing = app.records.list_records(&filter, page).await?;
            output::print_json(&listing);
        }
        RecordsCommand::Show { id } => {
            let response = app.records.get_record(*id).await?;
            output::print_json(&response);
        }
        RecordsCommand::Verify { id } => {
            let report = app.records.verify_record(*id).await?;
            output::print_json(&report);
        }
    }
    Ok(())
}
