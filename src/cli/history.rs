//! Audit history CLI commands
//!
//! Fetches audit-trail pages from the platform API and prints them.

use clap::Subcommand;
use chrono::NaiveDate;

use crate::api::{ApiConfig, AuditApi};
use crate::audit::{AuditAction, AuditFilters, PAGE_SIZE};
use crate::config::Settings;
use crate::display::history::format_history_page;
use crate::error::{TrailError, TrailResult};
use crate::services::ClientService;
use crate::storage::Storage;

/// Audit history subcommands
#[derive(Subcommand)]
pub enum HistoryCommands {
    /// Show one page of a client's audit history
    Show {
        /// Client trading code or ID
        client: String,
        /// Page to fetch (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Only entries with this action (create, update, delete)
        #[arg(long)]
        action: Option<String>,
        /// Only entries recorded by this actor
        #[arg(long)]
        actor: Option<String>,
        /// Only entries on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Only entries on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
}

/// Handle a history command
pub fn handle_history_command(
    storage: &Storage,
    settings: &Settings,
    cmd: HistoryCommands,
) -> TrailResult<()> {
    match cmd {
        HistoryCommands::Show {
            client,
            page,
            action,
            actor,
            from,
            to,
        } => {
            let service = ClientService::new(storage);
            let found = service
                .find(&client)?
                .ok_or_else(|| TrailError::client_not_found(&client))?;

            let filters = parse_filters(
                action.as_deref(),
                actor.as_deref(),
                from.as_deref(),
                to.as_deref(),
            )?;

            let api = AuditApi::new(&ApiConfig::from_settings(settings))?;
            let page = page.max(1);
            let fetched = api.fetch_page(&found.id.to_string(), page, PAGE_SIZE, &filters)?;

            println!("Audit history for {}", found);
            println!();
            print!(
                "{}",
                format_history_page(
                    &fetched.logs,
                    page,
                    fetched.pagination.total_pages.max(1),
                    fetched.pagination.total_logs,
                )
            );
        }
    }

    Ok(())
}

/// Parse the shared filter options into audit filters
pub fn parse_filters(
    action: Option<&str>,
    actor: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> TrailResult<AuditFilters> {
    let mut filters = AuditFilters::default();

    if let Some(raw) = action {
        let parsed = AuditAction::parse(raw).ok_or_else(|| {
            TrailError::Validation(format!(
                "Invalid action: '{}'. Valid values: create, update, delete",
                raw
            ))
        })?;
        filters.action = Some(parsed);
    }

    if let Some(actor) = actor {
        let actor = actor.trim();
        if !actor.is_empty() {
            filters.actor = Some(actor.to_string());
        }
    }

    if let Some(raw) = from {
        filters.from = Some(parse_date(raw)?);
    }

    if let Some(raw) = to {
        filters.to = Some(parse_date(raw)?);
    }

    Ok(filters)
}

fn parse_date(raw: &str) -> TrailResult<NaiveDate> {
    raw.parse()
        .map_err(|_| TrailError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", raw)))
}
