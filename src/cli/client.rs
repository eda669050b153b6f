//! Client CLI commands
//!
//! Implements CLI commands for managing the client roster.

use clap::Subcommand;

use crate::display::client::{format_client_details, format_client_list, format_roster_stats};
use crate::error::TrailResult;
use crate::models::{AccountStatus, CallingStatus, FieldKind, FieldValue};
use crate::services::ClientService;
use crate::storage::Storage;

/// Client subcommands
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a new client
    Add {
        /// Trading code (stored uppercase, must be unique)
        trading_code: String,
        /// Client name
        name: String,
        /// Mobile number
        mobile: String,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
    },
    /// List clients
    List {
        /// Filter by account status (active, inactive)
        #[arg(short, long)]
        status: Option<String>,
        /// Filter by calling status (not_called, follow_up, payment_committed,
        /// payment_received, not_interested)
        #[arg(short, long)]
        calling: Option<String>,
    },
    /// Search clients by code, name, mobile or email
    Search {
        /// Search text (case-insensitive substring)
        query: String,
    },
    /// Show client details
    Show {
        /// Client trading code or ID
        client: String,
    },
    /// Edit a client's profile
    Edit {
        /// Client trading code or ID
        client: String,
        /// New trading code
        #[arg(long)]
        code: Option<String>,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New mobile number
        #[arg(short, long)]
        mobile: Option<String>,
        /// New email address (pass an empty string to clear)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Move a client to a new calling status
    SetStatus {
        /// Client trading code or ID
        client: String,
        /// Target status (not_called, follow_up, payment_committed,
        /// payment_received, not_interested)
        status: String,
        /// Date value for statuses that need one (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Amount value for statuses that need one
        #[arg(short, long)]
        amount: Option<f64>,
    },
    /// Mark a client's account active
    Activate {
        /// Client trading code or ID
        client: String,
    },
    /// Mark a client's account inactive
    Deactivate {
        /// Client trading code or ID
        client: String,
    },
    /// Delete a client from the roster
    Delete {
        /// Client trading code or ID
        client: String,
    },
    /// Show roster statistics
    Stats,
}

/// Handle a client command
pub fn handle_client_command(storage: &Storage, cmd: ClientCommands) -> TrailResult<()> {
    let service = ClientService::new(storage);

    match cmd {
        ClientCommands::Add {
            trading_code,
            name,
            mobile,
            email,
        } => {
            let client = service.create(&trading_code, &name, &mobile, email.as_deref())?;

            println!("Created client: {}", client.name);
            println!("  Trading Code: {}", client.trading_code);
            println!("  Mobile:       {}", client.mobile_no);
            if let Some(email) = &client.email {
                println!("  Email:        {}", email);
            }
            println!("  ID:           {}", client.id);
        }

        ClientCommands::List { status, calling } => {
            let account_status = status
                .as_deref()
                .map(|s| {
                    AccountStatus::parse(s).ok_or_else(|| {
                        crate::error::TrailError::Validation(format!(
                            "Invalid account status: '{}'. Valid values: active, inactive",
                            s
                        ))
                    })
                })
                .transpose()?;
            let calling_status = calling
                .as_deref()
                .map(|s| {
                    CallingStatus::parse(s).ok_or_else(|| {
                        crate::error::TrailError::Validation(format!(
                            "Invalid calling status: '{}'. Valid values: not_called, follow_up, \
                             payment_committed, payment_received, not_interested",
                            s
                        ))
                    })
                })
                .transpose()?;

            let clients = match (account_status, calling_status) {
                (Some(account), None) => service.filter_by_account_status(account)?,
                (None, Some(calling)) => service.filter_by_calling_status(calling)?,
                (Some(account), Some(calling)) => {
                    let mut clients = service.filter_by_account_status(account)?;
                    clients.retain(|c| c.calling_status == calling);
                    clients
                }
                (None, None) => service.list()?,
            };

            print!("{}", format_client_list(&clients));
        }

        ClientCommands::Search { query } => {
            let clients = service.search(&query)?;
            print!("{}", format_client_list(&clients));
        }

        ClientCommands::Show { client } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| crate::error::TrailError::client_not_found(&client))?;

            print!("{}", format_client_details(&found));
        }

        ClientCommands::Edit {
            client,
            code,
            name,
            mobile,
            email,
        } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| crate::error::TrailError::client_not_found(&client))?;

            if code.is_none() && name.is_none() && mobile.is_none() && email.is_none() {
                println!(
                    "No changes specified. Use --code, --name, --mobile or --email."
                );
                return Ok(());
            }

            let updated = service.update(
                found.id,
                code.as_deref(),
                name.as_deref(),
                mobile.as_deref(),
                email.as_deref(),
            )?;
            println!("Updated client: {}", updated);
        }

        ClientCommands::SetStatus {
            client,
            status,
            date,
            amount,
        } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| crate::error::TrailError::client_not_found(&client))?;

            let status = CallingStatus::parse(&status).ok_or_else(|| {
                crate::error::TrailError::Validation(format!(
                    "Invalid calling status: '{}'. Valid values: not_called, follow_up, \
                     payment_committed, payment_received, not_interested",
                    status
                ))
            })?;

            let mut values = Vec::new();
            for descriptor in status.conditional_fields() {
                match descriptor.kind {
                    FieldKind::Date => {
                        let raw = date.as_deref().ok_or_else(|| {
                            crate::error::TrailError::Validation(format!(
                                "{} is required. Pass it with --date YYYY-MM-DD",
                                descriptor.label
                            ))
                        })?;
                        let parsed = raw.parse().map_err(|_| {
                            crate::error::TrailError::Validation(format!(
                                "Invalid date: '{}'. Use YYYY-MM-DD",
                                raw
                            ))
                        })?;
                        values.push((descriptor.field, FieldValue::Date(parsed)));
                    }
                    FieldKind::Amount => {
                        let parsed = amount.ok_or_else(|| {
                            crate::error::TrailError::Validation(format!(
                                "{} is required. Pass it with --amount",
                                descriptor.label
                            ))
                        })?;
                        values.push((descriptor.field, FieldValue::Amount(parsed)));
                    }
                }
            }

            let updated = service.set_calling_status(found.id, status, &values)?;
            println!("Updated {}: {}", updated.trading_code, updated.calling_status);
            for descriptor in updated.calling_status.conditional_fields() {
                if let Some(value) = updated.conditional_value(descriptor.field) {
                    println!("  {}: {}", descriptor.label, value);
                }
            }
        }

        ClientCommands::Activate { client } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| crate::error::TrailError::client_not_found(&client))?;

            let updated = service.set_account_status(found.id, AccountStatus::Active)?;
            println!("Activated client: {}", updated);
        }

        ClientCommands::Deactivate { client } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| crate::error::TrailError::client_not_found(&client))?;

            let updated = service.set_account_status(found.id, AccountStatus::Inactive)?;
            println!("Deactivated client: {}", updated);
        }

        ClientCommands::Delete { client } => {
            let found = service
                .find(&client)?
                .ok_or_else(|| crate::error::TrailError::client_not_found(&client))?;

            service.delete(found.id)?;
            println!("Deleted client: {}", found);
        }

        ClientCommands::Stats => {
            let stats = service.stats()?;
            print!("{}", format_roster_stats(&stats));
        }
    }

    Ok(())
}
