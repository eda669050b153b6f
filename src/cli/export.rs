//! CLI commands for audit history export
//!
//! Fetches a client's full (filtered) audit history from the platform API
//! and writes it to a file in the chosen format.

use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::api::{ApiConfig, AuditApi};
use crate::cli::history::parse_filters;
use crate::config::Settings;
use crate::error::TrailResult;
use crate::export::{csv, export_filename, json, yaml};
use crate::services::ClientService;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV with every cell quoted
    Csv,
    /// JSON envelope with export metadata
    Json,
    /// YAML envelope, human-readable
    Yaml,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export a client's audit history to a file
    History {
        /// Client trading code or ID
        client: String,

        /// Output file path (defaults to a timestamped file in the
        /// export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

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

/// Handle an export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> TrailResult<()> {
    match cmd {
        ExportCommands::History {
            client,
            output,
            format,
            pretty,
            action,
            actor,
            from,
            to,
        } => {
            let service = ClientService::new(storage);
            let found = service
                .find(&client)?
                .ok_or_else(|| crate::error::TrailError::client_not_found(&client))?;

            let filters = parse_filters(
                action.as_deref(),
                actor.as_deref(),
                from.as_deref(),
                to.as_deref(),
            )?;

            let api = AuditApi::new(&ApiConfig::from_settings(settings))?;
            let entity_id = found.id.to_string();
            let payload = api.fetch_export(&entity_id, &filters)?;
            let row_count = payload.data.len();

            let output = match output {
                Some(path) => path,
                None => storage.paths().export_dir().join(export_filename(
                    &found.trading_code,
                    format.extension(),
                    chrono::Utc::now(),
                )),
            };

            let file = File::create(&output).map_err(|e| {
                crate::error::TrailError::Export(format!(
                    "Failed to create file {}: {}",
                    output.display(),
                    e
                ))
            })?;
            let mut writer = BufWriter::new(file);

            match format {
                ExportFormat::Csv => {
                    csv::write_audit_csv(&payload, &mut writer)?;
                }
                ExportFormat::Json => {
                    let export = json::AuditExport::from_payload(
                        entity_id.as_str(),
                        found.trading_code.as_str(),
                        payload,
                    );
                    json::export_audit_json(&export, &mut writer, pretty)?;
                }
                ExportFormat::Yaml => {
                    let export = json::AuditExport::from_payload(
                        entity_id.as_str(),
                        found.trading_code.as_str(),
                        payload,
                    );
                    yaml::export_audit_yaml(&export, &mut writer)?;
                }
            }

            println!(
                "Exported {} audit entries to: {}",
                row_count,
                output.display()
            );
        }
    }

    Ok(())
}
