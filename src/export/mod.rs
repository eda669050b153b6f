//! Export module for trailscope
//!
//! Writes fetched audit history to files in multiple formats:
//! - CSV: the audit trail as a spreadsheet, every cell quoted
//! - JSON: machine-readable export with provenance metadata
//! - YAML: the same envelope, human-readable

use chrono::{DateTime, Utc};

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::write_audit_csv;
pub use json::{export_audit_json, AuditExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_audit_yaml;

/// File name for an export: `audit-log-<displayCode>-<timestamp>.<ext>`.
///
/// The timestamp is the basic ISO-8601 form in UTC, which contains no
/// colons (e.g., `20250305T143000Z`).
pub fn export_filename(display_code: &str, extension: &str, at: DateTime<Utc>) -> String {
    format!(
        "audit-log-{}-{}.{}",
        display_code,
        at.format("%Y%m%dT%H%M%SZ"),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename() {
        let at: DateTime<Utc> = "2025-03-05T14:30:00Z".parse().unwrap();
        assert_eq!(
            export_filename("ACME", "csv", at),
            "audit-log-ACME-20250305T143000Z.csv"
        );
        assert_eq!(
            export_filename("ACME", "yaml", at),
            "audit-log-ACME-20250305T143000Z.yaml"
        );
    }
}
