//! JSON export of audit history
//!
//! Wraps the flat export payload in an envelope with provenance metadata,
//! so a saved export still says which entity it belongs to and when it was
//! taken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;

use crate::api::ExportPayload;
use crate::error::{TrailError, TrailResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Audit export envelope for the structured formats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Entity the history belongs to
    pub entity_id: String,

    /// Display code of the entity
    pub display_code: String,

    /// Number of exported rows
    pub row_count: usize,

    /// The export rows as served by the API
    pub data: Vec<Map<String, Value>>,
}

impl AuditExport {
    /// Build the envelope around a fetched export payload
    pub fn from_payload(
        entity_id: impl Into<String>,
        display_code: impl Into<String>,
        payload: ExportPayload,
    ) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            entity_id: entity_id.into(),
            display_code: display_code.into(),
            row_count: payload.data.len(),
            data: payload.data,
        }
    }
}

/// Write an audit export as JSON
pub fn export_audit_json<W: Write>(
    export: &AuditExport,
    writer: &mut W,
    pretty: bool,
) -> TrailResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, export)
    } else {
        serde_json::to_writer(writer, export)
    }
    .map_err(|e| TrailError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> ExportPayload {
        serde_json::from_value(json!({
            "data": [
                { "tradingCode": "ABC123", "action": "UPDATE" },
                { "tradingCode": "ABC123", "action": "DELETE" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_envelope_from_payload() {
        let export = AuditExport::from_payload("CL-0007", "ABC123", sample_payload());
        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.entity_id, "CL-0007");
        assert_eq!(export.row_count, 2);
        assert_eq!(export.data.len(), 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let export = AuditExport::from_payload("CL-0007", "ABC123", sample_payload());

        let mut output = Vec::new();
        export_audit_json(&export, &mut output, true).unwrap();

        let parsed: AuditExport = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.display_code, "ABC123");
        assert_eq!(parsed.data[0]["tradingCode"], "ABC123");
    }
}
