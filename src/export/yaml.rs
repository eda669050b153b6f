//! YAML export of audit history
//!
//! Same envelope as the JSON export, rendered as YAML for people who read
//! their exports in an editor.

use std::io::Write;

use crate::error::{TrailError, TrailResult};

use super::json::AuditExport;

/// Write an audit export as YAML with a short comment header
pub fn export_audit_yaml<W: Write>(export: &AuditExport, writer: &mut W) -> TrailResult<()> {
    writeln!(writer, "# trailscope audit export")
        .map_err(|e| TrailError::Export(e.to_string()))?;
    writeln!(writer, "# Entity: {} ({})", export.entity_id, export.display_code)
        .map_err(|e| TrailError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| TrailError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| TrailError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| TrailError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ExportPayload;
    use serde_json::json;

    #[test]
    fn test_yaml_export() {
        let payload: ExportPayload = serde_json::from_value(json!({
            "data": [ { "tradingCode": "ABC123", "action": "CREATE" } ]
        }))
        .unwrap();
        let export = AuditExport::from_payload("CL-0007", "ABC123", payload);

        let mut output = Vec::new();
        export_audit_yaml(&export, &mut output).unwrap();

        let yaml_string = String::from_utf8(output).unwrap();
        assert!(yaml_string.contains("# trailscope audit export"));
        assert!(yaml_string.contains("ABC123"));

        let parsed: AuditExport = serde_yaml::from_str(&yaml_string).unwrap();
        assert_eq!(parsed.row_count, 1);
    }
}
