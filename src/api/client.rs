//! Audit API client
//!
//! Blocking HTTP client for the platform's audit-log endpoints. Failures
//! surface as [`TrailError::Api`]; the silent-containment policy for the
//! interactive viewer lives with its caller, not here.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::audit::{AuditFilters, AuditLogEntry};
use crate::config::Settings;
use crate::error::{TrailError, TrailResult};

/// Connection parameters for the audit API, resolved once at startup
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API (e.g., `http://localhost:5000/api`)
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Build the config from persisted settings plus the env override
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.effective_base_url(),
            timeout_secs: settings.api.timeout_secs,
        }
    }
}

/// One page of audit history as served by the list endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuditPage {
    /// Entries for the requested page, newest first
    #[serde(default)]
    pub logs: Vec<AuditLogEntry>,

    /// Paging counters
    #[serde(default)]
    pub pagination: PaginationInfo,
}

/// Pagination block of the list response
///
/// The server sends more counters than these; only the ones the client
/// uses are decoded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    /// Total number of pages for the current query
    #[serde(default)]
    pub total_pages: u32,

    /// Total number of entries across all pages, when reported
    #[serde(default)]
    pub total_logs: Option<u64>,
}

/// Flat row-oriented payload from the export endpoint
///
/// Rows are kept as ordered JSON maps so the exported column order matches
/// the server's key order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExportPayload {
    /// Export rows; the column set is derived from the first row's keys
    #[serde(default)]
    pub data: Vec<Map<String, Value>>,
}

/// HTTP client for the audit-log endpoints
#[derive(Debug)]
pub struct AuditApi {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl AuditApi {
    /// Create a client from the resolved API configuration
    pub fn new(config: &ApiConfig) -> TrailResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TrailError::Api(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Base URL requests are issued against, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of audit history for an entity.
    ///
    /// Filter criteria are forwarded as query parameters alongside the
    /// paging parameters.
    pub fn fetch_page(
        &self,
        entity_id: &str,
        page: u32,
        limit: u32,
        filters: &AuditFilters,
    ) -> TrailResult<AuditPage> {
        let url = format!("{}/audit-logs/client/{}", self.base_url, entity_id);
        let mut query: Vec<(&str, String)> =
            vec![("page", page.to_string()), ("limit", limit.to_string())];
        query.extend(filters.query_params());

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .map_err(|e| TrailError::Api(format!("Failed to reach audit API: {}", e)))?;
        let response = check_status(response, "Audit history")?;

        response
            .json::<AuditPage>()
            .map_err(|e| TrailError::Api(format!("Failed to decode audit history: {}", e)))
    }

    /// Fetch the flat export payload for an entity, with the same filter
    /// criteria the history view uses.
    pub fn fetch_export(
        &self,
        entity_id: &str,
        filters: &AuditFilters,
    ) -> TrailResult<ExportPayload> {
        let url = format!("{}/audit-logs/export", self.base_url);
        let mut query: Vec<(&str, String)> = vec![("clientId", entity_id.to_string())];
        query.extend(filters.query_params());

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .map_err(|e| TrailError::Api(format!("Failed to reach audit API: {}", e)))?;
        let response = check_status(response, "Audit export")?;

        response
            .json::<ExportPayload>()
            .map_err(|e| TrailError::Api(format!("Failed to decode audit export: {}", e)))
    }
}

/// Turn a non-2xx response into an error carrying the status and a body
/// excerpt for the log.
fn check_status(
    response: reqwest::blocking::Response,
    what: &str,
) -> TrailResult<reqwest::blocking::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        let excerpt: String = body.chars().take(200).collect();
        return Err(TrailError::Api(format!(
            "{} request failed with HTTP {}: {}",
            what, status, excerpt
        )));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            timeout_secs: 5,
        };
        let api = AuditApi::new(&config).unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn test_audit_page_deserializes_from_server_shape() {
        let payload = json!({
            "logs": [
                {
                    "id": "665f1c2e9b3a7d0012ab34cd",
                    "entityId": "CL-0007",
                    "action": "CREATE",
                    "createdAt": "2025-03-01T09:00:00Z"
                }
            ],
            "pagination": { "totalPages": 9, "totalLogs": 173, "currentPage": 1 }
        });

        let page: AuditPage = serde_json::from_value(payload).unwrap();
        assert_eq!(page.logs.len(), 1);
        assert_eq!(page.pagination.total_pages, 9);
        assert_eq!(page.pagination.total_logs, Some(173));
    }

    #[test]
    fn test_audit_page_tolerates_missing_fields() {
        let page: AuditPage = serde_json::from_value(json!({})).unwrap();
        assert!(page.logs.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[test]
    fn test_export_payload_preserves_key_order() {
        let payload: ExportPayload = serde_json::from_value(json!({
            "data": [
                { "tradingCode": "ABC123", "action": "UPDATE", "actor": "Jordan" }
            ]
        }))
        .unwrap();

        let keys: Vec<&String> = payload.data[0].keys().collect();
        assert_eq!(keys, ["tradingCode", "action", "actor"]);
    }

    #[test]
    fn test_export_payload_tolerates_missing_data() {
        let payload: ExportPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.data.is_empty());
    }
}
