//! Audit entry data structures
//!
//! Defines the wire format of audit log entries as served by the platform's
//! audit API: the action kind, field-level change records, and the entry
//! envelope itself. Field names follow the server's camelCase convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a value panel shows when the recorded value is blank or missing
pub const EMPTY_VALUE_PLACEHOLDER: &str = "Empty";

/// Timestamp format used everywhere an entry timestamp is shown
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M";

/// Kind of mutation an audit entry records
///
/// The server currently emits `CREATE`, `UPDATE` and `DELETE`; anything
/// else deserializes to [`AuditAction::Unknown`] so a new server-side
/// action never breaks rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    /// Entity was created
    Create,
    /// Entity was updated
    Update,
    /// Entity was deleted
    Delete,
    /// Unrecognized action string
    #[serde(other)]
    Unknown,
}

impl AuditAction {
    /// Parse an action from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Delete => write!(f, "DELETE"),
            AuditAction::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A single field-level before/after diff within an audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Machine key of the mutated attribute
    pub field: String,

    /// Human-readable label for display
    #[serde(default)]
    pub field_label: Option<String>,

    /// Stringified value before the change; blank and absent both exist
    #[serde(default)]
    pub old_value: Option<String>,

    /// Stringified value after the change
    #[serde(default)]
    pub new_value: Option<String>,
}

impl ChangeRecord {
    /// Label to display for this change, falling back to the machine key
    pub fn label(&self) -> &str {
        match &self.field_label {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.field,
        }
    }

    /// Old value in display form; blank values show as "Empty"
    pub fn display_old(&self) -> &str {
        display_value(&self.old_value)
    }

    /// New value in display form; blank values show as "Empty"
    pub fn display_new(&self) -> &str {
        display_value(&self.new_value)
    }
}

fn display_value(value: &Option<String>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => EMPTY_VALUE_PLACEHOLDER,
    }
}

/// Request context captured alongside the mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetadata {
    /// Address the mutation request came from
    #[serde(default)]
    pub ip_address: Option<String>,

    /// User agent of the mutation request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// When the underlying mutation happened, as opposed to when the
    /// audit entry was recorded
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// One immutable audit log entry
///
/// Records a single create/update/delete action on a tracked entity,
/// together with the field-level diffs for updates. Entries are written
/// only by the platform backend; this client never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Server-assigned identifier
    pub id: String,

    /// Identifier of the tracked entity this entry belongs to
    pub entity_id: String,

    /// Denormalized display label for the entity (e.g., trading code)
    #[serde(default)]
    pub display_code: Option<String>,

    /// Kind of mutation
    pub action: AuditAction,

    /// Name of the user who performed the action
    #[serde(default)]
    pub actor: String,

    /// Contact identifier for the actor, when captured
    #[serde(default)]
    pub actor_contact: Option<String>,

    /// Field-level diffs, in display order; typically empty for
    /// CREATE and DELETE
    #[serde(default)]
    pub changes: Vec<ChangeRecord>,

    /// Request context, when captured
    #[serde(default)]
    pub metadata: Option<AuditMetadata>,

    /// When the audit entry was recorded
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Entry timestamp in display form (e.g., "05 Mar 2025 14:30")
    pub fn format_created_at(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}
