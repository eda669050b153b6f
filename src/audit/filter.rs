//! Audit history filters
//!
//! Filter criteria for audit history queries. The same criteria are
//! forwarded as query parameters to both the paginated list endpoint and
//! the flat export endpoint.

use chrono::NaiveDate;

use super::entry::AuditAction;

/// Filter criteria for an audit history query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditFilters {
    /// Only entries recording this action
    pub action: Option<AuditAction>,

    /// Only entries by this actor
    pub actor: Option<String>,

    /// Only entries recorded on or after this date
    pub from: Option<NaiveDate>,

    /// Only entries recorded on or before this date
    pub to: Option<NaiveDate>,
}

impl AuditFilters {
    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.actor.is_none() && self.from.is_none() && self.to.is_none()
    }

    /// Reset all criteria
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Criteria as query parameters for the audit endpoints.
    ///
    /// Unset criteria produce no parameter; a blank actor counts as unset.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(action) = self.action {
            params.push(("action", action.to_string()));
        }
        if let Some(actor) = &self.actor {
            if !actor.trim().is_empty() {
                params.push(("actor", actor.trim().to_string()));
            }
        }
        if let Some(from) = self.from {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            params.push(("to", to.to_string()));
        }
        params
    }
}
