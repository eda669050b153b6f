//! Audit log subsystem for trailscope
//!
//! Read-only access to the change history the platform records for every
//! tracked entity. Entries are written exclusively by the platform backend;
//! this side only fetches, paginates, filters, renders, and exports them.
//!
//! # Architecture
//!
//! The subsystem consists of three components:
//!
//! - `AuditLogEntry` / `ChangeRecord`: the wire model of one recorded
//!   action and its field-level before/after diffs.
//! - `AuditFilters`: filter criteria forwarded to the list and export
//!   endpoints as query parameters.
//! - `ViewerSession`: the state machine behind the interactive history
//!   overlay, covering paging, filters, and stale-response handling via
//!   generation tokens.
//!
//! # Example
//!
//! ```rust,ignore
//! use trailscope::audit::ViewerSession;
//!
//! let mut session = ViewerSession::new();
//! session.open("CL-0007", "ACME");
//!
//! // Hand the queued fetch to a worker...
//! let request = session.take_request().unwrap();
//! let result = api.fetch_page(
//!     &request.entity_id,
//!     request.page,
//!     request.limit,
//!     &request.filters,
//! );
//!
//! // ...and feed the outcome back with its generation token.
//! session.apply_response(request.generation, result);
//! ```

mod entry;
mod filter;
mod session;

pub use entry::{
    AuditAction, AuditLogEntry, AuditMetadata, ChangeRecord, EMPTY_VALUE_PLACEHOLDER,
    TIMESTAMP_FORMAT,
};
pub use filter::AuditFilters;
pub use session::{FetchRequest, ViewerSession, ViewerState, PAGE_SIZE};
