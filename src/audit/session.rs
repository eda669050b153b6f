//! Audit viewer session state
//!
//! The state machine behind the interactive audit history overlay: one
//! session per opened entity, tracking page position, filter criteria, and
//! the handshake with the background fetch worker. Every issued fetch
//! carries a generation token; a late response from a superseded request
//! never clobbers newer state.

use crate::api::AuditPage;
use crate::error::TrailError;

use super::entry::AuditLogEntry;
use super::filter::AuditFilters;

/// Fixed number of entries per history page
pub const PAGE_SIZE: u32 = 20;

/// Where a viewer session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    /// No entity open; the viewer does no work in this state
    Idle,
    /// A fetch for the current page is in flight
    Loading,
    /// The current page arrived with at least one entry
    Loaded,
    /// The current page arrived with no entries
    Empty,
    /// The fetch failed; rendered like [`ViewerState::Empty`], with the
    /// error only logged
    ErrorSilent,
}

/// A fetch the session wants issued on its behalf.
///
/// The caller hands this to a worker and later feeds the outcome back via
/// [`ViewerSession::apply_response`] together with the generation token.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Entity whose history is requested
    pub entity_id: String,
    /// 1-indexed page to fetch
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Filter criteria to forward
    pub filters: AuditFilters,
    /// Token identifying the request; stale responses carry an old one
    pub generation: u64,
}

/// State machine for one audit history viewing session
#[derive(Debug)]
pub struct ViewerSession {
    state: ViewerState,
    entity_id: String,
    display_code: String,
    page: u32,
    total_pages: u32,
    total_logs: Option<u64>,
    entries: Vec<AuditLogEntry>,
    filters: AuditFilters,
    filter_panel_open: bool,
    generation: u64,
    pending: Option<FetchRequest>,
}

impl ViewerSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            state: ViewerState::Idle,
            entity_id: String::new(),
            display_code: String::new(),
            page: 1,
            total_pages: 1,
            total_logs: None,
            entries: Vec::new(),
            filters: AuditFilters::default(),
            filter_panel_open: false,
            generation: 0,
            pending: None,
        }
    }

    /// Open a session for an entity and queue the first-page fetch.
    ///
    /// Always starts at page 1 with cleared filters, no matter what a
    /// previous session did. A blank entity id is a no-op: the session
    /// stays idle and nothing is fetched.
    pub fn open(&mut self, entity_id: impl Into<String>, display_code: impl Into<String>) {
        let entity_id = entity_id.into();
        if entity_id.trim().is_empty() {
            return;
        }

        self.entity_id = entity_id;
        self.display_code = display_code.into();
        self.page = 1;
        self.total_pages = 1;
        self.total_logs = None;
        self.entries.clear();
        self.filters.clear();
        self.filter_panel_open = false;
        self.begin_fetch();
    }

    /// Close the session and discard all transient state. Bumping the
    /// generation here marks any in-flight response as stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.state = ViewerState::Idle;
        self.entity_id.clear();
        self.display_code.clear();
        self.page = 1;
        self.total_pages = 1;
        self.total_logs = None;
        self.entries.clear();
        self.filters.clear();
        self.filter_panel_open = false;
    }

    /// True while an entity is open in the viewer
    pub fn is_open(&self) -> bool {
        self.state != ViewerState::Idle
    }

    /// Take the fetch the session wants issued, if any
    pub fn take_request(&mut self) -> Option<FetchRequest> {
        self.pending.take()
    }

    /// Apply the outcome of a fetch.
    ///
    /// A response is dropped when the session has closed since the request
    /// was issued or when its generation is not the latest one. A failure
    /// moves to [`ViewerState::ErrorSilent`]: logged, never surfaced.
    pub fn apply_response(&mut self, generation: u64, result: Result<AuditPage, TrailError>) {
        if !self.is_open() || generation != self.generation {
            return;
        }

        match result {
            Ok(page) => {
                self.total_pages = page.pagination.total_pages.max(1);
                self.total_logs = page.pagination.total_logs;
                self.page = self.page.min(self.total_pages);
                self.entries = page.logs;
                self.state = if self.entries.is_empty() {
                    ViewerState::Empty
                } else {
                    ViewerState::Loaded
                };
            }
            Err(err) => {
                tracing::error!(error = %err, "audit history fetch failed");
                self.entries.clear();
                self.state = ViewerState::ErrorSilent;
            }
        }
    }

    /// True when the page can move backward
    pub fn can_prev_page(&self) -> bool {
        self.is_open() && self.page > 1
    }

    /// True when the page can move forward
    pub fn can_next_page(&self) -> bool {
        self.is_open() && self.page < self.total_pages
    }

    /// Move one page back and queue the fetch; no-op at the first page
    pub fn prev_page(&mut self) {
        if self.can_prev_page() {
            self.page -= 1;
            self.begin_fetch();
        }
    }

    /// Move one page forward and queue the fetch; no-op at the last page
    pub fn next_page(&mut self) {
        if self.can_next_page() {
            self.page += 1;
            self.begin_fetch();
        }
    }

    /// Replace the filter criteria and reload from the first page
    pub fn apply_filters(&mut self, filters: AuditFilters) {
        if !self.is_open() {
            return;
        }
        self.filters = filters;
        self.page = 1;
        self.begin_fetch();
    }

    /// Show or hide the filter panel; pure UI state, no fetch side effect
    pub fn toggle_filter_panel(&mut self) {
        if self.is_open() {
            self.filter_panel_open = !self.filter_panel_open;
        }
    }

    /// True when the body should render the "no audit logs found" view.
    /// A silent failure renders exactly like an entity with no history.
    pub fn shows_empty_state(&self) -> bool {
        matches!(self.state, ViewerState::Empty | ViewerState::ErrorSilent)
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn display_code(&self) -> &str {
        &self.display_code
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_logs(&self) -> Option<u64> {
        self.total_logs
    }

    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn filters(&self) -> &AuditFilters {
        &self.filters
    }

    pub fn filter_panel_open(&self) -> bool {
        self.filter_panel_open
    }

    fn begin_fetch(&mut self) {
        self.generation += 1;
        self.state = ViewerState::Loading;
        self.pending = Some(FetchRequest {
            entity_id: self.entity_id.clone(),
            page: self.page,
            limit: PAGE_SIZE,
            filters: self.filters.clone(),
            generation: self.generation,
        });
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PaginationInfo;
    use crate::audit::entry::AuditAction;

    fn entry(id: &str) -> AuditLogEntry {
        AuditLogEntry {
            id: id.to_string(),
            entity_id: "CL-0007".to_string(),
            display_code: Some("ACME".to_string()),
            action: AuditAction::Update,
            actor: "Jordan Rivers".to_string(),
            actor_contact: None,
            changes: Vec::new(),
            metadata: None,
            created_at: "2025-03-05T14:30:00Z".parse().unwrap(),
        }
    }

    fn page(ids: &[&str], total_pages: u32) -> AuditPage {
        AuditPage {
            logs: ids.iter().map(|id| entry(id)).collect(),
            pagination: PaginationInfo {
                total_pages,
                total_logs: None,
            },
        }
    }

    fn open_session() -> ViewerSession {
        let mut session = ViewerSession::new();
        session.open("CL-0007", "ACME");
        session
    }

    #[test]
    fn test_open_queues_first_page_fetch() {
        let mut session = open_session();
        assert_eq!(session.state(), ViewerState::Loading);

        let request = session.take_request().unwrap();
        assert_eq!(request.entity_id, "CL-0007");
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, PAGE_SIZE);
        assert!(request.filters.is_empty());

        // One fetch per transition, not one per poll
        assert!(session.take_request().is_none());
    }

    #[test]
    fn test_blank_entity_id_stays_idle() {
        let mut session = ViewerSession::new();
        session.open("   ", "ACME");
        assert_eq!(session.state(), ViewerState::Idle);
        assert!(session.take_request().is_none());
    }

    #[test]
    fn test_no_fetch_while_closed() {
        let mut session = ViewerSession::new();
        session.next_page();
        session.prev_page();
        session.apply_filters(AuditFilters {
            action: Some(AuditAction::Delete),
            ..Default::default()
        });
        assert_eq!(session.state(), ViewerState::Idle);
        assert!(session.take_request().is_none());
    }

    #[test]
    fn test_empty_history_shows_empty_state() {
        let mut session = open_session();
        let request = session.take_request().unwrap();

        session.apply_response(request.generation, Ok(page(&[], 0)));
        assert_eq!(session.state(), ViewerState::Empty);
        assert!(session.shows_empty_state());
        assert!(session.entries().is_empty());
        assert_eq!(session.total_pages(), 1);
    }

    #[test]
    fn test_loaded_page_replaces_entries() {
        let mut session = open_session();
        let request = session.take_request().unwrap();

        session.apply_response(request.generation, Ok(page(&["a", "b", "c"], 5)));
        assert_eq!(session.state(), ViewerState::Loaded);
        assert_eq!(session.entries().len(), 3);
        assert_eq!(session.total_pages(), 5);
    }

    #[test]
    fn test_fetch_failure_is_silent() {
        let mut session = open_session();
        let request = session.take_request().unwrap();

        session.apply_response(
            request.generation,
            Err(TrailError::Api("HTTP 500".to_string())),
        );
        assert_eq!(session.state(), ViewerState::ErrorSilent);
        assert!(session.shows_empty_state());
        assert!(session.entries().is_empty());
    }

    #[test]
    fn test_pagination_bounds() {
        let mut session = open_session();
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["a"], 3)));

        assert!(!session.can_prev_page());
        assert!(session.can_next_page());

        session.prev_page();
        assert_eq!(session.page(), 1);
        assert!(session.take_request().is_none());

        session.next_page();
        assert_eq!(session.page(), 2);
        assert_eq!(session.state(), ViewerState::Loading);
        let request = session.take_request().unwrap();
        assert_eq!(request.page, 2);
        session.apply_response(request.generation, Ok(page(&["b"], 3)));

        session.next_page();
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["c"], 3)));
        assert_eq!(session.page(), 3);
        assert!(!session.can_next_page());

        session.next_page();
        assert_eq!(session.page(), 3);
        assert!(session.take_request().is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = open_session();
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["page1"], 4)));

        session.next_page();
        let superseded = session.take_request().unwrap();
        session.next_page();
        let latest = session.take_request().unwrap();
        assert!(latest.generation > superseded.generation);

        // The slow response for page 2 lands after page 3 was requested
        session.apply_response(superseded.generation, Ok(page(&["page2"], 4)));
        assert_eq!(session.state(), ViewerState::Loading);
        assert_eq!(session.entries()[0].id, "page1");

        session.apply_response(latest.generation, Ok(page(&["page3"], 4)));
        assert_eq!(session.state(), ViewerState::Loaded);
        assert_eq!(session.entries()[0].id, "page3");
    }

    #[test]
    fn test_response_after_close_is_ignored() {
        let mut session = open_session();
        let request = session.take_request().unwrap();
        session.close();

        session.apply_response(request.generation, Ok(page(&["late"], 2)));
        assert_eq!(session.state(), ViewerState::Idle);
        assert!(session.entries().is_empty());
    }

    #[test]
    fn test_reopen_resets_page_and_filters() {
        let mut session = open_session();
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["a"], 5)));

        session.apply_filters(AuditFilters {
            actor: Some("Jordan".to_string()),
            ..Default::default()
        });
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["a"], 5)));
        session.next_page();
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["b"], 5)));
        assert_eq!(session.page(), 2);
        assert!(!session.filters().is_empty());

        session.close();
        session.open("CL-0007", "ACME");
        assert_eq!(session.page(), 1);
        assert!(session.filters().is_empty());
        assert_eq!(session.state(), ViewerState::Loading);

        let request = session.take_request().unwrap();
        assert_eq!(request.page, 1);
        assert!(request.filters.is_empty());
    }

    #[test]
    fn test_filter_apply_reloads_from_first_page() {
        let mut session = open_session();
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["a"], 5)));
        session.next_page();
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["b"], 5)));
        assert_eq!(session.page(), 2);

        session.apply_filters(AuditFilters {
            action: Some(AuditAction::Update),
            ..Default::default()
        });
        assert_eq!(session.page(), 1);
        assert_eq!(session.state(), ViewerState::Loading);

        let request = session.take_request().unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.filters.action, Some(AuditAction::Update));
    }

    #[test]
    fn test_page_clamps_when_total_shrinks() {
        let mut session = open_session();
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["a"], 3)));
        session.next_page();
        let request = session.take_request().unwrap();
        session.apply_response(request.generation, Ok(page(&["b"], 3)));
        session.next_page();
        let request = session.take_request().unwrap();

        // History shrank while we paged; stay inside the new bounds
        session.apply_response(request.generation, Ok(page(&["c"], 2)));
        assert_eq!(session.page(), 2);
        assert_eq!(session.total_pages(), 2);
    }

    #[test]
    fn test_filter_panel_toggle() {
        let mut session = ViewerSession::new();
        session.toggle_filter_panel();
        assert!(!session.filter_panel_open());

        session.open("CL-0007", "ACME");
        session.toggle_filter_panel();
        assert!(session.filter_panel_open());
        session.toggle_filter_panel();
        assert!(!session.filter_panel_open());
    }
}
