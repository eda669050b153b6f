//! Audit history display formatting
//!
//! Formats audit-trail pages for terminal output.

use crate::audit::AuditLogEntry;

/// Format one page of audit history with a pagination footer
pub fn format_history_page(
    entries: &[AuditLogEntry],
    page: u32,
    total_pages: u32,
    total_logs: Option<u64>,
) -> String {
    if entries.is_empty() {
        return "No audit entries found.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format_history_entry(entry));
    }

    output.push('\n');
    match total_logs {
        Some(total) => output.push_str(&format!(
            "Page {} of {} ({} entries)\n",
            page, total_pages, total
        )),
        None => output.push_str(&format!("Page {} of {}\n", page, total_pages)),
    }

    output
}

/// Format a single audit entry with its field changes
pub fn format_history_entry(entry: &AuditLogEntry) -> String {
    let mut output = String::new();

    let actor = match &entry.actor_contact {
        Some(contact) => format!("{} ({})", entry.actor, contact),
        None => entry.actor.clone(),
    };
    output.push_str(&format!(
        "{}  {:<6}  {}\n",
        entry.format_created_at(),
        entry.action.to_string(),
        actor
    ));

    for change in &entry.changes {
        output.push_str(&format!(
            "    {}: {} -> {}\n",
            change.label(),
            change.display_old(),
            change.display_new()
        ));
    }

    output
}
