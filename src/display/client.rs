//! Client display formatting
//!
//! Formats roster clients for terminal output in table and detail views.

use crate::models::Client;
use crate::services::RosterStats;

/// Format a list of clients as a table
pub fn format_client_list(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "No clients found.".to_string();
    }

    // Calculate column widths
    let code_width = clients
        .iter()
        .map(|c| c.trading_code.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let name_width = clients
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mobile_width = clients
        .iter()
        .map(|c| c.mobile_no.len())
        .max()
        .unwrap_or(6)
        .max(6);

    // Build header
    let mut output = String::new();
    output.push_str(&format!(
        "{:<7}  {:<code_width$}  {:<name_width$}  {:<mobile_width$}  {:<8}  {}\n",
        "ID",
        "Code",
        "Name",
        "Mobile",
        "Account",
        "Calling Status",
        code_width = code_width,
        name_width = name_width,
        mobile_width = mobile_width,
    ));

    // Separator line
    output.push_str(&format!(
        "{:-<7}  {:-<code_width$}  {:-<name_width$}  {:-<mobile_width$}  {:-<8}  {:-<17}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        code_width = code_width,
        name_width = name_width,
        mobile_width = mobile_width,
    ));

    // Client rows
    for client in clients {
        output.push_str(&format!(
            "{:<7}  {:<code_width$}  {:<name_width$}  {:<mobile_width$}  {:<8}  {}\n",
            client.id.to_string(),
            client.trading_code,
            client.name,
            client.mobile_no,
            client.account_status.to_string(),
            client.calling_status,
            code_width = code_width,
            name_width = name_width,
            mobile_width = mobile_width,
        ));
    }

    output
}

/// Format a single client's details
pub fn format_client_details(client: &Client) -> String {
    let mut output = String::new();

    output.push_str(&format!("Client: {}\n", client));
    output.push_str(&format!("  ID:             {}\n", client.id));
    output.push_str(&format!("  Mobile:         {}\n", client.mobile_no));
    if let Some(email) = &client.email {
        output.push_str(&format!("  Email:          {}\n", email));
    }
    output.push_str(&format!("  Account Status: {}\n", client.account_status));
    output.push_str(&format!("  Calling Status: {}\n", client.calling_status));

    let descriptors = client.calling_status.conditional_fields();
    if !descriptors.is_empty() {
        output.push('\n');
        for descriptor in descriptors {
            let value = client
                .conditional_value(descriptor.field)
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!("  {:<16}{}\n", format!("{}:", descriptor.label), value));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        client.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        client.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

/// Format roster statistics
pub fn format_roster_stats(stats: &RosterStats) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Roster: {} clients ({} active, {} inactive)\n\n",
        stats.total, stats.active, stats.inactive
    ));

    output.push_str(&format!("  Not Called:         {}\n", stats.not_called));
    output.push_str(&format!("  Follow Up:          {}\n", stats.follow_up));
    output.push_str(&format!(
        "  Payment Committed:  {}\n",
        stats.payment_committed
    ));
    output.push_str(&format!(
        "  Payment Received:   {}\n",
        stats.payment_received
    ));
    output.push_str(&format!("  Not Interested:     {}\n", stats.not_interested));

    output.push('\n');
    output.push_str(&format!("  Committed Total:  {:.2}\n", stats.committed_total));
    output.push_str(&format!("  Received Total:   {:.2}\n", stats.received_total));

    output
}
