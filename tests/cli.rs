//! End-to-end tests for the trailscope binary.
//!
//! Each test points `TRAILSCOPE_DATA_DIR` at a fresh temp directory and runs
//! the real binary, so roster changes must survive across process invocations.
//! Commands that reach the audit API are only exercised up to the point where
//! they fail locally (unknown client, invalid filter); nothing here talks to
//! a server.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A trailscope command wired to an isolated data directory
fn trailscope(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("trailscope").unwrap();
    cmd.env("TRAILSCOPE_DATA_DIR", dir.path());
    cmd
}

fn add_client(dir: &TempDir, code: &str, name: &str) {
    trailscope(dir)
        .args(["client", "add", code, name, "+8801712345678"])
        .assert()
        .success();
}

#[test]
fn no_args_prints_hint() {
    let dir = TempDir::new().unwrap();

    trailscope(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Run 'trailscope --help'"))
        .stdout(predicate::str::contains("trailscope tui"));
}

#[test]
fn add_creates_client_with_sequential_id() {
    let dir = TempDir::new().unwrap();

    trailscope(&dir)
        .args(["client", "add", "ABC123", "Acme Ltd", "+8801712345678"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created client: Acme Ltd"))
        .stdout(predicate::str::contains("ABC123"))
        .stdout(predicate::str::contains("CL-0001"));

    trailscope(&dir)
        .args(["client", "add", "XYZ789", "Beta Trading", "+8801898765432"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CL-0002"));
}

#[test]
fn add_uppercases_trading_code() {
    let dir = TempDir::new().unwrap();

    trailscope(&dir)
        .args(["client", "add", "abc123", "Acme Ltd", "+8801712345678"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC123"));

    // Lookup is case-insensitive too
    trailscope(&dir)
        .args(["client", "show", "abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Ltd (ABC123)"));
}

#[test]
fn duplicate_trading_code_rejected() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args(["client", "add", "abc123", "Copycat Ltd", "+8801700000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Trading code already exists: ABC123",
        ));
}

#[test]
fn show_unknown_client_fails() {
    let dir = TempDir::new().unwrap();

    trailscope(&dir)
        .args(["client", "show", "CL-0042"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Client not found: CL-0042"));
}

#[test]
fn list_shows_roster_across_invocations() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");
    add_client(&dir, "XYZ789", "Beta Trading");

    trailscope(&dir)
        .args(["client", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC123"))
        .stdout(predicate::str::contains("XYZ789"))
        .stdout(predicate::str::contains("Not Called"));
}

#[test]
fn search_matches_substring() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");
    add_client(&dir, "XYZ789", "Beta Trading");

    trailscope(&dir)
        .args(["client", "search", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC123"))
        .stdout(predicate::str::contains("XYZ789").not());
}

#[test]
fn edit_updates_profile() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args(["client", "edit", "ABC123", "--name", "Acme Holdings"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Updated client: Acme Holdings (ABC123)",
        ));

    trailscope(&dir)
        .args(["client", "show", "ABC123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Holdings"));
}

#[test]
fn edit_without_flags_is_a_noop() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args(["client", "edit", "ABC123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes specified"));
}

#[test]
fn set_status_records_conditional_values() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args([
            "client",
            "set-status",
            "ABC123",
            "follow_up",
            "--date",
            "2025-03-10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated ABC123: Follow Up"))
        .stdout(predicate::str::contains("Follow-up Date: 2025-03-10"));

    // Value persisted to disk, visible from a fresh process
    trailscope(&dir)
        .args(["client", "show", "ABC123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-10"));
}

#[test]
fn set_status_requires_conditional_value() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args([
            "client",
            "set-status",
            "ABC123",
            "payment_committed",
            "--date",
            "2025-04-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Committed Amount is required"));
}

#[test]
fn status_change_clears_previous_conditional_values() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args([
            "client",
            "set-status",
            "ABC123",
            "payment_committed",
            "--amount",
            "750",
            "--date",
            "2025-04-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed Amount: 750.00"));

    trailscope(&dir)
        .args(["client", "set-status", "ABC123", "not_interested"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated ABC123: Not Interested"));

    trailscope(&dir)
        .args(["client", "show", "ABC123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("750.00").not());
}

#[test]
fn deactivate_filters_from_active_list() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args(["client", "deactivate", "ABC123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deactivated client"));

    trailscope(&dir)
        .args(["client", "list", "--status", "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No clients found"));

    trailscope(&dir)
        .args(["client", "list", "--status", "inactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC123"));
}

#[test]
fn delete_removes_client() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args(["client", "delete", "ABC123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted client: Acme Ltd (ABC123)"));

    trailscope(&dir)
        .args(["client", "show", "ABC123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Client not found"));
}

#[test]
fn stats_totals_committed_amounts() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");
    add_client(&dir, "XYZ789", "Beta Trading");

    trailscope(&dir)
        .args([
            "client",
            "set-status",
            "ABC123",
            "payment_committed",
            "--amount",
            "750",
            "--date",
            "2025-04-01",
        ])
        .assert()
        .success();

    trailscope(&dir)
        .args(["client", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 clients"))
        .stdout(predicate::str::contains("Committed Total:  750.00"));
}

#[test]
fn history_show_requires_known_client() {
    let dir = TempDir::new().unwrap();

    // Fails on roster lookup, before any network request
    trailscope(&dir)
        .args(["history", "show", "CL-9999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Client not found: CL-9999"));
}

#[test]
fn history_show_rejects_bad_action_filter() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args(["history", "show", "ABC123", "--action", "upsert"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid action: 'upsert'"));
}

#[test]
fn export_history_rejects_bad_date_filter() {
    let dir = TempDir::new().unwrap();
    add_client(&dir, "ABC123", "Acme Ltd");

    trailscope(&dir)
        .args(["export", "history", "ABC123", "--from", "03/01/2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date: '03/01/2025'"));
}

#[test]
fn init_writes_settings_file() {
    let dir = TempDir::new().unwrap();

    trailscope(&dir)
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("exports").exists());
}

#[test]
fn config_prints_paths_and_settings() {
    let dir = TempDir::new().unwrap();

    trailscope(&dir)
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trailscope Configuration"))
        .stdout(predicate::str::contains("Data directory:"))
        .stdout(predicate::str::contains("API base URL:"));
}
