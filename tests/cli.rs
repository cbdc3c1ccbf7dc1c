use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `ems` with HOME pointed at a scratch directory so preferences never
/// touch the real config.
fn ems(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ems").unwrap();
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn attendance_show_lists_entries() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["attendance", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Venerable Sok Chea"))
        .stdout(predicate::str::contains("Page 1 of 1"));
}

#[test]
fn attendance_show_with_column_edits() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["attendance", "show", "--columns", "--drop-column", "role", "--rename", "phone=Mobile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mobile"))
        .stdout(predicate::str::contains("Main Chant Teacher").not());
}

#[test]
fn attendance_export_writes_workbook() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    ems(home.path())
        .args(["attendance", "export", "--output-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 rows"));
    assert!(out.path().join("attendance.xlsx").exists());
}

#[test]
fn payments_export_uses_filtered_rows_not_page() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    ems(home.path())
        .args(["payments", "export", "--status", "Pending", "--page-size", "1", "--format", "csv", "--output-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 rows"));
    let csv = std::fs::read_to_string(out.path().join("payments.csv")).unwrap();
    assert!(csv.contains("ELECTRICITY MANAGEMENT"));
    assert!(csv.contains("Vannak"));
    assert!(!csv.contains("PAY-001"));
}

#[test]
fn attendance_print_writes_html_page() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let path = out.path().join("sheet.html");
    ems(home.path())
        .args(["attendance", "print", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains(r#"class="print-only""#));
    assert!(html.contains("A4 landscape"));
}

#[test]
fn payments_print_pdf() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let path = out.path().join("statement.pdf");
    ems(home.path())
        .args(["payments", "print", "--pdf", "--month", "February 2026", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
}

#[test]
fn payments_list_as_resident_hides_others() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["payments", "list", "--as-resident", "Sokha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INV-004"))
        .stdout(predicate::str::contains("Vannak").not())
        .stdout(predicate::str::contains("Total arrears").not());
}

#[test]
fn payments_browse_without_terminal_prints_table() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["payments", "browse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PAY-005").or(predicate::str::contains("INV-005")));
}

#[test]
fn payments_toggle_marks_paid() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["payments", "toggle", "pay-002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PAY-002: Pending -> Paid on"))
        .stdout(predicate::str::contains("(Cash)"));
}

#[test]
fn payments_toggle_unknown_id_fails() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["payments", "toggle", "PAY-999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Unknown payment: PAY-999"));
}

#[test]
fn payments_statement() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["payments", "statement", "Vannak"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+855 97 123 4567"))
        .stdout(predicate::str::contains("Total owed: $110.80"));
}

#[test]
fn payments_statement_unknown_resident() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["payments", "statement", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Unknown resident: Nobody"));
}

#[test]
fn prefs_set_then_get() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["prefs", "set", "theme", "dark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theme = dark"));
    assert!(home.path().join(".config/ems/settings.json").exists());
    ems(home.path())
        .args(["prefs", "get", "theme"])
        .assert()
        .success()
        .stdout("dark\n");
}

#[test]
fn prefs_toggle_theme_twice() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["prefs", "toggle-theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));
    ems(home.path())
        .args(["prefs", "toggle-theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: light"));
}

#[test]
fn prefs_rejects_bad_values() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["prefs", "set", "theme", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for theme: blue"));
    ems(home.path())
        .args(["prefs", "get", "font"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: font"));
}

#[test]
fn managers_add_password_mismatch() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args([
            "managers", "add", "Mr. Keo Sambath",
            "--email", "keo@monastery.org",
            "--kuti", "Kuti D",
            "--kuti-number", "D-01",
            "--password-stdin",
        ])
        .write_stdin("s3cret\nother\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Passwords do not match!"));
}

#[test]
fn managers_add_with_matching_passwords() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args([
            "managers", "add", "Mr. Keo Sambath",
            "--email", "keo@monastery.org",
            "--kuti", "Kuti D",
            "--kuti-number", "D-01",
            "--password-stdin",
        ])
        .write_stdin("s3cret\ns3cret\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added manager 4: Mr. Keo Sambath <keo@monastery.org>"));
}

#[test]
fn residents_remove_unknown_fails() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["residents", "remove", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resident: 42"));
}

#[test]
fn meters_list_shows_summary() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["meters", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DDS1531-041"))
        .stdout(predicate::str::contains("123.5 kWh"));
}

#[test]
fn status_reports_counts() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Payments:      5"))
        .stdout(predicate::str::contains("Arrears:       $199.30"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ems"));
}

#[test]
fn attendance_added_column_can_be_renamed() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["attendance", "show", "--columns", "--add-column", "--rename", "new1=Alms Round", "--set-column", "new1.width=90px"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alms Round"))
        .stdout(predicate::str::contains("90px"))
        .stdout(predicate::str::contains("New Column").not());
}

#[test]
fn residents_show_includes_meter_usage() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["residents", "show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resident 2: Venerable Dara"))
        .stdout(predicate::str::contains("DDS1531-041 (Active)"))
        .stdout(predicate::str::contains("38.9 kWh"));
}

#[test]
fn residents_edit_keeps_other_fields() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["residents", "edit", "1", "--kuti", "Kuti D", "--kuti-number", "D-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated resident 1: Venerable Sokha (Resident Monk, Kuti D D-04)"));
}

#[test]
fn residents_edit_rejects_blank_name() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["residents", "edit", "1", "--name", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name is required"));
}

#[test]
fn meters_edit_and_remove() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["meters", "edit", "3", "--status", "inactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated meter 3: DDS1531-058 (Inactive)"));
    ems(home.path())
        .args(["meters", "remove", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed meter 2: DDS1531-041"));
    ems(home.path())
        .args(["meters", "remove", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown meter: 9"));
}

#[test]
fn managers_show_lists_kuti_residents() {
    let home = TempDir::new().unwrap();
    ems(home.path())
        .args(["managers", "show", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manager 3: Mrs. Leakena Vong"))
        .stdout(predicate::str::contains("Kuti C (C-02)"))
        .stdout(predicate::str::contains("Residents under Mrs. Leakena Vong"))
        .stdout(predicate::str::contains("Venerable Thavy"));
}
