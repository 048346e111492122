//! Tests for the `sheetroll inspect` command

mod common;

use common::{path_str, run, stderr, stdout, write_attendance, write_text_sheets};
use tempfile::tempdir;

#[test]
fn inspect_lists_sheets_and_team_leaders() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("attendance.xlsx");
    write_attendance(&input, &["03.06.2024", "01.06.2024", "02.06.2024"]);

    let output = run(&["inspect"], &[&input]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Loaded 3 date sheets with 3 team leaders"));
    assert!(out.contains("Date range: 01.06.2024 - 03.06.2024"));
    let john = out.find("  John").unwrap();
    let mike = out.find("  Mike").unwrap();
    let sarah = out.find("  Sarah").unwrap();
    assert!(john < mike && mike < sarah, "team leaders should be sorted");
}

#[test]
fn inspect_json_report() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("attendance.xlsx");
    write_attendance(&input, &["02.06.2024", "Notes", "01.06.2024"]);

    let output = run(&["inspect", "--format", "json"], &[&input]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["date_sheets"], serde_json::json!(["01.06.2024", "02.06.2024"]));
    assert_eq!(report["start_date"], "01.06.2024");
    assert_eq!(report["end_date"], "02.06.2024");
    assert_eq!(report["supervisors"], serde_json::json!(["John", "Mike", "Sarah"]));
    assert_eq!(report["skipped_sheets"], serde_json::json!([]));
}

#[test]
fn inspect_without_date_sheets_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("plain.xlsx");
    write_attendance(&input, &["Sheet1", "June"]);

    let output = run(&["inspect"], &[&input]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No sheets found with date format dd.mm.yyyy"));
}

#[test]
fn inspect_without_team_leader_column_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("noleader.xlsx");
    write_text_sheets(
        &input,
        &[("01.06.2024", vec!["Name", "Manager"], vec![vec!["Agent 1", "John"]])],
    );

    let output = run(&["inspect"], &[&input]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No team leaders found in any sheets"));
}

#[test]
fn invalid_calendar_sheet_is_skipped_with_warning() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("attendance.xlsx");
    write_attendance(&input, &["01.06.2024", "31.02.2024"]);

    let output = run(&["inspect"], &[&input]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Loaded 1 date sheets"));
    assert!(stderr(&output).contains("sheet '31.02.2024' is not a valid date"));
}

#[test]
fn strict_dates_rejects_invalid_calendar_sheet() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("attendance.xlsx");
    write_attendance(&input, &["01.06.2024", "31.02.2024"]);

    let output = run(&["inspect", "--strict-dates"], &[&input]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("31.02.2024"));
}

#[test]
fn config_file_can_require_valid_dates() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("attendance.xlsx");
    let config = dir.path().join("sheetroll.toml");
    write_attendance(&input, &["01.06.2024", "31.02.2024"]);
    std::fs::write(&config, "invalid_sheet_policy = \"fail\"\n").unwrap();

    let output = run(&["--config", path_str(&config), "inspect"], &[&input]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn unreadable_input_is_reported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.xlsx");

    let output = run(&["inspect"], &[&input]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to open workbook"));
}
