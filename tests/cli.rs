use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use tempfile::{tempdir, TempDir};

const HEADER: [&str; 11] = [
    "Sl No", "Class No", "Emplid", "Campus ID", "Quiz", "Mid Sem", "Lab Test", "Weekly Labs",
    "Pre Compre", "Compre", "Total",
];

const ROWS: [&[&str]; 6] = [
    &["1", "1", "E001", "2024A1001", "8", "25", "9", "9", "51", "40", "91"],
    &["2", "1", "E002", "2024A2002", "6", "22", "8", "9", "45", "30", "75"],
    &["3", "2", "E003", "2024B1003", "9", "28", "10", "10", "57", "38", "99"],
    &["4", "2", "E004", "2024A1004", "abc", "20", "8", "8", "36", "30", "66"],
    &["5", "2", "E006", "2024A1006", "7"],
    &["6", "3", "E005", "2023A1005", "5", "15", "7", "6", "33", "25", "58"],
];

fn write_xlsx(dir: &TempDir, rows: &[&[&str]]) -> PathBuf {
    let path = dir.path().join("marks.xlsx");
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, title) in HEADER.iter().enumerate() {
        worksheet.write_string(0, col as u16, *title).unwrap();
    }
    for (index, row) in rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            let col = col as u16;
            // ids stay text so they round-trip verbatim
            match value.parse::<f64>() {
                Ok(number) if col != 2 && col != 3 => {
                    worksheet.write_number(row_num, col, number).unwrap();
                }
                _ if value.is_empty() => {}
                _ => {
                    worksheet.write_string(row_num, col, *value).unwrap();
                }
            }
        }
    }

    workbook.save(&path).unwrap();
    path
}

fn write_csv(dir: &TempDir, rows: &[&[&str]]) -> PathBuf {
    let path = dir.path().join("marks.csv");
    let mut content = HEADER.join(",");
    content.push('\n');
    for row in rows {
        content.push_str(&row.join(","));
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn run(path: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("gradebook-report");
    cmd.env_remove("GRADEBOOK_COHORT_YEAR")
        .env_remove("GRADEBOOK_BRANCH_MARKER")
        .env("RUST_LOG", "info")
        .arg(path)
        .args(args)
        .assert()
}

#[test]
fn xlsx_report_covers_all_sections() {
    let dir = tempdir().unwrap();
    let path = write_xlsx(&dir, &ROWS);

    run(&path, &[])
        .success()
        .stdout(predicate::str::contains("--- Average Scores ---\nQuiz: 7.00\n"))
        .stdout(predicate::str::contains("Total: 80.75\n"))
        .stdout(predicate::str::contains("Branch A1: 91.00\nBranch A2: 75.00\n"))
        .stdout(predicate::str::contains("Branch B1").not())
        .stdout(predicate::str::contains(
            "Total:\nRank:1. E003 - 99.00\nRank:2. E001 - 91.00\nRank:3. E002 - 75.00\n",
        ))
        .stdout(predicate::str::contains("E004").not())
        .stdout(predicate::str::contains("E006").not());
}

#[test]
fn row_problems_are_logged_not_fatal() {
    let dir = tempdir().unwrap();
    let path = write_xlsx(&dir, &ROWS);

    run(&path, &[])
        .success()
        .stderr(predicate::str::contains(
            "Mismatch in total at row 4. Expected 95.00, Found 99.00",
        ))
        .stderr(predicate::str::contains("row 5: invalid numeric data in Quiz"))
        .stderr(predicate::str::contains("row 6: expected at least 11 columns, found 5"))
        .stderr(predicate::str::contains("row 2:").not());
}

#[test]
fn csv_input_matches_xlsx_input() {
    let dir = tempdir().unwrap();
    let xlsx = write_xlsx(&dir, &ROWS);
    let csv = write_csv(&dir, &ROWS);

    let from_xlsx = run(&xlsx, &[]).success().get_output().stdout.clone();
    let from_csv = run(&csv, &[]).success().get_output().stdout.clone();
    assert_eq!(from_xlsx, from_csv);
}

#[test]
fn repeated_runs_are_identical() {
    let dir = tempdir().unwrap();
    let path = write_xlsx(&dir, &ROWS);

    let first = run(&path, &[]).success().get_output().stdout.clone();
    let second = run(&path, &[]).success().get_output().stdout.clone();
    assert_eq!(first, second);
}

#[test]
fn unmatched_cohort_gives_empty_branch_section() {
    let dir = tempdir().unwrap();
    let path = write_xlsx(&dir, &ROWS);

    run(&path, &["--cohort-year", "2031"])
        .success()
        .stdout(predicate::str::contains("--- Branch-wise Averages (2031 Batch) ---\n\n"))
        .stdout(predicate::str::contains("Branch ").not());
}

#[test]
fn cohort_year_can_come_from_env() {
    let dir = tempdir().unwrap();
    let path = write_csv(&dir, &ROWS);

    let mut cmd = cargo_bin_cmd!("gradebook-report");
    cmd.env("GRADEBOOK_COHORT_YEAR", "2023")
        .env_remove("GRADEBOOK_BRANCH_MARKER")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Branch A1: 58.00\n"));
}

#[test]
fn json_output_to_file() {
    let dir = tempdir().unwrap();
    let path = write_csv(&dir, &ROWS);
    let out = dir.path().join("report.json");

    run(
        &path,
        &["--format", "json", "--top", "1", "--out", out.to_str().unwrap()],
    )
    .success()
    .stdout(predicate::str::contains("Report written to"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["summary"]["rows"], 6);
    assert_eq!(value["summary"]["records"], 4);
    assert_eq!(value["summary"]["skipped"], 2);
    assert_eq!(value["summary"]["mismatches"], 1);
    assert_eq!(value["rankings"].as_array().unwrap().len(), 7);
    assert_eq!(value["rankings"][6]["top"].as_array().unwrap().len(), 1);
    assert_eq!(value["rankings"][6]["top"][0]["employee_id"], "E003");
}

#[test]
fn component_filter_limits_rankings() {
    let dir = tempdir().unwrap();
    let path = write_csv(&dir, &ROWS);

    run(&path, &["--component", "compre", "--format", "markdown"])
        .success()
        .stdout(predicate::str::contains("### Compre\n1. E001 (2024A1001) 40.00\n"))
        .stdout(predicate::str::contains("### Quiz").not());
}

#[test]
fn unknown_component_is_rejected() {
    let dir = tempdir().unwrap();
    let path = write_csv(&dir, &ROWS);

    run(&path, &["--component", "attendance"])
        .failure()
        .stderr(predicate::str::contains("unknown score component: attendance"));
}

#[test]
fn missing_path_prints_usage() {
    let mut cmd = cargo_bin_cmd!("gradebook-report");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unreadable_workbook_stops_before_reporting() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.xlsx");

    run(&path, &[])
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to load gradebook"));
}

#[test]
fn help_describes_every_option() {
    let mut cmd = cargo_bin_cmd!("gradebook-report");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Report layout"))
        .stdout(predicate::str::contains("Number of students listed per component"));
}
