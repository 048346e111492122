//! Shared fixtures: workbooks shaped like the daily attendance exports

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::Path;
use std::process::{Command, Output};

pub const HEADERS: [&str; 6] = [
    "Name",
    "Team Leader",
    "Login Time",
    "Handled Inbound",
    "AHT",
    "Occupancy",
];

pub const LEADERS: [&str; 5] = ["John", "John", "Sarah", "Sarah", "Mike"];
const LOGINS: [&str; 5] = ["08:45:00", "09:00:00", "08:50:00", "09:15:00", "08:30:00"];
const HANDLED: [f64; 5] = [65.0, 50.0, 70.0, 45.0, 55.0];
const AHT: [&str; 5] = ["00:05:30", "00:07:45", "00:04:50", "00:08:30", "00:06:15"];
const OCCUPANCY: [f64; 5] = [0.75, 0.72, 0.80, 0.65, 0.78];

pub fn sheetroll() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sheetroll"))
}

pub fn run(args: &[&str], files: &[&Path]) -> Output {
    let mut cmd = sheetroll();
    cmd.args(args);
    for file in files {
        cmd.arg(file);
    }
    cmd.output().expect("failed to execute sheetroll")
}

/// Write one five-agent sheet per name in `sheets`, in the given order
pub fn write_attendance(path: &Path, sheets: &[&str]) {
    let mut workbook = Workbook::new();
    for name in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (col, header) in HEADERS.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for i in 0..5 {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, format!("Agent {}", i + 1)).unwrap();
            sheet.write_string(row, 1, LEADERS[i]).unwrap();
            sheet.write_string(row, 2, LOGINS[i]).unwrap();
            sheet.write_number(row, 3, HANDLED[i]).unwrap();
            sheet.write_string(row, 4, AHT[i]).unwrap();
            sheet.write_number(row, 5, OCCUPANCY[i]).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

/// Write sheets with arbitrary text headers and rows
pub fn write_text_sheets(path: &Path, sheets: &[(&str, Vec<&str>, Vec<Vec<&str>>)]) {
    let mut workbook = Workbook::new();
    for (name, headers, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, cells) in rows.iter().enumerate() {
            for (col, value) in cells.iter().enumerate() {
                sheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}
