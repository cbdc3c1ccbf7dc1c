//! Spreadsheet export of the full filtered row set.
//!
//! Sheet layout, top to bottom: title, "institution — location", note, a
//! blank row, the header row, then one row per record.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rust_xlsxwriter::{Format, Workbook};

use super::catalog::{ReportHeader, ReportKind};
use super::columns::ColumnRegistry;
use super::{Record, Value, INDEX_KEY};
use crate::error::Result;

/// Zero-based row of the header in the written sheet.
pub const HEADER_ROW: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// File stem; the report's default when `None` or blank.
    pub filename: Option<String>,
    /// Append blank fill-in columns after the data.
    pub include_extra_columns: bool,
    pub note: String,
    /// Drop core fields whose column is no longer in the registry.
    pub visible_only: bool,
    pub format: ExportFormat,
}

impl ExportOptions {
    pub fn for_report(kind: ReportKind) -> Self {
        Self {
            filename: None,
            include_extra_columns: true,
            note: kind.default_note().to_string(),
            visible_only: false,
            format: ExportFormat::Xlsx,
        }
    }

    pub fn file_name(&self, kind: ReportKind) -> String {
        let stem = self
            .filename
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(kind.default_filename());
        format!("{stem}.{}", self.format.extension())
    }
}

/// A sheet ready for encoding. `None` cells are written empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSheet {
    pub name: &'static str,
    pub metadata: [String; 3],
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<Value>>>,
}

/// Flatten `rows` into core fields, extra registry columns and optional
/// fill-in columns. `rows` is the whole filtered set, never one page.
pub fn build_sheet<T: Record>(
    kind: ReportKind,
    header: &ReportHeader,
    registry: &ColumnRegistry,
    rows: &[&T],
    options: &ExportOptions,
) -> ExportSheet {
    let core: Vec<(&str, &str)> = kind
        .core_fields()
        .iter()
        .copied()
        .filter(|(key, _)| !options.visible_only || registry.contains_key(key))
        .collect();
    let core_keys: HashSet<&str> = kind.core_fields().iter().map(|(key, _)| *key).collect();
    let added: Vec<_> = registry.iter().filter(|c| !core_keys.contains(c.data_key.as_str())).collect();
    let fill_in: &[&str] = if options.include_extra_columns { kind.extra_export_columns() } else { &[] };

    let mut headers: Vec<String> = core.iter().map(|(_, h)| h.to_string()).collect();
    headers.extend(added.iter().map(|c| c.label.clone()));
    headers.extend(fill_in.iter().map(|h| h.to_string()));

    let cell = |row: &T, key: &str, position: usize| -> Option<Value> {
        if key == INDEX_KEY {
            return Some(Value::Integer(position as i64));
        }
        match row.field(key) {
            Some(Value::Text(s)) if s.is_empty() => None,
            other => other,
        }
    };

    let data = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut out: Vec<Option<Value>> = core.iter().map(|(key, _)| cell(*row, *key, i + 1)).collect();
            out.extend(added.iter().map(|c| cell(*row, c.data_key.as_str(), i + 1)));
            out.extend(fill_in.iter().map(|_| None));
            out
        })
        .collect::<Vec<_>>();
    tracing::debug!(report = %kind, rows = data.len(), columns = headers.len(), "built export sheet");

    ExportSheet {
        name: kind.sheet_name(),
        metadata: [header.title.clone(), header.place_line(), options.note.clone()],
        headers,
        rows: data,
    }
}

pub fn encode_xlsx(sheet: &ExportSheet) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format("$#,##0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.name)?;

    worksheet.write_string_with_format(0, 0, &sheet.metadata[0], &title_format)?;
    worksheet.write_string(1, 0, &sheet.metadata[1])?;
    worksheet.write_string(2, 0, &sheet.metadata[2])?;

    for (col, header) in sheet.headers.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(HEADER_ROW, col, header, &header_format)?;
        worksheet.set_column_width(col, (header.chars().count() as f64 + 4.0).max(10.0))?;
    }

    for (i, row) in sheet.rows.iter().enumerate() {
        let r = HEADER_ROW + 1 + i as u32;
        for (col, value) in row.iter().enumerate() {
            let col = col as u16;
            match value {
                None => {}
                Some(Value::Text(s)) => {
                    worksheet.write_string(r, col, s)?;
                }
                Some(Value::Integer(n)) => {
                    worksheet.write_number(r, col, *n as f64)?;
                }
                Some(Value::Number(n)) => {
                    worksheet.write_number(r, col, *n)?;
                }
                Some(Value::Money(n)) => {
                    worksheet.write_number_with_format(r, col, *n, &money_format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn encode_csv(sheet: &ExportSheet) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
    for line in &sheet.metadata {
        writer.write_record([line.as_str()])?;
    }
    writer.write_record([""])?;
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        // Money goes out as a plain decimal so spreadsheets can sum it.
        writer.write_record(row.iter().map(|v| match v {
            None => String::new(),
            // Adding 0.0 turns a negative zero into 0.00.
            Some(Value::Money(n)) => format!("{:.2}", n + 0.0),
            Some(other) => other.to_string(),
        }))?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Encode `sheet` and write it into `dir`. Returns the written path.
pub fn write_export(sheet: &ExportSheet, kind: ReportKind, options: &ExportOptions, dir: &Path) -> Result<PathBuf> {
    let bytes = match options.format {
        ExportFormat::Xlsx => encode_xlsx(sheet)?,
        ExportFormat::Csv => encode_csv(sheet)?,
    };
    std::fs::create_dir_all(dir)?;
    let path = dir.join(options.file_name(kind));
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), rows = sheet.rows.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

    use super::*;
    use crate::fixtures;
    use crate::payments::ledger;
    use crate::report::filter::{apply, filter_rows, FilterState, Viewer};

    fn header() -> ReportHeader {
        ReportKind::Attendance.header("វត្តឈូកវ៉ា", "រាជធានីភ្នំពេញ")
    }

    #[test]
    fn test_export_row_count_matches_filtered_not_page() {
        let lines = ledger(&fixtures::payments(), fixtures::LAST_MONTH);
        let state = FilterState::default().with_status(Some("Pending"));
        let page = apply(&lines, &state, &Viewer::Admin, 2);
        assert_eq!(page.rows.len(), 2);

        let all = filter_rows(&lines, &state, &Viewer::Admin);
        let kind = ReportKind::Payments;
        let sheet = build_sheet(kind, &kind.header("", ""), &kind.default_columns(), &all, &ExportOptions::for_report(kind));
        assert_eq!(sheet.rows.len(), page.total_rows);

        let bytes = encode_xlsx(&sheet).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Payments").unwrap();
        let data_rows = range.rows().skip(HEADER_ROW as usize + 1).count();
        assert_eq!(data_rows, 3);
    }

    #[test]
    fn test_attendance_layout_and_headers() {
        let rows = fixtures::attendance();
        let all = filter_rows(&rows, &FilterState::default(), &Viewer::Admin);
        let kind = ReportKind::Attendance;
        let sheet = build_sheet(kind, &header(), &kind.default_columns(), &all, &ExportOptions::for_report(kind));
        assert_eq!(
            sheet.headers,
            vec![
                "No.", "Full Name", "Position / Title", "Monastic Role", "Phone Number",
                "Morning Present", "Morning Absent", "Evening Present", "Evening Absent",
            ]
        );

        let bytes = encode_xlsx(&sheet).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Attendance").unwrap();
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("បញ្ជីវត្តមានប្រចាំថ្ងៃ".into())));
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("វត្តឈូកវ៉ា \u{2014} រាជធានីភ្នំពេញ".into())));
        assert_eq!(range.get_value((2, 0)), Some(&Data::String("Daily attendance record".into())));
        assert_eq!(range.get_value((4, 1)), Some(&Data::String("Full Name".into())));
        assert_eq!(range.get_value((5, 0)), Some(&Data::Float(1.0)));
        assert_eq!(range.get_value((7, 1)), Some(&Data::String("Venerable Vann Sophea".into())));
    }

    #[test]
    fn test_added_columns_follow_core_and_extras_optional() {
        let mut rows = fixtures::attendance();
        let mut registry = ReportKind::Attendance.default_columns();
        let added = registry.add_column().clone();
        registry.update_column(&added.id, crate::report::ColumnField::Label, "Kuti");
        rows[0].extra.insert(added.data_key.clone(), "A-01".into());

        let all = filter_rows(&rows, &FilterState::default(), &Viewer::Admin);
        let mut options = ExportOptions::for_report(ReportKind::Attendance);
        options.include_extra_columns = false;
        let sheet = build_sheet(ReportKind::Attendance, &header(), &registry, &all, &options);
        assert_eq!(sheet.headers.last().map(String::as_str), Some("Kuti"));
        assert_eq!(sheet.rows[0][5], Some(Value::Text("A-01".into())));
        assert_eq!(sheet.rows[1][5], None);
    }

    #[test]
    fn test_visible_only_drops_removed_core_fields() {
        let rows = fixtures::attendance();
        let all = filter_rows(&rows, &FilterState::default(), &Viewer::Admin);
        let mut registry = ReportKind::Attendance.default_columns();
        registry.remove_column("phone");

        let mut options = ExportOptions::for_report(ReportKind::Attendance);
        let sheet = build_sheet(ReportKind::Attendance, &header(), &registry, &all, &options);
        assert!(sheet.headers.iter().any(|h| h == "Phone Number"));

        options.visible_only = true;
        let sheet = build_sheet(ReportKind::Attendance, &header(), &registry, &all, &options);
        assert!(!sheet.headers.iter().any(|h| h == "Phone Number"));
    }

    #[test]
    fn test_csv_layout() {
        let lines = ledger(&fixtures::payments(), fixtures::LAST_MONTH);
        let all = filter_rows(&lines, &FilterState::default().with_search("sokha"), &Viewer::Admin);
        let kind = ReportKind::Payments;
        let mut options = ExportOptions::for_report(kind);
        options.include_extra_columns = false;
        let sheet = build_sheet(kind, &kind.header("Wat", ""), &kind.default_columns(), &all, &options);
        let text = String::from_utf8(encode_csv(&sheet).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ELECTRICITY MANAGEMENT");
        assert_eq!(lines[1], "Wat");
        assert_eq!(lines[4], "No.,Resident,Invoice,Billing Month,Usage (kWh),Current Amount,Arrears,Grand Total,Status");
        assert_eq!(lines[5], "1,Sokha,INV-001,January 2026,128 kWh,45.20,0.00,45.20,Paid");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_file_name_defaults() {
        let mut options = ExportOptions::for_report(ReportKind::Attendance);
        assert_eq!(options.file_name(ReportKind::Attendance), "attendance.xlsx");
        options.filename = Some("attendance_list".into());
        options.format = ExportFormat::Csv;
        assert_eq!(options.file_name(ReportKind::Attendance), "attendance_list.csv");
        options.filename = Some("  ".into());
        assert_eq!(options.file_name(ReportKind::Attendance), "attendance.csv");
    }

    #[test]
    fn test_write_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = fixtures::attendance();
        let all = filter_rows(&rows, &FilterState::default(), &Viewer::Admin);
        let kind = ReportKind::Attendance;
        let options = ExportOptions::for_report(kind);
        let sheet = build_sheet(kind, &header(), &kind.default_columns(), &all, &options);
        let path = write_export(&sheet, kind, &options, &dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "attendance.xlsx");
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
