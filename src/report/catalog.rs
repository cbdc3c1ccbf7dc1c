//! The built-in reports: their default columns, export projection and
//! print layout.

use std::fmt;
use std::str::FromStr;

use super::columns::{ColumnDef, ColumnRegistry};
use super::INDEX_KEY;
use crate::error::EmsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Attendance,
    Payments,
    Invoices,
    Usage,
}

/// Decorative text above every printout and export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    pub title: String,
    pub subtitle: Option<String>,
    pub institution: String,
    pub location: String,
}

impl ReportHeader {
    /// "institution — location", or whichever half is set.
    pub fn place_line(&self) -> String {
        match (self.institution.is_empty(), self.location.is_empty()) {
            (false, false) => format!("{} \u{2014} {}", self.institution, self.location),
            (false, true) => self.institution.clone(),
            (true, false) => self.location.clone(),
            (true, true) => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn css(&self) -> &'static str {
        match self {
            Orientation::Portrait => "A4 portrait",
            Orientation::Landscape => "A4 landscape",
        }
    }
}

/// A header cell spanning several blank fill-in sub-columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnGroup {
    pub label: &'static str,
    pub print_label: &'static str,
    /// `(label, print_label)` per sub-column.
    pub sub_columns: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintLayout {
    pub orientation: Orientation,
    /// Grouped fill-in columns after the registry columns. Non-empty means a
    /// two-row header.
    pub groups: &'static [ColumnGroup],
    /// Blank date line under the heading.
    pub date_line: Option<&'static str>,
    /// Cells of this column are left-aligned; the rest are centered.
    pub left_align_key: &'static str,
    pub signature: &'static [&'static str],
    pub footer: &'static [&'static str],
    /// Prefix of the "printed on" stamp at the bottom of the page.
    pub printed_on: &'static str,
}

/// Fixed screen-only column after the registry columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingColumn {
    pub label: &'static str,
    pub marks: &'static [&'static str],
}

const SESSION_SUB_COLUMNS: &[(&str, &str)] = &[
    ("Present", "វត្តមាន"),
    ("Absent", "អវត្តមាន"),
    ("Note", "កំណត់សម្គាល់"),
    ("Signature", "ហត្ថលេខា"),
];

const ATTENDANCE_GROUPS: &[ColumnGroup] = &[
    ColumnGroup { label: "Morning", print_label: "ព្រឹក", sub_columns: SESSION_SUB_COLUMNS },
    ColumnGroup { label: "Evening", print_label: "ល្ងាច", sub_columns: SESSION_SUB_COLUMNS },
];

impl ReportKind {
    pub const ALL: [ReportKind; 4] =
        [ReportKind::Attendance, ReportKind::Payments, ReportKind::Invoices, ReportKind::Usage];

    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "attendance",
            ReportKind::Payments => "payments",
            ReportKind::Invoices => "invoices",
            ReportKind::Usage => "usage",
        }
    }

    pub fn default_columns(&self) -> ColumnRegistry {
        let columns = match self {
            ReportKind::Attendance => vec![
                ColumnDef::new("no", "No.", INDEX_KEY, "60px").print_as("ល.រ").permanent(),
                ColumnDef::new("name", "Full Name", "full_name", "300px")
                    .print_as("ព្រះនាម និងនាមត្រកូល")
                    .permanent(),
                ColumnDef::new("role", "Position / Title", "role", "170px").print_as("នាទី/ឋានៈ"),
                ColumnDef::new("gender_role", "Monastic Role", "gender_role", "130px").print_as("ភេទសីល"),
                ColumnDef::new("phone", "Phone Number", "phone", "150px").print_as("ទូរស័ព្ទ"),
            ],
            ReportKind::Payments => vec![
                ColumnDef::new("no", "No.", INDEX_KEY, "50px").permanent(),
                ColumnDef::new("resident", "Resident", "resident", "180px").permanent(),
                ColumnDef::new("invoice", "Invoice", "invoice_id", "110px"),
                ColumnDef::new("month", "Billing Month", "month", "140px"),
                ColumnDef::new("usage", "Usage (kWh)", "usage_kwh", "110px"),
                ColumnDef::new("amount", "Current Amount", "amount", "120px").print_as("Monthly Bill"),
                ColumnDef::new("arrears", "Arrears", "arrears", "110px").print_as("Debt/Arrears"),
                ColumnDef::new("grand_total", "Grand Total", "grand_total", "120px").print_as("Total Due"),
                ColumnDef::new("status", "Status", "status", "100px"),
            ],
            ReportKind::Invoices => vec![
                ColumnDef::new("no", "No.", INDEX_KEY, "50px").permanent(),
                ColumnDef::new("invoice", "Invoice", "id", "140px").permanent(),
                ColumnDef::new("resident", "Resident", "resident", "200px"),
                ColumnDef::new("meter", "Meter", "meter", "140px"),
                ColumnDef::new("period", "Period", "period", "130px"),
                ColumnDef::new("amount", "Amount (Riels)", "amount", "140px"),
                ColumnDef::new("status", "Status", "status", "100px"),
            ],
            ReportKind::Usage => vec![
                ColumnDef::new("no", "No.", INDEX_KEY, "50px").permanent(),
                ColumnDef::new("meter", "Meter ID", "meter_id", "140px").permanent(),
                ColumnDef::new("resident", "Resident", "resident", "200px"),
                ColumnDef::new("kuti", "Kuti", "kuti", "100px"),
                ColumnDef::new("monthly", "Monthly (kWh)", "monthly_usage", "120px"),
                ColumnDef::new("yearly", "Yearly (kWh)", "yearly_usage", "120px"),
                ColumnDef::new("cost", "Monthly Cost", "monthly_cost", "140px"),
            ],
        };
        ColumnRegistry::from_defaults(columns)
    }

    /// Header text for this report; `institution` and `location` come from
    /// preferences.
    pub fn header(&self, institution: &str, location: &str) -> ReportHeader {
        let (title, subtitle) = match self {
            ReportKind::Attendance => ("បញ្ជីវត្តមានប្រចាំថ្ងៃ", None),
            ReportKind::Payments => ("ELECTRICITY MANAGEMENT", Some("Monthly Utility Statement")),
            ReportKind::Invoices => ("ELECTRICITY MANAGEMENT", Some("Invoice Register")),
            ReportKind::Usage => ("ELECTRICITY MANAGEMENT", Some("Meter Usage Report")),
        };
        ReportHeader {
            title: title.to_string(),
            subtitle: subtitle.map(str::to_string),
            institution: institution.to_string(),
            location: location.to_string(),
        }
    }

    /// Fixed export projection as `(data_key, header)`. Always exported,
    /// independent of the column registry.
    pub fn core_fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ReportKind::Attendance => &[
                (INDEX_KEY, "No."),
                ("full_name", "Full Name"),
                ("role", "Position / Title"),
                ("gender_role", "Monastic Role"),
                ("phone", "Phone Number"),
            ],
            ReportKind::Payments => &[
                (INDEX_KEY, "No."),
                ("resident", "Resident"),
                ("invoice_id", "Invoice"),
                ("month", "Billing Month"),
                ("usage_kwh", "Usage (kWh)"),
                ("amount", "Current Amount"),
                ("arrears", "Arrears"),
                ("grand_total", "Grand Total"),
                ("status", "Status"),
            ],
            ReportKind::Invoices => &[
                (INDEX_KEY, "No."),
                ("id", "Invoice"),
                ("resident", "Resident"),
                ("meter", "Meter"),
                ("period", "Period"),
                ("amount", "Amount (Riels)"),
                ("status", "Status"),
            ],
            ReportKind::Usage => &[
                (INDEX_KEY, "No."),
                ("meter_id", "Meter ID"),
                ("resident", "Resident"),
                ("kuti", "Kuti"),
                ("monthly_usage", "Monthly (kWh)"),
                ("yearly_usage", "Yearly (kWh)"),
                ("monthly_cost", "Monthly Cost"),
            ],
        }
    }

    /// Blank columns appended to exports for manual fill-in.
    pub fn extra_export_columns(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Attendance => &["Morning Present", "Morning Absent", "Evening Present", "Evening Absent"],
            ReportKind::Payments => &["Payment Date", "Received By"],
            ReportKind::Invoices => &["Received By", "Signature"],
            ReportKind::Usage => &["New Reading", "Checked By"],
        }
    }

    pub fn print_layout(&self) -> PrintLayout {
        match self {
            ReportKind::Attendance => PrintLayout {
                orientation: Orientation::Landscape,
                groups: ATTENDANCE_GROUPS,
                date_line: Some("ថ្ងៃទី ………… ខែ ………… ឆ្នាំ ២០២៦"),
                left_align_key: "full_name",
                signature: &[],
                footer: &[],
                printed_on: "បោះពុម្ពនៅថ្ងៃទី",
            },
            ReportKind::Payments => PrintLayout {
                orientation: Orientation::Portrait,
                groups: &[],
                date_line: None,
                left_align_key: "resident",
                signature: &["Verified By: __________________________", "Operations Manager"],
                footer: &["Computer generated statement.", "No signature required unless manually marked."],
                printed_on: "Report Date",
            },
            ReportKind::Invoices => PrintLayout {
                orientation: Orientation::Portrait,
                groups: &[],
                date_line: None,
                left_align_key: "resident",
                signature: &["Received By: __________________________"],
                footer: &["Computer generated statement."],
                printed_on: "Report Date",
            },
            ReportKind::Usage => PrintLayout {
                orientation: Orientation::Portrait,
                groups: &[],
                date_line: None,
                left_align_key: "resident",
                signature: &["Checked By: __________________________"],
                footer: &[],
                printed_on: "Report Date",
            },
        }
    }

    pub fn trailing_column(&self) -> Option<TrailingColumn> {
        match self {
            ReportKind::Attendance => Some(TrailingColumn { label: "Status", marks: &["Present", "Absent"] }),
            _ => None,
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "Attendance",
            ReportKind::Payments => "Payments",
            ReportKind::Invoices => "Invoices",
            ReportKind::Usage => "Usage",
        }
    }

    /// File stem used when the export options leave the name blank.
    pub fn default_filename(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "attendance",
            ReportKind::Payments => "payments",
            ReportKind::Invoices => "invoices",
            ReportKind::Usage => "usage",
        }
    }

    pub fn default_note(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "Daily attendance record",
            ReportKind::Payments => "Monthly collection summary",
            ReportKind::Invoices => "Invoice register",
            ReportKind::Usage => "Meter usage summary",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportKind {
    type Err = EmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EmsError::InvalidField { field: "report", value: s.to_string() })
    }
}
