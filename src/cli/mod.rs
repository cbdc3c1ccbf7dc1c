pub mod attendance;
pub mod invoices;
pub mod managers;
pub mod meters;
pub mod payments;
pub mod prefs;
pub mod report;
pub mod residents;
pub mod status;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::error::{EmsError, Result};
use crate::fixtures;
use crate::report::export::{ExportFormat, ExportOptions};
use crate::report::filter::DEFAULT_PAGE_SIZE;
use crate::report::{ColumnField, ColumnRegistry, FilterState, ReportKind, Viewer};

#[derive(Parser)]
#[command(
    name = "ems",
    version,
    about = "Reports, printouts and spreadsheet exports for a monastery energy management system."
)]
pub struct Cli {
    /// Log to stderr: -v info, -vv debug, -vvv trace (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Daily attendance sheet.
    Attendance {
        #[command(subcommand)]
        command: AttendanceCommands,
    },
    /// Payment ledger with arrears.
    Payments {
        #[command(subcommand)]
        command: PaymentsCommands,
    },
    /// Invoice register.
    Invoices {
        #[command(subcommand)]
        command: InvoicesCommands,
    },
    /// Electricity meters and usage.
    Meters {
        #[command(subcommand)]
        command: MetersCommands,
    },
    /// Residents (changes last for this run only).
    Residents {
        #[command(subcommand)]
        command: ResidentsCommands,
    },
    /// Kuti managers (changes last for this run only).
    Managers {
        #[command(subcommand)]
        command: ManagersCommands,
    },
    /// Show or change saved preferences.
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
    /// Record counts, usage and collection totals.
    Status,
    /// Print a shell completion script.
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

/// Search, filters and page selection shared by every report.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Case-insensitive text search
    #[arg(long)]
    pub search: Option<String>,
    /// Exact status, e.g. Paid, Pending, Overdue ("All" for none)
    #[arg(long)]
    pub status: Option<String>,
    /// Exact billing period, e.g. "January 2026" ("All Months" for none)
    #[arg(long)]
    pub month: Option<String>,
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows per page
    #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
    /// View the report as this resident (only their rows)
    #[arg(long = "as-resident", value_name = "NAME")]
    pub as_resident: Option<String>,
}

impl FilterArgs {
    pub fn state(&self) -> FilterState {
        FilterState::default()
            .with_search(self.search.as_deref().unwrap_or_default())
            .with_status(self.status.as_deref())
            .with_period(self.month.as_deref())
            .with_page(self.page)
    }

    pub fn viewer(&self) -> Viewer {
        match &self.as_resident {
            Some(name) => Viewer::Resident(name.clone()),
            None => Viewer::Admin,
        }
    }
}

/// Column edits applied to the report's default columns before rendering.
#[derive(Args, Debug, Clone, Default)]
pub struct ColumnArgs {
    /// List the columns (after edits) above the output
    #[arg(long)]
    pub columns: bool,
    /// Append a blank column; repeat for more. Later edits in the same
    /// command refer to added columns as new1, new2, ...
    #[arg(long = "add-column", action = ArgAction::Count)]
    pub add_column: u8,
    /// Remove a column by id (permanent columns stay)
    #[arg(long = "drop-column", value_name = "ID")]
    pub drop_column: Vec<String>,
    /// Change a column's screen label
    #[arg(long, value_name = "ID=LABEL")]
    pub rename: Vec<String>,
    /// Change a column attribute: label, print-label, key or width
    #[arg(long = "set-column", value_name = "ID.ATTR=VALUE")]
    pub set_column: Vec<String>,
}

fn split_assignment<'a>(arg: &'a str, what: &'static str) -> Result<(&'a str, &'a str)> {
    arg.split_once('=')
        .filter(|(lhs, _)| !lhs.is_empty())
        .ok_or_else(|| EmsError::InvalidField { field: what, value: arg.to_string() })
}

impl ColumnArgs {
    /// The report's default registry with these edits applied. Edits to
    /// unknown or permanent columns are ignored (and logged).
    pub fn registry(&self, kind: ReportKind) -> Result<ColumnRegistry> {
        let mut registry = kind.default_columns();
        let added: Vec<String> = (0..self.add_column).map(|_| registry.add_column().id.clone()).collect();
        // "newN" names the Nth added column; generated ids differ every run.
        let resolve = |id: &str| -> String {
            id.strip_prefix("new")
                .and_then(|n| n.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| added.get(i))
                .cloned()
                .unwrap_or_else(|| id.to_string())
        };
        for id in &self.drop_column {
            registry.remove_column(&resolve(id));
        }
        for arg in &self.rename {
            let (id, label) = split_assignment(arg, "column rename")?;
            registry.update_column(&resolve(id), ColumnField::Label, label);
        }
        for arg in &self.set_column {
            let (target, value) = split_assignment(arg, "column setting")?;
            let (id, attr) = target
                .split_once('.')
                .ok_or_else(|| EmsError::InvalidField { field: "column setting", value: arg.clone() })?;
            registry.update_column(&resolve(id), attr.parse::<ColumnField>()?, value);
        }
        Ok(registry)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PrintArgs {
    /// Output file (default: <report>.html, or .pdf with --pdf)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Render a PDF instead of a printable HTML page
    #[cfg(feature = "pdf")]
    #[arg(long)]
    pub pdf: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// File name without extension (default: the report name)
    #[arg(long)]
    pub filename: Option<String>,
    #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
    pub format: ExportFormat,
    /// Leave out the blank fill-in columns
    #[arg(long = "no-extra-columns")]
    pub no_extra_columns: bool,
    /// Note line above the header row
    #[arg(long)]
    pub note: Option<String>,
    /// Only export fields whose column is still shown
    #[arg(long = "visible-only")]
    pub visible_only: bool,
    /// Directory to write into
    #[arg(long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
}

impl ExportArgs {
    pub fn options(&self, kind: ReportKind) -> ExportOptions {
        let mut options = ExportOptions::for_report(kind);
        options.filename = self.filename.clone();
        options.include_extra_columns = !self.no_extra_columns;
        if let Some(note) = &self.note {
            options.note = note.clone();
        }
        options.visible_only = self.visible_only;
        options.format = self.format;
        options
    }
}

/// Which billing periods count as "this month" and "last month".
#[derive(Args, Debug, Clone)]
pub struct PeriodArgs {
    #[arg(long = "current-month", default_value = fixtures::CURRENT_MONTH)]
    pub current_month: String,
    /// The prior period whose unpaid balance becomes arrears
    #[arg(long = "last-month", default_value = fixtures::LAST_MONTH)]
    pub last_month: String,
}

#[derive(Subcommand)]
pub enum AttendanceCommands {
    /// Show the attendance table.
    Show {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
    },
    /// Write the printable attendance sheet.
    Print {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        print: PrintArgs,
    },
    /// Export attendance to a spreadsheet.
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Subcommand)]
pub enum PaymentsCommands {
    /// Show the payment ledger with arrears and grand totals.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Write the printable monthly utility statement.
    Print {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        period: PeriodArgs,
        #[command(flatten)]
        print: PrintArgs,
    },
    /// Export the ledger to a spreadsheet.
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        period: PeriodArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Browse the ledger interactively and mark payments paid.
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Flip one payment between paid and unpaid.
    Toggle {
        /// Payment id, e.g. PAY-002
        id: String,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// One resident's last and current month.
    Statement {
        /// Resident name as it appears in the ledger
        resident: String,
        #[command(flatten)]
        period: PeriodArgs,
    },
}

#[derive(Subcommand)]
pub enum InvoicesCommands {
    /// Show the invoice register.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
    },
    /// Write the printable invoice register.
    Print {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        print: PrintArgs,
    },
    /// Export invoices to a spreadsheet.
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Subcommand)]
pub enum MetersCommands {
    /// Show meters with a usage summary.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
    },
    /// Write the printable usage report.
    Print {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        print: PrintArgs,
    },
    /// Export meter usage to a spreadsheet.
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        columns: ColumnArgs,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Register a meter.
    Add {
        /// Meter serial, e.g. DDS1531-077
        meter_id: String,
        /// Resident the meter is assigned to
        #[arg(long, default_value = "")]
        resident: String,
        #[arg(long, default_value = "")]
        kuti: String,
        /// active or inactive
        #[arg(long, default_value = "active")]
        status: String,
    },
    /// Change a meter's assignment or status. Recorded usage is kept.
    Edit {
        id: u32,
        #[arg(long = "meter-id")]
        meter_id: Option<String>,
        #[arg(long)]
        resident: Option<String>,
        #[arg(long)]
        kuti: Option<String>,
        /// active or inactive
        #[arg(long)]
        status: Option<String>,
    },
    /// Remove a meter by id.
    Remove { id: u32 },
}

#[derive(Subcommand)]
pub enum ResidentsCommands {
    /// List residents.
    List {
        /// Match name or meter
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a resident.
    Add {
        name: String,
        /// Defaults to "Resident Monk"
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long)]
        kuti: String,
        #[arg(long = "kuti-number")]
        kuti_number: String,
        #[arg(long, default_value = "")]
        meter: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// One resident's details and meter usage.
    Show { id: u32 },
    /// Change a resident's details.
    Edit {
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        kuti: Option<String>,
        #[arg(long = "kuti-number")]
        kuti_number: Option<String>,
        #[arg(long)]
        meter: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Remove a resident by id.
    Remove { id: u32 },
}

#[derive(Subcommand)]
pub enum ManagersCommands {
    /// List kuti managers.
    List {
        /// Match name or email
        #[arg(long)]
        search: Option<String>,
    },
    /// One manager's details and the residents of their kuti.
    Show { id: u32 },
    /// Add a manager. Prompts for a password and its confirmation.
    Add {
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        kuti: String,
        #[arg(long = "kuti-number")]
        kuti_number: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Read password and confirmation as two lines from stdin
        #[arg(long = "password-stdin")]
        password_stdin: bool,
    },
    /// Change a manager's details. The password is left alone.
    Edit {
        id: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        kuti: Option<String>,
        #[arg(long = "kuti-number")]
        kuti_number: Option<String>,
    },
    /// Remove a manager by id.
    Remove { id: u32 },
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show every preference.
    Show,
    /// Print one preference.
    Get { key: String },
    /// Change one preference.
    Set { key: String, value: String },
    /// Switch between light and dark.
    ToggleTheme,
}
