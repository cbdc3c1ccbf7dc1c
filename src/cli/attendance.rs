use super::{report, AttendanceCommands};
use crate::error::Result;
use crate::fixtures;
use crate::report::print::PrintContext;
use crate::report::ReportKind;
use crate::settings::SettingsStore;

pub fn dispatch(cmd: AttendanceCommands, store: &dyn SettingsStore) -> Result<()> {
    let kind = ReportKind::Attendance;
    let rows = fixtures::attendance();
    match cmd {
        AttendanceCommands::Show { filters, columns } => report::show(kind, &rows, &filters, &columns),
        AttendanceCommands::Print { filters, columns, print } => {
            let ctx = PrintContext::new(report::header(kind, store));
            report::print(kind, &rows, &filters, &columns, &print, &ctx)?;
            Ok(())
        }
        AttendanceCommands::Export { filters, columns, export } => {
            report::export(kind, &rows, &filters, &columns, &export, &report::header(kind, store))?;
            Ok(())
        }
    }
}
