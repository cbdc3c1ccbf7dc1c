use super::{report, InvoicesCommands};
use crate::error::Result;
use crate::fixtures;
use crate::fmt::riels;
use crate::models::InvoiceStatus;
use crate::report::filter::filter_rows;
use crate::report::print::PrintContext;
use crate::report::ReportKind;
use crate::settings::SettingsStore;

const KIND: ReportKind = ReportKind::Invoices;

pub fn dispatch(cmd: InvoicesCommands, store: &dyn SettingsStore) -> Result<()> {
    let invoices = fixtures::invoices();
    match cmd {
        InvoicesCommands::List { filters, columns } => report::show(KIND, &invoices, &filters, &columns),
        InvoicesCommands::Print { filters, columns, print } => {
            let filtered = filter_rows(&invoices, &filters.state(), &filters.viewer());
            let total: i64 = filtered.iter().map(|i| i.amount).sum();
            let outstanding: i64 = filtered
                .iter()
                .filter(|i| i.status == InvoiceStatus::Unpaid)
                .map(|i| i.amount)
                .sum();
            let mut ctx = PrintContext::new(report::header(KIND, store)).with_summary(vec![
                ("TOTAL BILLED".to_string(), riels(total)),
                ("OUTSTANDING".to_string(), riels(outstanding)),
            ]);
            if let Some(period) = filters.state().period {
                ctx = ctx.with_section(format!("Billing Period: {period}"));
            }
            report::print(KIND, &invoices, &filters, &columns, &print, &ctx)?;
            Ok(())
        }
        InvoicesCommands::Export { filters, columns, export } => {
            report::export(KIND, &invoices, &filters, &columns, &export, &report::header(KIND, store))?;
            Ok(())
        }
    }
}
