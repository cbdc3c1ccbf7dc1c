use std::io::IsTerminal;

use chrono::Local;
use comfy_table::{Cell, Table};

use super::{report, FilterArgs, PaymentsCommands, PeriodArgs};
use crate::browser::LedgerBrowser;
use crate::error::{EmsError, Result};
use crate::fixtures;
use crate::fmt::{kwh, money};
use crate::payments::{collection_stats, ledger, resident_statement, statement_totals, toggle_status};
use crate::report::filter::{filter_rows, paginate};
use crate::report::print::PrintContext;
use crate::report::view::{format_table, project};
use crate::report::ReportKind;
use crate::repo::{InMemoryRepository, Repository};
use crate::settings::SettingsStore;
use crate::tui;

const KIND: ReportKind = ReportKind::Payments;

pub fn dispatch(cmd: PaymentsCommands, store: &dyn SettingsStore) -> Result<()> {
    match cmd {
        PaymentsCommands::List { filters, columns, period } => {
            let lines = ledger(&fixtures::payments(), &period.last_month);
            report::show(KIND, &lines, &filters, &columns)?;
            print_stats(&filters, &period);
            Ok(())
        }
        PaymentsCommands::Print { filters, columns, period, print } => {
            let lines = ledger(&fixtures::payments(), &period.last_month);
            let filtered = filter_rows(&lines, &filters.state(), &filters.viewer());
            let totals = statement_totals(&filtered);
            let month = filters.state().period.unwrap_or_else(|| "All Months".to_string());
            let ctx = PrintContext::new(report::header(KIND, store))
                .with_section(format!("Collection Summary: {month}"))
                .with_summary(vec![
                    ("SUBTOTAL".to_string(), money(totals.subtotal)),
                    ("TOTAL ARREARS".to_string(), money(totals.arrears)),
                    ("GRAND TOTAL".to_string(), money(totals.grand_total)),
                ]);
            report::print(KIND, &lines, &filters, &columns, &print, &ctx)?;
            Ok(())
        }
        PaymentsCommands::Export { filters, columns, period, export } => {
            let lines = ledger(&fixtures::payments(), &period.last_month);
            report::export(KIND, &lines, &filters, &columns, &export, &report::header(KIND, store))?;
            Ok(())
        }
        PaymentsCommands::Browse { filters, columns, period } => {
            if !std::io::stdout().is_terminal() {
                let lines = ledger(&fixtures::payments(), &period.last_month);
                return report::show(KIND, &lines, &filters, &columns);
            }
            let mut browser = LedgerBrowser::new(
                InMemoryRepository::new(fixtures::payments()),
                &period.last_month,
                columns.registry(KIND)?,
                filters.state(),
                filters.viewer(),
                filters.page_size,
            );
            tui::run_report_view(&mut browser)?;
            if browser.toggled() > 0 {
                println!("{} status change(s) made; they are not saved.", browser.toggled());
            }
            Ok(())
        }
        PaymentsCommands::Toggle { id, period } => toggle(&id, &period, store),
        PaymentsCommands::Statement { resident, period } => statement(&resident, &period),
    }
}

/// Collection totals under the ledger table. Residents only see their own.
fn print_stats(filters: &FilterArgs, period: &PeriodArgs) {
    let payments = fixtures::payments();
    let lines = ledger(&payments, &period.last_month);
    let viewer = filters.viewer();
    let filtered = filter_rows(&lines, &filters.state(), &viewer);
    let stats = collection_stats(&payments, &filtered);
    println!();
    println!("Collected:       {}", money(stats.collected));
    println!("Expected:        {}", money(stats.expected));
    if !viewer.is_resident() {
        println!("Total arrears:   {}", money(stats.total_arrears));
    }
}

fn toggle(id: &str, period: &PeriodArgs, store: &dyn SettingsStore) -> Result<()> {
    let mut repo = InMemoryRepository::new(fixtures::payments());
    let id = id.to_uppercase();
    let before = repo
        .get(&id)
        .ok_or_else(|| EmsError::UnknownRecord { kind: "payment", id: id.clone() })?;
    let today = Local::now().date_naive();
    repo.modify(&id, |p| toggle_status(p, today));
    let after = repo
        .get(&id)
        .ok_or_else(|| EmsError::UnknownRecord { kind: "payment", id: id.clone() })?;

    let settings = store.load();
    let detail = match (after.date, after.method) {
        (Some(date), Some(method)) => {
            format!(" on {} ({})", date.format(settings.chrono_date_format()), method.as_str())
        }
        _ => String::new(),
    };
    println!("{id}: {} -> {}{detail}", before.status, after.status);

    let lines = ledger(repo.as_slice(), &period.last_month);
    let own: Vec<_> = lines.iter().filter(|l| l.payment.resident == after.resident).collect();
    let page = paginate(own, 1, usize::MAX);
    println!("{}", format_table(&project(KIND, &KIND.default_columns(), &page)));
    println!("Not saved: records reset on the next run.");
    Ok(())
}

fn statement(resident: &str, period: &PeriodArgs) -> Result<()> {
    let payments = fixtures::payments();
    let s = resident_statement(&payments, resident, &period.current_month, &period.last_month)
        .ok_or_else(|| EmsError::UnknownRecord { kind: "resident", id: resident.to_string() })?;

    println!("Statement for {} ({})", s.name, s.phone);
    let mut table = Table::new();
    table.set_header(vec!["Period", "Amount", "Usage", "Status"]);
    for (label, summary) in [
        (format!("{} (last month)", period.last_month), &s.last_month),
        (format!("{} (current)", period.current_month), &s.current_month),
    ] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(money(summary.amount)),
            Cell::new(kwh(f64::from(summary.usage_kwh))),
            Cell::new(&summary.status),
        ]);
    }
    println!("{table}");
    println!("Total owed: {}", money(s.total_owed));
    Ok(())
}
