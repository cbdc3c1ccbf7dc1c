use super::{report, MetersCommands};
use crate::error::{EmsError, Result};
use crate::fixtures;
use crate::fmt::{kwh, riels};
use crate::forms::MeterForm;
use crate::meters::{usage_summary, UsageSummary};
use crate::models::Meter;
use crate::report::filter::filter_rows;
use crate::report::print::PrintContext;
use crate::report::ReportKind;
use crate::repo::{InMemoryRepository, Repository};
use crate::settings::SettingsStore;

const KIND: ReportKind = ReportKind::Usage;

fn summary_lines(s: &UsageSummary, rate: i64) -> Vec<(String, String)> {
    vec![
        ("Meters".to_string(), format!("{} ({} active)", s.meters, s.active)),
        ("Monthly usage".to_string(), kwh(s.monthly_kwh)),
        ("Yearly usage".to_string(), kwh(s.yearly_kwh)),
        ("Monthly revenue".to_string(), riels(s.monthly_revenue)),
        (format!("At {} / kWh", riels(rate)), riels(s.projected_revenue)),
    ]
}

fn not_found(id: u32) -> EmsError {
    EmsError::UnknownRecord { kind: "meter", id: id.to_string() }
}

pub fn dispatch(cmd: MetersCommands, store: &dyn SettingsStore) -> Result<()> {
    let rate = store.load().electricity_rate;
    let meters = fixtures::meters();
    match cmd {
        MetersCommands::List { filters, columns } => {
            report::show(KIND, &meters, &filters, &columns)?;
            let filtered: Vec<Meter> = filter_rows(&meters, &filters.state(), &filters.viewer())
                .into_iter()
                .cloned()
                .collect();
            println!();
            for (label, value) in summary_lines(&usage_summary(&filtered, rate), rate) {
                println!("{label:<22}{value}");
            }
            Ok(())
        }
        MetersCommands::Print { filters, columns, print } => {
            let filtered: Vec<Meter> = filter_rows(&meters, &filters.state(), &filters.viewer())
                .into_iter()
                .cloned()
                .collect();
            let ctx = PrintContext::new(report::header(KIND, store))
                .with_summary(summary_lines(&usage_summary(&filtered, rate), rate));
            report::print(KIND, &meters, &filters, &columns, &print, &ctx)?;
            Ok(())
        }
        MetersCommands::Export { filters, columns, export } => {
            report::export(KIND, &meters, &filters, &columns, &export, &report::header(KIND, store))?;
            Ok(())
        }
        MetersCommands::Add { meter_id, resident, kuti, status } => {
            let form = MeterForm { meter_id, resident, kuti, status: status.parse()? };
            let mut repo = InMemoryRepository::new(meters);
            let meter = repo.create(form.to_meter(0)?)?;
            println!("Added meter {} (id {}, {})", meter.meter_id, meter.id, meter.status.as_str());
            println!("Not saved: records reset on the next run.");
            Ok(())
        }
        MetersCommands::Edit { id, meter_id, resident, kuti, status } => {
            let mut repo = InMemoryRepository::new(meters);
            let current = repo.get(&id).ok_or_else(|| not_found(id))?;
            let mut form = MeterForm::from_meter(&current);
            if let Some(meter_id) = meter_id {
                form.meter_id = meter_id;
            }
            if let Some(resident) = resident {
                form.resident = resident;
            }
            if let Some(kuti) = kuti {
                form.kuti = kuti;
            }
            if let Some(status) = status {
                form.status = status.parse()?;
            }
            let meter = form.update_meter(&current)?;
            if !repo.update(meter.clone())? {
                return Err(not_found(id));
            }
            println!("Updated meter {id}: {} ({})", meter.meter_id, meter.status.as_str());
            println!("Not saved: records reset on the next run.");
            Ok(())
        }
        MetersCommands::Remove { id } => {
            let mut repo = InMemoryRepository::new(meters);
            let meter = repo.get(&id).ok_or_else(|| not_found(id))?;
            repo.delete(&id)?;
            println!("Removed meter {id}: {}", meter.meter_id);
            println!("Not saved: records reset on the next run.");
            Ok(())
        }
    }
}
