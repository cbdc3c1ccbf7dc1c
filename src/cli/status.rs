use crate::error::Result;
use crate::fixtures;
use crate::fmt::{kwh, money, riels};
use crate::meters::usage_summary;
use crate::payments::{collection_stats, ledger};
use crate::settings::{FileStore, SettingsStore};

pub fn run(store: &FileStore) -> Result<()> {
    let settings = store.load();
    let payments = fixtures::payments();
    let lines = ledger(&payments, fixtures::LAST_MONTH);
    let all: Vec<_> = lines.iter().collect();
    let stats = collection_stats(&payments, &all);
    let usage = usage_summary(&fixtures::meters(), settings.electricity_rate);

    println!("Institution:   {}", settings.institution);
    println!("Location:      {}", settings.location);
    println!("Preferences:   {}", store.path().display());
    println!("Theme:         {}", settings.theme.as_str());
    println!("Language:      {}", settings.language.as_str());

    println!();
    println!("Managers:      {}", fixtures::managers().len());
    println!("Residents:     {}", fixtures::residents().len());
    println!("Meters:        {} ({} active)", usage.meters, usage.active);
    println!("Invoices:      {}", fixtures::invoices().len());
    println!("Payments:      {}", payments.len());
    println!("Attendance:    {}", fixtures::attendance().len());

    println!();
    println!("Monthly usage: {}", kwh(usage.monthly_kwh));
    println!("Revenue:       {}", riels(usage.monthly_revenue));
    println!("Collected:     {} of {}", money(stats.collected), money(stats.expected));
    println!("Arrears:       {}", money(stats.total_arrears));
    Ok(())
}
