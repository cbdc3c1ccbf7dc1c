use chrono::Local;

use super::{report, ResidentsCommands};
use crate::error::{EmsError, Result};
use crate::fixtures;
use crate::fmt::{kwh, DASH};
use crate::forms::ResidentForm;
use crate::report::{FilterState, Viewer};
use crate::report::filter::filter_rows;
use crate::repo::{InMemoryRepository, Repository};

const COLUMNS: &[(&str, &str)] = &[
    ("Name", "name"),
    ("Role", "role"),
    ("Kuti", "kuti"),
    ("No.", "kuti_number"),
    ("Meter", "meter"),
    ("Phone", "phone"),
    ("Joined", "joined"),
];

fn not_found(id: u32) -> EmsError {
    EmsError::UnknownRecord { kind: "resident", id: id.to_string() }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { DASH } else { value }
}

pub fn dispatch(cmd: ResidentsCommands) -> Result<()> {
    let mut repo = InMemoryRepository::new(fixtures::residents());
    match cmd {
        ResidentsCommands::List { search } => {
            let state = FilterState::default().with_search(search.as_deref().unwrap_or_default());
            let rows = filter_rows(repo.as_slice(), &state, &Viewer::Admin);
            let mut columns = vec![("ID", "id")];
            columns.extend_from_slice(COLUMNS);
            println!("Residents\n{}", report::record_table(&rows, &columns));
            Ok(())
        }
        ResidentsCommands::Add { name, role, kuti, kuti_number, meter, phone } => {
            let form = ResidentForm { name, role, kuti, kuti_number, meter, phone };
            let resident = repo.create(form.to_resident(0, Some(Local::now().date_naive()))?)?;
            println!("Added resident {}: {} ({})", resident.id, resident.name, resident.role);
            println!("Not saved: records reset on the next run.");
            Ok(())
        }
        ResidentsCommands::Show { id } => {
            let resident = repo.get(&id).ok_or_else(|| not_found(id))?;
            let joined = resident.joined.map(|d| d.format("%Y-%m-%d").to_string());
            println!("Resident {}: {}", resident.id, resident.name);
            println!("Role:          {}", resident.role);
            println!("Kuti:          {} ({})", resident.kuti, resident.kuti_number);
            println!("Phone:         {}", or_dash(&resident.phone));
            println!("Joined:        {}", joined.as_deref().unwrap_or(DASH));
            match fixtures::meters().into_iter().find(|m| !resident.meter.is_empty() && m.meter_id == resident.meter) {
                Some(meter) => {
                    println!("Meter:         {} ({})", meter.meter_id, meter.status.as_str());
                    println!("Monthly usage: {}", kwh(meter.monthly_usage));
                    println!("Yearly usage:  {}", kwh(meter.yearly_usage));
                }
                None => println!("Meter:         {}", or_dash(&resident.meter)),
            }
            Ok(())
        }
        ResidentsCommands::Edit { id, name, role, kuti, kuti_number, meter, phone } => {
            let current = repo.get(&id).ok_or_else(|| not_found(id))?;
            let mut form = ResidentForm::from_resident(&current);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(role) = role {
                form.role = role;
            }
            if let Some(kuti) = kuti {
                form.kuti = kuti;
            }
            if let Some(kuti_number) = kuti_number {
                form.kuti_number = kuti_number;
            }
            if let Some(meter) = meter {
                form.meter = meter;
            }
            if let Some(phone) = phone {
                form.phone = phone;
            }
            let resident = form.to_resident(id, current.joined)?;
            if !repo.update(resident.clone())? {
                return Err(not_found(id));
            }
            println!("Updated resident {id}: {} ({}, {} {})", resident.name, resident.role, resident.kuti, resident.kuti_number);
            println!("Not saved: records reset on the next run.");
            Ok(())
        }
        ResidentsCommands::Remove { id } => {
            let resident = repo.get(&id).ok_or_else(|| not_found(id))?;
            repo.delete(&id)?;
            println!("Removed resident {id}: {}", resident.name);
            println!("Not saved: records reset on the next run.");
            Ok(())
        }
    }
}
