use std::io::BufRead;

use super::{report, ManagersCommands};
use crate::error::{EmsError, Result};
use crate::fixtures;
use crate::forms::{FormMode, ManagerForm};
use crate::models::{Manager, Resident};
use crate::report::filter::filter_rows;
use crate::report::{FilterState, Viewer};
use crate::repo::{InMemoryRepository, Repository};

const COLUMNS: &[(&str, &str)] = &[
    ("ID", "id"),
    ("Name", "name"),
    ("Email", "email"),
    ("Phone", "phone"),
    ("Kuti", "kuti"),
    ("No.", "kuti_number"),
    ("Residents", "resident_count"),
];

/// Password and confirmation, either prompted without echo or read as two
/// lines from stdin.
fn read_passwords(from_stdin: bool) -> Result<(String, String)> {
    if from_stdin {
        let mut lines = std::io::stdin().lock().lines();
        let password = lines.next().transpose()?.unwrap_or_default();
        let confirm = lines.next().transpose()?.unwrap_or_default();
        return Ok((password, confirm));
    }
    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    Ok((password, confirm))
}

/// Residents living in the manager's kuti.
fn assigned_residents<'a>(manager: &Manager, residents: &'a [Resident]) -> Vec<&'a Resident> {
    residents.iter().filter(|r| r.kuti.eq_ignore_ascii_case(&manager.kuti.name)).collect()
}

fn not_found(id: u32) -> EmsError {
    EmsError::UnknownRecord { kind: "manager", id: id.to_string() }
}

pub fn dispatch(cmd: ManagersCommands) -> Result<()> {
    let mut repo = InMemoryRepository::new(fixtures::managers());
    match cmd {
        ManagersCommands::List { search } => {
            let state = FilterState::default().with_search(search.as_deref().unwrap_or_default());
            let rows = filter_rows(repo.as_slice(), &state, &Viewer::Manager);
            println!("Kuti Managers\n{}", report::record_table(&rows, COLUMNS));
            Ok(())
        }
        ManagersCommands::Show { id } => {
            let manager = repo.get(&id).ok_or_else(|| not_found(id))?;
            let residents = fixtures::residents();
            let assigned = assigned_residents(&manager, &residents);
            println!("Manager {}: {}", manager.id, manager.name);
            println!("Phone:     {}", manager.phone);
            println!("Email:     {}", manager.email);
            println!("Kuti:      {} ({})", manager.kuti.name, manager.kuti.number);
            println!("Residents: {}", manager.resident_count);
            println!();
            println!(
                "Residents under {}\n{}",
                manager.name,
                report::record_table(&assigned, &[("ID", "id"), ("Name", "name"), ("No.", "kuti_number"), ("Meter", "meter")])
            );
            Ok(())
        }
        ManagersCommands::Add { name, email, kuti, kuti_number, phone, password_stdin } => {
            let mut form = ManagerForm::default();
            form.name = name;
            form.phone = phone;
            form.email = email;
            form.kuti = kuti;
            form.kuti_number = kuti_number;
            // Check the other fields before asking for a password.
            form.validate(FormMode::Edit)?;
            let (password, confirm) = read_passwords(password_stdin)?;
            form.password = password;
            form.confirm_password = confirm;
            let manager = repo.create(form.to_manager(FormMode::Create, 0, 0)?)?;
            println!("Added manager {}: {} <{}>", manager.id, manager.name, manager.email);
            println!("Not saved: records reset on the next run.");
            Ok(())
        }
        ManagersCommands::Edit { id, name, email, phone, kuti, kuti_number } => {
            let current = repo.get(&id).ok_or_else(|| not_found(id))?;
            // ManagerForm wipes its passwords on drop, so fields are set one by one.
            let mut form = ManagerForm::default();
            form.name = name.unwrap_or(current.name);
            form.phone = phone.unwrap_or(current.phone);
            form.email = email.unwrap_or(current.email);
            form.kuti = kuti.unwrap_or(current.kuti.name);
            form.kuti_number = kuti_number.unwrap_or(current.kuti.number);
            let manager = form.to_manager(FormMode::Edit, id, current.resident_count)?;
            if !repo.update(manager.clone())? {
                return Err(not_found(id));
            }
            println!("Updated manager {id}: {} <{}>", manager.name, manager.email);
            println!("Not saved: records reset on the next run.");
            Ok(())
        }
        ManagersCommands::Remove { id } => {
            let manager = repo.get(&id).ok_or_else(|| not_found(id))?;
            repo.delete(&id)?;
            println!("Removed manager {id}: {}", manager.name);
            println!("Not saved: records reset on the next run.");
            Ok(())
        }
    }
}
