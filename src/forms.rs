//! Input validation for records created or edited from the command line.

use regex::Regex;
use zeroize::Zeroize;

use crate::error::{EmsError, Result};
use crate::models::{Kuti, Manager, Meter, MeterStatus, Resident};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const PHONE_PATTERN: &str = r"^\+?[0-9][0-9 ]{6,18}$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EmsError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn is_match(pattern: &str, value: &str) -> bool {
    Regex::new(pattern).map(|re| re.is_match(value)).unwrap_or(false)
}

/// Phone numbers are optional; when given they must look like one.
fn optional_phone(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !is_match(PHONE_PATTERN, trimmed) {
        return Err(EmsError::InvalidField { field: "phone", value: trimmed.to_string() });
    }
    Ok(trimmed.to_string())
}

/// Manager sign-up form. Passwords are checked and then wiped; they are
/// never copied into the stored record.
#[derive(Default)]
pub struct ManagerForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub kuti: String,
    pub kuti_number: String,
    pub password: String,
    pub confirm_password: String,
}

impl ManagerForm {
    pub fn validate(&self, mode: FormMode) -> Result<()> {
        required(&self.name, "name")?;
        let email = required(&self.email, "email")?;
        if !is_match(EMAIL_PATTERN, &email) {
            return Err(EmsError::InvalidField { field: "email", value: email });
        }
        required(&self.kuti, "kuti")?;
        required(&self.kuti_number, "kuti number")?;
        optional_phone(&self.phone)?;

        if mode == FormMode::Create {
            if self.password.is_empty() {
                return Err(EmsError::MissingField("password"));
            }
            if self.password != self.confirm_password {
                return Err(EmsError::PasswordMismatch);
            }
        }
        Ok(())
    }

    /// Validate and build the record. `id` is replaced on create.
    pub fn to_manager(&self, mode: FormMode, id: u32, resident_count: u32) -> Result<Manager> {
        self.validate(mode)?;
        Ok(Manager {
            id,
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            kuti: Kuti {
                name: self.kuti.trim().to_string(),
                number: self.kuti_number.trim().to_string(),
            },
            resident_count,
        })
    }
}

impl Drop for ManagerForm {
    fn drop(&mut self) {
        self.password.zeroize();
        self.confirm_password.zeroize();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResidentForm {
    pub name: String,
    pub role: String,
    pub kuti: String,
    pub kuti_number: String,
    pub meter: String,
    pub phone: String,
}

impl ResidentForm {
    /// Prefilled from an existing record, for editing.
    pub fn from_resident(resident: &Resident) -> Self {
        Self {
            name: resident.name.clone(),
            role: resident.role.clone(),
            kuti: resident.kuti.clone(),
            kuti_number: resident.kuti_number.clone(),
            meter: resident.meter.clone(),
            phone: resident.phone.clone(),
        }
    }

    pub fn to_resident(&self, id: u32, joined: Option<chrono::NaiveDate>) -> Result<Resident> {
        let role = self.role.trim();
        Ok(Resident {
            id,
            name: required(&self.name, "name")?,
            role: if role.is_empty() { "Resident Monk".to_string() } else { role.to_string() },
            kuti: required(&self.kuti, "kuti")?,
            kuti_number: required(&self.kuti_number, "kuti number")?,
            meter: self.meter.trim().to_string(),
            phone: optional_phone(&self.phone)?,
            joined,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MeterForm {
    pub meter_id: String,
    pub resident: String,
    pub kuti: String,
    pub status: MeterStatus,
}

impl Default for MeterForm {
    fn default() -> Self {
        Self {
            meter_id: String::new(),
            resident: String::new(),
            kuti: String::new(),
            status: MeterStatus::Active,
        }
    }
}

impl MeterForm {
    pub fn from_meter(meter: &Meter) -> Self {
        Self {
            meter_id: meter.meter_id.clone(),
            resident: meter.resident.clone(),
            kuti: meter.kuti.clone(),
            status: meter.status,
        }
    }

    /// Apply the form to an existing meter. Recorded usage and cost are kept.
    pub fn update_meter(&self, current: &Meter) -> Result<Meter> {
        let mut meter = self.to_meter(current.id)?;
        meter.monthly_usage = current.monthly_usage;
        meter.yearly_usage = current.yearly_usage;
        meter.monthly_cost = current.monthly_cost;
        Ok(meter)
    }

    /// New meters start with no recorded usage.
    pub fn to_meter(&self, id: u32) -> Result<Meter> {
        Ok(Meter {
            id,
            meter_id: required(&self.meter_id, "meter id")?,
            resident: self.resident.trim().to_string(),
            kuti: self.kuti.trim().to_string(),
            monthly_usage: 0.0,
            yearly_usage: 0.0,
            monthly_cost: 0,
            status: self.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_form() -> ManagerForm {
        ManagerForm {
            name: "Mr. Chan Dara".into(),
            phone: "012 345 678".into(),
            email: "chan.dara@monastery.org".into(),
            kuti: "Kuti A".into(),
            kuti_number: "A-01".into(),
            password: "s3cret".into(),
            confirm_password: "s3cret".into(),
        }
    }

    #[test]
    fn test_password_mismatch_blocks_create() {
        let mut form = manager_form();
        form.confirm_password = "other".into();
        let err = form.validate(FormMode::Create).unwrap_err();
        assert!(matches!(err, EmsError::PasswordMismatch));
        assert_eq!(err.to_string(), "Passwords do not match!");
    }

    #[test]
    fn test_edit_skips_password_check() {
        let mut form = manager_form();
        form.password.clear();
        form.confirm_password = "whatever".into();
        assert!(form.validate(FormMode::Edit).is_ok());
    }

    #[test]
    fn test_required_fields_and_email() {
        let mut form = manager_form();
        form.kuti = "   ".into();
        assert!(matches!(form.validate(FormMode::Create), Err(EmsError::MissingField("kuti"))));

        let mut form = manager_form();
        form.email = "not-an-email".into();
        assert!(matches!(form.validate(FormMode::Create), Err(EmsError::InvalidField { field: "email", .. })));
    }

    #[test]
    fn test_to_manager_trims_and_drops_password() {
        let mut form = manager_form();
        form.name = "  Mrs. Leakena Vong ".into();
        let manager = form.to_manager(FormMode::Create, 0, 0).unwrap();
        assert_eq!(manager.name, "Mrs. Leakena Vong");
        assert_eq!(manager.kuti.number, "A-01");
    }

    #[test]
    fn test_resident_defaults_role() {
        let form = ResidentForm {
            name: "Venerable Rith".into(),
            kuti: "Kuti D".into(),
            kuti_number: "D-01".into(),
            ..Default::default()
        };
        let resident = form.to_resident(0, None).unwrap();
        assert_eq!(resident.role, "Resident Monk");
        assert!(matches!(
            ResidentForm::default().to_resident(0, None),
            Err(EmsError::MissingField("name"))
        ));
    }

    #[test]
    fn test_bad_phone_rejected() {
        let form = ResidentForm {
            name: "Venerable Rith".into(),
            kuti: "Kuti D".into(),
            kuti_number: "D-01".into(),
            phone: "call me".into(),
            ..Default::default()
        };
        assert!(matches!(form.to_resident(0, None), Err(EmsError::InvalidField { field: "phone", .. })));
    }

    #[test]
    fn test_resident_edit_roundtrips_unchanged_fields() {
        let current = crate::fixtures::residents()[1].clone();
        let mut form = ResidentForm::from_resident(&current);
        form.phone = "011 222 333".into();
        let edited = form.to_resident(current.id, current.joined).unwrap();
        assert_eq!(edited.phone, "011 222 333");
        assert_eq!(edited.name, current.name);
        assert_eq!(edited.meter, current.meter);
        assert_eq!(edited.joined, current.joined);
    }

    #[test]
    fn test_meter_edit_keeps_usage() {
        let current = crate::fixtures::meters()[0].clone();
        let mut form = MeterForm::from_meter(&current);
        form.status = MeterStatus::Inactive;
        form.kuti = "Kuti Z".into();
        let edited = form.update_meter(&current).unwrap();
        assert_eq!(edited.id, current.id);
        assert_eq!(edited.status, MeterStatus::Inactive);
        assert_eq!(edited.kuti, "Kuti Z");
        assert_eq!(edited.monthly_usage, current.monthly_usage);
        assert_eq!(edited.monthly_cost, current.monthly_cost);

        form.meter_id = " ".into();
        assert!(matches!(form.update_meter(&current), Err(EmsError::MissingField("meter id"))));
    }

    #[test]
    fn test_meter_form_defaults_active() {
        let form = MeterForm { meter_id: "DDS1531-077".into(), ..Default::default() };
        let meter = form.to_meter(0).unwrap();
        assert_eq!(meter.status, MeterStatus::Active);
        assert!(MeterForm::default().to_meter(0).is_err());
    }
}
