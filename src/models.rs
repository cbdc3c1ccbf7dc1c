use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::EmsError;

#[derive(Debug, Clone, PartialEq)]
pub struct Kuti {
    pub name: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manager {
    pub id: u32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub kuti: Kuti,
    pub resident_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resident {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub kuti: String,
    pub kuti_number: String,
    pub meter: String,
    pub phone: String,
    pub joined: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterStatus {
    Active,
    Inactive,
}

impl MeterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeterStatus::Active => "Active",
            MeterStatus::Inactive => "Inactive",
        }
    }
}

impl FromStr for MeterStatus {
    type Err = EmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(MeterStatus::Active),
            "inactive" => Ok(MeterStatus::Inactive),
            _ => Err(EmsError::InvalidField { field: "meter status", value: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Meter {
    pub id: u32,
    pub meter_id: String,
    pub resident: String,
    pub kuti: String,
    pub monthly_usage: f64,
    pub yearly_usage: f64,
    /// Riels.
    pub monthly_cost: i64,
    pub status: MeterStatus,
}

impl Meter {
    /// Monthly cost in riels at the given tariff, rounded to the nearest riel.
    pub fn cost_for(&self, price_per_kwh: i64) -> i64 {
        (self.monthly_usage * price_per_kwh as f64).round() as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Overdue => "Overdue",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = EmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            "overdue" => Ok(PaymentStatus::Overdue),
            _ => Err(EmsError::InvalidField { field: "payment status", value: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Bank,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Bank => "Bank",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: String,
    pub resident: String,
    pub invoice_id: String,
    /// Billing period label, e.g. "January 2026".
    pub month: String,
    /// USD.
    pub amount: f64,
    pub usage_kwh: u32,
    pub status: PaymentStatus,
    pub date: Option<NaiveDate>,
    pub method: Option<PaymentMethod>,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Unpaid => "Unpaid",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub resident: String,
    pub meter: String,
    pub period: String,
    /// Riels.
    pub amount: i64,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceEntry {
    pub id: u32,
    pub full_name: String,
    pub role: String,
    pub gender_role: String,
    pub phone: String,
    /// Values for columns added at runtime, keyed by their data key.
    pub extra: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter(usage: f64) -> Meter {
        Meter {
            id: 1,
            meter_id: "DDS1531-023".into(),
            resident: "Venerable Sokha".into(),
            kuti: "Kuti A".into(),
            monthly_usage: usage,
            yearly_usage: usage * 12.0,
            monthly_cost: 0,
            status: MeterStatus::Active,
        }
    }

    #[test]
    fn test_cost_for_rounds_to_riel() {
        assert_eq!(meter(45.2).cost_for(610), 27572);
        assert_eq!(meter(0.0).cost_for(610), 0);
    }

    #[test]
    fn test_payment_status_parse() {
        assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert_eq!("Overdue".parse::<PaymentStatus>().unwrap(), PaymentStatus::Overdue);
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_meter_status_parse() {
        assert_eq!("INACTIVE".parse::<MeterStatus>().unwrap(), MeterStatus::Inactive);
        assert!("broken".parse::<MeterStatus>().is_err());
    }
}
