//! Built-in sample records. Every command starts from these.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{
    AttendanceEntry, Invoice, InvoiceStatus, Kuti, Manager, Meter, MeterStatus, Payment,
    PaymentMethod, PaymentStatus, Resident,
};

/// Billing period treated as "this month" by the payments ledger.
pub const CURRENT_MONTH: &str = "February 2026";
/// The single prior period whose unpaid balance counts as arrears.
pub const LAST_MONTH: &str = "January 2026";

/// Period choices offered by the payments month filter.
pub const MONTHS: &[&str] = &["January 2026", "February 2026", "March 2026"];

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn managers() -> Vec<Manager> {
    let manager = |id, name: &str, phone: &str, email: &str, kuti: &str, number: &str, count| {
        Manager {
            id,
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            kuti: Kuti { name: kuti.into(), number: number.into() },
            resident_count: count,
        }
    };
    vec![
        manager(1, "Mr. Chan Dara", "012 345 678", "chan.dara@monastery.org", "Kuti A", "A-01", 8),
        manager(2, "Mr. Sok Piseth", "098 555 222", "piseth.sok@monastery.org", "Kuti B", "B-03", 12),
        manager(3, "Mrs. Leakena Vong", "097 777 123", "leakena@monastery.org", "Kuti C", "C-02", 9),
    ]
}

pub fn residents() -> Vec<Resident> {
    let resident = |id, name: &str, kuti: &str, number: &str, meter: &str, phone: &str, joined| {
        Resident {
            id,
            name: name.into(),
            role: "Resident Monk".into(),
            kuti: kuti.into(),
            kuti_number: number.into(),
            meter: meter.into(),
            phone: phone.into(),
            joined,
        }
    };
    vec![
        resident(1, "Venerable Sokha", "Kuti A", "A-01", "DDS1531-023", "012 345 678", date(2023, 5, 15)),
        resident(2, "Venerable Dara", "Kuti B", "B-03", "DDS1531-041", "098 777 123", date(2024, 1, 10)),
        resident(3, "Venerable Thavy", "Kuti C", "C-02", "DDS1531-058", "097 888 456", date(2022, 11, 20)),
    ]
}

pub fn meters() -> Vec<Meter> {
    let meter = |id, meter_id: &str, resident: &str, kuti: &str, monthly, yearly, cost| Meter {
        id,
        meter_id: meter_id.into(),
        resident: resident.into(),
        kuti: kuti.into(),
        monthly_usage: monthly,
        yearly_usage: yearly,
        monthly_cost: cost,
        status: MeterStatus::Active,
    };
    vec![
        meter(1, "DDS1531-023", "Venerable Sokha", "Kuti A", 45.2, 530.4, 27622),
        meter(2, "DDS1531-041", "Venerable Dara", "Kuti B", 38.9, 467.0, 23729),
        meter(3, "DDS1531-058", "Venerable Thavy", "Kuti C", 39.4, 472.8, 24034),
    ]
}

pub fn payments() -> Vec<Payment> {
    let payment = |id: &str, resident: &str, invoice: &str, month: &str, amount, usage, status, phone: &str| {
        Payment {
            id: id.into(),
            resident: resident.into(),
            invoice_id: invoice.into(),
            month: month.into(),
            amount,
            usage_kwh: usage,
            status,
            date: None,
            method: None,
            phone: phone.into(),
        }
    };
    let mut first = payment(
        "PAY-001", "Sokha", "INV-001", "January 2026", 45.2, 128, PaymentStatus::Paid, "+855 12 345 678",
    );
    first.date = date(2026, 1, 5);
    first.method = Some(PaymentMethod::Bank);
    vec![
        first,
        payment("PAY-002", "Vannak", "INV-002", "January 2026", 62.8, 185, PaymentStatus::Pending, "+855 97 123 4567"),
        payment("PAY-003", "Srey", "INV-003", "January 2026", 38.5, 102, PaymentStatus::Overdue, "+855 88 987 6543"),
        payment("PAY-004", "Sokha", "INV-004", "February 2026", 50.0, 142, PaymentStatus::Pending, "+855 12 345 678"),
        payment("PAY-005", "Vannak", "INV-005", "February 2026", 48.0, 136, PaymentStatus::Pending, "+855 97 123 4567"),
    ]
}

pub fn invoices() -> Vec<Invoice> {
    let invoice = |id: &str, resident: &str, meter: &str, period: &str, amount, status| Invoice {
        id: id.into(),
        resident: resident.into(),
        meter: meter.into(),
        period: period.into(),
        amount,
        status,
    };
    vec![
        invoice("INV-2026-001", "Venerable Sokha", "DDS1531-023", "March 2026", 27622, InvoiceStatus::Paid),
        invoice("INV-2026-002", "Venerable Dara", "DDS1531-041", "March 2026", 23729, InvoiceStatus::Unpaid),
        invoice("INV-2026-003", "Venerable Thavy", "DDS1531-058", "March 2026", 24034, InvoiceStatus::Unpaid),
        invoice("INV-2026-004", "Venerable Sokha", "DDS1531-023", "February 2026", 26291, InvoiceStatus::Paid),
    ]
}

pub fn attendance() -> Vec<AttendanceEntry> {
    let entry = |id, name: &str, role: &str, gender_role: &str, phone: &str| AttendanceEntry {
        id,
        full_name: name.into(),
        role: role.into(),
        gender_role: gender_role.into(),
        phone: phone.into(),
        extra: BTreeMap::new(),
    };
    vec![
        entry(1, "Venerable Sok Chea", "Main Chant Teacher", "Monk", "012 345 678"),
        entry(2, "Samanera Chanthol", "Student", "Novice", "098 765 432"),
        entry(3, "Venerable Vann Sophea", "Assistant Teacher", "Monk", "097 112 2334"),
    ]
}
