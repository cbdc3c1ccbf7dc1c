//! Payment ledger: arrears, totals and the paid/unpaid toggle.
//!
//! Arrears always look at the whole payment collection, never at the
//! filtered or paginated view, and only at one prior period.

use chrono::NaiveDate;

use crate::fmt::kwh;
use crate::models::{Payment, PaymentMethod, PaymentStatus};
use crate::report::{Record, Value};

/// Unpaid balance a resident carries from `last_month`: the sum of their
/// non-Paid amounts for exactly that period.
pub fn arrears(payments: &[Payment], resident: &str, last_month: &str) -> f64 {
    payments
        .iter()
        .filter(|p| p.resident == resident && p.month == last_month && !p.status.is_paid())
        .fold(0.0, |total, p| total + p.amount)
}

pub fn grand_total(current_amount: f64, arrears: f64) -> f64 {
    current_amount + arrears
}

/// A payment with its resident's arrears attached, as shown in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerLine {
    pub payment: Payment,
    pub arrears: f64,
    pub grand_total: f64,
}

/// Attach arrears to every payment. Arrears come from the full
/// collection, so filtering the result later never changes them.
pub fn ledger(payments: &[Payment], last_month: &str) -> Vec<LedgerLine> {
    payments
        .iter()
        .map(|p| {
            let owed = arrears(payments, &p.resident, last_month);
            LedgerLine {
                payment: p.clone(),
                arrears: owed,
                grand_total: grand_total(p.amount, owed),
            }
        })
        .collect()
}

/// Flip a payment between paid and unpaid. Reverting clears the payment
/// date and method; marking paid records `today` and cash.
pub fn toggle_status(payment: &mut Payment, today: NaiveDate) {
    if payment.status.is_paid() {
        payment.status = PaymentStatus::Pending;
        payment.date = None;
        payment.method = None;
    } else {
        payment.status = PaymentStatus::Paid;
        payment.date = Some(today);
        payment.method = Some(PaymentMethod::Cash);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    /// Every unpaid amount in the collection, regardless of filters.
    pub total_arrears: f64,
    /// Paid amounts within the filtered set.
    pub collected: f64,
    /// All amounts within the filtered set.
    pub expected: f64,
}

pub fn collection_stats(all: &[Payment], filtered: &[&LedgerLine]) -> CollectionStats {
    CollectionStats {
        total_arrears: all.iter().filter(|p| !p.status.is_paid()).map(|p| p.amount).sum(),
        collected: filtered
            .iter()
            .filter(|l| l.payment.status.is_paid())
            .map(|l| l.payment.amount)
            .sum(),
        expected: filtered.iter().map(|l| l.payment.amount).sum(),
    }
}

/// Column sums printed under the statement table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTotals {
    pub subtotal: f64,
    pub arrears: f64,
    pub grand_total: f64,
}

pub fn statement_totals(filtered: &[&LedgerLine]) -> StatementTotals {
    StatementTotals {
        subtotal: filtered.iter().map(|l| l.payment.amount).sum(),
        arrears: filtered.iter().map(|l| l.arrears).sum(),
        grand_total: filtered.iter().map(|l| l.grand_total).sum(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub amount: f64,
    pub usage_kwh: u32,
    pub status: String,
}

/// One resident's standing across the last and current billing periods.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidentStatement {
    pub name: String,
    pub phone: String,
    pub last_month: PeriodSummary,
    pub current_month: PeriodSummary,
    pub total_owed: f64,
}

/// `None` when the resident has no payments at all.
pub fn resident_statement(
    payments: &[Payment],
    resident: &str,
    current_month: &str,
    last_month: &str,
) -> Option<ResidentStatement> {
    let own: Vec<&Payment> = payments.iter().filter(|p| p.resident == resident).collect();
    let first = own.first()?;

    let summary = |month: &str, missing_status: &str| {
        own.iter()
            .find(|p| p.month == month)
            .map(|p| PeriodSummary {
                amount: p.amount,
                usage_kwh: p.usage_kwh,
                status: p.status.as_str().to_string(),
            })
            .unwrap_or_else(|| PeriodSummary {
                amount: 0.0,
                usage_kwh: 0,
                status: missing_status.to_string(),
            })
    };
    let last = summary(last_month, "No Record");
    let current = summary(current_month, "Pending");
    let owed = arrears(payments, resident, last_month);

    Some(ResidentStatement {
        name: resident.to_string(),
        phone: if first.phone.is_empty() { "N/A".to_string() } else { first.phone.clone() },
        total_owed: grand_total(current.amount, owed),
        last_month: last,
        current_month: current,
    })
}

impl Record for LedgerLine {
    fn key(&self) -> String {
        self.payment.id.clone()
    }

    fn field(&self, data_key: &str) -> Option<Value> {
        let p = &self.payment;
        match data_key {
            "id" => Some(p.id.as_str().into()),
            "resident" => Some(p.resident.as_str().into()),
            "invoice_id" => Some(p.invoice_id.as_str().into()),
            "month" => Some(p.month.as_str().into()),
            "usage_kwh" => Some(kwh(f64::from(p.usage_kwh)).into()),
            "amount" => Some(Value::Money(p.amount)),
            "arrears" => Some(Value::Money(self.arrears)),
            "grand_total" => Some(Value::Money(self.grand_total)),
            "status" => Some(p.status.as_str().into()),
            "date" => p.date.map(|d| d.format("%Y-%m-%d").to_string().into()),
            "method" => p.method.map(|m| m.as_str().into()),
            "phone" => Some(p.phone.as_str().into()),
            _ => None,
        }
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.payment.resident)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.payment.resident, &self.payment.invoice_id]
    }

    fn status(&self) -> Option<&str> {
        Some(self.payment.status.as_str())
    }

    fn period(&self) -> Option<&str> {
        Some(&self.payment.month)
    }
}
