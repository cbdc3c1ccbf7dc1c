use crate::models::{Meter, MeterStatus};

/// Totals shown above the meter list.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSummary {
    pub meters: usize,
    pub active: usize,
    pub monthly_kwh: f64,
    pub yearly_kwh: f64,
    /// Sum of billed monthly costs, riels.
    pub monthly_revenue: i64,
    /// What this month's usage would cost at `rate` riels per kWh.
    pub projected_revenue: i64,
}

pub fn usage_summary(meters: &[Meter], rate: i64) -> UsageSummary {
    UsageSummary {
        meters: meters.len(),
        active: meters.iter().filter(|m| m.status == MeterStatus::Active).count(),
        monthly_kwh: meters.iter().map(|m| m.monthly_usage).sum(),
        yearly_kwh: meters.iter().map(|m| m.yearly_usage).sum(),
        monthly_revenue: meters.iter().map(|m| m.monthly_cost).sum(),
        projected_revenue: meters.iter().map(|m| m.cost_for(rate)).sum(),
    }
}
