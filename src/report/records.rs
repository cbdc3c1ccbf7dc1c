use super::{Record, Value};
use crate::fmt::riels;
use crate::models::{AttendanceEntry, Invoice, Manager, Meter, Resident};

impl Record for AttendanceEntry {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, data_key: &str) -> Option<Value> {
        match data_key {
            "full_name" => Some(self.full_name.as_str().into()),
            "role" => Some(self.role.as_str().into()),
            "gender_role" => Some(self.gender_role.as_str().into()),
            "phone" => Some(self.phone.as_str().into()),
            // Columns added at runtime read from the free-form map.
            other => self.extra.get(other).map(|v| v.as_str().into()),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.full_name, &self.role]
    }
}

impl Record for Invoice {
    fn key(&self) -> String {
        self.id.clone()
    }

    fn field(&self, data_key: &str) -> Option<Value> {
        match data_key {
            "id" => Some(self.id.as_str().into()),
            "resident" => Some(self.resident.as_str().into()),
            "meter" => Some(self.meter.as_str().into()),
            "period" => Some(self.period.as_str().into()),
            "amount" => Some(riels(self.amount).into()),
            "status" => Some(self.status.as_str().into()),
            _ => None,
        }
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.resident)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.resident, &self.id]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn period(&self) -> Option<&str> {
        Some(&self.period)
    }
}

impl Record for Meter {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, data_key: &str) -> Option<Value> {
        match data_key {
            "meter_id" => Some(self.meter_id.as_str().into()),
            "resident" => Some(self.resident.as_str().into()),
            "kuti" => Some(self.kuti.as_str().into()),
            "monthly_usage" => Some(Value::Number(self.monthly_usage)),
            "yearly_usage" => Some(Value::Number(self.yearly_usage)),
            "monthly_cost" => Some(riels(self.monthly_cost).into()),
            "status" => Some(self.status.as_str().into()),
            _ => None,
        }
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.resident)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.meter_id, &self.resident]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl Record for Resident {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, data_key: &str) -> Option<Value> {
        match data_key {
            "id" => Some(Value::Integer(i64::from(self.id))),
            "name" => Some(self.name.as_str().into()),
            "role" => Some(self.role.as_str().into()),
            "kuti" => Some(self.kuti.as_str().into()),
            "kuti_number" => Some(self.kuti_number.as_str().into()),
            "meter" => Some(self.meter.as_str().into()),
            "phone" => Some(self.phone.as_str().into()),
            "joined" => self.joined.map(|d| d.format("%Y-%m-%d").to_string().into()),
            _ => None,
        }
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.meter]
    }
}

impl Record for Manager {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn field(&self, data_key: &str) -> Option<Value> {
        match data_key {
            "id" => Some(Value::Integer(i64::from(self.id))),
            "name" => Some(self.name.as_str().into()),
            "phone" => Some(self.phone.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            "kuti" => Some(self.kuti.name.as_str().into()),
            "kuti_number" => Some(self.kuti.number.as_str().into()),
            "resident_count" => Some(Value::Integer(i64::from(self.resident_count))),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::report::filter::{filter_rows, FilterState, Viewer};

    #[test]
    fn test_attendance_extra_fields() {
        let mut entry = fixtures::attendance().remove(0);
        entry.extra.insert("field_42".into(), "Kuti 7".into());
        assert_eq!(entry.field("field_42"), Some(Value::Text("Kuti 7".into())));
        assert_eq!(entry.field("field_43"), None);
        assert_eq!(entry.field("gender_role"), Some(Value::Text("Monk".into())));
    }

    #[test]
    fn test_attendance_visible_to_resident_viewer() {
        let rows = fixtures::attendance();
        let viewer = Viewer::Resident("Sokha".into());
        assert_eq!(filter_rows(&rows, &FilterState::default(), &viewer).len(), 3);
    }

    #[test]
    fn test_invoice_filter_by_period_and_status() {
        let rows = fixtures::invoices();
        let state = FilterState::default()
            .with_period(Some("March 2026"))
            .with_status(Some("Unpaid"));
        let matched = filter_rows(&rows, &state, &Viewer::Admin);
        let ids: Vec<&str> = matched.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["INV-2026-002", "INV-2026-003"]);
        assert_eq!(matched[0].field("amount"), Some(Value::Text("23,729 Riels".into())));
    }

    #[test]
    fn test_meter_usage_is_numeric() {
        let meter = &fixtures::meters()[0];
        assert_eq!(meter.field("monthly_usage"), Some(Value::Number(45.2)));
        assert_eq!(meter.field("status"), Some(Value::Text("Active".into())));
    }

    #[test]
    fn test_manager_fields() {
        let manager = &fixtures::managers()[1];
        assert_eq!(manager.field("resident_count"), Some(Value::Integer(12)));
        assert_eq!(manager.field("kuti_number"), Some(Value::Text("B-03".into())));
    }
}
