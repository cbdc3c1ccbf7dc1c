use std::collections::HashSet;

use crate::error::{EmsError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub id: String,
    pub label: String,
    pub print_label: Option<String>,
    pub data_key: String,
    /// CSS width, rendered verbatim.
    pub width: String,
    pub permanent: bool,
}

impl ColumnDef {
    pub fn new(id: &str, label: &str, data_key: &str, width: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            print_label: None,
            data_key: data_key.to_string(),
            width: width.to_string(),
            permanent: false,
        }
    }

    pub fn print_as(mut self, print_label: &str) -> Self {
        self.print_label = Some(print_label.to_string());
        self
    }

    pub fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }

    /// Label for the print layout, falling back to the screen label.
    pub fn print_label(&self) -> &str {
        match self.print_label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => &self.label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnField {
    Label,
    PrintLabel,
    DataKey,
    Width,
}

impl std::str::FromStr for ColumnField {
    type Err = EmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "label" => Ok(ColumnField::Label),
            "print-label" | "print_label" => Ok(ColumnField::PrintLabel),
            "key" | "data-key" | "data_key" => Ok(ColumnField::DataKey),
            "width" => Ok(ColumnField::Width),
            other => Err(EmsError::InvalidField { field: "column attribute", value: other.to_string() }),
        }
    }
}

const NEW_COLUMN_LABEL: &str = "New Column";
const NEW_COLUMN_PRINT_LABEL: &str = "ជួរឈរថ្មី";
const NEW_COLUMN_WIDTH: &str = "150px";

/// Ordered column definitions for one report.
///
/// Always holds at least one permanent column. `add`, `remove` and
/// `update` never fail: unknown ids and permanent columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<ColumnDef>,
    last_stamp: i64,
}

impl ColumnRegistry {
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        if !columns.iter().any(|c| c.permanent) {
            return Err(EmsError::InvalidColumns("at least one permanent column is required".into()));
        }
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.id.as_str()) {
                return Err(EmsError::InvalidColumns(format!("duplicate column id: {}", col.id)));
            }
        }
        Ok(Self { columns, last_stamp: 0 })
    }

    /// Built-in column sets are known-valid; skip the checks.
    pub(super) fn from_defaults(columns: Vec<ColumnDef>) -> Self {
        debug_assert!(columns.iter().any(|c| c.permanent));
        Self { columns, last_stamp: 0 }
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDef> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn contains_key(&self, data_key: &str) -> bool {
        self.columns.iter().any(|c| c.data_key == data_key)
    }

    /// Append a placeholder column with a timestamp-based id and key.
    pub fn add_column(&mut self) -> &ColumnDef {
        let now = chrono::Local::now().timestamp_millis();
        self.add_column_at(now)
    }

    /// Stamps never repeat within a registry: a clock that stalls or runs
    /// backwards still yields fresh ids.
    fn add_column_at(&mut self, now: i64) -> &ColumnDef {
        let mut stamp = now.max(self.last_stamp + 1);
        while self.get(&format!("col-{stamp}")).is_some() {
            stamp += 1;
        }
        self.last_stamp = stamp;
        self.columns.push(ColumnDef {
            id: format!("col-{stamp}"),
            label: NEW_COLUMN_LABEL.to_string(),
            print_label: Some(NEW_COLUMN_PRINT_LABEL.to_string()),
            data_key: format!("field_{stamp}"),
            width: NEW_COLUMN_WIDTH.to_string(),
            permanent: false,
        });
        tracing::debug!(id = %format!("col-{stamp}"), "column added");
        &self.columns[self.columns.len() - 1]
    }

    /// Remove a column. Returns whether anything was removed.
    pub fn remove_column(&mut self, id: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c.id != id || c.permanent);
        let removed = self.columns.len() != before;
        if !removed {
            tracing::warn!(id, "column not removed (unknown or permanent)");
        }
        removed
    }

    /// Replace one attribute of one column. Any string is accepted.
    pub fn update_column(&mut self, id: &str, field: ColumnField, value: &str) -> bool {
        let Some(col) = self.columns.iter_mut().find(|c| c.id == id) else {
            tracing::warn!(id, "column not updated (unknown id)");
            return false;
        };
        match field {
            ColumnField::Label => col.label = value.to_string(),
            ColumnField::PrintLabel => col.print_label = Some(value.to_string()),
            ColumnField::DataKey => col.data_key = value.to_string(),
            ColumnField::Width => col.width = value.to_string(),
        }
        true
    }
}

impl<'a> IntoIterator for &'a ColumnRegistry {
    type Item = &'a ColumnDef;
    type IntoIter = std::slice::Iter<'a, ColumnDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ColumnRegistry {
        ColumnRegistry::new(vec![
            ColumnDef::new("no", "No.", "index", "60px").print_as("ល.រ").permanent(),
            ColumnDef::new("name", "Full Name", "full_name", "300px").permanent(),
            ColumnDef::new("role", "Position / Title", "role", "170px"),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_requires_permanent_column() {
        let err = ColumnRegistry::new(vec![ColumnDef::new("a", "A", "a", "1px")]).unwrap_err();
        assert!(err.to_string().contains("permanent"));
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let err = ColumnRegistry::new(vec![
            ColumnDef::new("a", "A", "a", "1px").permanent(),
            ColumnDef::new("a", "B", "b", "1px"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_remove_permanent_is_noop() {
        let mut reg = registry();
        let before = reg.clone();
        assert!(!reg.remove_column("no"));
        assert!(!reg.remove_column("name"));
        assert_eq!(reg, before);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut reg = registry();
        let before = reg.clone();
        assert!(!reg.remove_column("nope"));
        assert_eq!(reg, before);
    }

    #[test]
    fn test_remove_regular_column() {
        let mut reg = registry();
        assert!(reg.remove_column("role"));
        let ids: Vec<&str> = reg.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["no", "name"]);
    }

    #[test]
    fn test_add_column_placeholder() {
        let mut reg = registry();
        let col = reg.add_column().clone();
        assert!(col.id.starts_with("col-"));
        assert!(col.data_key.starts_with("field_"));
        assert_eq!(col.label, "New Column");
        assert_eq!(col.width, "150px");
        assert!(!col.permanent);
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn test_add_column_ids_unique_within_same_millisecond() {
        let mut reg = registry();
        let a = reg.add_column_at(1_000).id.clone();
        let b = reg.add_column_at(1_000).id.clone();
        let c = reg.add_column_at(999).id.clone();
        assert_eq!(a, "col-1000");
        assert_eq!(b, "col-1001");
        assert_eq!(c, "col-1002");
    }

    #[test]
    fn test_update_accepts_any_string() {
        let mut reg = registry();
        assert!(reg.update_column("role", ColumnField::Label, ""));
        assert!(reg.update_column("role", ColumnField::Width, "wide"));
        let role = reg.get("role").unwrap();
        assert_eq!(role.label, "");
        assert_eq!(role.width, "wide");
        assert!(!reg.update_column("ghost", ColumnField::Label, "x"));
    }

    #[test]
    fn test_print_label_falls_back_to_label() {
        let reg = registry();
        assert_eq!(reg.get("no").unwrap().print_label(), "ល.រ");
        assert_eq!(reg.get("role").unwrap().print_label(), "Position / Title");
    }

    #[test]
    fn test_column_field_parse() {
        assert_eq!("label".parse::<ColumnField>().unwrap(), ColumnField::Label);
        assert_eq!("print-label".parse::<ColumnField>().unwrap(), ColumnField::PrintLabel);
        assert!("colour".parse::<ColumnField>().is_err());
    }
}
