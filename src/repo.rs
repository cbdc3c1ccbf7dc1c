//! Record storage behind a small CRUD interface.
//!
//! The only backend is [`InMemoryRepository`]: records live for one process
//! and every change is lost on exit. Rendering code only sees the
//! [`Repository`] trait, so a durable store can replace it later.

use std::fmt::Display;

use crate::error::Result;
use crate::models::{AttendanceEntry, Invoice, Manager, Meter, Payment, Resident};

pub trait Entity: Clone {
    type Id: Clone + PartialEq + Display;

    /// Human-readable entity name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
    fn set_id(&mut self, id: Self::Id);
    /// The id a newly created record receives given the current records.
    fn next_id(existing: &[Self]) -> Self::Id;
}

pub trait Repository<T: Entity> {
    fn list(&self) -> Vec<T>;
    fn get(&self, id: &T::Id) -> Option<T>;
    /// Store a new record, assigning it a fresh id. Returns the stored record.
    fn create(&mut self, item: T) -> Result<T>;
    /// Replace the record with the same id. `Ok(false)` when no such record exists.
    fn update(&mut self, item: T) -> Result<bool>;
    /// `Ok(false)` when no such record exists.
    fn delete(&mut self, id: &T::Id) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct InMemoryRepository<T> {
    items: Vec<T>,
}

// Written out so an empty repository does not require `T: Default`.
impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Apply `f` to the record with the given id. Returns false when absent.
    pub fn modify(&mut self, id: &T::Id, f: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| &item.id() == id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn list(&self) -> Vec<T> {
        self.items.clone()
    }

    fn get(&self, id: &T::Id) -> Option<T> {
        self.items.iter().find(|item| &item.id() == id).cloned()
    }

    fn create(&mut self, mut item: T) -> Result<T> {
        item.set_id(T::next_id(&self.items));
        tracing::info!(kind = T::KIND, id = %item.id(), "created");
        self.items.push(item.clone());
        Ok(item)
    }

    fn update(&mut self, item: T) -> Result<bool> {
        let id = item.id();
        match self.items.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => {
                *existing = item;
                tracing::info!(kind = T::KIND, %id, "updated");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, id: &T::Id) -> Result<bool> {
        let before = self.items.len();
        self.items.retain(|item| &item.id() != id);
        let removed = self.items.len() != before;
        if removed {
            tracing::info!(kind = T::KIND, %id, "deleted");
        }
        Ok(removed)
    }
}

fn next_numeric<T>(existing: &[T], id: impl Fn(&T) -> u32) -> u32 {
    existing.iter().map(id).max().unwrap_or(0) + 1
}

/// Next id in a prefixed series such as `PAY-001`, keeping the zero padding.
fn next_prefixed<T>(existing: &[T], prefix: &str, id: impl Fn(&T) -> &str) -> String {
    let n = existing
        .iter()
        .filter_map(|item| id(item).strip_prefix(prefix)?.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    format!("{prefix}{n:03}")
}

macro_rules! numeric_entity {
    ($ty:ty, $kind:expr) => {
        impl Entity for $ty {
            type Id = u32;
            const KIND: &'static str = $kind;

            fn id(&self) -> u32 {
                self.id
            }

            fn set_id(&mut self, id: u32) {
                self.id = id;
            }

            fn next_id(existing: &[Self]) -> u32 {
                next_numeric(existing, |item| item.id)
            }
        }
    };
}

numeric_entity!(Manager, "manager");
numeric_entity!(Resident, "resident");
numeric_entity!(Meter, "meter");
numeric_entity!(AttendanceEntry, "attendance entry");

impl Entity for Payment {
    type Id = String;
    const KIND: &'static str = "payment";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn next_id(existing: &[Self]) -> String {
        next_prefixed(existing, "PAY-", |p| p.id.as_str())
    }
}

impl Entity for Invoice {
    type Id = String;
    const KIND: &'static str = "invoice";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn next_id(existing: &[Self]) -> String {
        next_prefixed(existing, "INV-2026-", |i| i.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_create_assigns_max_plus_one() {
        let mut repo = InMemoryRepository::new(fixtures::residents());
        let mut new = fixtures::residents()[0].clone();
        new.name = "Venerable Rith".into();
        let stored = repo.create(new).unwrap();
        assert_eq!(stored.id, 4);
        assert_eq!(repo.list().len(), 4);
    }

    #[test]
    fn test_create_on_empty_repo_starts_at_one() {
        let mut repo: InMemoryRepository<Manager> = InMemoryRepository::default();
        let stored = repo.create(fixtures::managers()[0].clone()).unwrap();
        assert_eq!(stored.id, 1);
    }

    #[test]
    fn test_payment_ids_keep_prefix_and_padding() {
        let mut repo = InMemoryRepository::new(fixtures::payments());
        let stored = repo.create(fixtures::payments()[0].clone()).unwrap();
        assert_eq!(stored.id, "PAY-006");
    }

    #[test]
    fn test_update_replaces_matching_record() {
        let mut repo = InMemoryRepository::new(fixtures::meters());
        let mut meter = repo.get(&2).unwrap();
        meter.kuti = "Kuti Z".into();
        assert!(repo.update(meter).unwrap());
        assert_eq!(repo.get(&2).unwrap().kuti, "Kuti Z");
    }

    #[test]
    fn test_update_missing_is_noop() {
        let mut repo = InMemoryRepository::new(fixtures::meters());
        let mut ghost = fixtures::meters()[0].clone();
        ghost.id = 99;
        assert!(!repo.update(ghost).unwrap());
        assert_eq!(repo.list(), fixtures::meters());
    }

    #[test]
    fn test_delete() {
        let mut repo = InMemoryRepository::new(fixtures::managers());
        assert!(repo.delete(&1).unwrap());
        assert!(!repo.delete(&1).unwrap());
        assert_eq!(repo.list().len(), 2);
    }

    #[test]
    fn test_modify_in_place() {
        let mut repo = InMemoryRepository::new(fixtures::payments());
        assert!(repo.modify(&"PAY-002".to_string(), |p| p.amount = 1.0));
        assert_eq!(repo.get(&"PAY-002".to_string()).unwrap().amount, 1.0);
        assert!(!repo.modify(&"PAY-999".to_string(), |p| p.amount = 1.0));
    }
}
