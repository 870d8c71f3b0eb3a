//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// In-memory store backing both the ledger and the source collections
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<Uuid, LedgerEntry>>>,
    services: Arc<RwLock<Vec<ServiceRecord>>>,
    movements: Arc<RwLock<Vec<StockMovement>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a service record
    pub fn push_service(&self, record: ServiceRecord) {
        self.services.write().unwrap().push(record);
    }

    /// Seed a stock movement
    pub fn push_movement(&self, movement: StockMovement) {
        self.movements.write().unwrap().push(movement);
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
        self.services.write().unwrap().clear();
        self.movements.write().unwrap().clear();
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn save_entry(&mut self, entry: &LedgerEntry) -> ClinicResult<()> {
        self.entries
            .write()
            .unwrap()
            .insert(entry.id, entry.clone());
        Ok(())
    }

    async fn get_entry(&self, id: Uuid) -> ClinicResult<Option<LedgerEntry>> {
        Ok(self.entries.read().unwrap().get(&id).cloned())
    }

    async fn list_entries(&self, kind: Option<EntryKind>) -> ClinicResult<Vec<LedgerEntry>> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .values()
            .filter(|e| kind.is_none_or(|k| e.kind == k))
            .cloned()
            .collect())
    }

    async fn entries_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClinicResult<Vec<LedgerEntry>> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .values()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect())
    }

    async fn update_entry(&mut self, entry: &LedgerEntry) -> ClinicResult<()> {
        if self.entries.read().unwrap().contains_key(&entry.id) {
            self.entries
                .write()
                .unwrap()
                .insert(entry.id, entry.clone());
            Ok(())
        } else {
            Err(ClinicError::EntryNotFound(entry.id))
        }
    }

    async fn delete_entry(&mut self, id: Uuid) -> ClinicResult<()> {
        if self.entries.write().unwrap().remove(&id).is_some() {
            Ok(())
        } else {
            Err(ClinicError::EntryNotFound(id))
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn service_records(
        &self,
        kind: ServiceKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClinicResult<Vec<ServiceRecord>> {
        let services = self.services.read().unwrap();
        Ok(services
            .iter()
            .filter(|r| r.kind == kind && r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }

    async fn stock_movements(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClinicResult<Vec<StockMovement>> {
        let movements = self.movements.read().unwrap();
        Ok(movements
            .iter()
            .filter(|m| m.date >= start && m.date <= end)
            .cloned()
            .collect())
    }
}
