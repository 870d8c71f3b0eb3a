//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::types::*;

/// Storage abstraction for manual ledger entries
///
/// This trait lets the clinic core work with any persistence backend
/// (hosted Postgres, SQLite, in-memory, ...) by implementing these methods.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Save a new entry to storage
    async fn save_entry(&mut self, entry: &LedgerEntry) -> ClinicResult<()>;

    /// Get an entry by id
    async fn get_entry(&self, id: Uuid) -> ClinicResult<Option<LedgerEntry>>;

    /// List all entries, optionally filtered by kind
    async fn list_entries(&self, kind: Option<EntryKind>) -> ClinicResult<Vec<LedgerEntry>>;

    /// List entries dated within `[start, end]`, inclusive on both ends
    async fn entries_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClinicResult<Vec<LedgerEntry>>;

    /// Update an existing entry
    async fn update_entry(&mut self, entry: &LedgerEntry) -> ClinicResult<()>;

    /// Delete an entry
    async fn delete_entry(&mut self, id: Uuid) -> ClinicResult<()>;
}

/// Read access to the source collections feeding aggregation
///
/// The aggregation engine itself works on already-fetched slices; this trait
/// is the seam the data-fetching layer implements to produce them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Service records of one kind dated within `[start, end]`
    async fn service_records(
        &self,
        kind: ServiceKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClinicResult<Vec<ServiceRecord>>;

    /// Stock movements dated within `[start, end]`
    async fn stock_movements(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClinicResult<Vec<StockMovement>>;
}

/// Trait for implementing custom manual-entry validation rules
pub trait EntryValidator: Send + Sync {
    /// Validate an entry before saving or updating
    fn validate_entry(&self, entry: &LedgerEntry) -> ClinicResult<()>;
}

/// Default entry validator with the baseline rules every write must pass
pub struct DefaultEntryValidator;

impl EntryValidator for DefaultEntryValidator {
    fn validate_entry(&self, entry: &LedgerEntry) -> ClinicResult<()> {
        if entry.description.trim().is_empty() {
            return Err(ClinicError::Validation(
                "Entry description cannot be empty".to_string(),
            ));
        }

        if entry.amount < BigDecimal::from(0) {
            return Err(ClinicError::Validation(
                "Entry amount cannot be negative".to_string(),
            ));
        }

        if !entry.source.is_manual() {
            return Err(ClinicError::Validation(format!(
                "Source {:?} is derived automatically and cannot be recorded manually",
                entry.source
            )));
        }

        Ok(())
    }
}
