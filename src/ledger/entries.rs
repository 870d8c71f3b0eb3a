//! Manual ledger entry management

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::realtime::{CacheKey, InvalidationSink};
use crate::traits::*;
use crate::types::*;

/// Fields that can change when editing a manual entry
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub kind: Option<EntryKind>,
    pub frequency: Option<Frequency>,
    pub description: Option<String>,
    pub amount: Option<BigDecimal>,
    pub date: Option<NaiveDate>,
    pub source: Option<EntrySource>,
    pub notes: Option<Option<String>>,
}

/// Manager for manual ledger entry CRUD
///
/// Every successful mutation invalidates the ledger cache key so readers
/// re-fetch fresh data.
pub struct EntryManager<S: LedgerStore> {
    storage: S,
    validator: Box<dyn EntryValidator>,
    invalidation: Option<Arc<dyn InvalidationSink>>,
}

impl<S: LedgerStore> EntryManager<S> {
    /// Create a new entry manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultEntryValidator),
            invalidation: None,
        }
    }

    /// Create a new entry manager with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn EntryValidator>) -> Self {
        Self {
            storage,
            validator,
            invalidation: None,
        }
    }

    /// Attach the cache-invalidation sink notified after each mutation
    pub fn with_invalidation(mut self, sink: Arc<dyn InvalidationSink>) -> Self {
        self.invalidation = Some(sink);
        self
    }

    fn invalidate_ledger(&self) {
        if let Some(sink) = &self.invalidation {
            sink.invalidate(CacheKey::Ledger);
        }
    }

    /// Record a new manual entry
    pub async fn add_entry(&mut self, entry: LedgerEntry) -> ClinicResult<LedgerEntry> {
        self.validator.validate_entry(&entry)?;

        if self.storage.get_entry(entry.id).await?.is_some() {
            return Err(ClinicError::Validation(format!(
                "Entry with id '{}' already exists",
                entry.id
            )));
        }

        self.storage.save_entry(&entry).await?;
        self.invalidate_ledger();

        Ok(entry)
    }

    /// Apply a patch to an existing entry
    pub async fn update_entry(&mut self, id: Uuid, patch: EntryPatch) -> ClinicResult<LedgerEntry> {
        let mut entry = self
            .storage
            .get_entry(id)
            .await?
            .ok_or(ClinicError::EntryNotFound(id))?;

        if let Some(kind) = patch.kind {
            entry.kind = kind;
        }
        if let Some(frequency) = patch.frequency {
            entry.frequency = frequency;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(amount) = patch.amount {
            entry.amount = amount;
        }
        if let Some(date) = patch.date {
            entry.date = date;
        }
        if let Some(source) = patch.source {
            entry.source = source;
        }
        if let Some(notes) = patch.notes {
            entry.notes = notes;
        }
        entry.updated_at = chrono::Utc::now().naive_utc();

        self.validator.validate_entry(&entry)?;
        self.storage.update_entry(&entry).await?;
        self.invalidate_ledger();

        Ok(entry)
    }

    /// Delete an entry
    pub async fn delete_entry(&mut self, id: Uuid) -> ClinicResult<()> {
        if self.storage.get_entry(id).await?.is_none() {
            return Err(ClinicError::EntryNotFound(id));
        }

        self.storage.delete_entry(id).await?;
        self.invalidate_ledger();

        Ok(())
    }

    /// Get an entry by id
    pub async fn get_entry(&self, id: Uuid) -> ClinicResult<Option<LedgerEntry>> {
        self.storage.get_entry(id).await
    }

    /// List all entries, optionally filtered by kind
    pub async fn list_entries(&self, kind: Option<EntryKind>) -> ClinicResult<Vec<LedgerEntry>> {
        self.storage.list_entries(kind).await
    }

    /// List entries dated within `[start, end]`
    pub async fn entries_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClinicResult<Vec<LedgerEntry>> {
        if start > end {
            return Err(ClinicError::InvalidRange { start, end });
        }
        self.storage.entries_in_range(start, end).await
    }
}

/// Builder for manual entries, mirroring how the accounting form fills them in
#[derive(Debug)]
pub struct EntryBuilder {
    entry: LedgerEntry,
}

impl EntryBuilder {
    /// Start a new entry with the required fields
    pub fn new(
        kind: EntryKind,
        description: String,
        amount: BigDecimal,
        date: NaiveDate,
        source: EntrySource,
    ) -> Self {
        Self {
            entry: LedgerEntry::new(
                kind,
                Frequency::Occasional,
                description,
                amount,
                date,
                source,
            ),
        }
    }

    /// Set the recurrence
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.entry.frequency = frequency;
        self
    }

    /// Attach notes
    pub fn notes(mut self, notes: String) -> Self {
        self.entry.notes = Some(notes);
        self
    }

    /// Validate and build the entry
    pub fn build(self) -> ClinicResult<LedgerEntry> {
        DefaultEntryValidator.validate_entry(&self.entry)?;
        Ok(self.entry)
    }
}
