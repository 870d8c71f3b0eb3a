//! Core types and data structures for the clinic domain

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a ledger entry adds to revenue or to expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Revenue,
    Expense,
}

/// How often a manual entry recurs (informational, not scheduled by this crate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Monthly,
    Annual,
    Occasional,
}

/// Where a ledger line's money came from
///
/// The first five variants are valid on persisted manual entries. The
/// remaining variants only ever appear on [`DerivedLine`]s synthesized from
/// source records at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySource {
    Salary,
    Rent,
    Tax,
    Insurance,
    Other,
    Consultation,
    Vaccination,
    Antiparasitic,
    Prescription,
    StockPurchase,
}

impl EntrySource {
    /// Returns true for sources staff may pick when recording a manual entry
    pub fn is_manual(&self) -> bool {
        matches!(
            self,
            EntrySource::Salary
                | EntrySource::Rent
                | EntrySource::Tax
                | EntrySource::Insurance
                | EntrySource::Other
        )
    }
}

/// A manually recorded revenue or expense entry
///
/// Only manual entries are persisted. Automatic entries (consultation fees,
/// stock purchases, ...) are derived from their own source records at
/// aggregation time and never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for the entry
    pub id: Uuid,
    /// Revenue or expense
    pub kind: EntryKind,
    /// Recurrence of the entry
    pub frequency: Frequency,
    /// Human-readable description
    pub description: String,
    /// Non-negative amount
    pub amount: BigDecimal,
    /// Calendar date the entry applies to
    pub date: NaiveDate,
    /// Attribution source (manual sources only)
    pub source: EntrySource,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the entry was created
    pub created_at: NaiveDateTime,
    /// When the entry was last updated
    pub updated_at: NaiveDateTime,
}

impl LedgerEntry {
    /// Create a new manual entry with a fresh id and timestamps
    pub fn new(
        kind: EntryKind,
        frequency: Frequency,
        description: String,
        amount: BigDecimal,
        date: NaiveDate,
        source: EntrySource,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            kind,
            frequency,
            description,
            amount,
            date,
            source,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The four billable service types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    Consultation,
    Vaccination,
    Antiparasitic,
    Prescription,
}

/// A billable service performed for a patient
///
/// Owned by the respective feature modules; aggregation only reads `kind`,
/// `date` and `cost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: Uuid,
    pub kind: ServiceKind,
    pub date: NaiveDate,
    /// Billed amount; a record without a cost contributes zero
    pub cost: Option<BigDecimal>,
    pub client_id: Uuid,
    pub patient_id: Uuid,
}

impl ServiceRecord {
    pub fn new(
        kind: ServiceKind,
        date: NaiveDate,
        cost: Option<BigDecimal>,
        client_id: Uuid,
        patient_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            date,
            cost,
            client_id,
            patient_id,
        }
    }
}

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    In,
    Out,
    Adjustment,
    Transfer,
}

/// Why a stock movement happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementReason {
    Purchase,
    Sale,
    Expiry,
    Breakage,
    InventoryCount,
    InternalTransfer,
}

/// A quantity of a stock item moving in or out of inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub item_id: Uuid,
    pub movement: MovementType,
    pub quantity: BigDecimal,
    pub date: NaiveDate,
    /// Unit cost of the associated stock item at movement time
    pub unit_cost: BigDecimal,
    pub reason: MovementReason,
}

impl StockMovement {
    pub fn new(
        item_id: Uuid,
        movement: MovementType,
        quantity: BigDecimal,
        date: NaiveDate,
        unit_cost: BigDecimal,
        reason: MovementReason,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            movement,
            quantity,
            date,
            unit_cost,
            reason,
        }
    }

    /// Expense this movement represents, if it is a stock purchase
    pub fn purchase_cost(&self) -> Option<BigDecimal> {
        if self.movement == MovementType::In && self.reason == MovementReason::Purchase {
            Some(&self.quantity * &self.unit_cost)
        } else {
            None
        }
    }
}

/// An item held in the clinic's inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub manufacturer: Option<String>,
    pub batch_number: Option<String>,
    pub dosage: Option<String>,
    pub unit: String,
    pub current_stock: BigDecimal,
    pub minimum_stock: BigDecimal,
    pub purchase_price: BigDecimal,
    pub selling_price: BigDecimal,
    pub expiry_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
}

/// A ledger line synthesized from a source record at read time
///
/// Never persisted; carries a reference back to the record it was derived
/// from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedLine {
    /// Id of the source record this line was derived from
    pub source_id: Uuid,
    /// Automatic source (consultation, vaccination, ...)
    pub source: EntrySource,
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub description: String,
}

/// A line in the presented ledger: either a persisted manual entry or a
/// line derived from a source record
///
/// The two are unioned only at the presentation boundary; storage never
/// mixes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerLine {
    Manual(LedgerEntry),
    Derived(DerivedLine),
}

impl LedgerLine {
    pub fn date(&self) -> NaiveDate {
        match self {
            LedgerLine::Manual(e) => e.date,
            LedgerLine::Derived(d) => d.date,
        }
    }

    pub fn amount(&self) -> &BigDecimal {
        match self {
            LedgerLine::Manual(e) => &e.amount,
            LedgerLine::Derived(d) => &d.amount,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            LedgerLine::Manual(e) => e.kind,
            LedgerLine::Derived(d) => d.kind,
        }
    }
}

/// Revenue attributed per source for one period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub consultations: BigDecimal,
    pub vaccinations: BigDecimal,
    pub antiparasitics: BigDecimal,
    pub prescriptions: BigDecimal,
    pub manual_entries: BigDecimal,
}

impl RevenueBreakdown {
    /// Sum of all revenue buckets
    pub fn total(&self) -> BigDecimal {
        &self.consultations
            + &self.vaccinations
            + &self.antiparasitics
            + &self.prescriptions
            + &self.manual_entries
    }
}

/// Expenses attributed per source for one period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub stock_purchases: BigDecimal,
    pub salaries: BigDecimal,
    pub rent: BigDecimal,
    pub taxes: BigDecimal,
    pub other: BigDecimal,
}

impl ExpenseBreakdown {
    /// Sum of all expense buckets
    pub fn total(&self) -> BigDecimal {
        &self.stock_purchases + &self.salaries + &self.rent + &self.taxes + &self.other
    }
}

/// Aggregated financial view of one period (derived, not persisted)
///
/// Invariants: `total_revenue` equals the sum of the revenue buckets,
/// `total_expenses` equals the sum of the expense buckets, and
/// `net_income = total_revenue - total_expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Label for the period (e.g. "2024-03")
    pub period: String,
    pub total_revenue: BigDecimal,
    pub total_expenses: BigDecimal,
    pub net_income: BigDecimal,
    pub revenue: RevenueBreakdown,
    pub expenses: ExpenseBreakdown,
}

/// Errors that can occur in the clinic core
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(Uuid),
    #[error("Subscription error: {0}")]
    Subscription(String),
    #[error("CSV error: {0}")]
    Csv(String),
}

/// Result type for clinic operations
pub type ClinicResult<T> = Result<T, ClinicError>;
