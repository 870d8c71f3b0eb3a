//! The aggregation engine deriving a period financial summary

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use crate::types::*;

/// Borrowed view over the collections a summary is derived from
///
/// The engine never mutates these; the data-fetching layer owns them and is
/// the single writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceCollections<'a> {
    pub consultations: &'a [ServiceRecord],
    pub vaccinations: &'a [ServiceRecord],
    pub antiparasitics: &'a [ServiceRecord],
    pub prescriptions: &'a [ServiceRecord],
    pub stock_movements: &'a [StockMovement],
    pub manual_entries: &'a [LedgerEntry],
}

/// Derive the financial summary for `[start, end]`, inclusive on both ends
///
/// Pure function of its inputs: same collections and range always produce
/// the same summary. Records dated exactly on `start` or `end` are
/// included. A service record without a cost contributes zero. Negative
/// amounts are clamped to zero with a logged warning rather than skewing
/// the totals.
pub fn generate_summary(
    period: &str,
    start: NaiveDate,
    end: NaiveDate,
    sources: &SourceCollections<'_>,
) -> ClinicResult<PeriodSummary> {
    if start > end {
        return Err(ClinicError::InvalidRange { start, end });
    }

    let revenue = RevenueBreakdown {
        consultations: sum_service_costs(sources.consultations, start, end),
        vaccinations: sum_service_costs(sources.vaccinations, start, end),
        antiparasitics: sum_service_costs(sources.antiparasitics, start, end),
        prescriptions: sum_service_costs(sources.prescriptions, start, end),
        manual_entries: sum_manual(sources.manual_entries, EntryKind::Revenue, start, end, None),
    };

    let expenses = ExpenseBreakdown {
        stock_purchases: sum_stock_purchases(sources.stock_movements, start, end),
        salaries: sum_manual_expense(sources.manual_entries, start, end, ExpenseBucket::Salaries),
        rent: sum_manual_expense(sources.manual_entries, start, end, ExpenseBucket::Rent),
        taxes: sum_manual_expense(sources.manual_entries, start, end, ExpenseBucket::Taxes),
        other: sum_manual_expense(sources.manual_entries, start, end, ExpenseBucket::Other),
    };

    let total_revenue = revenue.total();
    let total_expenses = expenses.total();
    let net_income = &total_revenue - &total_expenses;

    Ok(PeriodSummary {
        period: period.to_string(),
        total_revenue,
        total_expenses,
        net_income,
        revenue,
        expenses,
    })
}

/// Expense buckets a manual expense entry can land in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExpenseBucket {
    Salaries,
    Rent,
    Taxes,
    Other,
}

impl ExpenseBucket {
    /// Bucket for a manual expense source; anything not named maps to Other
    fn for_source(source: EntrySource) -> Self {
        match source {
            EntrySource::Salary => ExpenseBucket::Salaries,
            EntrySource::Rent => ExpenseBucket::Rent,
            EntrySource::Tax => ExpenseBucket::Taxes,
            _ => ExpenseBucket::Other,
        }
    }
}

fn in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

fn clamped(amount: BigDecimal, record_id: Uuid, what: &str) -> BigDecimal {
    if amount < BigDecimal::from(0) {
        warn!(%record_id, %amount, "negative {what} clamped to zero");
        BigDecimal::from(0)
    } else {
        amount
    }
}

fn sum_service_costs(records: &[ServiceRecord], start: NaiveDate, end: NaiveDate) -> BigDecimal {
    records
        .iter()
        .filter(|r| in_range(r.date, start, end))
        .map(|r| {
            let cost = r.cost.clone().unwrap_or_else(|| BigDecimal::from(0));
            clamped(cost, r.id, "service cost")
        })
        .sum()
}

fn sum_stock_purchases(movements: &[StockMovement], start: NaiveDate, end: NaiveDate) -> BigDecimal {
    movements
        .iter()
        .filter(|m| in_range(m.date, start, end))
        .filter_map(|m| m.purchase_cost().map(|c| clamped(c, m.id, "purchase cost")))
        .sum()
}

fn sum_manual(
    entries: &[LedgerEntry],
    kind: EntryKind,
    start: NaiveDate,
    end: NaiveDate,
    bucket: Option<ExpenseBucket>,
) -> BigDecimal {
    entries
        .iter()
        .filter(|e| e.kind == kind && in_range(e.date, start, end))
        .filter(|e| bucket.is_none_or(|b| ExpenseBucket::for_source(e.source) == b))
        .map(|e| clamped(e.amount.clone(), e.id, "entry amount"))
        .sum()
}

fn sum_manual_expense(
    entries: &[LedgerEntry],
    start: NaiveDate,
    end: NaiveDate,
    bucket: ExpenseBucket,
) -> BigDecimal {
    sum_manual(entries, EntryKind::Expense, start, end, Some(bucket))
}
