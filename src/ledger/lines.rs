//! Presentation-boundary union of manual entries and derived lines

use chrono::NaiveDate;

use crate::summary::SourceCollections;
use crate::types::*;

fn service_source(kind: ServiceKind) -> EntrySource {
    match kind {
        ServiceKind::Consultation => EntrySource::Consultation,
        ServiceKind::Vaccination => EntrySource::Vaccination,
        ServiceKind::Antiparasitic => EntrySource::Antiparasitic,
        ServiceKind::Prescription => EntrySource::Prescription,
    }
}

fn service_description(kind: ServiceKind) -> &'static str {
    match kind {
        ServiceKind::Consultation => "Consultation",
        ServiceKind::Vaccination => "Vaccination",
        ServiceKind::Antiparasitic => "Antiparasitic treatment",
        ServiceKind::Prescription => "Prescription",
    }
}

fn derive_service_line(record: &ServiceRecord) -> Option<DerivedLine> {
    let cost = record.cost.clone()?;
    Some(DerivedLine {
        source_id: record.id,
        source: service_source(record.kind),
        kind: EntryKind::Revenue,
        date: record.date,
        amount: cost,
        description: service_description(record.kind).to_string(),
    })
}

fn derive_purchase_line(movement: &StockMovement) -> Option<DerivedLine> {
    let cost = movement.purchase_cost()?;
    Some(DerivedLine {
        source_id: movement.id,
        source: EntrySource::StockPurchase,
        kind: EntryKind::Expense,
        date: movement.date,
        amount: cost,
        description: "Stock purchase".to_string(),
    })
}

/// Union manual entries with lines derived from source records for display
///
/// Derived lines are synthesized here and nowhere else; the result is sorted
/// by date. Records outside `[start, end]` are dropped.
pub fn ledger_lines(
    sources: &SourceCollections<'_>,
    start: NaiveDate,
    end: NaiveDate,
) -> ClinicResult<Vec<LedgerLine>> {
    if start > end {
        return Err(ClinicError::InvalidRange { start, end });
    }

    let mut lines: Vec<LedgerLine> = Vec::new();

    for entry in sources.manual_entries {
        if entry.date >= start && entry.date <= end {
            lines.push(LedgerLine::Manual(entry.clone()));
        }
    }

    let services = sources
        .consultations
        .iter()
        .chain(sources.vaccinations)
        .chain(sources.antiparasitics)
        .chain(sources.prescriptions);
    for record in services {
        if record.date >= start && record.date <= end {
            if let Some(line) = derive_service_line(record) {
                lines.push(LedgerLine::Derived(line));
            }
        }
    }

    for movement in sources.stock_movements {
        if movement.date >= start && movement.date <= end {
            if let Some(line) = derive_purchase_line(movement) {
                lines.push(LedgerLine::Derived(line));
            }
        }
    }

    lines.sort_by_key(|line| line.date());
    Ok(lines)
}
