//! CSV import and export for stock items
//!
//! Column names are the French headers the clinic's spreadsheets use; the
//! column order on export is fixed so re-imports round-trip.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Writer};
use tracing::warn;
use uuid::Uuid;

use crate::types::{ClinicError, ClinicResult, StockItem};

/// Export column order, fixed
pub const EXPORT_HEADERS: [&str; 17] = [
    "Nom",
    "Catégorie",
    "Sous-catégorie",
    "Fabricant",
    "Numéro de lot",
    "Dosage",
    "Unité",
    "Stock actuel",
    "Stock minimum",
    "Prix d'achat",
    "Prix de vente",
    "Date d'expiration",
    "Fournisseur",
    "Emplacement",
    "Notes",
    "Code-barres",
    "SKU",
];

/// Headers that must be present for an import to start
pub const REQUIRED_HEADERS: [&str; 7] = [
    "Nom",
    "Catégorie",
    "Unité",
    "Stock actuel",
    "Stock minimum",
    "Prix d'achat",
    "Prix de vente",
];

/// Categories an imported row may carry
pub const KNOWN_CATEGORIES: [&str; 7] = [
    "Médicament",
    "Vaccin",
    "Antiparasitaire",
    "Consommable",
    "Alimentation",
    "Matériel",
    "Autre",
];

/// Outcome of a CSV import: valid rows become items, bad rows are counted
#[derive(Debug, Default)]
pub struct ImportReport {
    pub items: Vec<StockItem>,
    pub errors: usize,
}

impl ImportReport {
    /// Number of rows imported successfully
    pub fn imported(&self) -> usize {
        self.items.len()
    }
}

fn opt_field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Serialize items to CSV bytes in the fixed column order
pub fn export_items(items: &[StockItem]) -> ClinicResult<Vec<u8>> {
    let mut writer = Writer::from_writer(vec![]);
    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| ClinicError::Csv(e.to_string()))?;

    for item in items {
        writer
            .write_record([
                item.name.as_str(),
                item.category.as_str(),
                item.subcategory.as_deref().unwrap_or(""),
                item.manufacturer.as_deref().unwrap_or(""),
                item.batch_number.as_deref().unwrap_or(""),
                item.dosage.as_deref().unwrap_or(""),
                item.unit.as_str(),
                &item.current_stock.to_string(),
                &item.minimum_stock.to_string(),
                &item.purchase_price.to_string(),
                &item.selling_price.to_string(),
                &item
                    .expiry_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                item.supplier.as_deref().unwrap_or(""),
                item.location.as_deref().unwrap_or(""),
                item.notes.as_deref().unwrap_or(""),
                item.barcode.as_deref().unwrap_or(""),
                item.sku.as_deref().unwrap_or(""),
            ])
            .map_err(|e| ClinicError::Csv(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ClinicError::Csv(e.to_string()))
}

fn parse_row(row: &HashMap<String, String>) -> Result<StockItem, String> {
    let field = |name: &str| row.get(name).map(String::as_str).unwrap_or("").trim();

    let name = field("Nom");
    if name.is_empty() {
        return Err("missing name".to_string());
    }

    let category = field("Catégorie");
    if !KNOWN_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category))
    {
        return Err(format!("unknown category '{category}'"));
    }

    let unit = field("Unité");
    if unit.is_empty() {
        return Err("missing unit".to_string());
    }

    let decimal = |name: &str| -> Result<BigDecimal, String> {
        field(name)
            .parse::<BigDecimal>()
            .map_err(|_| format!("invalid number in '{name}'"))
    };

    let expiry_date = match field("Date d'expiration") {
        "" => None,
        raw => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| format!("invalid expiry date '{raw}'"))?,
        ),
    };

    Ok(StockItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        category: category.to_string(),
        subcategory: opt_field(field("Sous-catégorie")),
        manufacturer: opt_field(field("Fabricant")),
        batch_number: opt_field(field("Numéro de lot")),
        dosage: opt_field(field("Dosage")),
        unit: unit.to_string(),
        current_stock: decimal("Stock actuel")?,
        minimum_stock: decimal("Stock minimum")?,
        purchase_price: decimal("Prix d'achat")?,
        selling_price: decimal("Prix de vente")?,
        expiry_date,
        supplier: opt_field(field("Fournisseur")),
        location: opt_field(field("Emplacement")),
        notes: opt_field(field("Notes")),
        barcode: opt_field(field("Code-barres")),
        sku: opt_field(field("SKU")),
    })
}

/// Parse CSV bytes into stock items
///
/// Fails up front if any of the required headers is absent. Individual rows
/// failing validation are skipped and counted, never fatal to the batch.
pub fn import_items(data: &[u8]) -> ClinicResult<ImportReport> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ClinicError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for required in REQUIRED_HEADERS {
        if !headers.iter().any(|h| h == required) {
            return Err(ClinicError::Csv(format!(
                "missing required column '{required}'"
            )));
        }
    }

    let mut report = ImportReport::default();

    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(row = index + 1, %err, "unreadable CSV row skipped");
                report.errors += 1;
                continue;
            }
        };

        let row: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|v| v.to_string()))
            .collect();

        match parse_row(&row) {
            Ok(item) => report.items.push(item),
            Err(reason) => {
                warn!(row = index + 1, reason, "invalid CSV row skipped");
                report.errors += 1;
            }
        }
    }

    Ok(report)
}
