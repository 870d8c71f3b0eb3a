//! Stock CSV export/import example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use clinic_core::{export_items, import_items, StockItem};
use uuid::Uuid;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📦 Clinic Core - Stock CSV Example\n");

    let items = vec![StockItem {
        id: Uuid::new_v4(),
        name: "Amoxicilline 250mg".to_string(),
        category: "Médicament".to_string(),
        subcategory: Some("Antibiotique".to_string()),
        manufacturer: Some("Virbac".to_string()),
        batch_number: Some("L2024-117".to_string()),
        dosage: Some("250mg".to_string()),
        unit: "boîte".to_string(),
        current_stock: BigDecimal::from(12),
        minimum_stock: BigDecimal::from(3),
        purchase_price: BigDecimal::from(8),
        selling_price: BigDecimal::from(14),
        expiry_date: NaiveDate::from_ymd_opt(2025, 6, 30),
        supplier: Some("Centravet".to_string()),
        location: Some("Armoire A".to_string()),
        notes: None,
        barcode: None,
        sku: Some("MED-001".to_string()),
    }];

    // Export to in-memory CSV
    let bytes = export_items(&items)?;
    println!("📤 Exported CSV:\n{}", String::from_utf8_lossy(&bytes));

    // Import it back, plus a row that fails validation
    let mut data = bytes.clone();
    data.extend_from_slice("Laisse,Accessoire,pièce,5,1,4,9\n".as_bytes());

    let report = import_items(&data)?;
    println!(
        "📥 Imported {} item(s), {} row(s) skipped",
        report.imported(),
        report.errors
    );

    Ok(())
}
