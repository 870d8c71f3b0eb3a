//! Period financial report example

use clinic_core::utils::MemoryStore;
use clinic_core::{
    generate_summary, EntryBuilder, EntryKind, EntryManager, EntrySource, Frequency,
    MovementReason, MovementType, RecordStore, ServiceKind, ServiceRecord, SourceCollections,
    StockMovement,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🐾 Clinic Core - Period Report Example\n");

    let store = MemoryStore::new();
    let client = Uuid::new_v4();
    let patient = Uuid::new_v4();

    // 1. Seed a month of activity
    println!("📋 Recording March activity...");
    store.push_service(ServiceRecord::new(
        ServiceKind::Consultation,
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        Some(BigDecimal::from(200)),
        client,
        patient,
    ));
    store.push_service(ServiceRecord::new(
        ServiceKind::Vaccination,
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
        Some(BigDecimal::from(55)),
        client,
        patient,
    ));
    store.push_movement(StockMovement::new(
        Uuid::new_v4(),
        MovementType::In,
        BigDecimal::from(20),
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        BigDecimal::from(6),
        MovementReason::Purchase,
    ));
    println!("  ✓ One consultation, one vaccination, one stock purchase");

    let mut manager = EntryManager::new(store.clone());
    manager
        .add_entry(
            EntryBuilder::new(
                EntryKind::Expense,
                "March rent".to_string(),
                BigDecimal::from(3000),
                NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                EntrySource::Rent,
            )
            .frequency(Frequency::Monthly)
            .build()?,
        )
        .await?;
    println!("  ✓ Manual rent entry of 3000\n");

    // 2. Fetch the collections and derive the summary
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

    let consultations = store
        .service_records(ServiceKind::Consultation, start, end)
        .await?;
    let vaccinations = store
        .service_records(ServiceKind::Vaccination, start, end)
        .await?;
    let movements = store.stock_movements(start, end).await?;
    let entries = manager.entries_in_range(start, end).await?;

    let sources = SourceCollections {
        consultations: &consultations,
        vaccinations: &vaccinations,
        stock_movements: &movements,
        manual_entries: &entries,
        ..Default::default()
    };

    let summary = generate_summary("2024-03", start, end, &sources)?;

    println!("📈 Summary for {}", summary.period);
    println!("  Revenue");
    println!("    consultations: {}", summary.revenue.consultations);
    println!("    vaccinations:  {}", summary.revenue.vaccinations);
    println!("  Expenses");
    println!("    stock:         {}", summary.expenses.stock_purchases);
    println!("    rent:          {}", summary.expenses.rent);
    println!("  ───────────────────────");
    println!("  Total revenue:  {}", summary.total_revenue);
    println!("  Total expenses: {}", summary.total_expenses);
    println!("  Net income:     {}", summary.net_income);

    Ok(())
}
