//! Integration tests for clinic-core

use std::sync::Arc;
use std::time::Duration;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use clinic_core::{
    generate_summary, import_items, ledger_lines, utils::MemoryStore, BackoffPolicy, CacheKey,
    ChangeEvent, ChangeKind, ChangeRouter, ChannelState, EntryBuilder, EntryKind, EntryManager,
    EntryPatch, EntrySource, Frequency, LedgerLine, MemoryFeed, MovementReason,
    MovementType, QueryCache, RecordStore, ResourceType, RouterConfig, RouterHandle, ServiceKind,
    ServiceRecord, SourceCollections, StockMovement,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within 1s");
}

async fn wait_subscribed(handle: &RouterHandle, resources: &[ResourceType]) {
    for resource in resources {
        wait_until(|| handle.state(*resource) == ChannelState::Subscribed).await;
    }
}

fn test_config() -> RouterConfig {
    RouterConfig {
        backoff: BackoffPolicy {
            base: Duration::from_millis(5),
            cap: Duration::from_millis(20),
        },
    }
}

#[tokio::test]
async fn test_full_accounting_month() {
    let store = MemoryStore::new();
    let client = Uuid::new_v4();
    let patient = Uuid::new_v4();

    store.push_service(ServiceRecord::new(
        ServiceKind::Consultation,
        date(2024, 3, 15),
        Some(BigDecimal::from(200)),
        client,
        patient,
    ));
    store.push_service(ServiceRecord::new(
        ServiceKind::Vaccination,
        date(2024, 3, 18),
        Some(BigDecimal::from(60)),
        client,
        patient,
    ));
    store.push_movement(StockMovement::new(
        Uuid::new_v4(),
        MovementType::In,
        BigDecimal::from(10),
        date(2024, 3, 5),
        BigDecimal::from(12),
        MovementReason::Purchase,
    ));

    let mut manager = EntryManager::new(store.clone());
    manager
        .add_entry(
            EntryBuilder::new(
                EntryKind::Expense,
                "March rent".to_string(),
                BigDecimal::from(3000),
                date(2024, 3, 10),
                EntrySource::Rent,
            )
            .frequency(Frequency::Monthly)
            .build()
            .unwrap(),
        )
        .await
        .unwrap();

    let start = date(2024, 3, 1);
    let end = date(2024, 3, 31);
    let consultations = store
        .service_records(ServiceKind::Consultation, start, end)
        .await
        .unwrap();
    let vaccinations = store
        .service_records(ServiceKind::Vaccination, start, end)
        .await
        .unwrap();
    let movements = store.stock_movements(start, end).await.unwrap();
    let entries = manager.entries_in_range(start, end).await.unwrap();

    let sources = SourceCollections {
        consultations: &consultations,
        vaccinations: &vaccinations,
        stock_movements: &movements,
        manual_entries: &entries,
        ..Default::default()
    };

    let summary = generate_summary("2024-03", start, end, &sources).unwrap();

    assert_eq!(summary.revenue.consultations, BigDecimal::from(200));
    assert_eq!(summary.revenue.vaccinations, BigDecimal::from(60));
    assert_eq!(summary.expenses.stock_purchases, BigDecimal::from(120));
    assert_eq!(summary.expenses.rent, BigDecimal::from(3000));
    assert_eq!(summary.total_revenue, BigDecimal::from(260));
    assert_eq!(summary.total_expenses, BigDecimal::from(3120));
    assert_eq!(summary.net_income, BigDecimal::from(-2860));

    // The presented ledger carries one manual line and three derived ones.
    let lines = ledger_lines(&sources, start, end).unwrap();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines
            .iter()
            .filter(|l| matches!(l, LedgerLine::Manual(_)))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_entry_crud_invalidates_ledger_key() {
    let cache = Arc::new(QueryCache::new());
    let mut manager =
        EntryManager::new(MemoryStore::new()).with_invalidation(cache.clone());

    cache.mark_fresh(CacheKey::Ledger);

    let entry = EntryBuilder::new(
        EntryKind::Revenue,
        "Subsidy".to_string(),
        BigDecimal::from(500),
        date(2024, 3, 12),
        EntrySource::Other,
    )
    .build()
    .unwrap();
    let id = entry.id;

    manager.add_entry(entry).await.unwrap();
    assert!(!cache.is_fresh(CacheKey::Ledger));

    cache.mark_fresh(CacheKey::Ledger);
    manager
        .update_entry(
            id,
            EntryPatch {
                notes: Some(Some("corrected".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!cache.is_fresh(CacheKey::Ledger));

    cache.mark_fresh(CacheKey::Ledger);
    manager.delete_entry(id).await.unwrap();
    assert!(!cache.is_fresh(CacheKey::Ledger));
}

#[tokio::test]
async fn test_insert_event_invalidates_only_its_keys() {
    let feed = Arc::new(MemoryFeed::new());
    let cache = Arc::new(QueryCache::new());
    let handle = ChangeRouter::spawn(
        feed.clone(),
        Arc::clone(&cache),
        &ResourceType::ALL,
        test_config(),
    );
    wait_subscribed(&handle, &ResourceType::ALL).await;

    for resource in ResourceType::ALL {
        cache.mark_fresh(CacheKey::Resource(resource));
    }
    cache.mark_fresh(CacheKey::DashboardStats);
    cache.mark_fresh(CacheKey::Ledger);

    let delivered = feed.publish(ChangeEvent {
        resource: ResourceType::Consultations,
        change: ChangeKind::Insert,
    });
    assert_eq!(delivered, 1);

    wait_until(|| !cache.is_fresh(CacheKey::Resource(ResourceType::Consultations))).await;
    wait_until(|| !cache.is_fresh(CacheKey::DashboardStats)).await;

    // No other resource's key was touched.
    for resource in ResourceType::ALL {
        if resource != ResourceType::Consultations {
            assert!(cache.is_fresh(CacheKey::Resource(resource)));
        }
    }
    assert!(cache.is_fresh(CacheKey::Ledger));

    handle.shutdown();
}

#[tokio::test]
async fn test_stock_event_does_not_stale_dashboard() {
    let feed = Arc::new(MemoryFeed::new());
    let cache = Arc::new(QueryCache::new());
    let handle = ChangeRouter::spawn(
        feed.clone(),
        Arc::clone(&cache),
        &[ResourceType::StockItems],
        test_config(),
    );
    wait_subscribed(&handle, &[ResourceType::StockItems]).await;

    cache.mark_fresh(CacheKey::Resource(ResourceType::StockItems));
    cache.mark_fresh(CacheKey::DashboardStats);

    feed.publish(ChangeEvent {
        resource: ResourceType::StockItems,
        change: ChangeKind::Update,
    });

    wait_until(|| !cache.is_fresh(CacheKey::Resource(ResourceType::StockItems))).await;
    assert!(cache.is_fresh(CacheKey::DashboardStats));

    handle.shutdown();
}

#[tokio::test]
async fn test_logout_clears_entire_cache() {
    let feed = Arc::new(MemoryFeed::new());
    let cache = Arc::new(QueryCache::new());
    let handle = ChangeRouter::spawn(
        feed.clone(),
        Arc::clone(&cache),
        &ResourceType::ALL,
        test_config(),
    );
    wait_subscribed(&handle, &ResourceType::ALL).await;

    for resource in ResourceType::ALL {
        cache.mark_fresh(CacheKey::Resource(resource));
    }
    cache.mark_fresh(CacheKey::DashboardStats);
    cache.mark_fresh(CacheKey::Ledger);
    assert_eq!(cache.fresh_count(), 10);

    handle.auth_changed();

    assert_eq!(cache.fresh_count(), 0);
}

#[tokio::test]
async fn test_router_resubscribes_after_channel_drop() {
    let feed = Arc::new(MemoryFeed::new());
    let cache = Arc::new(QueryCache::new());
    let handle = ChangeRouter::spawn(
        feed.clone(),
        Arc::clone(&cache),
        &[ResourceType::Invoices],
        test_config(),
    );
    wait_subscribed(&handle, &[ResourceType::Invoices]).await;

    feed.drop_channel(ResourceType::Invoices);

    // The listener comes back on a fresh channel and keeps routing.
    wait_until(|| {
        feed.publish(ChangeEvent {
            resource: ResourceType::Invoices,
            change: ChangeKind::Delete,
        }) > 0
    })
    .await;

    cache.mark_fresh(CacheKey::Resource(ResourceType::Invoices));
    feed.publish(ChangeEvent {
        resource: ResourceType::Invoices,
        change: ChangeKind::Insert,
    });
    wait_until(|| !cache.is_fresh(CacheKey::Resource(ResourceType::Invoices))).await;

    handle.shutdown();
}

#[tokio::test]
async fn test_summary_recomputes_when_collections_change() {
    let store = MemoryStore::new();
    let start = date(2024, 3, 1);
    let end = date(2024, 3, 31);

    let consultations = store
        .service_records(ServiceKind::Consultation, start, end)
        .await
        .unwrap();
    let sources = SourceCollections {
        consultations: &consultations,
        ..Default::default()
    };
    let before = generate_summary("2024-03", start, end, &sources).unwrap();
    assert_eq!(before.total_revenue, BigDecimal::from(0));

    store.push_service(ServiceRecord::new(
        ServiceKind::Consultation,
        date(2024, 3, 20),
        Some(BigDecimal::from(90)),
        Uuid::new_v4(),
        Uuid::new_v4(),
    ));

    let consultations = store
        .service_records(ServiceKind::Consultation, start, end)
        .await
        .unwrap();
    let sources = SourceCollections {
        consultations: &consultations,
        ..Default::default()
    };
    let after = generate_summary("2024-03", start, end, &sources).unwrap();
    assert_eq!(after.total_revenue, BigDecimal::from(90));
}

#[test]
fn test_csv_import_counts_bad_rows() {
    let data = "Nom,Catégorie,Unité,Stock actuel,Stock minimum,Prix d'achat,Prix de vente\n\
                Amoxicilline,Médicament,boîte,12,3,8,14\n\
                ,Médicament,boîte,1,1,1,1\n";

    let report = import_items(data.as_bytes()).unwrap();

    assert_eq!(report.imported(), 1);
    assert_eq!(report.errors, 1);
}
