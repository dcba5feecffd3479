use super::*;
use crate::testing::{field, metric, table, FakeDestination};

fn dest() -> FakeDestination {
    let mut dest = FakeDestination::default();
    dest.tables = vec![
        table(20, "orders", "public", 4),
        table(21, "customers", "public", 4),
        table(22, "orders", "archive", 4),
    ];
    dest.fields.insert(
        20,
        vec![field(55, "customer_id", 20), field(56, "total", 20)],
    );
    dest.metrics = vec![metric(7, "Total revenue", 20)];
    dest
}

#[test]
fn test_resolve_table_by_full_key() {
    let dest = dest();
    let mut cache = CatalogCache::new();
    let t = cache.resolve_table(&dest, "orders", "public", 4).unwrap();
    assert_eq!(t.id, 20);
    let t = cache.resolve_table(&dest, "orders", "archive", 4).unwrap();
    assert_eq!(t.id, 22);
}

#[test]
fn test_resolve_table_is_case_sensitive() {
    let dest = dest();
    let mut cache = CatalogCache::new();
    let err = cache
        .resolve_table(&dest, "Orders", "public", 4)
        .unwrap_err();
    assert!(matches!(err, MigrateError::TableNotFound { .. }));
}

#[test]
fn test_resolve_table_wrong_database() {
    let dest = dest();
    let mut cache = CatalogCache::new();
    assert!(matches!(
        cache.resolve_table(&dest, "orders", "public", 9),
        Err(MigrateError::TableNotFound { .. })
    ));
}

#[test]
fn test_table_list_fetched_once() {
    let dest = dest();
    let mut cache = CatalogCache::new();
    cache.resolve_table(&dest, "orders", "public", 4).unwrap();
    cache.resolve_table(&dest, "customers", "public", 4).unwrap();
    let _ = cache.resolve_table(&dest, "missing", "public", 4);
    assert_eq!(dest.table_fetches.get(), 1);
}

#[test]
fn test_resolve_field() {
    let dest = dest();
    let mut cache = CatalogCache::new();
    assert_eq!(cache.resolve_field(&dest, 20, "customer_id").unwrap(), 55);
    assert_eq!(cache.resolve_field(&dest, 20, "total").unwrap(), 56);
    assert_eq!(dest.field_fetches.borrow()[&20], 1);
}

#[test]
fn test_resolve_field_unknown_name() {
    let dest = dest();
    let mut cache = CatalogCache::new();
    let err = cache.resolve_field(&dest, 20, "CUSTOMER_ID").unwrap_err();
    assert!(matches!(
        err,
        MigrateError::FieldNotFound { ref name, table_id: 20 } if name == "CUSTOMER_ID"
    ));
}

#[test]
fn test_duplicate_field_names_first_match_wins() {
    let mut dest = dest();
    dest.fields.insert(
        21,
        vec![field(70, "name", 21), field(71, "name", 21)],
    );
    let mut cache = CatalogCache::new();
    assert_eq!(cache.resolve_field(&dest, 21, "name").unwrap(), 70);
}

#[test]
fn test_resolve_metric_scoped_to_table() {
    let dest = dest();
    let mut cache = CatalogCache::new();
    assert_eq!(
        cache.resolve_metric(&dest, 20, "Total revenue").unwrap(),
        7
    );
    // right name, wrong owning table
    assert!(matches!(
        cache.resolve_metric(&dest, 21, "Total revenue"),
        Err(MigrateError::MetricNotFound { .. })
    ));
}
