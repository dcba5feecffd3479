use super::*;
use crate::testing::{field, metric, table, FakeDestination, FakeSource};
use mm_core::model::{Dashboard, DashboardCard, DashboardSummary};
use serde_json::json;

fn fixture() -> (FakeSource, FakeDestination) {
    let mut source = FakeSource::default();
    source
        .collections
        .insert(CollectionRef::Id(12), "Sales".to_string());
    source.collection_dashboards.insert(
        CollectionRef::Id(12),
        vec![DashboardSummary {
            id: 101,
            name: "KPIs".to_string(),
        }],
    );

    let dashboard: Dashboard = serde_json::from_value(json!({
        "id": 101,
        "name": "KPIs",
        "collection_id": 12,
        "parameters": [{"id": "p1", "name": "Date", "type": "date/range"}],
        "ordered_cards": [
            {
                "id": 501, "card_id": 7,
                "row": 0, "col": 0, "sizeX": 8, "sizeY": 6, "series": [],
                "parameter_mappings": [
                    {"parameter_id": "p1", "card_id": 7,
                     "target": ["dimension", ["field", 10, null]]}
                ]
            },
            {
                "id": 502, "card_id": null,
                "row": 0, "col": 8, "sizeX": 4, "sizeY": 6, "series": [],
                "visualization_settings": {"text": "notes"}
            },
            {
                "id": 503, "card_id": 8,
                "row": 6, "col": 0, "sizeX": 6, "sizeY": 4, "series": []
            },
            {
                "id": 504, "card_id": 9,
                "row": 6, "col": 6, "sizeX": 6, "sizeY": 4, "series": []
            }
        ]
    }))
    .unwrap();
    source.dashboards.insert(101, dashboard);

    // card 7: complete, resolvable
    source.cards.insert(
        7,
        serde_json::from_value(json!({
            "id": 7, "name": "Revenue", "display": "line", "description": "",
            "table_id": 2,
            "dataset_query": {
                "type": "query", "database": 1,
                "query": {"source-table": 2, "aggregation": [["sum", ["field", 10, null]]]}
            }
        }))
        .unwrap(),
    );
    // card 8: no dataset_query
    source.cards.insert(
        8,
        serde_json::from_value(json!({"id": 8, "name": "Broken", "display": "table"})).unwrap(),
    );
    // card 9: metric whose source table has no destination counterpart
    source.cards.insert(
        9,
        serde_json::from_value(json!({
            "id": 9, "name": "Events", "display": "bar",
            "table_id": 2,
            "dataset_query": {
                "type": "query", "database": 1,
                "query": {"source-table": 2, "aggregation": [["metric", 3, null]]}
            }
        }))
        .unwrap(),
    );

    source.tables.insert(2, table(2, "orders", "public", 1));
    source.tables.insert(5, table(5, "events", "public", 1));
    source.fields.insert(10, field(10, "customer_id", 2));
    source.metrics.insert(3, metric(3, "Events count", 5));

    let mut dest = FakeDestination::default();
    dest.tables = vec![table(20, "orders", "public", 4)];
    dest.fields.insert(20, vec![field(55, "customer_id", 20)]);
    (source, dest)
}

#[test]
fn test_full_run_creates_collection_dashboard_and_cards() {
    let (source, dest) = fixture();
    let report = Migrator::new(&source, &dest, 4)
        .run(&CollectionRef::Id(12))
        .unwrap();

    let collections = dest.created_collections.borrow();
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].name, "Sales migrated");

    let dashboards = dest.created_dashboards.borrow();
    assert_eq!(dashboards.len(), 1);
    assert_eq!(dashboards[0].name, "KPIs");
    assert_eq!(dashboards[0].collection_id, Some(collections[0].id));

    // parameters are patched after creation
    let parameter_patches = dest.parameter_patches.borrow();
    assert_eq!(parameter_patches.len(), 1);
    assert_eq!(parameter_patches[0].1[0]["id"], json!("p1"));

    assert_eq!(report.dashboards, 1);
    assert_eq!(report.migrated, vec!["Revenue".to_string()]);
}

#[test]
fn test_card_query_is_fully_retargeted() {
    let (source, dest) = fixture();
    Migrator::new(&source, &dest, 4)
        .run(&CollectionRef::Id(12))
        .unwrap();

    let cards = dest.created_cards.borrow();
    assert_eq!(cards.len(), 1);
    let card = &cards[0];
    assert_eq!(card.name.as_deref(), Some("Revenue"));
    assert_eq!(card.table_id, Some(20));
    assert_eq!(
        card.collection_id,
        Some(dest.created_collections.borrow()[0].id)
    );
    // empty description normalized before creation
    assert_eq!(card.description, None);

    let query = card.dataset_query.as_ref().unwrap();
    assert_eq!(query.database, 4);
    assert_eq!(query.query["source-table"], json!(20));
    assert_eq!(
        query.query["aggregation"],
        json!([["sum", ["field", 55, null]]])
    );
}

#[test]
fn test_layout_and_mappings_preserved_with_new_ids() {
    let (source, dest) = fixture();
    Migrator::new(&source, &dest, 4)
        .run(&CollectionRef::Id(12))
        .unwrap();

    // card 7's placement and the text tile; the two skipped cards never attach
    let attached = dest.attached_cards.borrow();
    assert_eq!(attached.len(), 2);
    let dest_card_id = attached[0].1.unwrap();
    assert_eq!(attached[1].1, None);

    let patches = dest.placement_patches.borrow();
    assert_eq!(patches.len(), 2);

    let revenue = &patches[0].1;
    assert_eq!((revenue.row, revenue.col), (0, 0));
    assert_eq!((revenue.size_x, revenue.size_y), (8, 6));
    assert_eq!(revenue.card_id, Some(dest_card_id));
    let mapping = &revenue.parameter_mappings[0];
    assert_eq!(mapping.card_id, Some(dest_card_id));
    assert_eq!(mapping.target, json!(["dimension", ["field", 55, null]]));

    let text_tile = &patches[1].1;
    assert_eq!((text_tile.row, text_tile.col), (0, 8));
    assert_eq!(text_tile.card_id, None);
    assert_eq!(
        text_tile.visualization_settings.get("text"),
        Some(&json!("notes"))
    );
}

#[test]
fn test_invalid_and_unresolvable_cards_are_skipped_not_created() {
    let (source, dest) = fixture();
    let report = Migrator::new(&source, &dest, 4)
        .run(&CollectionRef::Id(12))
        .unwrap();

    assert!(report.has_skips());
    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(skipped, vec!["Broken", "Events"]);
    assert!(report.skipped[0].reason.contains("dataset_query"));
    assert!(report.skipped[1].reason.contains("events"));

    // no create call was issued for either skipped card
    let cards = dest.created_cards.borrow();
    assert!(cards.iter().all(|c| c.name.as_deref() == Some("Revenue")));
}

#[test]
fn test_mapping_lookup_failure_skips_card_without_creating_it() {
    let (mut source, dest) = fixture();
    // "region" exists on the source table but not on the destination one,
    // so the mapping target cannot be resolved
    source.fields.insert(11, field(11, "region", 2));
    source.dashboards.get_mut(&101).unwrap().ordered_cards[0].parameter_mappings[0].target =
        json!(["dimension", ["field", 11, null]]);

    let report = Migrator::new(&source, &dest, 4)
        .run(&CollectionRef::Id(12))
        .unwrap();

    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.name.as_str()).collect();
    assert!(skipped.contains(&"Revenue"));
    assert!(!report.migrated.contains(&"Revenue".to_string()));

    // the skip left nothing behind: no card created, only the text tile attached
    assert!(dest.created_cards.borrow().is_empty());
    let attached = dest.attached_cards.borrow();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].1, None);
}

#[test]
fn test_unfetchable_source_card_is_skipped_by_id() {
    let (mut source, dest) = fixture();
    let placement: DashboardCard = serde_json::from_value(json!({
        "id": 505, "card_id": 99,
        "row": 10, "col": 0, "sizeX": 4, "sizeY": 4, "series": []
    }))
    .unwrap();
    source
        .dashboards
        .get_mut(&101)
        .unwrap()
        .ordered_cards
        .push(placement);

    let report = Migrator::new(&source, &dest, 4)
        .run(&CollectionRef::Id(12))
        .unwrap();

    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.name.as_str()).collect();
    assert!(skipped.contains(&"card 99"));
    // the run carried on past the fetch failure
    assert_eq!(report.migrated, vec!["Revenue".to_string()]);
}

#[test]
fn test_rejected_dashboard_create_is_fatal() {
    let (source, mut dest) = fixture();
    dest.reject_dashboard_create = true;
    let err = Migrator::new(&source, &dest, 4)
        .run(&CollectionRef::Id(12))
        .unwrap_err();
    assert!(matches!(err, MigrateError::DashboardCreate { .. }));
    // the collection was already created; nothing below it was
    assert_eq!(dest.created_collections.borrow().len(), 1);
    assert!(dest.created_cards.borrow().is_empty());
    assert!(dest.parameter_patches.borrow().is_empty());
}

#[test]
fn test_rejected_collection_create_is_fatal() {
    let (source, mut dest) = fixture();
    dest.reject_collection_create = true;
    let err = Migrator::new(&source, &dest, 4)
        .run(&CollectionRef::Id(12))
        .unwrap_err();
    assert!(matches!(err, MigrateError::CollectionCreate { .. }));
    assert!(dest.created_dashboards.borrow().is_empty());
    assert!(dest.created_cards.borrow().is_empty());
}

#[test]
fn test_root_collection_migrates() {
    let (mut source, dest) = fixture();
    source
        .collections
        .insert(CollectionRef::Root, "Our analytics".to_string());
    source.collection_dashboards.insert(
        CollectionRef::Root,
        vec![DashboardSummary {
            id: 101,
            name: "KPIs".to_string(),
        }],
    );

    let report = Migrator::new(&source, &dest, 4)
        .run(&CollectionRef::Root)
        .unwrap();
    assert_eq!(report.dashboards, 1);
    assert_eq!(
        dest.created_collections.borrow()[0].name,
        "Our analytics migrated"
    );
}
