use protein_price_rs::interface::write_csv;
use protein_price_rs::models::{CatalogState, Item, MassUnit, PriceMode, ProteinBasis};
use protein_price_rs::pricing::{filter_items, rank_items, Filters, SortDirection, SortKey};
use protein_price_rs::state::{Catalog, CatalogStore, FallbackStore, JsonFileStore};
use tempfile::tempdir;

fn incomplete_item() -> Item {
    Item::new(
        "",
        "Mystery powder",
        PriceMode::UnitPrice {
            price: Some(12.0),
            unit: None,
            package: None,
        },
        ProteinBasis::per_100g(80.0),
    )
}

#[test]
fn test_fresh_catalog_is_seeded_and_ranked() {
    let dir = tempdir().unwrap();
    let mut store = FallbackStore::new(
        JsonFileStore::new(dir.path().join("catalog.json")),
        None::<JsonFileStore>,
    );
    let catalog = Catalog::new(store.load());
    assert_eq!(catalog.len(), 3);

    let ranked = rank_items(
        catalog.items(),
        SortKey::CostPerTarget,
        SortDirection::Ascending,
        catalog.settings().target_grams,
    );
    let names: Vec<&str> = ranked.iter().map(|r| r.item.name.as_str()).collect();
    assert_eq!(names, vec!["Chicken breast", "Whey isolate", "Greek yogurt (2%)"]);
}

#[test]
fn test_edits_survive_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let mut store = FallbackStore::new(JsonFileStore::new(&path), None::<JsonFileStore>);
    let mut catalog = Catalog::new(store.load());

    let added = catalog.add(incomplete_item());
    let whey = catalog.find_by_name("whey isolate").unwrap().id.clone();
    catalog.toggle_favorite(&whey).unwrap();
    let copy = catalog.duplicate(&whey).unwrap().id.clone();
    catalog.set_target(25.0).unwrap();
    catalog.set_currency("€").unwrap();
    assert!(store.save(&catalog.to_state()));

    let reloaded = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(reloaded, catalog.to_state());

    let catalog = Catalog::new(reloaded);
    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.settings().target_grams, 25.0);
    assert_eq!(catalog.get(&copy).unwrap().name, "Whey isolate (Copy)");
    assert!(catalog.get(&copy).unwrap().favorite);

    // The incomplete item loads back and still sorts last.
    let ranked = rank_items(
        catalog.items(),
        SortKey::CostPerGram,
        SortDirection::Descending,
        25.0,
    );
    let last = ranked.last().unwrap();
    assert_eq!(last.item.id, added);
    assert!(!last.cost.valid);

    let favorites = filter_items(
        catalog.items(),
        &Filters {
            query: None,
            favorites_only: true,
        },
    );
    assert_eq!(favorites.len(), 2);
}

#[test]
fn test_offline_session_writes_fallback() {
    let dir = tempdir().unwrap();
    // A directory cannot be read as a catalog file.
    let primary = JsonFileStore::new(dir.path());
    let local_path = dir.path().join("local.json");

    let mut store = FallbackStore::new(primary, Some(JsonFileStore::new(&local_path)));
    let mut catalog = Catalog::new(store.load());
    assert!(!store.is_online());

    catalog.add(Item::new(
        "",
        "Tofu",
        PriceMode::total(2.29, 14.0, MassUnit::Ounce),
        ProteinBasis::per_100g(8.0),
    ));
    assert!(store.save(&catalog.to_state()));

    let local = JsonFileStore::new(&local_path).load().unwrap().unwrap();
    assert_eq!(local.items.len(), 4);
    assert!(local.items.iter().any(|i| i.name == "Tofu"));
}

#[test]
fn test_export_csv() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.csv");

    let mut state = CatalogState::default();
    state.items.push(Item::new(
        "y",
        "Greek yogurt",
        PriceMode::total(5.49, 32.0, MassUnit::Ounce),
        ProteinBasis::per_100g(10.0),
    ));
    let catalog = Catalog::new(state);

    let ranked = rank_items(
        catalog.items(),
        SortKey::CostPerTarget,
        SortDirection::Ascending,
        30.0,
    );
    write_csv(&ranked, catalog.settings(), &out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("Greek yogurt"));
}
