use crate::models::{CatalogState, Item, MassUnit, PriceMode, ProteinBasis, Settings};
use crate::state::manager::generate_id;

/// The three demo products a fresh catalog starts with.
pub fn demo_items() -> Vec<Item> {
    vec![
        Item::new(
            generate_id(),
            "Chicken breast",
            PriceMode::per_unit(2.49, MassUnit::Pound),
            ProteinBasis::per_100g(31.0),
        )
        .with_brand("Kirkland")
        .with_store("Costco")
        .with_quality(8)
        .with_notes("High quality lean protein"),
        Item::new(
            generate_id(),
            "Whey isolate",
            PriceMode::total(39.99, 5.0, MassUnit::Pound),
            ProteinBasis::per_serving(32.0, MassUnit::Gram, 25.0),
        )
        .with_brand("ON")
        .with_store("Amazon")
        .with_quality(9)
        .with_notes("Fast absorbing, great for post-workout"),
        Item::new(
            generate_id(),
            "Greek yogurt (2%)",
            PriceMode::total(5.49, 32.0, MassUnit::Ounce),
            ProteinBasis::per_100g(10.0),
        )
        .with_brand("Fage")
        .with_store("Kroger")
        .with_quality(7)
        .with_notes("Creamy texture, good for snacks"),
    ]
}

/// A fresh catalog: demo items and default settings.
pub fn seeded_state() -> CatalogState {
    CatalogState {
        items: demo_items(),
        settings: Settings::default(),
    }
}
