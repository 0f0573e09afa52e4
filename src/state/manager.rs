use tracing::debug;

use crate::error::{PpcError, Result};
use crate::models::{CatalogState, Item, Settings};
use crate::pricing::constants::toggle_target;
use crate::state::seed::demo_items;

/// Appended to the name of a duplicated item.
pub const COPY_SUFFIX: &str = " (Copy)";

/// Generate a random UUID-v4 shaped id.
pub fn generate_id() -> String {
    let bits: u128 = rand::random();
    // Set the version (4) and variant (10xx) bits.
    let bits = (bits & !(0xf << 76) | (0x4 << 76)) & !(0x3 << 62) | (0x2 << 62);
    let hex = format!("{:032x}", bits);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// The items and settings being worked on, in display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    settings: Settings,
}

impl Catalog {
    pub fn new(state: CatalogState) -> Self {
        Self {
            items: state.items,
            settings: state.settings,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by id.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| PpcError::ItemNotFound(id.to_string()))
    }

    /// Get the first item with this name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        let wanted = name.trim().to_lowercase();
        self.items
            .iter()
            .find(|item| item.name.to_lowercase() == wanted)
    }

    /// Add an item under a fresh id and return that id.
    pub fn add(&mut self, mut item: Item) -> String {
        item.id = generate_id();
        let id = item.id.clone();
        debug!(id = %id, name = %item.name, "adding item");
        self.items.push(item);
        id
    }

    /// Replace the item with the same id, keeping its position.
    pub fn update(&mut self, item: Item) -> Result<()> {
        let slot = self.get_mut(&item.id)?;
        *slot = item;
        Ok(())
    }

    /// Remove an item and return it.
    pub fn remove(&mut self, id: &str) -> Result<Item> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| PpcError::ItemNotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Copy an item, every field included, under a new id and a "(Copy)" name.
    pub fn duplicate(&mut self, id: &str) -> Result<&Item> {
        let original = self
            .get(id)
            .ok_or_else(|| PpcError::ItemNotFound(id.to_string()))?;

        let mut copy = original.clone();
        copy.id = generate_id();
        copy.name = format!("{}{}", original.name, COPY_SUFFIX);
        debug!(from = %id, to = %copy.id, "duplicating item");

        self.items.push(copy);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Flip the favorite flag and return the new value.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        let item = self.get_mut(id)?;
        item.favorite = !item.favorite;
        Ok(item.favorite)
    }

    /// Switch between the two standard targets and return the new one.
    pub fn toggle_target(&mut self) -> f64 {
        self.settings.target_grams = toggle_target(self.settings.target_grams);
        self.settings.target_grams
    }

    pub fn set_target(&mut self, target_grams: f64) -> Result<()> {
        if target_grams.is_nan() || target_grams <= 0.0 {
            return Err(PpcError::InvalidInput(format!(
                "Target must be a positive number of grams, got {}",
                target_grams
            )));
        }
        self.settings.target_grams = target_grams;
        Ok(())
    }

    pub fn set_currency(&mut self, symbol: &str) -> Result<()> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(PpcError::InvalidInput(
                "Currency symbol cannot be empty".to_string(),
            ));
        }
        self.settings.currency_symbol = symbol.to_string();
        Ok(())
    }

    /// Drop every item and start over with the demo items.
    pub fn reset_demo_items(&mut self) {
        self.items = demo_items();
    }

    /// Snapshot for persistence.
    pub fn to_state(&self) -> CatalogState {
        CatalogState {
            items: self.items.clone(),
            settings: self.settings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MassUnit, PriceMode, ProteinBasis};

    fn sample_catalog() -> Catalog {
        let mut chicken = Item::new(
            "chicken-1",
            "Chicken breast",
            PriceMode::per_unit(2.49, MassUnit::Pound),
            ProteinBasis::per_100g(31.0),
        )
        .with_quality(8);
        chicken
            .extra
            .insert("color".to_string(), serde_json::json!("pink"));

        Catalog::new(CatalogState {
            items: vec![chicken],
            settings: Settings::default(),
        })
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), 36);
        assert_eq!(&id[14..15], "4");
        assert!(matches!(&id[19..20], "8" | "9" | "a" | "b"));
        assert_ne!(generate_id(), id);
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let catalog = sample_catalog();
        assert!(catalog.find_by_name("CHICKEN BREAST").is_some());
        assert!(catalog.find_by_name("tofu").is_none());
    }

    #[test]
    fn test_duplicate_copies_everything() {
        let mut catalog = sample_catalog();
        let copy = catalog.duplicate("chicken-1").unwrap().clone();

        assert_ne!(copy.id, "chicken-1");
        assert_eq!(copy.name, "Chicken breast (Copy)");
        assert_eq!(copy.quality, Some(8));
        assert_eq!(copy.extra.get("color"), Some(&serde_json::json!("pink")));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_toggle_favorite_and_remove() {
        let mut catalog = sample_catalog();
        assert!(catalog.toggle_favorite("chicken-1").unwrap());
        assert!(!catalog.toggle_favorite("chicken-1").unwrap());

        catalog.remove("chicken-1").unwrap();
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.remove("chicken-1"),
            Err(PpcError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_settings_changes() {
        let mut catalog = sample_catalog();
        assert_eq!(catalog.toggle_target(), 25.0);
        assert_eq!(catalog.toggle_target(), 30.0);

        assert!(catalog.set_target(0.0).is_err());
        catalog.set_target(40.0).unwrap();
        assert_eq!(catalog.settings().target_grams, 40.0);

        assert!(catalog.set_currency("  ").is_err());
        catalog.set_currency("€").unwrap();
        assert_eq!(catalog.settings().currency_symbol, "€");
    }

    #[test]
    fn test_add_assigns_fresh_id() {
        let mut catalog = sample_catalog();
        let item = Item::new(
            "",
            "Tofu",
            PriceMode::total(2.0, 14.0, MassUnit::Ounce),
            ProteinBasis::per_100g(8.0),
        );
        let id = catalog.add(item);
        assert_eq!(catalog.get(&id).map(|i| i.name.as_str()), Some("Tofu"));
    }
}
