mod item;
mod settings;
mod units;

pub use item::{Item, ItemRecord, PackageSize, PriceMode, ProteinBasis};
pub use settings::{CatalogState, Settings, DEFAULT_CURRENCY_SYMBOL, DEFAULT_TARGET_GRAMS};
pub use units::{MassUnit, UnitEntry, GRAMS_PER_KG, GRAMS_PER_LB, GRAMS_PER_OZ};
