mod manager;
mod persistence;
mod seed;

pub use manager::{generate_id, Catalog, COPY_SUFFIX};
pub use persistence::{CatalogStore, FallbackStore, JsonFileStore, StorageMode};
pub use seed::{demo_items, seeded_state};
