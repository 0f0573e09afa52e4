use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{CatalogState, Item};
use crate::state::manager::generate_id;
use crate::state::seed::seeded_state;

/// Somewhere a catalog can be loaded from and saved to.
pub trait CatalogStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<CatalogState>>;

    fn save(&self, state: &CatalogState) -> Result<()>;
}

/// Give every record without an id one of its own.
fn assign_missing_ids(items: &mut [Item]) {
    for item in items.iter_mut().filter(|item| item.id.trim().is_empty()) {
        item.id = generate_id();
        debug!(id = %item.id, name = %item.name, "assigned id to record without one");
    }
}

/// Drop repeated ids, keeping the last record in the first record's position.
fn dedupe_items(items: Vec<Item>) -> Vec<Item> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<Item> = Vec::with_capacity(items.len());

    for item in items {
        match positions.get(&item.id) {
            Some(&index) => {
                warn!(id = %item.id, "duplicate item id, keeping the last record");
                deduped[index] = item;
            }
            None => {
                positions.insert(item.id.clone(), deduped.len());
                deduped.push(item);
            }
        }
    }

    deduped
}

/// A catalog kept as one pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CatalogStore for JsonFileStore {
    fn load(&self) -> Result<Option<CatalogState>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no catalog file yet");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let mut state: CatalogState = serde_json::from_str(&content)?;
        assign_missing_ids(&mut state.items);
        state.items = dedupe_items(state.items);

        debug!(path = %self.path.display(), items = state.items.len(), "loaded catalog");
        Ok(Some(state))
    }

    /// Write to a sibling temp file, then rename over the target.
    fn save(&self, state: &CatalogState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), items = state.items.len(), "saved catalog");
        Ok(())
    }
}

/// Whether saves currently go to the primary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Online,
    Offline,
}

/// A primary store with a local fallback.
///
/// Starts online. The first failure of the primary switches to offline mode,
/// after which everything goes to the fallback for the rest of the session.
#[derive(Debug)]
pub struct FallbackStore<P, F> {
    primary: P,
    fallback: Option<F>,
    mode: StorageMode,
}

impl<P: CatalogStore, F: CatalogStore> FallbackStore<P, F> {
    pub fn new(primary: P, fallback: Option<F>) -> Self {
        Self {
            primary,
            fallback,
            mode: StorageMode::Online,
        }
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    pub fn is_online(&self) -> bool {
        self.mode == StorageMode::Online
    }

    fn go_offline(&mut self) {
        if self.mode == StorageMode::Online {
            warn!("primary store unavailable, switching to offline mode");
        }
        self.mode = StorageMode::Offline;
    }

    fn load_fallback(&self) -> Option<CatalogState> {
        let fallback = self.fallback.as_ref()?;
        match fallback.load() {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "could not read fallback store");
                None
            }
        }
    }

    /// Load the catalog, seeding demo items when nothing is stored anywhere.
    pub fn load(&mut self) -> CatalogState {
        match self.primary.load() {
            Ok(primary_state) => {
                self.mode = StorageMode::Online;
                let primary_empty = primary_state
                    .as_ref()
                    .is_none_or(|state| state.items.is_empty());

                if primary_empty {
                    if let Some(local) = self.load_fallback().filter(|s| !s.items.is_empty()) {
                        info!(items = local.items.len(), "migrating local catalog to primary store");
                        if !self.save(&local) {
                            warn!("local catalog could not be copied to the primary store");
                        }
                        return local;
                    }
                }

                primary_state.unwrap_or_else(seeded_state)
            }
            Err(e) => {
                warn!(error = %e, "could not load from primary store");
                self.go_offline();
                self.load_fallback().unwrap_or_else(seeded_state)
            }
        }
    }

    /// Best-effort save. Failures are logged, never returned.
    ///
    /// Returns whether the state was written to either store.
    pub fn save(&mut self, state: &CatalogState) -> bool {
        if self.mode == StorageMode::Online {
            match self.primary.save(state) {
                Ok(()) => return true,
                Err(e) => {
                    warn!(error = %e, "save to primary store failed");
                    self.go_offline();
                }
            }
        }

        match self.fallback.as_ref() {
            Some(fallback) => match fallback.save(state) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(error = %e, "save to fallback store failed, changes were not persisted");
                    false
                }
            },
            None => {
                tracing::error!("offline with no fallback store, changes were not persisted");
                false
            }
        }
    }

    /// Tear down and hand back the underlying stores.
    pub fn into_inner(self) -> (P, Option<F>) {
        (self.primary, self.fallback)
    }
}
