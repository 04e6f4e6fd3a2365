//! Named, persisted filter states
//!
//! [`SavedFilterStore`] keeps a per-scope collection of [`SavedFilter`]s
//! in a [`FilterStorage`] backend, serialized as one JSON blob under a
//! prefixed key. At most one filter is marked default at any time.
//!
//! Mutations are write-through: the in-memory collection is updated,
//! persisted, and rolled back when persistence fails. Like the board,
//! public operations return success indicators rather than errors.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use steward_common::SAVED_FILTER_KEY_PREFIX;

use crate::error::Result;
use crate::filters::builder::AdvancedFilterState;

/// A named filter state with bookkeeping metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub filter: AdvancedFilterState,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Key-value persistence backend for saved filters.
///
/// The store never interprets keys beyond its own prefix and writes the
/// whole collection as one value.
pub trait FilterStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Collection of saved filters for one scope (e.g. a board or view name)
pub struct SavedFilterStore<S> {
    storage: S,
    key: String,
    filters: RwLock<Vec<SavedFilter>>,
}

impl<S: FilterStorage> SavedFilterStore<S> {
    /// Open the store for a scope, loading whatever is persisted.
    ///
    /// A missing or unreadable blob yields an empty collection; corrupt
    /// data is logged and discarded rather than surfaced as an error.
    pub fn new(storage: S, scope: &str) -> Self {
        let key = format!("{SAVED_FILTER_KEY_PREFIX}{scope}");
        let filters = Self::load(&storage, &key);
        Self {
            storage,
            key,
            filters: RwLock::new(filters),
        }
    }

    fn load(storage: &S, key: &str) -> Vec<SavedFilter> {
        match storage.read(key) {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(filters) => filters,
                Err(e) => {
                    warn!("Discarding corrupt saved filters under {key}: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read saved filters under {key}: {e}");
                Vec::new()
            }
        }
    }

    /// Re-read the persisted collection, replacing in-memory state.
    ///
    /// Hook for cross-context synchronization when another session wrote
    /// to the same scope.
    pub fn reload(&self) {
        *self.filters.write() = Self::load(&self.storage, &self.key);
    }

    /// Snapshot of all saved filters
    #[must_use]
    pub fn filters(&self) -> Vec<SavedFilter> {
        self.filters.read().clone()
    }

    /// Look up a saved filter by id
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<SavedFilter> {
        self.filters.read().iter().find(|f| f.id == id).cloned()
    }

    /// The filter currently marked default, if any
    #[must_use]
    pub fn default_filter(&self) -> Option<SavedFilter> {
        self.filters.read().iter().find(|f| f.is_default).cloned()
    }

    /// Save the given state under a new name.
    ///
    /// Names are trimmed; an empty or whitespace-only name is refused.
    /// Returns the saved record, or `None` when refused or persistence
    /// failed (the collection is then unchanged).
    pub fn save_filter(
        &self,
        name: &str,
        description: Option<String>,
        state: AdvancedFilterState,
    ) -> Option<SavedFilter> {
        let name = name.trim();
        if name.is_empty() {
            debug!("save_filter: refusing empty name");
            return None;
        }

        let now = Utc::now();
        let saved = SavedFilter {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description,
            filter: state,
            is_default: false,
            created_at: now,
            updated_at: now,
        };

        let snapshot = self.filters.read().clone();
        self.filters.write().push(saved.clone());
        if self.persist() {
            Some(saved)
        } else {
            *self.filters.write() = snapshot;
            None
        }
    }

    /// Rename a saved filter and optionally replace its description.
    ///
    /// A `None` description leaves the existing one in place; pass
    /// `Some(String::new())` to clear it. The filter state and default
    /// flag stay as they are.
    pub fn update_filter(&self, id: Uuid, name: &str, description: Option<String>) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        let snapshot = self.filters.read().clone();
        {
            let mut filters = self.filters.write();
            let Some(filter) = filters.iter_mut().find(|f| f.id == id) else {
                return false;
            };
            filter.name = name.to_string();
            if let Some(description) = description {
                filter.description = if description.is_empty() {
                    None
                } else {
                    Some(description)
                };
            }
            filter.updated_at = Utc::now();
        }
        self.persist_or_revert(snapshot)
    }

    /// Delete a saved filter.
    ///
    /// Deleting the default filter leaves the collection with no default;
    /// nothing is promoted in its place.
    pub fn delete_filter(&self, id: Uuid) -> bool {
        let snapshot = self.filters.read().clone();
        {
            let mut filters = self.filters.write();
            let before = filters.len();
            filters.retain(|f| f.id != id);
            if filters.len() == before {
                return false;
            }
        }
        self.persist_or_revert(snapshot)
    }

    /// Mark one filter as the default, or clear the default entirely.
    ///
    /// The flag moves atomically: every other filter is cleared in the
    /// same write, so at most one default ever persists.
    pub fn set_default(&self, id: Option<Uuid>) -> bool {
        let snapshot = self.filters.read().clone();
        {
            let mut filters = self.filters.write();
            if let Some(id) = id {
                if !filters.iter().any(|f| f.id == id) {
                    return false;
                }
            }
            let now = Utc::now();
            for filter in filters.iter_mut() {
                let should_be_default = Some(filter.id) == id;
                if filter.is_default != should_be_default {
                    filter.is_default = should_be_default;
                    filter.updated_at = now;
                }
            }
        }
        self.persist_or_revert(snapshot)
    }

    /// Hand a saved filter's state to `apply`, typically a callback that
    /// installs it as the active filter. Returns `false` for unknown ids.
    pub fn apply_filter<F>(&self, id: Uuid, apply: F) -> bool
    where
        F: FnOnce(&AdvancedFilterState),
    {
        match self.get(id) {
            Some(saved) => {
                apply(&saved.filter);
                true
            }
            None => false,
        }
    }

    fn persist(&self) -> bool {
        let blob = {
            let filters = self.filters.read();
            match serde_json::to_string(&*filters) {
                Ok(blob) => blob,
                Err(e) => {
                    warn!("Failed to serialize saved filters: {e}");
                    return false;
                }
            }
        };
        if let Err(e) = self.storage.write(&self.key, &blob) {
            warn!("Failed to persist saved filters under {}: {e}", self.key);
            return false;
        }
        true
    }

    fn persist_or_revert(&self, snapshot: Vec<SavedFilter>) -> bool {
        if self.persist() {
            true
        } else {
            *self.filters.write() = snapshot;
            false
        }
    }
}
