//! JSON-file persistence for tasks and saved filters
//!
//! Each collection is one JSON blob in the data directory: `tasks.json`
//! for the task list and `filters.json` for the saved-filter key/value
//! map. Missing files behave as empty collections; corrupt files are
//! logged and treated as empty rather than aborting the command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use steward_core::{
    FilterStorage, Result, StewardConfig, StewardError, Task, TaskPatch, TaskStore,
};

const FILTERS_FILENAME: &str = "filters.json";

fn read_collection<T: DeserializeOwned + Default>(path: &Path) -> T {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring corrupt data file {}: {e}", path.display());
                T::default()
            }
        },
        Err(_) => T::default(),
    }
}

fn write_collection<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    std::fs::write(path, raw)?;
    Ok(())
}

/// Task collection stored as `tasks.json`
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    /// Open the store inside the configured data directory, creating the
    /// directory when the configuration permits it.
    ///
    /// # Errors
    /// Returns a configuration error when the data directory cannot be
    /// resolved.
    pub fn open(config: &StewardConfig) -> Result<Self> {
        config.effective_data_dir()?;
        Ok(Self {
            path: config.tasks_file(),
        })
    }

    fn load(&self) -> Vec<Task> {
        read_collection(&self.path)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        write_collection(&self.path, &tasks)
    }
}

#[async_trait]
impl TaskStore for JsonTaskStore {
    async fn fetch_tasks(&self, _owner_id: Uuid, donor_id: Option<Uuid>) -> Result<Vec<Task>> {
        Ok(self
            .load()
            .into_iter()
            .filter(|t| donor_id.map_or(true, |d| t.donor_id == Some(d)))
            .collect())
    }

    async fn insert_task(&self, _owner_id: Uuid, task: &Task) -> Result<()> {
        let mut tasks = self.load();
        tasks.push(task.clone());
        self.save(&tasks)
    }

    async fn update_task_fields(&self, id: Uuid, patch: &TaskPatch) -> Result<()> {
        let mut tasks = self.load();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StewardError::TaskNotFound {
                uuid: id.to_string(),
            })?;
        patch.apply(task);
        self.save(&tasks)
    }

    async fn delete_task_by_id(&self, id: Uuid) -> Result<()> {
        let mut tasks = self.load();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(StewardError::TaskNotFound {
                uuid: id.to_string(),
            });
        }
        self.save(&tasks)
    }
}

/// Saved-filter key/value map stored as `filters.json`
#[derive(Debug, Clone)]
pub struct JsonFilterStorage {
    path: PathBuf,
}

impl JsonFilterStorage {
    /// Open the storage inside the configured data directory
    ///
    /// # Errors
    /// Returns a configuration error when the data directory cannot be
    /// resolved.
    pub fn open(config: &StewardConfig) -> Result<Self> {
        let dir = config.effective_data_dir()?;
        Ok(Self {
            path: dir.join(FILTERS_FILENAME),
        })
    }

    fn load(&self) -> HashMap<String, String> {
        read_collection(&self.path)
    }
}

impl FilterStorage for JsonFilterStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());
        write_collection(&self.path, &values)
    }
}
