//! Shared test fixtures: in-memory store implementations with failure
//! injection, and task builders.
//!
//! Available to downstream crates via the `test-utils` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::board::{TaskPatch, TaskStore};
use crate::error::{Result, StewardError};
use crate::filters::saved::FilterStorage;
use crate::models::{Task, TaskPriority, TaskStatus, TaskType};

/// In-memory [`TaskStore`] with a switchable failure mode
#[derive(Clone, Default)]
pub struct MemoryTaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
    fail: Arc<AtomicBool>,
}

impl MemoryTaskStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::default();
        *store.tasks.write() = tasks;
        store
    }

    /// Make every subsequent store call fail
    pub fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::Release);
    }

    /// Snapshot of persisted tasks, bypassing the store trait
    #[must_use]
    pub fn persisted(&self) -> Vec<Task> {
        self.tasks.read().clone()
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::Acquire) {
            Err(StewardError::storage("injected failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn fetch_tasks(&self, _owner_id: Uuid, donor_id: Option<Uuid>) -> Result<Vec<Task>> {
        self.check()?;
        let tasks = self.tasks.read();
        Ok(tasks
            .iter()
            .filter(|t| donor_id.map_or(true, |d| t.donor_id == Some(d)))
            .cloned()
            .collect())
    }

    async fn insert_task(&self, _owner_id: Uuid, task: &Task) -> Result<()> {
        self.check()?;
        self.tasks.write().push(task.clone());
        Ok(())
    }

    async fn update_task_fields(&self, id: Uuid, patch: &TaskPatch) -> Result<()> {
        self.check()?;
        let mut tasks = self.tasks.write();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StewardError::TaskNotFound {
                uuid: id.to_string(),
            })?;
        patch.apply(task);
        Ok(())
    }

    async fn delete_task_by_id(&self, id: Uuid) -> Result<()> {
        self.check()?;
        let mut tasks = self.tasks.write();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(StewardError::TaskNotFound {
                uuid: id.to_string(),
            });
        }
        Ok(())
    }
}

/// In-memory [`FilterStorage`] with a switchable write-failure mode
#[derive(Clone, Default)]
pub struct MemoryFilterStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryFilterStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail; reads keep working
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }
}

impl FilterStorage for MemoryFilterStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(StewardError::storage("injected write failure"));
        }
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Builder for task fixtures
pub struct TaskFixture {
    task: Task,
}

impl TaskFixture {
    #[must_use]
    pub fn new(title: &str) -> Self {
        let now = Utc::now();
        Self {
            task: Task {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: None,
                notes: None,
                task_type: TaskType::FollowUp,
                status: TaskStatus::NotStarted,
                priority: TaskPriority::None,
                due_date: None,
                reminder_date: None,
                donor_id: None,
                donor: None,
                sort_key: 0.0,
                is_auto_generated: false,
                completed_at: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[must_use]
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.task.priority = priority;
        self
    }

    #[must_use]
    pub fn task_type(mut self, task_type: TaskType) -> Self {
        self.task.task_type = task_type;
        self
    }

    #[must_use]
    pub fn due(mut self, due: NaiveDate) -> Self {
        self.task.due_date = Some(due);
        self
    }

    #[must_use]
    pub fn donor(mut self, donor_id: Uuid) -> Self {
        self.task.donor_id = Some(donor_id);
        self
    }

    #[must_use]
    pub fn sort_key(mut self, sort_key: f64) -> Self {
        self.task.sort_key = sort_key;
        self
    }

    #[must_use]
    pub fn build(self) -> Task {
        self.task
    }
}

/// Shorthand for a plain not-started task
#[must_use]
pub fn sample_task(title: &str) -> Task {
    TaskFixture::new(title).build()
}
