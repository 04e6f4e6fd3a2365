//! Kanban task board: optimistic reordering over a persistence collaborator
//!
//! [`TaskBoard`] owns the in-memory task collection for one session/view.
//! Mutations are applied optimistically (local first, then persisted) and
//! reverted when persistence fails. Moves are serialized through an async
//! mutex so there is never more than one in-flight reorder; a later move
//! therefore always computes its rank from the already-applied state of
//! the previous one.
//!
//! Public operations never return errors: they yield a boolean or
//! `Option` success indicator and report human-readable failures through
//! the configured error sink (supplied by the consumer, typically a toast).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use steward_common::SORT_KEY_GAP;

use crate::error::Result;
use crate::models::{
    CreateTaskRequest, Task, TaskPriority, TaskStatus, TaskType, UpdateTaskRequest,
};
use crate::stats::{compute_stats, TaskStats};

/// Partial field update sent to the persistence collaborator.
///
/// `None` means "leave unchanged"; `completed_at` is doubly optional so a
/// reopen can clear it explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub reminder_date: Option<DateTime<Utc>>,
    pub donor_id: Option<Uuid>,
    pub sort_key: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Apply this patch to an in-memory task
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(notes) = &self.notes {
            task.notes = Some(notes.clone());
        }
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(reminder_date) = self.reminder_date {
            task.reminder_date = Some(reminder_date);
        }
        if let Some(donor_id) = self.donor_id {
            task.donor_id = Some(donor_id);
        }
        if let Some(sort_key) = self.sort_key {
            task.sort_key = sort_key;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
        if let Some(updated_at) = self.updated_at {
            task.updated_at = updated_at;
        }
    }
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(request: UpdateTaskRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            notes: request.notes,
            task_type: request.task_type,
            status: request.status,
            priority: request.priority,
            due_date: request.due_date,
            reminder_date: request.reminder_date,
            donor_id: request.donor_id,
            ..Self::default()
        }
    }
}

/// Persistence collaborator for tasks.
///
/// Implementations fail with a descriptive error on network/validation
/// problems; success or failure is the only status surfaced.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch all tasks for an owner, optionally scoped to one donor
    async fn fetch_tasks(&self, owner_id: Uuid, donor_id: Option<Uuid>) -> Result<Vec<Task>>;

    /// Persist a newly created task
    async fn insert_task(&self, owner_id: Uuid, task: &Task) -> Result<()>;

    /// Persist a partial field update
    async fn update_task_fields(&self, id: Uuid, patch: &TaskPatch) -> Result<()>;

    /// Delete a task permanently
    async fn delete_task_by_id(&self, id: Uuid) -> Result<()>;
}

/// Side channel for user-visible error reporting
pub type ErrorSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Lifecycle flags owned by the board, not ambient globals.
///
/// `is_live` guards against a late-resolving persistence response
/// mutating state after the consuming view has gone away.
#[derive(Debug, Default)]
pub struct SessionState {
    closed: AtomicBool,
    fetched_once: AtomicBool,
}

impl SessionState {
    fn is_live(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn mark_fetched(&self) {
        self.fetched_once.store(true, Ordering::Release);
    }

    fn has_fetched_once(&self) -> bool {
        self.fetched_once.load(Ordering::Acquire)
    }
}

/// Compute the sort key for inserting into a column at `target_index`.
///
/// `column` is the target column sorted ascending by sort key, excluding
/// the task being placed. An empty column takes `seed` (wall-clock
/// seconds are sufficient; the key is a rank, not a timestamp). Index 0
/// goes a fixed gap below the head, an index past the end a fixed gap
/// above the tail, and anything in between is the midpoint of its
/// neighbors.
#[must_use]
pub fn sort_key_for_insert(column: &[Task], target_index: usize, seed: f64) -> f64 {
    if column.is_empty() {
        return seed;
    }
    if target_index == 0 {
        return column[0].sort_key - SORT_KEY_GAP;
    }
    if target_index >= column.len() {
        return column[column.len() - 1].sort_key + SORT_KEY_GAP;
    }
    (column[target_index - 1].sort_key + column[target_index].sort_key) / 2.0
}

fn sort_by_rank(tasks: &mut [Task]) {
    // Ties (equal keys) fall back to creation order, then id for determinism
    tasks.sort_by(|a, b| {
        a.sort_key
            .partial_cmp(&b.sort_key)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// In-memory kanban board over a [`TaskStore`]
pub struct TaskBoard<S> {
    store: S,
    owner_id: Uuid,
    donor_scope: Option<Uuid>,
    tasks: RwLock<Vec<Task>>,
    // Serializes move/rebalance so only one reorder is in flight at a time
    move_lock: Mutex<()>,
    session: SessionState,
    error_sink: Option<ErrorSink>,
}

impl<S: TaskStore> TaskBoard<S> {
    /// Create a board for one owner's tasks
    #[must_use]
    pub fn new(store: S, owner_id: Uuid) -> Self {
        Self {
            store,
            owner_id,
            donor_scope: None,
            tasks: RwLock::new(Vec::new()),
            move_lock: Mutex::new(()),
            session: SessionState::default(),
            error_sink: None,
        }
    }

    /// Restrict the board to tasks for a single donor
    #[must_use]
    pub fn with_donor_scope(mut self, donor_id: Uuid) -> Self {
        self.donor_scope = Some(donor_id);
        self
    }

    /// Attach a side channel for user-visible error messages
    #[must_use]
    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.error_sink = Some(sink);
        self
    }

    /// The owner this board belongs to
    #[must_use]
    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    /// Whether the initial fetch has completed at least once
    #[must_use]
    pub fn has_fetched_once(&self) -> bool {
        self.session.has_fetched_once()
    }

    /// Mark the session closed; subsequent late persistence responses
    /// will no longer mutate in-memory state.
    pub fn close(&self) {
        self.session.close();
    }

    fn report(&self, message: &str) {
        warn!("{message}");
        if let Some(sink) = &self.error_sink {
            sink(message);
        }
    }

    /// Re-fetch the task collection from the store.
    ///
    /// This is also the entry point for external change notifications:
    /// the payload is never interpreted, a notification just means
    /// "data may have changed, call refresh".
    pub async fn refresh(&self) -> bool {
        match self.store.fetch_tasks(self.owner_id, self.donor_scope).await {
            Ok(mut fetched) => {
                if !self.session.is_live() {
                    return false;
                }
                sort_by_rank(&mut fetched);
                *self.tasks.write() = fetched;
                self.session.mark_fetched();
                true
            }
            Err(e) => {
                self.report(&format!("Failed to load tasks: {e}"));
                false
            }
        }
    }

    /// Snapshot of all tasks, sorted by rank
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.read().clone()
    }

    /// Snapshot of one status column, sorted by rank
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks
            .read()
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }

    /// Look up a task by id
    #[must_use]
    pub fn find(&self, id: Uuid) -> Option<Task> {
        self.tasks.read().iter().find(|t| t.id == id).cloned()
    }

    /// Derived counts relative to the given calendar date
    #[must_use]
    pub fn stats(&self, today: NaiveDate) -> TaskStats {
        compute_stats(&self.tasks.read(), today)
    }

    /// Create a task appended to the very end of the board.
    ///
    /// The new sort key is greater than every existing key in any column,
    /// so creation order is a total order that only becomes column-local
    /// after the first move. Returns the created task, or `None` when
    /// persistence failed (in-memory state is then untouched).
    pub async fn create_task(&self, request: CreateTaskRequest) -> Option<Task> {
        let now = Utc::now();
        let sort_key = {
            let tasks = self.tasks.read();
            tasks
                .iter()
                .map(|t| t.sort_key)
                .fold(None::<f64>, |acc, k| Some(acc.map_or(k, |m| m.max(k))))
                .map_or_else(|| timestamp_seed(now), |max| max + SORT_KEY_GAP)
        };

        let status = request.status.unwrap_or(TaskStatus::NotStarted);
        let task = Task {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            notes: request.notes,
            task_type: request.task_type.unwrap_or(TaskType::FollowUp),
            status,
            priority: request.priority.unwrap_or(TaskPriority::None),
            due_date: request.due_date,
            reminder_date: request.reminder_date,
            donor_id: request.donor_id,
            donor: None,
            sort_key,
            is_auto_generated: false,
            completed_at: (status == TaskStatus::Completed).then_some(now),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.store.insert_task(self.owner_id, &task).await {
            self.report(&format!("Failed to create task: {e}"));
            return None;
        }
        if self.session.is_live() {
            let mut tasks = self.tasks.write();
            tasks.push(task.clone());
            sort_by_rank(&mut tasks);
        }
        Some(task)
    }

    /// Patch a task's fields. A stale id is a silent no-op returning
    /// `false`; on persistence failure the pre-operation state is kept.
    pub async fn update_task(&self, id: Uuid, request: UpdateTaskRequest) -> bool {
        if self.find(id).is_none() {
            debug!("update_task: unknown task {id}");
            return false;
        }
        let mut patch = TaskPatch::from(request);
        patch.updated_at = Some(Utc::now());
        self.persist_patch(id, patch, "update").await
    }

    /// Mark a task completed
    pub async fn complete_task(&self, id: Uuid) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        let now = Utc::now();
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            completed_at: Some(Some(now)),
            updated_at: Some(now),
            ..TaskPatch::default()
        };
        self.persist_patch(id, patch, "complete").await
    }

    /// Reopen a completed task.
    ///
    /// Always returns to the not-started column regardless of the status
    /// the task held before completion.
    pub async fn reopen_task(&self, id: Uuid) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        let patch = TaskPatch {
            status: Some(TaskStatus::NotStarted),
            completed_at: Some(None),
            updated_at: Some(Utc::now()),
            ..TaskPatch::default()
        };
        self.persist_patch(id, patch, "reopen").await
    }

    /// Delete a task permanently
    pub async fn delete_task(&self, id: Uuid) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        if let Err(e) = self.store.delete_task_by_id(id).await {
            self.report(&format!("Failed to delete task: {e}"));
            return false;
        }
        if self.session.is_live() {
            self.tasks.write().retain(|t| t.id != id);
        }
        true
    }

    /// Move a task to `target_index` within the `target_status` column.
    ///
    /// The new rank is computed by midpoint interpolation between the
    /// target's neighbors, applied optimistically, then persisted; on
    /// failure the whole collection reverts to its pre-move snapshot.
    /// Moving a task to the position it already occupies is a no-op with
    /// no persistence call.
    pub async fn move_task(&self, id: Uuid, target_status: TaskStatus, target_index: usize) -> bool {
        // One reorder in flight at a time; the next move computes its
        // rank from the previous one's already-applied state.
        let _guard = self.move_lock.lock().await;

        let snapshot = self.tasks.read().clone();
        let Some(task) = snapshot.iter().find(|t| t.id == id).cloned() else {
            debug!("move_task: unknown task {id}");
            return false;
        };

        if task.status == target_status {
            let current_index = snapshot
                .iter()
                .filter(|t| t.status == target_status)
                .position(|t| t.id == id);
            if current_index == Some(target_index) {
                return true;
            }
        }

        let column: Vec<Task> = snapshot
            .iter()
            .filter(|t| t.status == target_status && t.id != id)
            .cloned()
            .collect();
        let now = Utc::now();
        let new_sort_key = sort_key_for_insert(&column, target_index, timestamp_seed(now));

        // Optimistic local apply
        if self.session.is_live() {
            let mut tasks = self.tasks.write();
            if let Some(t) = tasks.iter_mut().find(|t| t.id == id) {
                t.status = target_status;
                t.sort_key = new_sort_key;
                t.updated_at = now;
            }
            sort_by_rank(&mut tasks);
        }

        let patch = TaskPatch {
            status: Some(target_status),
            sort_key: Some(new_sort_key),
            updated_at: Some(now),
            ..TaskPatch::default()
        };
        if let Err(e) = self.store.update_task_fields(id, &patch).await {
            if self.session.is_live() {
                *self.tasks.write() = snapshot;
            }
            self.report(&format!("Failed to move task: {e}"));
            return false;
        }
        true
    }

    /// Renumber a column's sort keys with fresh, evenly spaced values.
    ///
    /// Out-of-band maintenance for when repeated midpoint insertions have
    /// eaten into float precision; never invoked by `move_task` itself.
    pub async fn rebalance_column(&self, status: TaskStatus) -> bool {
        let _guard = self.move_lock.lock().await;

        let snapshot = self.tasks.read().clone();
        let column: Vec<Task> = snapshot
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        if column.is_empty() {
            return true;
        }

        let now = Utc::now();
        let assignments: Vec<(Uuid, f64)> = column
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id, (i as f64 + 1.0) * SORT_KEY_GAP))
            .collect();

        if self.session.is_live() {
            let mut tasks = self.tasks.write();
            for (id, key) in &assignments {
                if let Some(t) = tasks.iter_mut().find(|t| t.id == *id) {
                    t.sort_key = *key;
                    t.updated_at = now;
                }
            }
            sort_by_rank(&mut tasks);
        }

        for (id, key) in &assignments {
            let patch = TaskPatch {
                sort_key: Some(*key),
                updated_at: Some(now),
                ..TaskPatch::default()
            };
            if let Err(e) = self.store.update_task_fields(*id, &patch).await {
                if self.session.is_live() {
                    *self.tasks.write() = snapshot;
                }
                self.report(&format!("Failed to rebalance column: {e}"));
                return false;
            }
        }
        true
    }

    /// Persist a patch, then apply it locally on success
    async fn persist_patch(&self, id: Uuid, patch: TaskPatch, action: &str) -> bool {
        if let Err(e) = self.store.update_task_fields(id, &patch).await {
            self.report(&format!("Failed to {action} task: {e}"));
            return false;
        }
        if self.session.is_live() {
            let mut tasks = self.tasks.write();
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                patch.apply(task);
            }
            sort_by_rank(&mut tasks);
        }
        true
    }
}

#[allow(clippy::cast_precision_loss)]
fn timestamp_seed(now: DateTime<Utc>) -> f64 {
    now.timestamp() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ranked_task(sort_key: f64) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            notes: None,
            task_type: TaskType::FollowUp,
            status: TaskStatus::NotStarted,
            priority: TaskPriority::None,
            due_date: None,
            reminder_date: None,
            donor_id: None,
            donor: None,
            sort_key,
            is_auto_generated: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_sort_key_for_insert_empty_column_takes_seed() {
        assert_eq!(sort_key_for_insert(&[], 0, 1234.0), 1234.0);
        assert_eq!(sort_key_for_insert(&[], 7, 1234.0), 1234.0);
    }

    #[test]
    fn test_sort_key_for_insert_head() {
        let column = vec![ranked_task(100.0), ranked_task(200.0)];
        assert_eq!(sort_key_for_insert(&column, 0, 0.0), 0.0);

        let column = vec![ranked_task(500.0)];
        assert_eq!(sort_key_for_insert(&column, 0, 0.0), 400.0);
    }

    #[test]
    fn test_sort_key_for_insert_tail() {
        let column = vec![ranked_task(100.0), ranked_task(200.0)];
        assert_eq!(sort_key_for_insert(&column, 2, 0.0), 300.0);
        // Past-the-end indexes clamp to append
        assert_eq!(sort_key_for_insert(&column, 99, 0.0), 300.0);
    }

    #[test]
    fn test_sort_key_for_insert_midpoint() {
        let column = vec![ranked_task(100.0), ranked_task(200.0), ranked_task(300.0)];
        assert_eq!(sort_key_for_insert(&column, 1, 0.0), 150.0);
        assert_eq!(sort_key_for_insert(&column, 2, 0.0), 250.0);
    }

    #[test]
    fn test_task_patch_apply() {
        let mut task = ranked_task(100.0);
        let completed = Utc::now();
        let patch = TaskPatch {
            title: Some("renamed".to_string()),
            status: Some(TaskStatus::Completed),
            sort_key: Some(250.0),
            completed_at: Some(Some(completed)),
            ..TaskPatch::default()
        };

        patch.apply(&mut task);

        assert_eq!(task.title, "renamed");
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.sort_key, 250.0);
        assert_eq!(task.completed_at, Some(completed));
        // Untouched fields survive
        assert_eq!(task.priority, TaskPriority::None);
    }

    #[test]
    fn test_task_patch_can_clear_completed_at() {
        let mut task = ranked_task(100.0);
        task.completed_at = Some(Utc::now());

        let patch = TaskPatch {
            completed_at: Some(None),
            ..TaskPatch::default()
        };
        patch.apply(&mut task);

        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_sort_by_rank_breaks_ties_by_creation_order() {
        let mut older = ranked_task(100.0);
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        let newer = ranked_task(100.0);

        let mut tasks = vec![newer.clone(), older.clone()];
        sort_by_rank(&mut tasks);

        assert_eq!(tasks[0].id, older.id);
        assert_eq!(tasks[1].id, newer.id);
    }

    proptest! {
        #[test]
        fn prop_midpoint_insert_lands_between_neighbors(
            keys in proptest::collection::vec(0.0f64..1e9, 2..20),
            index in 1usize..19,
        ) {
            let mut keys = keys;
            keys.sort_by(|a, b| a.partial_cmp(b).unwrap());
            keys.dedup();
            prop_assume!(keys.len() >= 2);
            let index = index.min(keys.len() - 1);

            let column: Vec<Task> = keys.iter().map(|&k| ranked_task(k)).collect();
            let key = sort_key_for_insert(&column, index, 0.0);

            prop_assert!(key >= column[index - 1].sort_key);
            prop_assert!(key <= column[index].sort_key);
        }
    }
}
