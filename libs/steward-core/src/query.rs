//! Query builder and in-memory predicate for task listings

use crate::models::{Task, TaskFilters, TaskPriority, TaskStatus, TaskType};
use chrono::NaiveDate;
use steward_common::MAX_QUERY_LIMIT;
use uuid::Uuid;

impl TaskFilters {
    /// Evaluate this filter against a task.
    ///
    /// Every present criterion must match (AND semantics across fields).
    /// The search query is a case-insensitive substring test over title,
    /// description and notes. Due-date bounds are inclusive; a task with
    /// no due date never matches a date-bounded filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }

        if let Some(task_type) = self.task_type {
            if task.task_type != task_type {
                return false;
            }
        }

        if let Some(donor_id) = self.donor_id {
            if task.donor_id != Some(donor_id) {
                return false;
            }
        }

        if let Some(query) = &self.search_query {
            let query = query.to_lowercase();
            if !query.is_empty() {
                let title_hit = task.title.to_lowercase().contains(&query);
                let description_hit = task
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&query));
                let notes_hit = task
                    .notes
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&query));
                if !title_hit && !description_hit && !notes_hit {
                    return false;
                }
            }
        }

        if self.due_from.is_some() || self.due_to.is_some() {
            let Some(due) = task.due_date else {
                return false;
            };
            if let Some(from) = self.due_from {
                if due < from {
                    return false;
                }
            }
            if let Some(to) = self.due_to {
                if due > to {
                    return false;
                }
            }
        }

        true
    }

    /// Apply this filter to a task slice, honoring `offset` and `limit`.
    ///
    /// Result sets are capped at [`MAX_QUERY_LIMIT`] rows even when no
    /// explicit limit is set.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        let limit = self.limit.unwrap_or(MAX_QUERY_LIMIT).min(MAX_QUERY_LIMIT);
        tasks
            .iter()
            .filter(|t| self.matches(t))
            .skip(self.offset.unwrap_or(0))
            .take(limit)
            .collect()
    }
}

/// Builder for constructing task queries with filters
#[derive(Debug, Clone)]
pub struct TaskQueryBuilder {
    filters: TaskFilters,
}

impl TaskQueryBuilder {
    /// Create a new query builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: TaskFilters::default(),
        }
    }

    /// Filter by status
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.filters.status = Some(status);
        self
    }

    /// Filter by priority
    #[must_use]
    pub const fn priority(mut self, priority: TaskPriority) -> Self {
        self.filters.priority = Some(priority);
        self
    }

    /// Filter by task type
    #[must_use]
    pub const fn task_type(mut self, task_type: TaskType) -> Self {
        self.filters.task_type = Some(task_type);
        self
    }

    /// Filter by donor UUID
    #[must_use]
    pub const fn donor(mut self, donor_id: Uuid) -> Self {
        self.filters.donor_id = Some(donor_id);
        self
    }

    /// Add search query
    #[must_use]
    pub fn search(mut self, query: &str) -> Self {
        self.filters.search_query = Some(query.to_string());
        self
    }

    /// Filter by due date range (inclusive bounds)
    #[must_use]
    pub const fn due_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.filters.due_from = from;
        self.filters.due_to = to;
        self
    }

    /// Set limit
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.filters.limit = Some(limit);
        self
    }

    /// Set offset for pagination
    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.filters.offset = Some(offset);
        self
    }

    /// Build the final filters
    #[must_use]
    pub fn build(self) -> TaskFilters {
        self.filters
    }
}

impl Default for TaskQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
