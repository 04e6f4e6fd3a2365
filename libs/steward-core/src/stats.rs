//! Task statistics aggregation
//!
//! [`compute_stats`] is a pure function of the task list and a calendar
//! date. The caller decides what "today" means (typically the local
//! calendar date); the task model carries no timezone metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Task, TaskPriority, TaskStatus};

/// Derived counts over a task collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Open tasks whose due date has passed
    pub overdue: usize,
    /// Tasks due on the current day (completed excluded)
    pub due_today: usize,
    /// Open high-priority tasks
    pub high_priority: usize,
    /// Tasks in the not-started column
    pub not_started: usize,
    /// Tasks in progress or waiting
    pub in_progress: usize,
    /// Completed tasks
    pub completed: usize,
    /// All tasks
    pub total: usize,
}

/// Compute stats for a task collection relative to `today`.
///
/// Overdue: open (neither completed nor deferred), has a due date, and
/// the due date is before today. Due today: not completed, due date is
/// today. High priority: high priority and not completed.
#[must_use]
pub fn compute_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::NotStarted => stats.not_started += 1,
            TaskStatus::InProgress | TaskStatus::Waiting => stats.in_progress += 1,
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::Deferred => {}
        }

        let open = !matches!(task.status, TaskStatus::Completed | TaskStatus::Deferred);

        if let Some(due) = task.due_date {
            if open && due < today {
                stats.overdue += 1;
            }
            if task.status != TaskStatus::Completed && due == today {
                stats.due_today += 1;
            }
        }

        if task.priority == TaskPriority::High && task.status != TaskStatus::Completed {
            stats.high_priority += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskType;
    use chrono::Utc;
    use uuid::Uuid;

    fn task(status: TaskStatus, priority: TaskPriority, due: Option<NaiveDate>) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            notes: None,
            task_type: TaskType::FollowUp,
            status,
            priority,
            due_date: due,
            reminder_date: None,
            donor_id: None,
            donor: None,
            sort_key: 0.0,
            is_auto_generated: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn mid_june() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_overdue_boundary() {
        // Due the day before now: overdue
        let tasks = vec![task(
            TaskStatus::NotStarted,
            TaskPriority::None,
            NaiveDate::from_ymd_opt(2024, 6, 14),
        )];
        let stats = compute_stats(&tasks, mid_june());
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.due_today, 0);
    }

    #[test]
    fn test_due_today_boundary() {
        // Due on the current day: due today, not overdue
        let tasks = vec![task(
            TaskStatus::NotStarted,
            TaskPriority::None,
            NaiveDate::from_ymd_opt(2024, 6, 15),
        )];
        let stats = compute_stats(&tasks, mid_june());
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.due_today, 1);
    }

    #[test]
    fn test_completed_task_is_neither_overdue_nor_due_today() {
        let tasks = vec![task(
            TaskStatus::Completed,
            TaskPriority::None,
            NaiveDate::from_ymd_opt(2024, 6, 1),
        )];
        let stats = compute_stats(&tasks, mid_june());
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.due_today, 0);
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_deferred_task_is_not_overdue_but_can_be_due_today() {
        let overdue_deferred = vec![task(
            TaskStatus::Deferred,
            TaskPriority::None,
            NaiveDate::from_ymd_opt(2024, 6, 1),
        )];
        let stats = compute_stats(&overdue_deferred, mid_june());
        assert_eq!(stats.overdue, 0);

        // Only completed is excluded from the due-today count
        let due_today_deferred = vec![task(
            TaskStatus::Deferred,
            TaskPriority::None,
            NaiveDate::from_ymd_opt(2024, 6, 15),
        )];
        let stats = compute_stats(&due_today_deferred, mid_june());
        assert_eq!(stats.due_today, 1);
    }

    #[test]
    fn test_high_priority_excludes_completed() {
        let tasks = vec![
            task(TaskStatus::NotStarted, TaskPriority::High, None),
            task(TaskStatus::Waiting, TaskPriority::High, None),
            task(TaskStatus::Completed, TaskPriority::High, None),
        ];
        let stats = compute_stats(&tasks, mid_june());
        assert_eq!(stats.high_priority, 2);
    }

    #[test]
    fn test_category_partitions() {
        let tasks = vec![
            task(TaskStatus::NotStarted, TaskPriority::None, None),
            task(TaskStatus::InProgress, TaskPriority::None, None),
            task(TaskStatus::Waiting, TaskPriority::None, None),
            task(TaskStatus::Completed, TaskPriority::None, None),
            task(TaskStatus::Deferred, TaskPriority::None, None),
        ];
        let stats = compute_stats(&tasks, mid_june());

        assert_eq!(stats.not_started, 1);
        // In-progress bucket includes waiting
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.total, 5);
    }

    #[test]
    fn test_empty_collection() {
        let stats = compute_stats(&[], mid_june());
        assert_eq!(stats, TaskStats::default());
    }

    #[test]
    fn test_undated_task_is_never_overdue() {
        let tasks = vec![task(TaskStatus::NotStarted, TaskPriority::None, None)];
        let stats = compute_stats(&tasks, mid_june());
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.due_today, 0);
    }
}
