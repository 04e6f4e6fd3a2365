//! Data models for Steward task entities

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task status enumeration
///
/// One status per kanban column; `Completed` and `Deferred` are terminal
/// for scheduling purposes (neither counts as overdue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Waiting,
    Completed,
    Deferred,
}

impl TaskStatus {
    /// All statuses in kanban column order
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Waiting,
        TaskStatus::Completed,
        TaskStatus::Deferred,
    ];
}

/// Task priority enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    None,
    Low,
    Medium,
    High,
}

/// Task type enumeration for donor-relations work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Call,
    Email,
    ThankYou,
    FollowUp,
    Visit,
    Other,
}

/// Denormalized donor reference attached to a task.
///
/// Maintained by the persistence layer as a read-only join; the task
/// engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorRef {
    /// Donor identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: Option<String>,
    /// Avatar image URL
    pub avatar_url: Option<String>,
}

/// Main task entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: Uuid,
    /// Task title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// Task type
    pub task_type: TaskType,
    /// Task status (kanban column)
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Due date
    pub due_date: Option<NaiveDate>,
    /// Reminder timestamp
    pub reminder_date: Option<DateTime<Utc>>,
    /// Associated donor UUID
    pub donor_id: Option<Uuid>,
    /// Denormalized donor join (read-only)
    pub donor: Option<DonorRef>,
    /// Floating-point rank within the status column
    pub sort_key: f64,
    /// Whether the task was generated automatically (e.g. from a pipeline rule)
    pub is_auto_generated: bool,
    /// Completion timestamp (set on completion, cleared on reopen)
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Task creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title (required)
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional notes
    pub notes: Option<String>,
    /// Task type (defaults to FollowUp)
    pub task_type: Option<TaskType>,
    /// Initial status (defaults to NotStarted)
    pub status: Option<TaskStatus>,
    /// Priority (defaults to None)
    pub priority: Option<TaskPriority>,
    /// Due date
    pub due_date: Option<NaiveDate>,
    /// Reminder timestamp
    pub reminder_date: Option<DateTime<Utc>>,
    /// Associated donor UUID
    pub donor_id: Option<Uuid>,
}

impl CreateTaskRequest {
    /// Minimal request with just a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            notes: None,
            task_type: None,
            status: None,
            priority: None,
            due_date: None,
            reminder_date: None,
            donor_id: None,
        }
    }
}

/// Task update request; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New notes
    pub notes: Option<String>,
    /// New task type
    pub task_type: Option<TaskType>,
    /// New status
    pub status: Option<TaskStatus>,
    /// New priority
    pub priority: Option<TaskPriority>,
    /// New due date
    pub due_date: Option<NaiveDate>,
    /// New reminder timestamp
    pub reminder_date: Option<DateTime<Utc>>,
    /// New donor UUID
    pub donor_id: Option<Uuid>,
}

impl UpdateTaskRequest {
    /// Whether the patch changes anything at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.notes.is_none()
            && self.task_type.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.reminder_date.is_none()
            && self.donor_id.is_none()
    }
}

/// Fixed-shape task filters for board listings.
///
/// This is the ad-hoc counterpart of the general filter engine in
/// [`crate::filters`]: one optional criterion per field, AND semantics
/// across criteria. See [`TaskFilters::matches`](crate::query) for
/// evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskFilters {
    /// Filter by status
    pub status: Option<TaskStatus>,
    /// Filter by priority
    pub priority: Option<TaskPriority>,
    /// Filter by task type
    pub task_type: Option<TaskType>,
    /// Filter by donor UUID
    pub donor_id: Option<Uuid>,
    /// Case-insensitive search over title, description and notes
    pub search_query: Option<String>,
    /// Filter by due date range (inclusive)
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
    /// Limit results
    pub limit: Option<usize>,
    /// Offset for pagination
    pub offset: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_serialization() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::NotStarted).unwrap(),
            "\"not_started\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Waiting).unwrap(),
            "\"waiting\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Deferred).unwrap(),
            "\"deferred\""
        );
    }

    #[test]
    fn test_task_status_deserialization() {
        let deserialized: TaskStatus = serde_json::from_str("\"not_started\"").unwrap();
        assert_eq!(deserialized, TaskStatus::NotStarted);

        let deserialized: TaskStatus = serde_json::from_str("\"deferred\"").unwrap();
        assert_eq!(deserialized, TaskStatus::Deferred);
    }

    #[test]
    fn test_task_priority_ordering() {
        assert!(TaskPriority::None < TaskPriority::Low);
        assert!(TaskPriority::Low < TaskPriority::Medium);
        assert!(TaskPriority::Medium < TaskPriority::High);
    }

    #[test]
    fn test_task_type_serialization() {
        assert_eq!(
            serde_json::to_string(&TaskType::ThankYou).unwrap(),
            "\"thank_you\""
        );
        assert_eq!(
            serde_json::to_string(&TaskType::FollowUp).unwrap(),
            "\"follow_up\""
        );
    }

    #[test]
    fn test_task_serialization_roundtrip() {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: "Thank-you letter for the Hendersons".to_string(),
            description: None,
            notes: Some("Mention the new field report".to_string()),
            task_type: TaskType::ThankYou,
            status: TaskStatus::NotStarted,
            priority: TaskPriority::Medium,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 20),
            reminder_date: None,
            donor_id: Some(Uuid::new_v4()),
            donor: Some(DonorRef {
                id: Uuid::new_v4(),
                name: "Henderson Family".to_string(),
                email: Some("hendersons@example.com".to_string()),
                avatar_url: None,
            }),
            sort_key: 100.0,
            is_auto_generated: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        let serialized = serde_json::to_string(&task).unwrap();
        let deserialized: Task = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, task);
    }

    #[test]
    fn test_create_task_request_new() {
        let request = CreateTaskRequest::new("Call donor");

        assert_eq!(request.title, "Call donor");
        assert!(request.task_type.is_none());
        assert!(request.status.is_none());
        assert!(request.priority.is_none());
        assert!(request.due_date.is_none());
        assert!(request.donor_id.is_none());
    }

    #[test]
    fn test_update_task_request_is_empty() {
        assert!(UpdateTaskRequest::default().is_empty());

        let patch = UpdateTaskRequest {
            title: Some("New title".to_string()),
            ..UpdateTaskRequest::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_task_filters_default() {
        let filters = TaskFilters::default();

        assert!(filters.status.is_none());
        assert!(filters.priority.is_none());
        assert!(filters.task_type.is_none());
        assert!(filters.donor_id.is_none());
        assert!(filters.search_query.is_none());
        assert!(filters.due_from.is_none());
        assert!(filters.due_to.is_none());
        assert!(filters.limit.is_none());
        assert!(filters.offset.is_none());
    }

    #[test]
    fn test_task_status_all_is_exhaustive() {
        assert_eq!(TaskStatus::ALL.len(), 5);
        assert_eq!(TaskStatus::ALL[0], TaskStatus::NotStarted);
        assert_eq!(TaskStatus::ALL[3], TaskStatus::Completed);
    }
}
