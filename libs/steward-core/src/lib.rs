//! Steward Core - filtering and task scheduling engines for donor relations
//!
//! This library provides the two engines behind the Steward toolkit:
//!
//! - **Advanced filtering**: a declarative field registry, a pure filter
//!   state builder with uniform AND/OR combination, row evaluation, and
//!   named saved filters with a single-default invariant.
//! - **Task board**: a kanban-style task collection with fractional sort
//!   keys, midpoint-interpolation reordering, optimistic updates with
//!   revert on persistence failure, and derived statistics.
//!
//! # Quick Start
//!
//! ```
//! use steward_core::{
//!     evaluate, AdvancedFilterState, FieldType, FilterBuilder, FilterFieldDefinition, RowValue,
//! };
//! use std::collections::HashMap;
//!
//! let fields = vec![FilterFieldDefinition::new("amount", "Amount", FieldType::Number)];
//! let builder = FilterBuilder::new(fields.clone());
//!
//! let state = builder.add_condition(&AdvancedFilterState::default());
//!
//! let mut row = HashMap::new();
//! row.insert("amount".to_string(), RowValue::Number(250.0));
//! // A condition with no operand filled in does not constrain anything
//! assert!(evaluate(&state, &fields, &row));
//! ```
//!
//! # Crate Features
//!
//! - `test-utils`: in-memory store implementations with failure injection

pub mod board;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod query;
pub mod stats;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use board::{ErrorSink, TaskBoard, TaskPatch, TaskStore};
pub use config::StewardConfig;
pub use error::{Result, StewardError};
pub use filters::{
    evaluate, AdvancedFilterState, ConditionPatch, FieldType, FilterBuilder, FilterCondition,
    FilterFieldDefinition, FilterLogic, FilterOperator, FilterRow, FilterStorage, FilterValue,
    RowValue, SavedFilter, SavedFilterStore, SelectOption, ValueShape,
};
pub use models::{
    CreateTaskRequest, DonorRef, Task, TaskFilters, TaskPriority, TaskStatus, TaskType,
    UpdateTaskRequest,
};
pub use query::TaskQueryBuilder;
pub use stats::{compute_stats, TaskStats};
