//! Advanced filtering: field registry, condition builder, evaluation,
//! and saved filter persistence.
//!
//! The pieces are layered so each can be used alone: [`field`] declares
//! what is filterable, [`builder`] edits filter state as pure value
//! transformations, [`eval`] applies a state to rows, and [`saved`]
//! persists named states with a single-default invariant.

pub mod builder;
pub mod eval;
pub mod field;
pub mod saved;

pub use builder::{AdvancedFilterState, ConditionPatch, FilterBuilder, FilterLogic};
pub use eval::{evaluate, evaluate_condition, FilterRow, RowValue};
pub use field::{
    FieldType, FilterCondition, FilterFieldDefinition, FilterOperator, FilterValue, SelectOption,
    ValueShape,
};
pub use saved::{FilterStorage, SavedFilter, SavedFilterStore};
