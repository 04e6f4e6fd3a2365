//! Stateless builder for advanced filter state
//!
//! [`FilterBuilder`] owns the field registry and transforms one
//! [`AdvancedFilterState`] into the next: state in, state out. Out-of-range
//! indexes and unknown field ids are silent no-ops, never errors — the
//! consumer feeds states back through whatever change callback it uses.

use serde::{Deserialize, Serialize};

use super::field::{
    default_value, expected_shape, FilterCondition, FilterFieldDefinition, FilterOperator,
    FilterValue,
};

/// Combinator applied uniformly to all conditions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterLogic {
    #[default]
    And,
    Or,
}

impl FilterLogic {
    /// The other combinator
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            FilterLogic::And => FilterLogic::Or,
            FilterLogic::Or => FilterLogic::And,
        }
    }
}

/// Ordered condition list plus the single combinator applied to all of them.
///
/// There is no per-pair or nested grouping; `logic` is uniform. The empty
/// state passes every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedFilterState {
    /// Conditions in display/evaluation order
    pub conditions: Vec<FilterCondition>,
    /// AND/OR combinator
    pub logic: FilterLogic,
}

impl AdvancedFilterState {
    /// Whether no conditions are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Partial update for a single condition; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ConditionPatch {
    pub field: Option<String>,
    pub operator: Option<FilterOperator>,
    pub value: Option<FilterValue>,
}

/// Pure state transformer over [`AdvancedFilterState`]
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    fields: Vec<FilterFieldDefinition>,
}

impl FilterBuilder {
    /// Create a builder over a field registry
    #[must_use]
    pub fn new(fields: Vec<FilterFieldDefinition>) -> Self {
        Self { fields }
    }

    /// The field registry, in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FilterFieldDefinition] {
        &self.fields
    }

    /// Look up a field definition by id
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FilterFieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Operators offered for the given field, or an empty slice for an
    /// unknown id
    #[must_use]
    pub fn operators_for_field(&self, id: &str) -> &'static [FilterOperator] {
        self.field(id)
            .map_or(&[], |f| super::field::operators_for(f.field_type))
    }

    /// Append a new condition on the first field in the registry.
    ///
    /// No-op when the registry is empty.
    #[must_use]
    pub fn add_condition(&self, state: &AdvancedFilterState) -> AdvancedFilterState {
        let Some(first) = self.fields.first() else {
            return state.clone();
        };
        let mut next = state.clone();
        next.conditions.push(FilterCondition::for_field(first));
        next
    }

    /// Shallow-merge a patch into the condition at `index`.
    ///
    /// No-op when `index` is out of range.
    #[must_use]
    pub fn update_condition(
        &self,
        state: &AdvancedFilterState,
        index: usize,
        patch: ConditionPatch,
    ) -> AdvancedFilterState {
        let mut next = state.clone();
        let Some(condition) = next.conditions.get_mut(index) else {
            return state.clone();
        };
        if let Some(field) = patch.field {
            condition.field = field;
        }
        if let Some(operator) = patch.operator {
            condition.operator = operator;
        }
        if let Some(value) = patch.value {
            condition.value = value;
        }
        next
    }

    /// Remove the condition at `index`, shifting later conditions down.
    ///
    /// No-op when `index` is out of range.
    #[must_use]
    pub fn remove_condition(&self, state: &AdvancedFilterState, index: usize) -> AdvancedFilterState {
        if index >= state.conditions.len() {
            return state.clone();
        }
        let mut next = state.clone();
        next.conditions.remove(index);
        next
    }

    /// Retarget the condition at `index` to a different field, resetting
    /// both operator and value to the new field's defaults. A stale
    /// operator/value pair must never survive a field change.
    ///
    /// No-op when `index` is out of range or the field id is unknown.
    #[must_use]
    pub fn change_field(
        &self,
        state: &AdvancedFilterState,
        index: usize,
        field_id: &str,
    ) -> AdvancedFilterState {
        let Some(field) = self.field(field_id) else {
            return state.clone();
        };
        let mut next = state.clone();
        let Some(condition) = next.conditions.get_mut(index) else {
            return state.clone();
        };
        let operator = field.initial_operator();
        condition.field = field.id.clone();
        condition.operator = operator;
        condition.value = default_value(field.field_type, operator);
        next
    }

    /// Change only the operator of the condition at `index`.
    ///
    /// The value is kept when the new operator expects the same value
    /// shape as the old one, and reset to the new operator's empty value
    /// otherwise, so a scalar is never left behind under a range operator.
    ///
    /// No-op when `index` is out of range or the condition's field is
    /// unknown.
    #[must_use]
    pub fn change_operator(
        &self,
        state: &AdvancedFilterState,
        index: usize,
        operator: FilterOperator,
    ) -> AdvancedFilterState {
        let Some(condition) = state.conditions.get(index) else {
            return state.clone();
        };
        let Some(field) = self.field(&condition.field) else {
            return state.clone();
        };

        let mut next = state.clone();
        let condition = &mut next.conditions[index];
        let old_shape = expected_shape(field.field_type, condition.operator);
        let new_shape = expected_shape(field.field_type, operator);
        condition.operator = operator;
        if old_shape != new_shape {
            condition.value = default_value(field.field_type, operator);
        }
        next
    }

    /// Flip the combinator for the entire state
    #[must_use]
    pub fn toggle_logic(&self, state: &AdvancedFilterState) -> AdvancedFilterState {
        let mut next = state.clone();
        next.logic = next.logic.toggled();
        next
    }
}
