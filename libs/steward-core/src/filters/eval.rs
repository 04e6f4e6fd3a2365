//! Predicate evaluation for advanced filter states
//!
//! Rows expose their attributes as [`RowValue`]s through the [`FilterRow`]
//! trait. Each condition is dispatched on the field's declared type and
//! the condition's operator — never on the runtime shape of the value —
//! and the results are combined with the state's AND/OR logic.
//!
//! A condition whose operand has not been filled in yet (a `Null` scalar,
//! an empty membership list) places no constraint on the row and passes.
//! A shape mismatch between operator and operand, or a field id missing
//! from the registry, evaluates to `false` rather than erroring.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::builder::{AdvancedFilterState, FilterLogic};
use super::field::{
    FieldType, FilterCondition, FilterFieldDefinition, FilterOperator, FilterValue,
};

/// Attribute value a row exposes to the filter engine
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    Null,
    Text(String),
    Number(f64),
    Flag(bool),
    Date(NaiveDate),
    TextList(Vec<String>),
}

impl RowValue {
    /// The null/undefined/empty-string/empty-array test, independent of type
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            RowValue::Null => true,
            RowValue::Text(s) => s.is_empty(),
            RowValue::TextList(items) => items.is_empty(),
            RowValue::Number(_) | RowValue::Flag(_) | RowValue::Date(_) => false,
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            RowValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            RowValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RowValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// A row of tabular data the filter engine can interrogate
pub trait FilterRow {
    /// The value of the attribute named by `field_id`; `RowValue::Null`
    /// when the row has no such attribute.
    fn field_value(&self, field_id: &str) -> RowValue;
}

impl FilterRow for HashMap<String, RowValue> {
    fn field_value(&self, field_id: &str) -> RowValue {
        self.get(field_id).cloned().unwrap_or(RowValue::Null)
    }
}

/// Evaluate a full filter state against a row.
///
/// The empty state always passes. AND requires every condition to pass;
/// OR requires at least one.
#[must_use]
pub fn evaluate(
    state: &AdvancedFilterState,
    fields: &[FilterFieldDefinition],
    row: &impl FilterRow,
) -> bool {
    if state.conditions.is_empty() {
        return true;
    }

    let condition_passes = |condition: &FilterCondition| {
        let Some(field) = fields.iter().find(|f| f.id == condition.field) else {
            return false;
        };
        evaluate_condition(field, condition, &row.field_value(&condition.field))
    };

    match state.logic {
        FilterLogic::And => state.conditions.iter().all(condition_passes),
        FilterLogic::Or => state.conditions.iter().any(condition_passes),
    }
}

/// Evaluate one condition against one row value
#[must_use]
pub fn evaluate_condition(
    field: &FilterFieldDefinition,
    condition: &FilterCondition,
    value: &RowValue,
) -> bool {
    match condition.operator {
        FilterOperator::IsEmpty => value.is_empty(),
        FilterOperator::IsNotEmpty => !value.is_empty(),
        FilterOperator::IsTrue => matches!(value, RowValue::Flag(true)),
        FilterOperator::IsFalse => matches!(value, RowValue::Flag(false)),

        FilterOperator::Equals => eval_equals(field.field_type, condition, value),
        FilterOperator::NotEquals => {
            // Vacuous operand stays vacuous under negation
            if matches!(condition.value, FilterValue::Null) {
                true
            } else {
                !eval_equals(field.field_type, condition, value)
            }
        }

        FilterOperator::Contains => eval_substring(condition, value, |hay, needle| {
            hay.contains(needle)
        }),
        FilterOperator::NotContains => {
            if matches!(condition.value, FilterValue::Null) {
                true
            } else {
                !eval_substring(condition, value, |hay, needle| hay.contains(needle))
            }
        }
        FilterOperator::StartsWith => eval_substring(condition, value, |hay, needle| {
            hay.starts_with(needle)
        }),
        FilterOperator::EndsWith => eval_substring(condition, value, |hay, needle| {
            hay.ends_with(needle)
        }),

        FilterOperator::Gt => eval_ordering(field.field_type, condition, value, |ord| {
            ord == std::cmp::Ordering::Greater
        }),
        FilterOperator::Gte => eval_ordering(field.field_type, condition, value, |ord| {
            ord != std::cmp::Ordering::Less
        }),
        FilterOperator::Lt => eval_ordering(field.field_type, condition, value, |ord| {
            ord == std::cmp::Ordering::Less
        }),
        FilterOperator::Lte => eval_ordering(field.field_type, condition, value, |ord| {
            ord != std::cmp::Ordering::Greater
        }),

        FilterOperator::Between => eval_between(condition, value),

        FilterOperator::In => eval_membership(condition, value, false),
        FilterOperator::NotIn => eval_membership(condition, value, true),

        FilterOperator::Before => eval_date(condition, value, |d, bound| d < bound),
        FilterOperator::After => eval_date(condition, value, |d, bound| d > bound),
        FilterOperator::OnOrBefore => eval_date(condition, value, |d, bound| d <= bound),
        FilterOperator::OnOrAfter => eval_date(condition, value, |d, bound| d >= bound),
    }
}

fn eval_equals(field_type: FieldType, condition: &FilterCondition, value: &RowValue) -> bool {
    match field_type {
        FieldType::Number | FieldType::NumberRange => match &condition.value {
            FilterValue::Null => true,
            FilterValue::Number(expected) => value.as_number() == Some(*expected),
            _ => false,
        },
        FieldType::Date | FieldType::DateRange => match &condition.value {
            FilterValue::Null => true,
            FilterValue::Date(expected) => value.as_date() == Some(*expected),
            _ => false,
        },
        FieldType::Boolean => match &condition.value {
            FilterValue::Null => true,
            FilterValue::Flag(expected) => matches!(value, RowValue::Flag(b) if b == expected),
            _ => false,
        },
        FieldType::Text | FieldType::Select | FieldType::MultiSelect => match &condition.value {
            FilterValue::Null => true,
            FilterValue::Text(expected) => value
                .as_text()
                .is_some_and(|t| t.eq_ignore_ascii_case(expected)),
            _ => false,
        },
    }
}

fn eval_substring(
    condition: &FilterCondition,
    value: &RowValue,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    match &condition.value {
        FilterValue::Null => true,
        FilterValue::Text(needle) => {
            if needle.is_empty() {
                return true;
            }
            value
                .as_text()
                .is_some_and(|hay| test(&hay.to_lowercase(), &needle.to_lowercase()))
        }
        _ => false,
    }
}

fn eval_ordering(
    field_type: FieldType,
    condition: &FilterCondition,
    value: &RowValue,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    match field_type {
        FieldType::Date | FieldType::DateRange => match &condition.value {
            FilterValue::Null => true,
            FilterValue::Date(bound) => value
                .as_date()
                .is_some_and(|d| accept(d.cmp(bound))),
            _ => false,
        },
        _ => match &condition.value {
            FilterValue::Null => true,
            FilterValue::Number(bound) => value
                .as_number()
                .and_then(|n| n.partial_cmp(bound))
                .is_some_and(accept),
            _ => false,
        },
    }
}

fn eval_between(condition: &FilterCondition, value: &RowValue) -> bool {
    match &condition.value {
        FilterValue::Null => true,
        FilterValue::NumberRange { min, max } => {
            let Some(n) = value.as_number() else {
                return false;
            };
            // A null bound means unbounded on that side; bounds are inclusive
            min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
        }
        FilterValue::DateRange { from, to } => {
            let Some(d) = value.as_date() else {
                return false;
            };
            from.map_or(true, |lo| d >= lo) && to.map_or(true, |hi| d <= hi)
        }
        _ => false,
    }
}

fn eval_membership(condition: &FilterCondition, value: &RowValue, negate: bool) -> bool {
    let hit = match &condition.value {
        FilterValue::Null => return true,
        FilterValue::TextList(items) => {
            if items.is_empty() {
                return true;
            }
            match value {
                RowValue::Text(t) => items.iter().any(|i| i.eq_ignore_ascii_case(t)),
                RowValue::TextList(row_items) => row_items
                    .iter()
                    .any(|r| items.iter().any(|i| i.eq_ignore_ascii_case(r))),
                _ => false,
            }
        }
        FilterValue::NumberList(items) => {
            if items.is_empty() {
                return true;
            }
            value.as_number().is_some_and(|n| items.contains(&n))
        }
        _ => return false,
    };
    hit != negate
}

fn eval_date(
    condition: &FilterCondition,
    value: &RowValue,
    test: impl Fn(NaiveDate, NaiveDate) -> bool,
) -> bool {
    match &condition.value {
        FilterValue::Null => true,
        FilterValue::Date(bound) => value.as_date().is_some_and(|d| test(d, *bound)),
        _ => false,
    }
}
