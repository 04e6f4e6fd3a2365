//! Filter field registry, operator vocabulary and condition factory
//!
//! A [`FilterFieldDefinition`] declares one filterable column: its value
//! type and (implicitly, via [`operators_for`]) the closed set of
//! operators the builder may offer for it. Conditions are created through
//! [`FilterCondition::for_field`], which assigns the field's default
//! operator and the empty value appropriate to that operator's shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    DateRange,
    NumberRange,
    Boolean,
}

impl FieldType {
    /// All field types
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Select,
        FieldType::MultiSelect,
        FieldType::Date,
        FieldType::DateRange,
        FieldType::NumberRange,
        FieldType::Boolean,
    ];
}

/// Closed operator enumeration.
///
/// Not every operator is valid for every field type; [`operators_for`]
/// is the authoritative menu per type. The model itself does not reject
/// mismatched pairs — evaluation treats them as non-matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    In,
    NotIn,
    Before,
    After,
    OnOrBefore,
    OnOrAfter,
    IsTrue,
    IsFalse,
}

/// Shape of the value an operator expects for a given field type.
///
/// Used to decide whether a value can survive an operator change: if the
/// shape differs, the old value is discarded and replaced with the new
/// operator's empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Operator takes no value (is_empty, is_true, ...)
    None,
    Text,
    Number,
    Flag,
    Date,
    TextList,
    NumberList,
    NumberRange,
    DateRange,
}

/// Typed filter value.
///
/// An explicit sum type: consumers dispatch on the field's declared
/// [`FieldType`] and the operator, then pattern-match the expected
/// variant, never on the runtime shape alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    Null,
    Text(String),
    Number(f64),
    Flag(bool),
    Date(NaiveDate),
    TextList(Vec<String>),
    NumberList(Vec<f64>),
    NumberRange {
        min: Option<f64>,
        max: Option<f64>,
    },
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

/// One enumerated choice of a select/multi-select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Stored value
    pub value: String,
    /// Display label
    pub label: String,
}

impl SelectOption {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declaration of one filterable field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterFieldDefinition {
    /// Unique key into the row's attribute namespace
    pub id: String,
    /// Display name (presentation only)
    pub label: String,
    /// Value type
    pub field_type: FieldType,
    /// Enumerated choices; required for select/multi-select fields
    #[serde(default)]
    pub options: Vec<SelectOption>,
    /// Optional override of the type's default operator
    #[serde(default)]
    pub default_operator: Option<FilterOperator>,
}

impl FilterFieldDefinition {
    /// Declare a field with no options
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            options: Vec::new(),
            default_operator: None,
        }
    }

    /// Declare a select/multi-select field with its choices
    #[must_use]
    pub fn with_options(
        id: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            options,
            default_operator: None,
        }
    }

    /// Override the default operator for this field
    #[must_use]
    pub fn default_operator(mut self, operator: FilterOperator) -> Self {
        self.default_operator = Some(operator);
        self
    }

    /// The operator a fresh condition on this field starts with
    #[must_use]
    pub fn initial_operator(&self) -> FilterOperator {
        self.default_operator
            .unwrap_or_else(|| default_operator(self.field_type))
    }
}

/// One typed predicate instance: field + operator + value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Unique, generated identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Field id from the registry
    pub field: String,
    /// Operator applied to the field
    pub operator: FilterOperator,
    /// Operator operand
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a condition with the field's default operator and the
    /// empty value appropriate to that operator.
    #[must_use]
    pub fn for_field(field: &FilterFieldDefinition) -> Self {
        let operator = field.initial_operator();
        Self {
            id: Uuid::new_v4(),
            field: field.id.clone(),
            operator,
            value: default_value(field.field_type, operator),
        }
    }
}

/// Default operator per field type.
///
/// Total over [`FieldType`]; the mapping is stable and documented here:
/// text → contains, number → equals, select → equals, multi-select → in,
/// date → on_or_after, date-range → between, number-range → between,
/// boolean → is_true.
#[must_use]
pub const fn default_operator(field_type: FieldType) -> FilterOperator {
    match field_type {
        FieldType::Text => FilterOperator::Contains,
        FieldType::Number | FieldType::Select => FilterOperator::Equals,
        FieldType::MultiSelect => FilterOperator::In,
        FieldType::Date => FilterOperator::OnOrAfter,
        FieldType::DateRange | FieldType::NumberRange => FilterOperator::Between,
        FieldType::Boolean => FilterOperator::IsTrue,
    }
}

/// Shape of the value `operator` expects when applied to `field_type`.
///
/// Total over both enums.
#[must_use]
pub const fn expected_shape(field_type: FieldType, operator: FilterOperator) -> ValueShape {
    match operator {
        FilterOperator::IsEmpty
        | FilterOperator::IsNotEmpty
        | FilterOperator::IsTrue
        | FilterOperator::IsFalse => ValueShape::None,
        FilterOperator::Contains
        | FilterOperator::NotContains
        | FilterOperator::StartsWith
        | FilterOperator::EndsWith => ValueShape::Text,
        FilterOperator::Between => match field_type {
            FieldType::Date | FieldType::DateRange => ValueShape::DateRange,
            _ => ValueShape::NumberRange,
        },
        FilterOperator::In | FilterOperator::NotIn => match field_type {
            FieldType::Number | FieldType::NumberRange => ValueShape::NumberList,
            _ => ValueShape::TextList,
        },
        FilterOperator::Before
        | FilterOperator::After
        | FilterOperator::OnOrBefore
        | FilterOperator::OnOrAfter => ValueShape::Date,
        FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte => {
            match field_type {
                FieldType::Date | FieldType::DateRange => ValueShape::Date,
                _ => ValueShape::Number,
            }
        }
        FilterOperator::Equals | FilterOperator::NotEquals => match field_type {
            FieldType::Number | FieldType::NumberRange => ValueShape::Number,
            FieldType::Date | FieldType::DateRange => ValueShape::Date,
            FieldType::Boolean => ValueShape::Flag,
            _ => ValueShape::Text,
        },
    }
}

/// Empty value for a field type / operator pairing.
///
/// `Null` for scalar operators, an empty list for membership operators,
/// an unbounded range for range operators. Total over both enums.
#[must_use]
pub fn default_value(field_type: FieldType, operator: FilterOperator) -> FilterValue {
    match expected_shape(field_type, operator) {
        ValueShape::TextList => FilterValue::TextList(Vec::new()),
        ValueShape::NumberList => FilterValue::NumberList(Vec::new()),
        ValueShape::NumberRange => FilterValue::NumberRange {
            min: None,
            max: None,
        },
        ValueShape::DateRange => FilterValue::DateRange {
            from: None,
            to: None,
        },
        ValueShape::None
        | ValueShape::Text
        | ValueShape::Number
        | ValueShape::Flag
        | ValueShape::Date => FilterValue::Null,
    }
}

/// Operators the builder offers for a field type.
///
/// Closed, semantically valid sets: text gets the equality/contains/empty
/// family, numbers get comparisons and between, dates get before/after
/// and between, selects get equality, multi-selects membership, booleans
/// is_true/is_false.
#[must_use]
pub const fn operators_for(field_type: FieldType) -> &'static [FilterOperator] {
    match field_type {
        FieldType::Text => &[
            FilterOperator::Equals,
            FilterOperator::NotEquals,
            FilterOperator::Contains,
            FilterOperator::NotContains,
            FilterOperator::StartsWith,
            FilterOperator::EndsWith,
            FilterOperator::IsEmpty,
            FilterOperator::IsNotEmpty,
        ],
        FieldType::Number | FieldType::NumberRange => &[
            FilterOperator::Equals,
            FilterOperator::NotEquals,
            FilterOperator::Gt,
            FilterOperator::Gte,
            FilterOperator::Lt,
            FilterOperator::Lte,
            FilterOperator::Between,
            FilterOperator::IsEmpty,
            FilterOperator::IsNotEmpty,
        ],
        FieldType::Select => &[
            FilterOperator::Equals,
            FilterOperator::NotEquals,
            FilterOperator::IsEmpty,
            FilterOperator::IsNotEmpty,
        ],
        FieldType::MultiSelect => &[
            FilterOperator::In,
            FilterOperator::NotIn,
            FilterOperator::IsEmpty,
            FilterOperator::IsNotEmpty,
        ],
        FieldType::Date | FieldType::DateRange => &[
            FilterOperator::Equals,
            FilterOperator::Before,
            FilterOperator::After,
            FilterOperator::OnOrBefore,
            FilterOperator::OnOrAfter,
            FilterOperator::Between,
            FilterOperator::IsEmpty,
            FilterOperator::IsNotEmpty,
        ],
        FieldType::Boolean => &[FilterOperator::IsTrue, FilterOperator::IsFalse],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_operator_is_total() {
        // Every field type has a default, and it is on that type's menu
        for field_type in FieldType::ALL {
            let op = default_operator(field_type);
            assert!(
                operators_for(field_type).contains(&op),
                "default operator {op:?} missing from menu for {field_type:?}"
            );
        }
    }

    #[test]
    fn test_default_value_is_total_and_shape_appropriate() {
        for field_type in FieldType::ALL {
            for &op in operators_for(field_type) {
                let value = default_value(field_type, op);
                match expected_shape(field_type, op) {
                    ValueShape::TextList => assert_eq!(value, FilterValue::TextList(vec![])),
                    ValueShape::NumberList => assert_eq!(value, FilterValue::NumberList(vec![])),
                    ValueShape::NumberRange => assert_eq!(
                        value,
                        FilterValue::NumberRange {
                            min: None,
                            max: None
                        }
                    ),
                    ValueShape::DateRange => assert_eq!(
                        value,
                        FilterValue::DateRange {
                            from: None,
                            to: None
                        }
                    ),
                    _ => assert_eq!(value, FilterValue::Null),
                }
            }
        }
    }

    #[test]
    fn test_default_operator_mapping() {
        assert_eq!(default_operator(FieldType::Text), FilterOperator::Contains);
        assert_eq!(default_operator(FieldType::Number), FilterOperator::Equals);
        assert_eq!(default_operator(FieldType::Select), FilterOperator::Equals);
        assert_eq!(default_operator(FieldType::MultiSelect), FilterOperator::In);
        assert_eq!(default_operator(FieldType::Date), FilterOperator::OnOrAfter);
        assert_eq!(default_operator(FieldType::Boolean), FilterOperator::IsTrue);
    }

    #[test]
    fn test_condition_factory_uses_field_defaults() {
        let field = FilterFieldDefinition::new("amount", "Amount", FieldType::Number);
        let condition = FilterCondition::for_field(&field);

        assert_eq!(condition.field, "amount");
        assert_eq!(condition.operator, FilterOperator::Equals);
        assert_eq!(condition.value, FilterValue::Null);
    }

    #[test]
    fn test_condition_factory_honors_operator_override() {
        let field =
            FilterFieldDefinition::new("amount", "Amount", FieldType::Number)
                .default_operator(FilterOperator::Gte);
        let condition = FilterCondition::for_field(&field);

        assert_eq!(condition.operator, FilterOperator::Gte);
        assert_eq!(condition.value, FilterValue::Null);
    }

    #[test]
    fn test_condition_factory_multiselect_gets_empty_list() {
        let field = FilterFieldDefinition::with_options(
            "status",
            "Status",
            FieldType::MultiSelect,
            vec![
                SelectOption::new("succeeded", "Succeeded"),
                SelectOption::new("pending", "Pending"),
            ],
        );
        let condition = FilterCondition::for_field(&field);

        assert_eq!(condition.operator, FilterOperator::In);
        assert_eq!(condition.value, FilterValue::TextList(vec![]));
    }

    #[test]
    fn test_condition_ids_are_unique() {
        let field = FilterFieldDefinition::new("name", "Name", FieldType::Text);
        let a = FilterCondition::for_field(&field);
        let b = FilterCondition::for_field(&field);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_between_shape_depends_on_field_type() {
        assert_eq!(
            expected_shape(FieldType::Number, FilterOperator::Between),
            ValueShape::NumberRange
        );
        assert_eq!(
            expected_shape(FieldType::Date, FilterOperator::Between),
            ValueShape::DateRange
        );
    }

    #[test]
    fn test_operator_serialization() {
        assert_eq!(serde_json::to_string(&FilterOperator::In).unwrap(), "\"in\"");
        assert_eq!(
            serde_json::to_string(&FilterOperator::NotIn).unwrap(),
            "\"not_in\""
        );
        assert_eq!(
            serde_json::to_string(&FilterOperator::OnOrAfter).unwrap(),
            "\"on_or_after\""
        );
    }

    #[test]
    fn test_filter_value_serialization_roundtrip() {
        let values = vec![
            FilterValue::Null,
            FilterValue::Text("hello".to_string()),
            FilterValue::Number(42.5),
            FilterValue::Flag(true),
            FilterValue::Date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
            FilterValue::TextList(vec!["a".to_string(), "b".to_string()]),
            FilterValue::NumberList(vec![1.0, 2.0]),
            FilterValue::NumberRange {
                min: Some(10.0),
                max: None,
            },
            FilterValue::DateRange {
                from: None,
                to: NaiveDate::from_ymd_opt(2024, 12, 31),
            },
        ];

        for value in values {
            let serialized = serde_json::to_string(&value).unwrap();
            let deserialized: FilterValue = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, value);
        }
    }

    #[test]
    fn test_boolean_menu_is_flag_only() {
        assert_eq!(
            operators_for(FieldType::Boolean),
            &[FilterOperator::IsTrue, FilterOperator::IsFalse]
        );
    }
}
