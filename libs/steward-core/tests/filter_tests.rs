//! Filter engine workflow: build a state, save it, reopen the store,
//! apply the default, and evaluate rows with it.

use std::collections::HashMap;

use steward_core::test_utils::MemoryFilterStorage;
use steward_core::{
    evaluate, AdvancedFilterState, ConditionPatch, FieldType, FilterBuilder, FilterFieldDefinition,
    FilterOperator, FilterValue, RowValue, SavedFilterStore, SelectOption,
};

fn registry() -> Vec<FilterFieldDefinition> {
    vec![
        FilterFieldDefinition::new("name", "Name", FieldType::Text),
        FilterFieldDefinition::new("amount", "Amount", FieldType::Number),
        FilterFieldDefinition::with_options(
            "status",
            "Status",
            FieldType::Select,
            vec![
                SelectOption::new("active", "Active"),
                SelectOption::new("lapsed", "Lapsed"),
            ],
        ),
    ]
}

fn row(name: &str, amount: f64, status: &str) -> HashMap<String, RowValue> {
    let mut row = HashMap::new();
    row.insert("name".to_string(), RowValue::Text(name.to_string()));
    row.insert("amount".to_string(), RowValue::Number(amount));
    row.insert("status".to_string(), RowValue::Text(status.to_string()));
    row
}

/// Build the state a user would: add two conditions and fill them in
fn active_majors_state(builder: &FilterBuilder) -> AdvancedFilterState {
    let state = builder.add_condition(&AdvancedFilterState::default());
    let state = builder.change_field(&state, 0, "amount");
    let state = builder.update_condition(
        &state,
        0,
        ConditionPatch {
            operator: Some(FilterOperator::Gte),
            value: Some(FilterValue::Number(100.0)),
            ..ConditionPatch::default()
        },
    );

    let state = builder.add_condition(&state);
    let state = builder.change_field(&state, 1, "status");
    builder.update_condition(
        &state,
        1,
        ConditionPatch {
            value: Some(FilterValue::Text("active".to_string())),
            ..ConditionPatch::default()
        },
    )
}

#[test]
fn saved_filter_survives_reopen_and_still_evaluates() {
    let fields = registry();
    let builder = FilterBuilder::new(fields.clone());
    let state = active_majors_state(&builder);

    let storage = MemoryFilterStorage::new();
    {
        let store = SavedFilterStore::new(storage.clone(), "donors");
        let saved = store
            .save_filter("Active majors", None, state)
            .expect("in-memory persistence");
        assert!(store.set_default(Some(saved.id)));
    }

    let reopened = SavedFilterStore::new(storage, "donors");
    let default = reopened.default_filter().expect("default persisted");
    assert_eq!(default.name, "Active majors");

    let mut applied = AdvancedFilterState::default();
    assert!(reopened.apply_filter(default.id, |s| applied = s.clone()));

    assert!(evaluate(&applied, &fields, &row("Henderson", 250.0, "active")));
    assert!(!evaluate(&applied, &fields, &row("Henderson", 50.0, "active")));
    assert!(!evaluate(&applied, &fields, &row("Henderson", 250.0, "lapsed")));
}

#[test]
fn or_logic_widens_the_match() {
    let fields = registry();
    let builder = FilterBuilder::new(fields.clone());
    let state = active_majors_state(&builder);
    let state = builder.toggle_logic(&state);

    // Either branch alone now passes
    assert!(evaluate(&state, &fields, &row("H", 50.0, "active")));
    assert!(evaluate(&state, &fields, &row("H", 250.0, "lapsed")));
    assert!(!evaluate(&state, &fields, &row("H", 50.0, "lapsed")));
}

#[test]
fn removing_a_condition_relaxes_the_filter() {
    let fields = registry();
    let builder = FilterBuilder::new(fields.clone());
    let state = active_majors_state(&builder);

    let lapsed_major = row("H", 250.0, "lapsed");
    assert!(!evaluate(&state, &fields, &lapsed_major));

    let relaxed = builder.remove_condition(&state, 1);
    assert!(evaluate(&relaxed, &fields, &lapsed_major));
}
