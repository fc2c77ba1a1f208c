use serde_json::json;
use sqlcompose::compiler::{compile_condition, CompileError, Operator};
use sqlcompose::model::{Condition, Value};
use sqlcompose::sql::Dialect;

fn condition(value: serde_json::Value) -> Condition {
    serde_json::from_value(value).unwrap()
}

fn render(value: serde_json::Value) -> String {
    compile_condition(&condition(value))
        .unwrap()
        .serialize(Dialect::Postgres)
}

#[test]
fn test_null_checks_ignore_value() {
    assert_eq!(
        render(json!({ "column": "platform", "operator": "is_null" })),
        "platform is null"
    );
    assert_eq!(
        render(json!({ "column": "platform", "operator": "is_not_null", "value": "x" })),
        "platform is not null"
    );
}

#[test]
fn test_comparisons_with_numbers() {
    assert_eq!(
        render(json!({ "column": "spend", "operator": "not_equal", "value": 80302000 })),
        "spend <> 80302000"
    );
    assert_eq!(
        render(json!({ "column": "revenue", "operator": "less_than", "value": 7.8 })),
        "revenue < 7.8"
    );
    assert_eq!(
        render(json!({ "column": "spend", "operator": "greater_than_or_equal", "value": -1 })),
        "spend >= -1"
    );
    assert_eq!(
        render(json!({ "column": "installs", "operator": "less_than_or_equal", "value": 10 })),
        "installs <= 10"
    );
    assert_eq!(
        render(json!({ "column": "spend", "operator": "greater_than", "value": 7000 })),
        "spend > 7000"
    );
}

#[test]
fn test_comparisons_with_strings() {
    assert_eq!(
        render(json!({ "column": "platform", "operator": "equal", "value": "ios" })),
        "platform = 'ios'"
    );
    assert_eq!(
        render(json!({ "column": "platform", "operator": "not_equal", "value": "" })),
        "platform <> ''"
    );
}

#[test]
fn test_pattern_operators() {
    assert_eq!(
        render(json!({ "column": "campaign_name", "operator": "contains", "value": "ios" })),
        "campaign_name ilike '%ios%'"
    );
    assert_eq!(
        render(json!({ "column": "tag", "operator": "starts_with", "value": "ff" })),
        "tag ilike 'ff%'"
    );
    assert_eq!(
        render(json!({ "column": "tag", "operator": "ends_with", "value": "ff" })),
        "tag ilike '%ff'"
    );
    assert_eq!(
        render(json!({ "column": "code", "operator": "contains", "value": 42 })),
        "code ilike '%42%'"
    );
}

#[test]
fn test_case_sensitive_pattern_uses_like() {
    assert_eq!(
        render(json!({
            "column": "campaign_name",
            "operator": "contains",
            "value": "_ADR_",
            "options": { "caseSensitive": true }
        })),
        "campaign_name like '%_ADR_%'"
    );
    assert_eq!(
        render(json!({
            "column": "campaign_name",
            "operator": "contains",
            "value": "_ADR_",
            "options": { "caseSensitive": false }
        })),
        "campaign_name ilike '%_ADR_%'"
    );
}

#[test]
fn test_unknown_operator() {
    let result = compile_condition(&Condition::new("spend", "between", Value::from(1)));
    assert_eq!(result, Err(CompileError::UnknownOperator("between".into())));
}

#[test]
fn test_missing_value_for_binary_operator() {
    let result = compile_condition(&Condition::new("spend", "equal", Value::Null));
    assert_eq!(result, Err(CompileError::MissingValue("equal".into())));
}

#[test]
fn test_quotes_are_escaped_outside_legacy() {
    let cond = Condition::new("name", "equal", Value::from("O'Brien"));
    let tokens = compile_condition(&cond).unwrap();
    assert_eq!(tokens.serialize(Dialect::Postgres), "name = 'O''Brien'");
    assert_eq!(tokens.serialize(Dialect::Legacy), "name = 'O'Brien'");
}

#[test]
fn test_bound_pattern() {
    let cond = Condition::new("campaign_name", "contains", Value::from("ios")).case_sensitive();
    let bound = compile_condition(&cond).unwrap().bind(Dialect::Postgres);
    assert_eq!(bound.sql, "campaign_name like $1");
    assert_eq!(bound.params, vec!["%ios%".to_string()]);
}

#[test]
fn test_registry_lists_every_operator() {
    let names: Vec<&str> = Operator::ALL.iter().map(Operator::name).collect();
    assert_eq!(
        names,
        vec![
            "is_null",
            "is_not_null",
            "equal",
            "not_equal",
            "less_than",
            "less_than_or_equal",
            "greater_than",
            "greater_than_or_equal",
            "contains",
            "starts_with",
            "ends_with",
        ]
    );
}
