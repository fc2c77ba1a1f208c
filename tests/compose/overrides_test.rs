use serde_json::json;
use sqlcompose::composer::{ComposeError, Composer};
use sqlcompose::model::{Condition, FilterExpr, Interval, ParameterOverrides, RowFilter, SqlQuery, Value};
use sqlcompose::overrides::resolve;
use sqlcompose::validation::MAX_ROW_FILTERS;

fn filter(identifier: &str, column: &str, value: i64) -> RowFilter {
    RowFilter::new(
        identifier,
        FilterExpr::Leaf(Condition::new(column, "greater_than", Value::from(value))),
    )
}

fn base_query() -> SqlQuery {
    serde_json::from_value(json!({
        "composition": {
            "table": "cube",
            "columns": { "spend": { "sql": "spend" } },
            "parameters": {
                "interval": { "unit": "day", "value": 30 },
                "rowFilters": [
                    { "metadata": { "templateType": "row_filter", "identifier": "a" },
                      "column": "a", "operator": "greater_than", "value": 1 },
                    { "metadata": { "templateType": "row_filter", "identifier": "b" },
                      "column": "b", "operator": "greater_than", "value": 2 }
                ]
            }
        }
    }))
    .unwrap()
}

#[test]
fn test_resolve_primary_first_then_unshadowed_defaults() {
    let overrides = vec![filter("b", "b", 20), filter("c", "c", 30)];
    let defaults = vec![filter("a", "a", 1), filter("b", "b", 2)];

    let merged = resolve(&overrides, &defaults);
    let ids: Vec<&str> = merged.iter().map(RowFilter::identifier).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    assert_eq!(merged[0], filter("b", "b", 20));
}

#[test]
fn test_resolve_with_empty_sides() {
    let defaults = vec![filter("a", "a", 1)];
    let none: Vec<RowFilter> = Vec::new();
    assert_eq!(resolve(&none, &defaults), defaults);
    assert_eq!(resolve(&defaults, &none), defaults);
    assert!(resolve(&none, &none).is_empty());
}

#[test]
fn test_empty_overrides_use_defaults() {
    let overrides: ParameterOverrides = serde_json::from_value(json!({})).unwrap();
    let sql = base_query().compose("acme", &overrides).unwrap();
    assert_eq!(
        sql,
        "SELECT spend FROM acme.cube \
         WHERE daily_cohort >= current_timestamp - interval '30 day' AND a > 1 AND b > 2"
    );
}

#[test]
fn test_override_filter_shadows_default() {
    let overrides = ParameterOverrides::new().with_row_filters(vec![filter("b", "b", 99)]);
    let sql = base_query().compose("acme", &overrides).unwrap();
    assert!(sql.ends_with("AND b > 99 AND a > 1"));
}

#[test]
fn test_interval_override_replaces_default() {
    let overrides = ParameterOverrides::new().with_interval(Interval::days(1));
    let sql = base_query().compose("acme", &overrides).unwrap();
    assert!(sql.contains("WHERE daily_cohort >= current_timestamp - interval '1 day' AND a > 1"));
}

#[test]
fn test_explicit_null_interval_disables_date_filter() {
    let overrides: ParameterOverrides =
        serde_json::from_value(json!({ "interval": null })).unwrap();
    assert_eq!(overrides, ParameterOverrides::new().without_interval());

    let sql = base_query().compose("acme", &overrides).unwrap();
    assert_eq!(sql, "SELECT spend FROM acme.cube WHERE a > 1 AND b > 2");
}

#[test]
fn test_compose_checked_accepts_valid_overrides() {
    let overrides = ParameterOverrides::new().with_row_filters(vec![filter("c", "c", 3)]);
    let sql = Composer::default()
        .compose_checked(&base_query(), Some("acme"), &overrides)
        .unwrap();
    assert!(sql.ends_with("AND c > 3 AND a > 1 AND b > 2"));
}

#[test]
fn test_compose_checked_rejects_too_many_filters() {
    let filters = (0..=MAX_ROW_FILTERS)
        .map(|i| filter(&format!("f{}", i), "x", i as i64))
        .collect();
    let overrides = ParameterOverrides::new().with_row_filters(filters);

    let err = Composer::default()
        .compose_checked(&base_query(), Some("acme"), &overrides)
        .unwrap_err();
    match err {
        ComposeError::Validation(errors) => assert_eq!(errors.len(), 1),
        other => panic!("expected validation error, got {:?}", other),
    }
}
