use serde_json::json;
use sqlcompose::model::{
    CaseClause, ColumnExpression, Composition, Condition, FilterExpr, ParameterOverrides,
    Predicate, RowFilter, SqlQuery, SqlQueryDocument, ThenValue, Value,
};
use sqlcompose::validation::{
    summarize, validate_composition, validate_document, validate_overrides, ValidationError,
    DEFAULT_MAX_DEPTH, MAX_COLUMNS,
};

fn document(value: serde_json::Value) -> SqlQueryDocument {
    serde_json::from_value(value).unwrap()
}

fn errors_for(value: serde_json::Value) -> Vec<ValidationError> {
    validate_document(&document(value), DEFAULT_MAX_DEPTH).unwrap_err()
}

#[test]
fn test_valid_documents() {
    let composed = document(json!({
        "composition": {
            "table": "cube",
            "columns": {
                "spend": { "sql": "spend" },
                "platform": { "cases": [
                    { "or": [
                        { "when": { "column": "platform", "operator": "is_null" } },
                        { "when": { "column": "platform", "operator": "equal", "value": "" } }
                      ],
                      "then": { "value": "unknown" } },
                    { "default": { "column": "platform" } }
                ]}
            },
            "parameters": {
                "rowFilters": [
                    { "metadata": { "templateType": "row_filter", "identifier": "ios" },
                      "column": "platform", "operator": "equal", "value": "ios" }
                ]
            }
        },
        "description": "Spend by platform"
    }));
    assert_eq!(validate_document(&composed, DEFAULT_MAX_DEPTH), Ok(()));

    let raw = document(json!({ "query": "select 1" }));
    assert_eq!(validate_document(&raw, DEFAULT_MAX_DEPTH), Ok(()));
}

#[test]
fn test_exactly_one_source() {
    let both = errors_for(json!({
        "query": "select 1",
        "composition": { "table": "cube", "columns": { "a": { "sql": "a" } } }
    }));
    assert_eq!(both, vec![ValidationError::AmbiguousSource]);

    let neither = errors_for(json!({ "description": "nothing" }));
    assert_eq!(neither, vec![ValidationError::AmbiguousSource]);
}

#[test]
fn test_empty_strings() {
    let errors = errors_for(json!({ "query": "  ", "description": "" }));
    assert_eq!(
        errors,
        vec![
            ValidationError::Empty {
                location: "query".into()
            },
            ValidationError::Empty {
                location: "description".into()
            },
        ]
    );
}

#[test]
fn test_table_and_columns_required() {
    let errors = errors_for(json!({ "composition": { "table": "", "columns": {} } }));
    assert_eq!(
        errors,
        vec![
            ValidationError::Empty {
                location: "composition.table".into()
            },
            ValidationError::TooFew {
                location: "composition.columns".into(),
                min: 1,
                found: 0
            },
        ]
    );
}

#[test]
fn test_too_many_columns() {
    let mut composition = Composition::new("cube");
    for i in 0..=MAX_COLUMNS {
        composition = composition.with_column(format!("c{}", i), ColumnExpression::raw("x"));
    }
    let errors = validate_composition(&composition, DEFAULT_MAX_DEPTH).unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::TooMany {
            location: "composition.columns".into(),
            max: MAX_COLUMNS,
            found: MAX_COLUMNS + 1
        }]
    );
}

#[test]
fn test_all_condition_problems_are_reported() {
    let errors = errors_for(json!({
        "composition": {
            "table": "cube",
            "columns": {
                "platform": { "cases": [
                    { "when": { "column": "platform", "operator": "matches", "value": "x" },
                      "then": { "value": "a" } },
                    { "and": [
                        { "when": { "column": "", "operator": "equal", "value": "" } },
                        { "when": { "column": "campaign", "operator": "contains" } }
                      ],
                      "then": { "column": "" } }
                ]}
            }
        }
    }));

    assert_eq!(
        errors,
        vec![
            ValidationError::UnknownOperator {
                location: "composition.columns.platform.cases[0].operator".into(),
                operator: "matches".into()
            },
            ValidationError::Empty {
                location: "composition.columns.platform.cases[1].and[0].column".into()
            },
            ValidationError::MissingValue {
                location: "composition.columns.platform.cases[1].and[1].value".into(),
                operator: "contains".into()
            },
            ValidationError::Empty {
                location: "composition.columns.platform.cases[1].then.column".into()
            },
        ]
    );
}

#[test]
fn test_groups_need_two_children() {
    let errors = errors_for(json!({
        "composition": {
            "table": "cube",
            "columns": {
                "platform": { "cases": [
                    { "and": [ { "when": { "column": "a", "operator": "is_null" } } ],
                      "then": { "value": 1 } },
                    { "default": { "value": 0 } }
                ]}
            },
            "parameters": {
                "rowFilters": [
                    { "metadata": { "templateType": "row_filter", "identifier": "f" },
                      "or": [] }
                ]
            }
        }
    }));

    assert_eq!(
        errors,
        vec![
            ValidationError::TooFew {
                location: "composition.columns.platform.cases[0].and".into(),
                min: 2,
                found: 1
            },
            ValidationError::TooFew {
                location: "composition.parameters.rowFilters[0].or".into(),
                min: 2,
                found: 0
            },
        ]
    );
}

#[test]
fn test_cases_must_not_be_empty() {
    let errors = errors_for(json!({
        "composition": { "table": "cube", "columns": { "platform": { "cases": [] } } }
    }));
    assert_eq!(
        errors,
        vec![ValidationError::TooFew {
            location: "composition.columns.platform.cases".into(),
            min: 2,
            found: 0
        }]
    );
}

#[test]
fn test_cases_need_two_clauses() {
    let errors = errors_for(json!({
        "composition": {
            "table": "cube",
            "columns": { "platform": { "cases": [ { "default": { "value": "x" } } ] } }
        }
    }));
    assert_eq!(
        errors,
        vec![ValidationError::TooFew {
            location: "composition.columns.platform.cases".into(),
            min: 2,
            found: 1
        }]
    );

    let two_defaults = document(json!({
        "composition": {
            "table": "cube",
            "columns": { "platform": { "cases": [
                { "default": { "value": "x" } },
                { "default": { "value": "y" } }
            ] } }
        }
    }));
    assert_eq!(validate_document(&two_defaults, DEFAULT_MAX_DEPTH), Ok(()));

    let single = r#"{ "composition": { "table": "cube",
        "columns": { "platform": { "cases": [ { "default": { "value": "x" } } ] } } } }"#;
    assert!(SqlQuery::from_json(single).is_err());
}

#[test]
fn test_null_then_value() {
    let composition = Composition::new("cube").with_column(
        "x",
        ColumnExpression::cased(vec![
            CaseClause::Default(ThenValue::value("x")),
            CaseClause::Default(ThenValue::Value(Value::Null)),
        ]),
    );
    let errors = validate_composition(&composition, DEFAULT_MAX_DEPTH).unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::NullValue {
            location: "composition.columns.x.cases[1].default.value".into()
        }]
    );
}

#[test]
fn test_row_filter_metadata() {
    let errors = errors_for(json!({
        "composition": {
            "table": "cube",
            "columns": { "a": { "sql": "a" } },
            "parameters": {
                "rowFilters": [
                    { "metadata": { "templateType": "query", "identifier": "" },
                      "column": "a", "operator": "is_null" }
                ]
            }
        }
    }));

    assert_eq!(
        errors,
        vec![
            ValidationError::WrongTemplateType {
                location: "composition.parameters.rowFilters[0].metadata".into(),
                expected: "row_filter".into(),
                found: "query".into()
            },
            ValidationError::Empty {
                location: "composition.parameters.rowFilters[0].metadata.identifier".into()
            },
        ]
    );
}

fn nested_filter(levels: usize) -> FilterExpr {
    let leaf = FilterExpr::Leaf(Condition::new("a", "is_null", Value::Null));
    let mut expr = leaf.clone();
    for _ in 0..levels {
        expr = FilterExpr::Or {
            or: vec![expr, leaf.clone()],
        };
    }
    expr
}

#[test]
fn test_nesting_depth_limit() {
    let overrides =
        ParameterOverrides::new().with_row_filters(vec![RowFilter::new("deep", nested_filter(3))]);

    assert_eq!(validate_overrides(&overrides, 4), Ok(()));

    let errors = validate_overrides(&overrides, 3).unwrap_err();
    assert_eq!(
        errors,
        vec![
            ValidationError::TooDeep {
                location: "parameters.rowFilters[0].or[0].or[0].or[0]".into(),
                limit: 3
            },
            ValidationError::TooDeep {
                location: "parameters.rowFilters[0].or[0].or[0].or[1]".into(),
                limit: 3
            },
        ]
    );
}

#[test]
fn test_case_predicate_depth_limit() {
    let leaf = Predicate::Leaf(Condition::new("a", "is_null", Value::Null));
    let condition = Predicate::And(vec![
        Predicate::And(vec![leaf.clone(), leaf.clone()]),
        leaf.clone(),
    ]);
    let composition = Composition::new("cube").with_column(
        "x",
        ColumnExpression::cased(vec![
            CaseClause::When {
                condition,
                then: ThenValue::value(1),
            },
            CaseClause::Default(ThenValue::value(0)),
        ]),
    );

    assert_eq!(validate_composition(&composition, 3), Ok(()));
    let errors = validate_composition(&composition, 2).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ValidationError::TooDeep { limit: 2, .. })));
}

#[test]
fn test_overrides_without_filters_are_valid() {
    assert_eq!(
        validate_overrides(&ParameterOverrides::default(), DEFAULT_MAX_DEPTH),
        Ok(())
    );
}

#[test]
fn test_query_parsing_reports_errors() {
    let errors = SqlQuery::from_json("{ not json").unwrap_err();
    assert!(matches!(errors.as_slice(), [ValidationError::Malformed(_)]));

    let errors = SqlQuery::from_json(r#"{ "query": "" }"#).unwrap_err();
    assert_eq!(
        errors,
        vec![ValidationError::Empty {
            location: "query".into()
        }]
    );

    let result: Result<SqlQuery, _> =
        serde_json::from_value(json!({ "composition": { "table": "cube", "columns": {} } }));
    let message = result.unwrap_err().to_string();
    assert!(message.contains("composition.columns needs at least 1 entries, found 0"));
}

#[test]
fn test_error_messages() {
    let errors = vec![
        ValidationError::UnknownOperator {
            location: "composition.columns.p.cases[0].operator".into(),
            operator: "matches".into(),
        },
        ValidationError::TooDeep {
            location: "parameters.rowFilters[0]".into(),
            limit: 64,
        },
    ];
    assert_eq!(
        summarize(&errors),
        "composition.columns.p.cases[0].operator uses unknown operator 'matches'; \
         parameters.rowFilters[0] nests deeper than 64 levels"
    );
}

#[test]
fn test_query_parsing_honours_configured_depth() {
    let json = r#"{ "composition": {
        "table": "cube",
        "columns": { "spend": { "sql": "spend" } },
        "parameters": { "rowFilters": [
            { "metadata": { "templateType": "row_filter", "identifier": "f" },
              "or": [
                { "and": [
                    { "column": "a", "operator": "is_null" },
                    { "column": "b", "operator": "is_null" }
                ] },
                { "column": "c", "operator": "is_null" }
              ] }
        ] }
    } }"#;

    assert!(SqlQuery::from_json(json).is_ok());
    assert!(SqlQuery::from_json_with_depth(json, 3).is_ok());

    let errors = SqlQuery::from_json_with_depth(json, 2).unwrap_err();
    assert_eq!(
        errors,
        vec![
            ValidationError::TooDeep {
                location: "composition.parameters.rowFilters[0].or[0].and[0]".into(),
                limit: 2
            },
            ValidationError::TooDeep {
                location: "composition.parameters.rowFilters[0].or[0].and[1]".into(),
                limit: 2
            },
        ]
    );
}
