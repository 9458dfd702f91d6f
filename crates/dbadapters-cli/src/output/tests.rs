use super::*;
use dbadapters::{ColumnMeta, Row, Value};
use pretty_assertions::assert_eq;

fn sample() -> QueryResult {
    let names: Arc<[String]> = Arc::from(vec!["id".to_string(), "name".to_string()]);
    QueryResult {
        columns: vec![
            ColumnMeta {
                name: "id".into(),
                data_type: "LONGLONG".into(),
                nullable: false,
                ordinal: 0,
            },
            ColumnMeta {
                name: "name".into(),
                data_type: "VAR_STRING".into(),
                nullable: true,
                ordinal: 1,
            },
        ],
        rows: vec![
            Row::new(names.clone(), vec![Value::Int64(1), Value::from("alice")]),
            Row::new(names, vec![Value::Int64(2), Value::Null]),
        ],
        ..Default::default()
    }
}

#[test]
fn test_json_rows_keep_order_and_types() {
    let rendered = render(&sample(), Format::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(
        parsed,
        serde_json::json!([
            {"id": 1, "name": "alice"},
            {"id": 2, "name": null},
        ])
    );
}

#[test]
fn test_json_without_result_set_reports_counters() {
    let result = QueryResult {
        affected_rows: 3,
        last_insert_id: Some(17),
        ..Default::default()
    };
    let parsed: serde_json::Value =
        serde_json::from_str(&render(&result, Format::Json).unwrap()).unwrap();

    assert_eq!(
        parsed,
        serde_json::json!({"affected_rows": 3, "last_insert_id": 17})
    );
}

#[test]
fn test_table_output() {
    let rendered = render(&sample(), Format::Table).unwrap();
    assert!(rendered.contains("alice"));
    assert!(rendered.contains("2 row(s)"));

    let affected = QueryResult {
        affected_rows: 4,
        ..Default::default()
    };
    assert_eq!(render(&affected, Format::Table).unwrap(), "4 row(s) affected");
}

fn single_column(name: &str, value: Value) -> QueryResult {
    let names: Arc<[String]> = Arc::from(vec![name.to_string()]);
    QueryResult {
        columns: vec![ColumnMeta {
            name: name.into(),
            data_type: "LONGLONG".into(),
            nullable: false,
            ordinal: 0,
        }],
        rows: vec![Row::new(names, vec![value])],
        ..Default::default()
    }
}

#[test]
fn test_json_repeated_column_names_keep_every_value() {
    let names: Arc<[String]> = Arc::from(vec!["a".to_string(), "a".to_string(), "a_2".to_string()]);
    let columns = names
        .iter()
        .enumerate()
        .map(|(ordinal, name)| ColumnMeta {
            name: name.clone(),
            data_type: "LONGLONG".into(),
            nullable: false,
            ordinal,
        })
        .collect();
    let result = QueryResult {
        columns,
        rows: vec![Row::new(
            names,
            vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)],
        )],
        ..Default::default()
    };
    let parsed: serde_json::Value =
        serde_json::from_str(&render(&result, Format::Json).unwrap()).unwrap();

    assert_eq!(parsed, serde_json::json!([{"a": 1, "a_3": 2, "a_2": 3}]));
}

#[test]
fn test_json_batch_renders_one_value_per_result_set() {
    let mut result = single_column("a", Value::Int64(1));
    result.more_results = vec![
        single_column("b", Value::Int64(2)),
        QueryResult {
            affected_rows: 4,
            ..Default::default()
        },
    ];
    let parsed: serde_json::Value =
        serde_json::from_str(&render(&result, Format::Json).unwrap()).unwrap();

    assert_eq!(
        parsed,
        serde_json::json!([
            [{"a": 1}],
            [{"b": 2}],
            {"affected_rows": 4, "last_insert_id": null},
        ])
    );
}

#[test]
fn test_table_batch_renders_every_result_set() {
    let mut result = single_column("first_col", Value::Int64(1));
    result.more_results = vec![single_column("second_col", Value::Int64(2))];
    let rendered = render(&result, Format::Table).unwrap();

    assert!(rendered.contains("first_col"));
    assert!(rendered.contains("second_col"));
    assert_eq!(rendered.matches("1 row(s)").count(), 2);
}
