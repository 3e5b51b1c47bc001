mod common;

use chrono::NaiveDate;
use salesboard::{
    coerce::coerce_types,
    config::{FieldNames, default_role_rules},
    data::Value,
    normalize::ingest,
    records::RecordTable,
    resolve::resolve_schema,
};

use common::{fixture_tables, prepared_fixtures};

fn text(table: &RecordTable, row: usize, column: &str) -> Option<String> {
    let idx = table.column_index(column)?;
    table.cell(row, idx).map(Value::as_display)
}

#[test]
fn dates_become_timestamps_and_invalid_dates_become_null() {
    let data = prepared_fixtures();
    let idx = data.table.column_index("FECHA_VENTA").unwrap();
    let expected = NaiveDate::from_ymd_opt(2024, 1, 5)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(data.table.cell(0, idx), Some(&Value::DateTime(expected)));
    // "2023-13-45" and an empty cell
    assert_eq!(data.table.cell(5, idx), None);
    assert_eq!(data.table.cell(6, idx), None);
    assert_eq!(data.table.len(), 7);
}

#[test]
fn categorical_fields_are_trimmed_and_uppercased() {
    let data = prepared_fixtures();
    assert_eq!(text(&data.table, 0, "VENDEDOR").as_deref(), Some("ANA PEREZ"));
    assert_eq!(text(&data.table, 0, "DISTRITO").as_deref(), Some("LIMA"));
    assert_eq!(
        text(&data.table, 0, "GRUPO_DE_COMISION").as_deref(),
        Some("VENDEDOR EXTERNO")
    );
    assert_eq!(
        text(&data.table, 0, "SERVICIO_SOLICITADO").as_deref(),
        Some("FIBRA 100")
    );
}

#[test]
fn fields_outside_the_categorical_list_are_untouched() {
    let data = prepared_fixtures();
    assert_eq!(text(&data.table, 0, "CANAL_PEDIDO").as_deref(), Some("web"));
    assert_eq!(
        text(&data.table, 3, "OBSERVACION").as_deref(),
        Some("cliente nuevo")
    );
}

#[test]
fn nulls_stay_null() {
    let data = prepared_fixtures();
    let canal = data.table.column_index("CANAL_PEDIDO").unwrap();
    assert_eq!(data.table.cell(3, canal), None);

    let table = RecordTable::from_text(&["VENDEDOR"], &[vec![""], vec!["nan"]]);
    let coerced = coerce_types(&table, &Default::default(), &FieldNames::default());
    assert_eq!(coerced.cell(0, 0), None);
    assert_eq!(coerced.cell(1, 0), Some(&Value::from("NAN")));
}

#[test]
fn absent_fields_and_roles_are_skipped() {
    let table = RecordTable::from_text(&["OTRA"], &[vec![" x "]]);
    let schema = resolve_schema(table.columns(), &default_role_rules());
    let coerced = coerce_types(&table, &schema, &FieldNames::default());
    assert_eq!(coerced, table);
}

#[test]
fn numbers_are_stringified_in_canonical_form() {
    let table = RecordTable::new(
        vec!["DISTRITO".to_string()],
        vec![vec![Some(Value::Number(15.0))], vec![Some(Value::Number(2.5))]],
    );
    let coerced = coerce_types(&table, &Default::default(), &FieldNames::default());
    assert_eq!(coerced.cell(0, 0), Some(&Value::from("15")));
    assert_eq!(coerced.cell(1, 0), Some(&Value::from("2.5")));
}

#[test]
fn coercion_does_not_modify_its_input() {
    let raw = ingest(&fixture_tables()).unwrap();
    let schema = resolve_schema(raw.columns(), &default_role_rules());
    let before = raw.clone();
    let _ = coerce_types(&raw, &schema, &FieldNames::default());
    assert_eq!(raw, before);
}
