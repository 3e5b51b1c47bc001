use anyhow::Result;
use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    cli::OptionsArgs,
    config::FieldNames,
    data::Value,
    error,
    filter::{FilterSelection, apply_filters},
    records::RecordTable,
    report::{build_selection, load_config, load_prepared},
    resolve::ResolvedSchema,
};

/// The choices a client offers in its filter widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub date_bounds: Option<(NaiveDateTime, NaiveDateTime)>,
    pub commission_groups: Vec<String>,
    pub sellers: Vec<String>,
}

fn distinct_sorted(table: &RecordTable, column: &str) -> Vec<String> {
    let Some(idx) = table.column_index(column) else {
        return Vec::new();
    };
    table
        .column_values(idx)
        .flatten()
        .map(Value::as_display)
        .sorted()
        .dedup()
        .collect()
}

/// Earliest and latest timestamp in the date column, ignoring nulls.
pub fn date_bounds(
    table: &RecordTable,
    schema: &ResolvedSchema,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let idx = table.column_index(schema.date.as_deref()?)?;
    let mut dates = table
        .column_values(idx)
        .flatten()
        .filter_map(Value::as_datetime);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), dt| (lo.min(dt), hi.max(dt))))
}

/// Date bounds and commission groups come from the whole table. Seller
/// choices cascade: they come from the rows left after the date range and
/// commission groups of `selection`. Its seller set is ignored.
pub fn filter_options(
    table: &RecordTable,
    schema: &ResolvedSchema,
    fields: &FieldNames,
    selection: &FilterSelection,
) -> error::Result<FilterOptions> {
    let narrowing = FilterSelection {
        sellers: Default::default(),
        ..selection.clone()
    };
    let narrowed = apply_filters(table, schema, fields, &narrowing)?;
    Ok(FilterOptions {
        date_bounds: date_bounds(table, schema),
        commission_groups: distinct_sorted(table, &fields.commission_group),
        sellers: distinct_sorted(&narrowed, &fields.seller),
    })
}

pub fn execute(args: &OptionsArgs) -> Result<()> {
    let config = load_config(&args.input)?;
    let selection = build_selection(args.from, args.to, &args.groups, &[])?;
    let data = load_prepared(&args.input, &config)?;
    let options = filter_options(&data.table, &data.schema, &config.fields, &selection)?;

    match options.date_bounds {
        Some((lo, hi)) => println!("dates: {} .. {}", lo.date(), hi.date()),
        None => println!("dates: (no date column)"),
    }
    println!("commission groups:");
    for group in &options.commission_groups {
        println!("  {group}");
    }
    println!("sellers:");
    for seller in &options.sellers {
        println!("  {seller}");
    }
    Ok(())
}
