//! Column listing for a set of inputs.
//!
//! Renders the normalized column names of the merged input together with the
//! role each one was resolved to and how many cells are filled.

use anyhow::Result;
use log::info;

use crate::{
    cli::ColumnsArgs,
    report::{PreparedData, load_config, load_prepared},
    table::{self, Align},
};

pub fn column_rows(data: &PreparedData) -> Vec<Vec<String>> {
    data.table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let role = data
                .schema
                .role_of(name)
                .map(|r| r.label().to_string())
                .unwrap_or_default();
            let filled = data.table.column_values(idx).flatten().count();
            vec![(idx + 1).to_string(), name.clone(), role, filled.to_string()]
        })
        .collect()
}

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let config = load_config(&args.input)?;
    let data = load_prepared(&args.input, &config)?;
    let rows = column_rows(&data);

    let headers = vec![
        "#".to_string(),
        "name".to_string(),
        "role".to_string(),
        "filled".to_string(),
    ];
    print!(
        "{}",
        table::render_table(
            &headers,
            &rows,
            &[Align::Right, Align::Left, Align::Left, Align::Right]
        )
    );
    info!(
        "Listed {} column(s) across {} row(s)",
        rows.len(),
        data.table.len()
    );
    Ok(())
}
