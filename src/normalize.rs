use log::{debug, info, warn};

use crate::{
    error::{PipelineError, Result},
    records::{RecordTable, Row},
};

/// Trim, uppercase, and replace spaces and slashes with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_uppercase().replace([' ', '/'], "_")
}

/// Concatenates the raw tables into one table over the union of their
/// normalized columns. Columns keep first-seen order; rows keep input order.
pub fn ingest(raw_tables: &[RecordTable]) -> Result<RecordTable> {
    if raw_tables.is_empty() {
        return Err(PipelineError::NoInputTables);
    }

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Row> = Vec::new();
    // Every row pushed so far is padded to the current column count, so new
    // columns only need to be appended to existing rows once.
    for (table_idx, table) in raw_tables.iter().enumerate() {
        if table.columns().is_empty() {
            warn!("Skipping input table {} with no columns", table_idx + 1);
            continue;
        }

        let targets = table
            .columns()
            .iter()
            .map(|raw| {
                let name = normalize_column_name(raw);
                match columns.iter().position(|c| *c == name) {
                    Some(idx) => idx,
                    None => {
                        debug!("Column '{raw}' normalized to '{name}'");
                        columns.push(name);
                        columns.len() - 1
                    }
                }
            })
            .collect::<Vec<_>>();

        for row in &mut rows {
            row.resize(columns.len(), None);
        }
        if table.is_empty() {
            warn!("Input table {} has no data rows; keeping its columns only", table_idx + 1);
            continue;
        }

        for source in table.rows() {
            let mut row: Row = vec![None; columns.len()];
            for (cell, &target) in source.iter().zip(&targets) {
                if row[target].is_none() {
                    row[target] = cell.clone();
                }
            }
            rows.push(row);
        }
    }

    if rows.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    info!(
        "Ingested {} row(s) across {} column(s) from {} table(s)",
        rows.len(),
        columns.len(),
        raw_tables.len()
    );
    Ok(RecordTable::new(columns, rows))
}
