use log::debug;

use crate::{
    config::FieldNames,
    data::{Value, canonical_value, coerce_datetime},
    records::RecordTable,
    resolve::ResolvedSchema,
};

/// Casts the date column to timestamps and the categorical fields to their
/// canonical text. Unparseable dates become null; nulls stay null.
pub fn coerce_types(
    table: &RecordTable,
    schema: &ResolvedSchema,
    fields: &FieldNames,
) -> RecordTable {
    let mut coerced = table.clone();

    if let Some(idx) = schema.date.as_deref().and_then(|c| coerced.column_index(c)) {
        let mut rejected = 0usize;
        coerced = coerced.map_column(idx, |cell| {
            let cell = cell?;
            let parsed = coerce_datetime(cell);
            if parsed.is_none() {
                rejected += 1;
            }
            parsed.map(Value::DateTime)
        });
        if rejected > 0 {
            debug!("{rejected} value(s) in date column could not be parsed and were set to null");
        }
    }

    let categorical = [
        Some(fields.district.as_str()),
        Some(fields.seller.as_str()),
        Some(fields.commission_group.as_str()),
        schema.service.as_deref(),
    ];
    for name in categorical.into_iter().flatten() {
        let Some(idx) = coerced.column_index(name) else {
            debug!("Categorical field '{name}' not present; skipping");
            continue;
        };
        coerced = coerced.map_column(idx, canonical_value);
    }
    coerced
}
