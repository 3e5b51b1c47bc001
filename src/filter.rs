use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::info;
use serde::Serialize;

use crate::{
    config::FieldNames,
    data::{Value, canonical_text},
    error::{PipelineError, Result},
    records::{RecordTable, Row},
    resolve::ResolvedSchema,
};

/// Inclusive date range. Both boundaries are compared as midnight timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(PipelineError::InvalidFilterRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    fn lower(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    fn upper(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN)
    }

    pub fn contains(&self, value: &NaiveDateTime) -> bool {
        *value >= self.lower() && *value <= self.upper()
    }
}

/// User-selected filters. Every unset component passes all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub date_range: Option<DateRange>,
    pub commission_groups: BTreeSet<String>,
    pub sellers: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_commission_groups<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.commission_groups
            .extend(values.into_iter().map(|v| canonical_text(v.as_ref())));
        self
    }

    pub fn with_sellers<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sellers
            .extend(values.into_iter().map(|v| canonical_text(v.as_ref())));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.commission_groups.is_empty() && self.sellers.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        match &self.date_range {
            Some(range) => range.validate(),
            None => Ok(()),
        }
    }
}

struct CompiledFilter<'a> {
    date: Option<(usize, &'a DateRange)>,
    groups: Option<(Option<usize>, &'a BTreeSet<String>)>,
    sellers: Option<(Option<usize>, &'a BTreeSet<String>)>,
}

impl CompiledFilter<'_> {
    fn accepts(&self, row: &Row) -> bool {
        if let Some((idx, range)) = self.date {
            let inside = row
                .get(idx)
                .and_then(|v| v.as_ref())
                .and_then(Value::as_datetime)
                .is_some_and(|dt| range.contains(&dt));
            if !inside {
                return false;
            }
        }
        membership(row, self.groups) && membership(row, self.sellers)
    }
}

// A field the table lacks cannot be filtered on; the predicate passes.
fn membership(row: &Row, filter: Option<(Option<usize>, &BTreeSet<String>)>) -> bool {
    let Some((Some(idx), allowed)) = filter else {
        return true;
    };
    row.get(idx)
        .and_then(|v| v.as_ref())
        .and_then(Value::as_text)
        .is_some_and(|text| allowed.contains(text))
}

/// Returns the rows of `table` that satisfy every active component of
/// `selection`, in their original order. An inverted date range is rejected
/// before any row is inspected.
pub fn apply_filters(
    table: &RecordTable,
    schema: &ResolvedSchema,
    fields: &FieldNames,
    selection: &FilterSelection,
) -> Result<RecordTable> {
    selection.validate()?;
    if selection.is_empty() {
        return Ok(table.clone());
    }

    let compiled = CompiledFilter {
        date: schema
            .date
            .as_deref()
            .and_then(|c| table.column_index(c))
            .zip(selection.date_range.as_ref()),
        groups: (!selection.commission_groups.is_empty()).then(|| {
            (
                table.column_index(&fields.commission_group),
                &selection.commission_groups,
            )
        }),
        sellers: (!selection.sellers.is_empty())
            .then(|| (table.column_index(&fields.seller), &selection.sellers)),
    };

    let filtered = table.retain_rows(|row| compiled.accepts(row));
    info!(
        "Filters kept {} of {} row(s)",
        filtered.len(),
        table.len()
    );
    Ok(filtered)
}
