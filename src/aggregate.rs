//! Aggregate views over a filtered record table.
//!
//! Every function here is pure: it reads the table it is given and returns a
//! freshly built `(category, count)` sequence. A view whose grouping column is
//! unresolved or absent is omitted (`None`) rather than rendered empty.

use std::collections::{BTreeMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::{
    config::{FieldNames, SegmentDef},
    data::{Value, month_period},
    records::RecordTable,
    resolve::ResolvedSchema,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewName {
    MonthlyTrend,
    DistrictRanking,
    SellerRanking,
    ServiceRanking,
    ChannelShare,
    CommissionGroupShare,
}

impl ViewName {
    pub fn title(self) -> &'static str {
        match self {
            ViewName::MonthlyTrend => "Sales by month",
            ViewName::DistrictRanking => "Sales by district",
            ViewName::SellerRanking => "Sales by seller",
            ViewName::ServiceRanking => "Sales by requested service",
            ViewName::ChannelShare => "Order channel share",
            ViewName::CommissionGroupShare => "Commission group share",
        }
    }

    pub fn sort_order(self) -> SortOrder {
        match self {
            ViewName::MonthlyTrend => SortOrder::Chronological,
            ViewName::DistrictRanking | ViewName::SellerRanking | ViewName::ServiceRanking => {
                SortOrder::AscendingByCount
            }
            ViewName::ChannelShare | ViewName::CommissionGroupShare => SortOrder::Unordered,
        }
    }

    /// Column this view groups by, if the table provides one.
    fn key_column<'a>(
        self,
        schema: &'a ResolvedSchema,
        fields: &'a FieldNames,
    ) -> Option<&'a str> {
        match self {
            ViewName::MonthlyTrend => schema.date.as_deref(),
            ViewName::DistrictRanking => Some(fields.district.as_str()),
            ViewName::SellerRanking => Some(fields.seller.as_str()),
            ViewName::ServiceRanking => schema.service.as_deref(),
            ViewName::ChannelShare => schema.channel.as_deref(),
            ViewName::CommissionGroupShare => Some(fields.commission_group.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending by period key (`YYYY-MM`).
    Chronological,
    /// Ascending by count; ties ordered by category.
    AscendingByCount,
    /// Category order; the consumer renders shares.
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateView {
    pub title: String,
    pub sort: SortOrder,
    pub rows: Vec<(String, usize)>,
}

impl AggregateView {
    pub fn total(&self) -> usize {
        self.rows.iter().map(|(_, count)| count).sum()
    }

    /// Share of the view total held by `count`, in percent.
    pub fn percent(&self, count: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => (count as f64 / total as f64) * 100.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Seller rankings keyed by segment label, in segment definition order.
/// Segments without matching rows have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentedRanking {
    pub segments: Vec<(String, AggregateView)>,
}

impl SegmentedRanking {
    pub fn get(&self, label: &str) -> Option<&AggregateView> {
        self.segments
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, view)| view)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Debug, Default)]
struct CountAccumulator {
    counts: BTreeMap<String, usize>,
}

impl CountAccumulator {
    fn ingest(&mut self, key: String) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    fn into_rows(self, sort: SortOrder) -> Vec<(String, usize)> {
        let mut rows = self.counts.into_iter().collect::<Vec<_>>();
        if sort == SortOrder::AscendingByCount {
            // Stable over the key-ordered map, so ties stay alphabetical.
            rows.sort_by_key(|(_, count)| *count);
        }
        rows
    }
}

fn group_key(view: ViewName, value: &Value) -> Option<String> {
    match view {
        ViewName::MonthlyTrend => value.as_datetime().map(|dt| month_period(&dt)),
        _ => Some(value.as_display()),
    }
}

/// Computes one named view, or `None` when its grouping column is missing.
pub fn aggregate(
    table: &RecordTable,
    schema: &ResolvedSchema,
    fields: &FieldNames,
    view: ViewName,
) -> Option<AggregateView> {
    let Some(column) = view.key_column(schema, fields) else {
        debug!("Omitting '{}' view: role unresolved", view.title());
        return None;
    };
    let Some(idx) = table.column_index(column) else {
        debug!("Omitting '{}' view: column '{column}' absent", view.title());
        return None;
    };

    let mut acc = CountAccumulator::default();
    for value in table.column_values(idx).flatten() {
        if let Some(key) = group_key(view, value) {
            acc.ingest(key);
        }
    }
    let sort = view.sort_order();
    Some(AggregateView {
        title: view.title().to_string(),
        sort,
        rows: acc.into_rows(sort),
    })
}

/// Seller ranking for each segment whose marker occurs in the canonical
/// commission-group value. Rows with a null group belong to no segment.
pub fn aggregate_segmented(
    table: &RecordTable,
    fields: &FieldNames,
    segments: &[SegmentDef],
) -> SegmentedRanking {
    let (Some(group_idx), Some(seller_idx)) = (
        table.column_index(&fields.commission_group),
        table.column_index(&fields.seller),
    ) else {
        debug!("Omitting segmented seller rankings: commission group or seller column absent");
        return SegmentedRanking::default();
    };

    let mut ranking = SegmentedRanking::default();
    for segment in segments {
        let subset = table.retain_rows(|row| {
            row.get(group_idx)
                .and_then(|v| v.as_ref())
                .and_then(Value::as_text)
                .is_some_and(|group| segment.matches(group))
        });
        if subset.is_empty() {
            debug!("Segment '{}' matched no rows", segment.label);
            continue;
        }
        let mut acc = CountAccumulator::default();
        for value in subset.column_values(seller_idx).flatten() {
            acc.ingest(value.as_display());
        }
        ranking.segments.push((
            segment.label.clone(),
            AggregateView {
                title: segment.label.clone(),
                sort: SortOrder::AscendingByCount,
                rows: acc.into_rows(SortOrder::AscendingByCount),
            },
        ));
    }
    ranking
}

/// Headline counts shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub total_sales: usize,
    pub sellers: usize,
    pub districts: usize,
    pub services: usize,
}

fn distinct_count(table: &RecordTable, column: Option<&str>) -> usize {
    let Some(idx) = column.and_then(|c| table.column_index(c)) else {
        return 0;
    };
    table
        .column_values(idx)
        .flatten()
        .map(Value::as_display)
        .collect::<HashSet<_>>()
        .len()
}

pub fn compute_kpis(table: &RecordTable, schema: &ResolvedSchema, fields: &FieldNames) -> Kpis {
    Kpis {
        total_sales: table.len(),
        sellers: distinct_count(table, Some(&fields.seller)),
        districts: distinct_count(table, Some(&fields.district)),
        services: distinct_count(table, schema.service.as_deref()),
    }
}
