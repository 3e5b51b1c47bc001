use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use crate::{
    aggregate::{
        AggregateView, Kpis, SegmentedRanking, ViewName, aggregate, aggregate_segmented,
        compute_kpis,
    },
    cli::{InputArgs, OutputFormat, ReportArgs},
    coerce::coerce_types,
    config::PipelineConfig,
    error::PipelineError,
    filter::{DateRange, FilterSelection, apply_filters},
    io_utils,
    normalize::ingest,
    records::RecordTable,
    resolve::{ResolvedSchema, resolve_schema},
    table,
};

/// The immutable base table of one ingestion call, coerced and resolved.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub table: RecordTable,
    pub schema: ResolvedSchema,
}

/// Ingest, resolve, and coerce. Runs once per set of uploaded tables.
pub fn prepare(
    raw_tables: &[RecordTable],
    config: &PipelineConfig,
) -> std::result::Result<PreparedData, PipelineError> {
    let merged = ingest(raw_tables)?;
    let schema = resolve_schema(merged.columns(), &config.roles);
    let table = coerce_types(&merged, &schema, &config.fields);
    Ok(PreparedData { table, schema })
}

/// Every view of the dashboard, in display order. Omitted views are `None`
/// (or missing from `seller_rankings`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub monthly_trend: Option<AggregateView>,
    pub district_ranking: Option<AggregateView>,
    pub seller_ranking: Option<AggregateView>,
    pub seller_rankings: SegmentedRanking,
    pub service_ranking: Option<AggregateView>,
    pub channel_share: Option<AggregateView>,
    pub commission_group_share: Option<AggregateView>,
}

impl Dashboard {
    pub fn build(
        data: &PreparedData,
        config: &PipelineConfig,
        selection: &FilterSelection,
    ) -> std::result::Result<Self, PipelineError> {
        let filtered = apply_filters(&data.table, &data.schema, &config.fields, selection)?;
        let view = |name| aggregate(&filtered, &data.schema, &config.fields, name);
        Ok(Self {
            kpis: compute_kpis(&filtered, &data.schema, &config.fields),
            monthly_trend: view(ViewName::MonthlyTrend),
            district_ranking: view(ViewName::DistrictRanking),
            seller_ranking: view(ViewName::SellerRanking),
            seller_rankings: aggregate_segmented(&filtered, &config.fields, &config.segments),
            service_ranking: view(ViewName::ServiceRanking),
            channel_share: view(ViewName::ChannelShare),
            commission_group_share: view(ViewName::CommissionGroupShare),
        })
    }

    pub fn render(&self) -> String {
        let mut sections = vec![table::render_kpis(&self.kpis)];
        sections.extend(self.monthly_trend.iter().map(table::render_view));
        sections.extend(self.district_ranking.iter().map(table::render_view));
        sections.extend(self.seller_ranking.iter().map(table::render_view));
        sections.extend(
            self.seller_rankings
                .segments
                .iter()
                .map(|(_, view)| table::render_view(view)),
        );
        sections.extend(self.service_ranking.iter().map(table::render_view));
        sections.extend(self.channel_share.iter().map(table::render_view));
        sections.extend(self.commission_group_share.iter().map(table::render_view));
        sections.join("\n")
    }
}

pub(crate) fn load_config(input: &InputArgs) -> Result<PipelineConfig> {
    match &input.config {
        Some(path) => PipelineConfig::load(path),
        None => Ok(PipelineConfig::default()),
    }
}

pub(crate) fn load_prepared(input: &InputArgs, config: &PipelineConfig) -> Result<PreparedData> {
    let encoding = io_utils::resolve_encoding(input.input_encoding.as_deref())?;
    let tables = io_utils::load_tables(&input.inputs, input.delimiter, encoding);
    prepare(&tables, config).with_context(|| format!("Loading {} input file(s)", input.inputs.len()))
}

pub(crate) fn build_selection(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    groups: &[String],
    sellers: &[String],
) -> Result<FilterSelection> {
    let mut selection = FilterSelection::new()
        .with_commission_groups(groups)
        .with_sellers(sellers);
    if let Some(range) = date_range(from, to)? {
        selection = selection.with_date_range(range);
    }
    Ok(selection)
}

fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Option<DateRange>> {
    let range = match (from, to) {
        (None, None) => return Ok(None),
        (Some(start), Some(end)) => DateRange::new(start, end),
        (Some(start), None) => DateRange::new(start, NaiveDate::MAX),
        (None, Some(end)) => DateRange::new(NaiveDate::MIN, end),
    };
    Ok(Some(range.context("Validating --from/--to")?))
}

pub fn execute(args: &ReportArgs) -> Result<()> {
    let config = load_config(&args.input)?;
    let selection = build_selection(args.from, args.to, &args.groups, &args.sellers)?;
    let data = load_prepared(&args.input, &config)?;
    let dashboard = Dashboard::build(&data, &config, &selection)?;
    info!(
        "Built dashboard from {} row(s); {} sale(s) after filters",
        data.table.len(),
        dashboard.kpis.total_sales
    );
    match args.format {
        OutputFormat::Table => print!("{}", dashboard.render()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&dashboard).context("Serializing dashboard")?
        ),
    }
    Ok(())
}
