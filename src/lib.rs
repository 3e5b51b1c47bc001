//! Sales export normalization, filtering, and aggregation.
//!
//! The pipeline runs leaf-first:
//! [`normalize::ingest`] → [`resolve::resolve_schema`] → [`coerce::coerce_types`]
//! → [`filter::apply_filters`] → [`aggregate::aggregate`] /
//! [`aggregate::aggregate_segmented`]. Every stage takes a table by reference
//! and returns a new one. [`report::Dashboard`] wires them together for the
//! command-line front end.

pub mod aggregate;
pub mod cli;
pub mod coerce;
pub mod columns;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod io_utils;
pub mod normalize;
pub mod options;
pub mod records;
pub mod report;
pub mod resolve;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::{
    cli::{Cli, Commands},
    config::PipelineConfig,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("salesboard", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => report::execute(&args),
        Commands::Columns(args) => columns::execute(&args),
        Commands::Options(args) => options::execute(&args),
        Commands::Config => {
            print!("{}", PipelineConfig::default().to_yaml()?);
            Ok(())
        }
    }
}
