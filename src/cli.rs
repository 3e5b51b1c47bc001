use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Sales dashboard views from spreadsheet exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build every dashboard view from one or more sales exports
    Report(ReportArgs),
    /// List the normalized columns and the role each one resolved to
    Columns(ColumnsArgs),
    /// Show the values available to the date, group, and seller filters
    Options(OptionsArgs),
    /// Print the default pipeline configuration as YAML
    Config,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// One or more CSV/TSV exports to merge
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// Pipeline configuration (YAML); built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// First day of the date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,
    /// Last day of the date range (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
    /// Keep only these commission groups (repeatable)
    #[arg(long = "group", action = clap::ArgAction::Append)]
    pub groups: Vec<String>,
    /// Keep only these sellers (repeatable)
    #[arg(long = "seller", action = clap::ArgAction::Append)]
    pub sellers: Vec<String>,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Narrow the seller choices to sales on or after this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,
    /// Narrow the seller choices to sales on or before this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
    /// Narrow the seller choices to these commission groups (repeatable)
    #[arg(long = "group", action = clap::ArgAction::Append)]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("Expected a YYYY-MM-DD date: {err}"))
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
