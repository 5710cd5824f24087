//! CLI module
//!
//! Runs the upload server, or renders a report straight from a CSV file
//! without starting it.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::{
    configuration::{get_report_options, set_configuration},
    error::Error,
    ingest::CsvParser,
    report::{generate, render, ReportOptions},
};

/// Daily cross-chain transfer metrics
#[derive(Parser)]
#[command(name = "transfer-metrics")]
#[command(about = "Daily cross-chain transfer metrics report", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the upload server (default if no command specified)
    Serve,

    /// Print the report for a CSV export
    Render {
        /// Path of the CSV export
        #[arg(long)]
        file: PathBuf,

        /// Reference date, the report covers the day before (default: today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Print the structured report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Reads `file` and returns the rendered report.
pub fn run_render(
    file: &Path,
    as_of: Option<NaiveDate>,
    json: bool,
) -> Result<String, Error> {
    set_configuration()?;
    let options = get_report_options(|key| env::var(key).ok())?;
    let content = fs::read(file)?;
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());

    tracing::info!("Rendering {} as of {}", file.display(), as_of);

    render_content(&content, as_of, &options, json)
}

pub fn render_content(
    content: &[u8],
    as_of: NaiveDate,
    options: &ReportOptions,
    json: bool,
) -> Result<String, Error> {
    let rows = CsvParser::new()
        .with_expected_columns(options.columns())
        .parse_bytes(content)?;
    let report = generate(&rows, as_of, options);

    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    Ok(render(&report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;

    const CONTENT: &[u8] = b"origin_timestamp,from_asset_amount_usd\n2025-03-09,1000000\n";

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_render_content_text() {
        let text =
            render_content(CONTENT, as_of(), &ReportOptions::default(), false)
                .unwrap();

        assert!(text.starts_with("**Metrics Mar 09**"));
        assert!(text.contains("- Total — $1.00M (0% d-o-d; 0% w-o-w)"));
    }

    #[test]
    fn test_render_content_json() {
        let json =
            render_content(CONTENT, as_of(), &ReportOptions::default(), true)
                .unwrap();
        let report: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(report.total_volume, "$1.00M");
        assert_eq!(report.user_tx_count, 1);
    }

    #[test]
    fn test_cli_parses_render_arguments() {
        let cli = Cli::try_parse_from([
            "transfer-metrics",
            "render",
            "--file",
            "daily.csv",
            "--as-of",
            "2025-03-10",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Render { file, as_of, json }) => {
                assert_eq!(file, PathBuf::from("daily.csv"));
                assert_eq!(as_of, Some(self::as_of()));
                assert!(json);
            },
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["transfer-metrics"]).unwrap();
        assert!(cli.command.is_none());
    }
}
