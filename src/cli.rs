use crate::collector::DEFAULT_CONCURRENCY;
use crate::error::{ReportError, Result};
use crate::prompt::ExportChoice;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Collect every commit you authored across your GitHub repositories in a date range
#[derive(Parser, Debug)]
#[command(
    name = "github-commit-report",
    version,
    after_help = "Example: github-commit-report 2024-01-01 2024-01-31"
)]
pub struct Cli {
    /// First day of the range, inclusive (YYYY-MM-DD)
    #[arg(value_name = "START_DATE", value_parser = parse_date)]
    pub start: NaiveDate,

    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(value_name = "END_DATE", value_parser = parse_date)]
    pub end: NaiveDate,

    /// Export without asking
    #[arg(long, value_enum)]
    pub export: Option<ExportChoice>,

    /// Repositories fetched at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Directory the export files are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Cli {
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        if self.start > self.end {
            return Err(ReportError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok((self.start, self.end))
    }
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("dates must be in YYYY-MM-DD format, got {s:?}"))
}

fn parse_concurrency(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("expected a positive number, got {s:?}")),
    }
}
