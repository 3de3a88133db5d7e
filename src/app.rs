use crate::cli::Cli;
use crate::collector::CommitCollector;
use crate::config::Config;
use crate::error::ReportError;
use crate::github_client::{GithubClient, Transport};
use crate::models::CommitReport;
use crate::prompt;
use crate::report::{self, console};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{self, Write};

pub fn print_banner() {
    println!("{}", "=".repeat(80));
    println!("GitHub All Repositories Commits Fetcher");
    println!("{}", "=".repeat(80));
    println!();
}

pub async fn run(cli: Cli) -> Result<()> {
    print_banner();

    let (start, end) = cli.date_range()?;
    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let client = GithubClient::new(&config).context("Failed to build GitHub client")?;
    let report = fetch_report(&client, start, end, cli.concurrency).await?;

    let mut stdout = io::stdout().lock();
    if report.is_empty() {
        console::write_no_commits(&mut stdout)?;
    } else {
        console::write_summary(&mut stdout, &report)?;

        let choice = match cli.export {
            Some(choice) => choice,
            None => prompt::ask_export_choice(io::stdin().lock(), &mut stdout)?,
        };
        report::export(&report, choice, &cli.output_dir, &mut stdout)
            .with_context(|| format!("Failed to export into {}", cli.output_dir.display()))?;
    }

    writeln!(stdout, "\nDone!")?;
    Ok(())
}

/// Checks the token, then gathers every matching commit. Nothing beyond the
/// identity lookup is requested when the token is refused.
pub async fn fetch_report<T: Transport>(
    client: &GithubClient<T>,
    start: NaiveDate,
    end: NaiveDate,
    concurrency: usize,
) -> std::result::Result<CommitReport, ReportError> {
    print!("Validating GitHub token... ");
    io::stdout().flush()?;
    let user = match client.validate_token().await {
        Ok(user) => user,
        Err(e) => {
            println!();
            return Err(e);
        }
    };
    println!("✓\nAuthenticated as: {}\n", user.login);

    CommitCollector::new(client, concurrency).collect(start, end).await
}
