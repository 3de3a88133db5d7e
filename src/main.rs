mod app;
mod cli;
mod collector;
mod config;
mod error;
mod github_client;
mod models;
mod prompt;
mod report;

use clap::Parser;
use cli::Cli;
use error::ReportError;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\nERROR: {:#}", err);
            match err.downcast_ref::<ReportError>() {
                Some(ReportError::MissingConfig(_)) => {
                    eprintln!("\n{}", config::SETUP_INSTRUCTIONS)
                }
                Some(e) if e.is_auth() => {
                    eprintln!("Please check your GitHub token and try again.")
                }
                _ => {}
            }
            ExitCode::FAILURE
        }
    }
}
