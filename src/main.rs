use clap::Parser;
use colored::*;
use gh_org_clone::app::App;
use gh_org_clone::cli::Cli;
use gh_org_clone::config::Config;
use gh_org_clone::error::ClonerError;
use gh_org_clone::git::GitCli;
use gh_org_clone::github::GitHubClient;
use gh_org_clone::prompt::DialoguerSelector;
use gh_org_clone::signals;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Quiet by default so log lines do not land on top of the prompts
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::from_cli(cli, std::env::var("HOME").ok()) {
        Ok(config) => config,
        Err(e @ ClonerError::AuthError(_)) => {
            println!("{}", e.to_string().yellow());
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    signals::install();

    let client = match GitHubClient::new(config.token.clone()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    let app = App::new(config, client, DialoguerSelector::new(), GitCli::new());

    match app.run().await {
        Ok(summary) => {
            println!("\nInterrupted by user. Exiting.");
            if !summary.cloned.is_empty() || summary.failed > 0 {
                println!(
                    "{} cloned, {} failed",
                    summary.cloned.len().to_string().green(),
                    summary.failed.to_string().red()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}
