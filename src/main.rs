use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let config = pricewatch::config::Config::from_env();
    pricewatch::logging::init(&config.log_dir).context("init logging")?;

    let cli = pricewatch::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    if !config.has_email_credentials() {
        tracing::warn!(
            "SENDER_EMAIL / SENDER_PASSWORD not configured; email notifications are disabled"
        );
    }

    match cli.command {
        Some(pricewatch::cli::Command::Scheduler) => {
            pricewatch::schedule::run(&config).await.context("scheduler")?;
        }
        Some(pricewatch::cli::Command::TestEmail) => {
            pricewatch::notify::send_test_alert(&config).context("test email")?;
        }
        Some(pricewatch::cli::Command::External(args)) => {
            tracing::warn!(?args, "unrecognized arguments; running a single check");
            pricewatch::check::run(&config).await.context("check")?;
        }
        None => {
            pricewatch::check::run(&config).await.context("check")?;
        }
    }

    Ok(())
}
