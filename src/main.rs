//! Cronwatch CLI entry point.
//!
//! Provides `run` and `check` subcommands: a full pass that delivers the
//! report to the webhook, or the same pass printing the payload instead.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use cronwatch::config::{load_config_or_default, CronwatchConfig};
use cronwatch::flavor::Flavor;
use cronwatch::monitor::Monitor;
use cronwatch::notifier::Notifier;
use cronwatch::sources::SystemRunner;

/// Cronwatch — reconcile cron/fcron schedules against recent logs.
#[derive(Parser)]
#[command(name = "cronwatch", version, about)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, env = "CRONWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Webhook URL, overriding the config file.
    #[arg(long, global = true, env = "CRONWATCH_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Minutes of logs to inspect, overriding the config file.
    #[arg(long, global = true, env = "CRONWATCH_WINDOW_MINUTES")]
    window_minutes: Option<u32>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Check the window and send the report to the webhook.
    Run {
        /// Scheduler flavor (defaults to the config value).
        #[arg(long, value_enum)]
        flavor: Option<Flavor>,
    },
    /// Check the window and print the payload without sending it.
    Check {
        /// Scheduler flavor (defaults to the config value).
        #[arg(long, value_enum)]
        flavor: Option<Flavor>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = load_config_or_default(cli.config.as_deref())?
        .with_overrides(cli.webhook_url, cli.window_minutes);
    config.validate().context("invalid configuration")?;

    let _logging_guard = match &config.logging.dir {
        Some(dir) => Some(cronwatch::logging::init_with_file(dir)?),
        None => {
            cronwatch::logging::init_cli();
            None
        }
    };

    match cli.command {
        Command::Run { flavor } => handle_run(&config, flavor.unwrap_or(config.flavor)).await,
        Command::Check { flavor } => handle_check(&config, flavor.unwrap_or(config.flavor)).await,
    }
}

/// Run one pass and deliver the report. Delivery failures do not fail the run.
async fn handle_run(config: &CronwatchConfig, flavor: Flavor) -> anyhow::Result<()> {
    let runner = SystemRunner;
    let monitor = Monitor::new(config, flavor, &runner);

    let report = monitor.report().await;
    let payload = monitor.payload(&report);

    let delivery = Notifier::new(&config.webhook).deliver(&payload).await;
    info!(?delivery, "run complete");

    Ok(())
}

/// Run one pass and print the payload as JSON on stdout.
async fn handle_check(config: &CronwatchConfig, flavor: Flavor) -> anyhow::Result<()> {
    let runner = SystemRunner;
    let monitor = Monitor::new(config, flavor, &runner);

    let report = monitor.report().await;
    for entry in &report.entries {
        info!(
            job = %entry.job_label,
            status = ?entry.status,
            "entry"
        );
    }

    let payload = monitor.payload(&report);
    let json = serde_json::to_string_pretty(&payload).context("failed to serialize payload")?;
    println!("{json}");

    Ok(())
}
