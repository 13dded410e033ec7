//! Command-line runner for the domain reconciler.
//!
//! Each sweep can be run once (`intake`, `activate`, `liveness`), all three
//! together (`run`), or periodically (`watch`). Reports are printed to stdout
//! as JSON; diagnostics go to stderr.

mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_reconciler_app::adapters::{HttpWebhookNotifier, SqliteStore};
use domain_reconciler_app::{AppState, AppStateBuilder};
use domain_reconciler_core::traits::DomainRecordRepository;
use domain_reconciler_core::types::{DomainFilter, Progress};
use domain_reconciler_provider::{
    create_provider, CloudflareProvider, DnsProvider, ProviderCredentials,
};

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "domain-reconciler", version)]
#[command(about = "Reconciles donated custom domains against Cloudflare")]
struct Cli {
    /// Path to the TOML config file (defaults to ./reconciler.toml if present)
    #[arg(short, long, env = "RECONCILER_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expire domains stuck in INPUT past the grace period
    Intake,
    /// Promote activated WAITING domains, retire the ones that never activated
    Activate,
    /// Retire WAITING/DONE domains whose zone vanished or went inactive
    Liveness,
    /// Run intake, activation and liveness once
    Run,
    /// Run all sweeps periodically until interrupted
    Watch {
        /// Seconds between cycles
        #[arg(long, default_value_t = 300)]
        interval: u64,
    },
    /// Print stored domain records as JSON
    List {
        /// Only records in this stage (INPUT, WAITING, DONE)
        #[arg(long)]
        progress: Option<Progress>,
    },
    /// Check that the configured API token is accepted by the provider
    VerifyToken,
}

#[tokio::main]
async fn main() -> ExitCode {
    // 日志输出到 stderr，stdout 留给 JSON 报告
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::List { progress } => list(&settings, progress).await,
        Command::VerifyToken => verify_token(&settings).await,
        Command::Intake => {
            let state = build_state(&settings).await?;
            print_json(&state.run_intake().await?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Activate => {
            let state = build_state(&settings).await?;
            print_json(&state.run_activation().await?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Liveness => {
            let state = build_state(&settings).await?;
            print_json(&state.run_liveness().await?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run => {
            let state = build_state(&settings).await?;
            let cycle = state.run_all().await;
            print_json(&cycle)?;
            Ok(if cycle.errors.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Watch { interval } => {
            let state = build_state(&settings).await?;
            watch(&state, Duration::from_secs(interval.max(1))).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn watch(state: &AppState, period: Duration) -> Result<()> {
    tracing::info!("Watching: one cycle every {}s", period.as_secs());

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let cycle = state.run_all().await;
                if cycle.is_clean() {
                    tracing::info!("Cycle finished cleanly");
                } else {
                    tracing::warn!(
                        "Cycle finished with {} aborted sweep(s) and {} domain failure(s)",
                        cycle.errors.len(),
                        cycle.sweeps.iter().map(|s| s.failures.len()).sum::<usize>()
                    );
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                tracing::info!("Interrupted, stopping");
                return Ok(());
            }
        }
    }
}

async fn list(settings: &Settings, progress: Option<Progress>) -> Result<ExitCode> {
    let store = open_store(settings).await?;
    let filter = progress.map(DomainFilter::progress).unwrap_or_default();
    let records = store.find_many(&filter).await?;
    print_json(&records)?;
    Ok(ExitCode::SUCCESS)
}

async fn verify_token(settings: &Settings) -> Result<ExitCode> {
    let provider = build_provider(settings)?;
    if provider.validate_credentials().await? {
        tracing::info!("API token is valid");
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!("API token was rejected by {}", provider.id());
        Ok(ExitCode::FAILURE)
    }
}

async fn open_store(settings: &Settings) -> Result<Arc<SqliteStore>> {
    let path = &settings.database.path;
    let store = SqliteStore::new(path)
        .await
        .with_context(|| format!("failed to open database {}", path.display()))?;
    tracing::debug!("Database opened at {}", path.display());
    Ok(Arc::new(store))
}

fn build_provider(settings: &Settings) -> Result<Arc<dyn DnsProvider>> {
    let api_token = settings.api_token()?.to_string();
    match settings.provider.api_base.as_deref() {
        Some(base) => Ok(Arc::new(
            CloudflareProvider::new(api_token).with_api_base(base),
        )),
        None => Ok(create_provider(ProviderCredentials::Cloudflare { api_token })?),
    }
}

async fn build_state(settings: &Settings) -> Result<AppState> {
    let provider = build_provider(settings)?;
    if settings.reconciler.origin_ip.is_none() {
        tracing::warn!(
            "origin_ip is not configured: activated domains cannot be promoted (set [reconciler].origin_ip or {})",
            settings::ENV_ORIGIN_IP
        );
    }

    let store = open_store(settings).await?;
    let mut builder = AppStateBuilder::new()
        .domain_repository(store.clone())
        .preference_repository(store.clone())
        .notification_sink(store.clone())
        .log_sink(store)
        .provider(provider)
        .config(settings.reconciler.clone());

    if let Some(url) = settings.webhook.url.as_deref() {
        let webhook =
            HttpWebhookNotifier::new(url, Duration::from_secs(settings.webhook.timeout_secs))?;
        builder = builder.webhook(Arc::new(webhook));
    }

    Ok(builder.build()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_watch_interval_and_list_filter() {
        let cli = Cli::parse_from(["domain-reconciler", "watch", "--interval", "60"]);
        assert!(matches!(cli.command, Command::Watch { interval: 60 }));

        let cli = Cli::parse_from(["domain-reconciler", "list", "--progress", "waiting"]);
        assert!(matches!(
            cli.command,
            Command::List {
                progress: Some(Progress::Waiting)
            }
        ));
    }

    #[test]
    fn missing_token_is_reported() {
        let err = build_provider(&Settings::default()).err().unwrap();
        assert!(err.to_string().contains("API token"));
    }
}
