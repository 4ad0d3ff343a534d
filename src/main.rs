//! Fleetledger main entry point

use anyhow::Context;
use clap::Parser;
use fleetledger_api::start_server;
use fleetledger_config::error::ConfigErrorSeverity;
use fleetledger_config::{Config, ConfigError};
use fleetledger_core::ChartOfAccounts;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fleetledger")]
#[command(author = "Fleetledger Contributors")]
#[command(version = "0.1.0")]
#[command(
    about = "Chart of accounts and journal entry back office for fleet operators",
    long_about = None
)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

/// Load the configuration; warnings fall back to defaults
fn load_config(path: &Path) -> anyhow::Result<(Config, Option<ConfigError>)> {
    match Config::load(path) {
        Ok(config) => Ok((config, None)),
        Err(err) if err.severity() == ConfigErrorSeverity::Warning => {
            Ok((Config::default(), Some(err)))
        }
        Err(err) => Err(anyhow::anyhow!("{}", err.to_details()))
            .with_context(|| format!("Invalid configuration in {}", path.display())),
    }
}

fn load_chart(config: &Config) -> anyhow::Result<ChartOfAccounts> {
    match &config.accounting.chart_seed {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read chart seed {}", path.display()))?;
            let chart = ChartOfAccounts::from_yaml(&content)
                .with_context(|| format!("Invalid chart seed {}", path.display()))?;
            log::info!("Loaded chart seed {} ({} nodes)", path.display(), chart.len());
            Ok(chart)
        }
        None => Ok(ChartOfAccounts::seeded()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing) = load_config(&args.config)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    match missing {
        Some(err) => log::warn!("{}\nUsing default configuration", err.to_details()),
        None => log::info!("Config loaded from {}", args.config.display()),
    }

    let seed = load_chart(&config)?;
    log::info!(
        "Chart of accounts ready: {} nodes, currency {}",
        seed.len(),
        config.accounting.currency
    );

    start_server(config, seed).await.context("Server error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("fleetledger-no-such-config.yaml");
        let (config, warning) = load_config(&path).unwrap();
        assert_eq!(config.server.port, 8082);
        let warning = warning.unwrap();
        assert_eq!(warning.severity(), ConfigErrorSeverity::Warning);
    }

    #[test]
    fn test_invalid_config_aborts() {
        let name = format!("fleetledger-bad-{}.yaml", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "server:\n  port: 0\n").unwrap();
        let err = load_config(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid configuration"));
        assert!(message.contains("[INVALID_VALUE]"));
    }
}
