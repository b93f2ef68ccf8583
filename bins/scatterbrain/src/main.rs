//! Scatterbrain daemon.
//!
//! Connects to a wallet over JSON-RPC and, once per interval, tops up the
//! scatter accounts from the stake account and scatters small amounts
//! between them. Runs until Ctrl+C.

mod rpc;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scatter_engine::Scheduler;
use tracing::{error, info, warn};

use crate::rpc::RpcWallet;
use crate::settings::Settings;

/// Scatterbrain: stake top-up and fund scattering for wallet sub-accounts.
#[derive(Parser, Debug)]
#[command(name = "scatterbrain", version, disable_help_flag = true)]
struct Args {
    #[command(flatten)]
    settings: Settings,

    /// Config file with key=value settings; command-line values take precedence
    #[arg(short = 'f', long = "config")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Print help
    #[arg(short = 'H', long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let file = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    let settings = args.settings.or(file);
    let timeout = settings.rpc_timeout();
    let config = settings
        .into_engine_config()
        .context("invalid configuration")?;

    info!("Scatterbrain v{}", env!("CARGO_PKG_VERSION"));
    info!(
        network = %config.network(),
        endpoint = %config.rpc_url(),
        account = %config.stake_account,
        scatter = config.scatter_count,
        prefix = %config.prefix,
        policy = %config.scatter_policy,
        "Starting scatter loop"
    );

    let wallet = RpcWallet::new(&config, timeout).context("failed to build RPC client")?;
    let mut scheduler = Scheduler::new(config, wallet, StdRng::from_entropy())
        .context("invalid configuration")?;

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, stopping."),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    scheduler.run(shutdown).await.context("scatter loop aborted")?;
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// `RUST_LOG` takes precedence over `level_str`. Pass `format = "json"` for
/// structured output; anything else gives human-readable text.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn short_flags_follow_daemon_conventions() {
        let args = Args::try_parse_from([
            "scatterbrain", "-h", "wallet", "-P", "11617", "-u", "rpc", "-p", "secret", "-a", "main",
            "-S", "5", "-x", "sb", "-i", "60", "-s", "40", "-d", "2", "-n", "8", "-t", "0.05", "-T",
            "0.5", "-m", "1000", "-f", "scatter.properties",
        ])
        .unwrap();

        let s = &args.settings;
        assert_eq!(s.host.as_deref(), Some("wallet"));
        assert_eq!(s.port, Some(11617));
        assert_eq!(s.user.as_deref(), Some("rpc"));
        assert_eq!(s.password.as_deref(), Some("secret"));
        assert_eq!(s.account.as_deref(), Some("main"));
        assert_eq!(s.scatter, Some(5));
        assert_eq!(s.prefix.as_deref(), Some("sb"));
        assert_eq!(s.interval, Some(60));
        assert_eq!(s.stake_mean, Some(40.0));
        assert_eq!(s.stake_sd, Some(2.0));
        assert_eq!(s.stake_threshold, Some(8.0));
        assert_eq!(s.transfer_min, Some(0.05));
        assert_eq!(s.transfer_max, Some(0.5));
        assert_eq!(s.minimum, Some(1000.0));
        assert_eq!(args.config, Some(PathBuf::from("scatter.properties")));
    }

    #[test]
    fn help_is_capital_h_since_h_is_host() {
        for flag in ["--help", "-H"] {
            let err = Args::try_parse_from(["scatterbrain", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp, "{flag}");
        }
    }

    #[test]
    fn camel_case_aliases_match_config_keys() {
        let args = Args::try_parse_from([
            "scatterbrain", "--stakeMean", "40", "--stakeSD", "2", "--stakeThreshhold", "3",
            "--transferMin", "0.05", "--transferMax", "0.5",
        ])
        .unwrap();

        let s = &args.settings;
        assert_eq!(s.stake_mean, Some(40.0));
        assert_eq!(s.stake_sd, Some(2.0));
        assert_eq!(s.stake_threshold, Some(3.0));
        assert_eq!(s.transfer_min, Some(0.05));
        assert_eq!(s.transfer_max, Some(0.5));

        let kebab = Args::try_parse_from(["scatterbrain", "--stake-threshold", "3"]).unwrap();
        assert_eq!(kebab.settings.stake_threshold, Some(3.0));
    }

    #[test]
    fn unset_flags_stay_unset() {
        let args = Args::try_parse_from(["scatterbrain", "-a", "main"]).unwrap();
        assert_eq!(args.settings.port, None);
        assert_eq!(args.settings.scatter_policy, None);
        assert_eq!(args.log_level, "info");
        assert_eq!(args.log_format, "text");
    }

    #[test]
    fn unknown_policy_is_rejected_by_parser() {
        let err = Args::try_parse_from(["scatterbrain", "--scatter-policy", "gaussian"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }
}
