//! Donor Finder command line entry point.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use donor_finder::cli::{self, AppState, Cli, StdinConfirm};
use donor_finder::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }

    // Initialize logging on stderr so stdout stays clean for results
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    if config.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    config.log_warnings();
    tracing::debug!("Database path: {:?}", config.db_path);

    let state = match AppState::connect(config).await {
        Ok(state) => state,
        Err(err) => {
            eprintln!("{}", err.message());
            return ExitCode::from(err.exit_code());
        }
    };

    let mut stdout = io::stdout().lock();
    match cli::run(&state, cli, &StdinConfirm, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_user_facing() => {
            eprintln!("{}", err.message());
            ExitCode::from(err.exit_code())
        }
        Err(err) => {
            tracing::error!(code = err.error_code(), "Command failed: {}", err.message());
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
