use std::{process::ExitCode, str::FromStr};

use crypto_portfolio_core::{
    adapters::config::app_config::AppConfig,
    ports::routine::{Routine, RoutineError},
    prettyprint::prettyprint::PrettyFormatter,
};
use tracing::{error, info, instrument, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

mod routine_factory;

use routine_factory::RoutineFactory;

const EXIT_CONFIG_ERROR: u8 = 1;
const EXIT_PARTIAL: u8 = 2;
const EXIT_SPREADSHEET_FAILURE: u8 = 3;

const LOG_FILE: &str = "crypto_portfolio.log";

#[tokio::main]
#[instrument]
async fn main() -> ExitCode {
    // A missing .env is fine, variables may come from the environment
    dotenv::dotenv().ok();

    if let Err(e) = setup_tracing() {
        eprintln!("Failed to set up logging: {e}");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }
    setup_panic_hook();

    info!("Starting crypto-portfolio");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(report) => {
            error!("Failed to load configuration: {report:?}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let routine = match RoutineFactory::create(&config).await {
        Ok(routine) => routine,
        Err(report) => {
            error!("Failed to set up {report:?}");
            return exit_code_for(report.current_context());
        }
    };

    match routine.run().await {
        Ok(report) if report.is_partial() => {
            warn!("{} completed with degraded values", routine.name());
            ExitCode::from(EXIT_PARTIAL)
        }
        Ok(_) => {
            info!("{} completed successfully", routine.name());
            ExitCode::SUCCESS
        }
        Err(report) => {
            error!("{} failed: {report:?}", routine.name());
            exit_code_for(report.current_context())
        }
    }
}

fn exit_code_for(error: &RoutineError) -> ExitCode {
    match error {
        RoutineError::SpreadsheetFailure { .. } => ExitCode::from(EXIT_SPREADSHEET_FAILURE),
        RoutineError::RoutineFailure { .. } => ExitCode::from(EXIT_CONFIG_ERROR),
    }
}

/// `LOG_LEVEL` (trace, debug, info, warn, error), trace by default.
fn log_level() -> tracing::Level {
    std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| tracing::Level::from_str(level.trim()).ok())
        .unwrap_or(tracing::Level::TRACE)
}

fn setup_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let indicatif_layer = IndicatifLayer::new();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(indicatif_layer.get_stderr_writer());

    let log_file_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(false))
        .with_writer(std::fs::File::create(LOG_FILE)?)
        .with_ansi(false);

    let level = log_level();

    Registry::default()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("crypto_portfolio", level)
                .with_target("crypto_portfolio_core", level),
        )
        .with(indicatif_layer)
        .with(log_file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(())
}

fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}
