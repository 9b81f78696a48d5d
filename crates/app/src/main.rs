//! Runner entry point.

use std::process::ExitCode;

use app::{AppError, Config, LogFormat};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the dispatch log, so logs go to stderr.
    match config.log_format {
        LogFormat::Plain => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn print_log(log: &[orchestration::Message]) -> Result<(), AppError> {
    for line in app::render_log(log)? {
        println!("{line}");
    }
    Ok(())
}

fn main() -> ExitCode {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Dispatch the configured command
    let outcome = match app::run(&config) {
        Ok(outcome) => outcome,
        Err(err) => {
            if let AppError::Dispatch { log, .. } = &err {
                if let Err(render_err) = print_log(log) {
                    tracing::error!(error = %render_err, "failed to render dispatch log");
                }
            }
            tracing::error!(error = %err, "run failed");
            return ExitCode::FAILURE;
        }
    };

    // 3. Print the dispatch log and the result
    if let Err(err) = print_log(&outcome.log) {
        tracing::error!(error = %err, "failed to render dispatch log");
        return ExitCode::FAILURE;
    }
    println!("{}", app::render_prediction(outcome.prediction));

    ExitCode::SUCCESS
}
