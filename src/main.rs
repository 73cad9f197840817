use std::process::ExitCode;
use std::sync::Arc;

use podio_assistant::config::{load_config, print_schema};
use podio_assistant::startup;
use podio_assistant::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    if std::env::args().skip(1).any(|arg| arg == "--schema") {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error printing configuration schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // A missing .env file is fine; the variables may come from the real environment.
    dotenvy::dotenv().ok();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging);

    if let Err(e) = startup::run(Arc::new(config)).await {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
