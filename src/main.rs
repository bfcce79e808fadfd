use std::process::ExitCode;

use clap::Parser;
use review_lottery::{cli::Cli, config::Config, init_logging};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();
    let cli = Cli::parse();
    let _guard = init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            eprintln!("error: {}", e.public_message());
            ExitCode::FAILURE
        }
    }
}
