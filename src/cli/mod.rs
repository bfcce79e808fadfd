//! Operator command line. Every subcommand maps onto one use case.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info_span, Instrument};

use crate::config::Config;
use crate::domain::services::game_suggestion::suggest_game;
use crate::error::AppError;
use crate::infra::factory::{bootstrap_state, connect, run_migrations};
use crate::state::AppState;

mod campaign;
mod pricing;
mod winner;

#[derive(Debug, Parser)]
#[command(name = "review-lottery", about = "ReviewLottery operator CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the game best suited to a number of prizes
    SuggestGame(SuggestGameArgs),
    Winner(winner::WinnerCommand),
    Campaign(campaign::CampaignCommand),
    Pricing(pricing::PricingCommand),
}

#[derive(Debug, Args)]
struct SuggestGameArgs {
    /// Number of prizes in the campaign
    #[arg(long)]
    prizes: i64,
}

impl Cli {
    pub async fn run(self, config: &Config) -> Result<(), AppError> {
        match self.command {
            Commands::Migrate => {
                let database = connect(config).await?;
                let result = run_migrations(&database).instrument(info_span!("migrate")).await;
                database.close().await;
                result
            }
            Commands::SuggestGame(args) => {
                let suggestion = suggest_game(args.prizes)?;
                print_json(&suggestion)
            }
            Commands::Winner(command) => with_state(config, |state| winner::run(command, state)).await,
            Commands::Campaign(command) => with_state(config, |state| campaign::run(command, state)).await,
            Commands::Pricing(command) => with_state(config, |state| pricing::run(command, state)).await,
        }
    }
}

/// Bootstraps the state, runs one command, and closes the pool whatever the outcome.
async fn with_state<F, Fut>(config: &Config, command: F) -> Result<(), AppError>
where
    F: FnOnce(AppState) -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    let state = bootstrap_state(config).await?;
    let result = command(state.clone()).await;
    state.shutdown().await;
    result
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to render output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
