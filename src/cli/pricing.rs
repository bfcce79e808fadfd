use clap::{Args, Subcommand};

use crate::cli::print_json;
use crate::domain::use_cases::pricing::{GetPricingPlanBySlug, ListPricingPlans};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Args)]
pub(crate) struct PricingCommand {
    #[command(subcommand)]
    command: PricingSubcommand,
}

#[derive(Debug, Subcommand)]
enum PricingSubcommand {
    List,
    Show { slug: String },
}

pub(crate) async fn run(command: PricingCommand, state: AppState) -> Result<(), AppError> {
    match command.command {
        PricingSubcommand::List => print_json(&ListPricingPlans::new(state.pricing_plan_repo.clone()).execute().await?),
        PricingSubcommand::Show { slug } => {
            print_json(&GetPricingPlanBySlug::new(state.pricing_plan_repo.clone()).execute(&slug).await?)
        }
    }
}
