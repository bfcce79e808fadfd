use clap::{Args, Subcommand};
use tracing::{info_span, Instrument};

use crate::cli::print_json;
use crate::domain::actor::{Actor, Role};
use crate::domain::models::campaign::CampaignId;
use crate::domain::use_cases::campaign::{ActivateCampaign, CampaignRef, DeactivateCampaign};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Args)]
pub(crate) struct CampaignCommand {
    #[command(subcommand)]
    command: CampaignSubcommand,
}

#[derive(Debug, Subcommand)]
enum CampaignSubcommand {
    /// Put a campaign live; other campaigns of its store are switched off
    Activate {
        id: String,
        /// User id of the brand owner
        #[arg(long)]
        actor: String,
        /// Act with admin rights
        #[arg(long)]
        admin: bool,
    },
    /// Stop a live campaign
    Deactivate { id: String },
}

pub(crate) async fn run(command: CampaignCommand, state: AppState) -> Result<(), AppError> {
    match command.command {
        CampaignSubcommand::Activate { id, actor, admin } => {
            let role = if admin { Role::Admin } else { Role::User };
            let campaign = ActivateCampaign::new(
                state.campaign_repo.clone(),
                state.store_repo.clone(),
                state.brand_repo.clone(),
                state.config.probability_policy,
            )
            .execute(CampaignRef { actor: Actor::new(actor, role), campaign_id: CampaignId::from(id) })
            .instrument(info_span!("campaign_activate"))
            .await?;
            print_json(&campaign)
        }
        CampaignSubcommand::Deactivate { id } => {
            let campaign = DeactivateCampaign::new(state.campaign_repo.clone())
                .execute(&CampaignId::from(id))
                .instrument(info_span!("campaign_deactivate"))
                .await?;
            print_json(&campaign)
        }
    }
}
