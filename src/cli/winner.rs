use clap::{Args, Subcommand};
use tracing::{info_span, Instrument};

use crate::cli::print_json;
use crate::domain::actor::{Actor, Role};
use crate::domain::models::{campaign::CampaignId, winner::WinnerStatus};
use crate::domain::use_cases::winner::{ClaimPrize, ClaimPrizeInput, GetWinnerByClaimCode, ListWinners, ListWinnersInput};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Args)]
pub(crate) struct WinnerCommand {
    #[command(subcommand)]
    command: WinnerSubcommand,
}

#[derive(Debug, Subcommand)]
enum WinnerSubcommand {
    /// Show the winner behind a claim code
    Lookup {
        code: String,
    },
    /// Mark a prize as handed over
    Claim {
        code: String,
        /// User id of the merchant redeeming the code
        #[arg(long)]
        actor: String,
        /// Act with admin rights
        #[arg(long)]
        admin: bool,
    },
    /// List the winners of a campaign
    List {
        #[arg(long)]
        campaign: String,
        /// PENDING, CLAIMED or EXPIRED
        #[arg(long)]
        status: Option<WinnerStatus>,
    },
}

pub(crate) async fn run(command: WinnerCommand, state: AppState) -> Result<(), AppError> {
    match command.command {
        WinnerSubcommand::Lookup { code } => {
            let winner = GetWinnerByClaimCode::new(state.winner_repo.clone())
                .execute(&code)
                .instrument(info_span!("winner_lookup"))
                .await?;
            print_json(&winner)
        }
        WinnerSubcommand::Claim { code, actor, admin } => {
            let role = if admin { Role::Admin } else { Role::User };
            let use_case = ClaimPrize::new(
                state.winner_repo.clone(),
                state.campaign_repo.clone(),
                state.store_repo.clone(),
                state.brand_repo.clone(),
            );
            let winner = use_case
                .execute(ClaimPrizeInput { actor: Actor::new(actor, role), claim_code: code })
                .instrument(info_span!("winner_claim"))
                .await?;
            print_json(&winner)
        }
        WinnerSubcommand::List { campaign, status } => {
            let list = ListWinners::new(state.winner_repo.clone())
                .execute(ListWinnersInput { campaign_id: Some(CampaignId::from(campaign)), status })
                .instrument(info_span!("winner_list"))
                .await?;
            print_json(&list)
        }
    }
}
