pub mod claim_code;
pub mod game_suggestion;
pub mod prize_draw;
