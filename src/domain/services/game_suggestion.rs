use serde::Serialize;
use thiserror::Error;

use crate::domain::models::campaign::GameType;
use crate::error::AppError;

pub const MAX_PRIZES: i64 = 20;
pub const SCRATCH_CARD_CELLS: u32 = 9;
pub const SLOT_MACHINE_REELS: u32 = 3;
const WHEEL_SEGMENTS_PER_PRIZE: u32 = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameSuggestionError {
    #[error("A game needs at least one prize")]
    NoPrizes,
    #[error("Too many prizes (max {max})")]
    TooManyPrizes { max: i64 },
}

impl From<GameSuggestionError> for AppError {
    fn from(e: GameSuggestionError) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "game", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameSuggestion {
    ScratchCard { cells: u32 },
    Wheel { segments: u32 },
    SlotMachine { reels: u32, symbols: u32 },
}

impl GameSuggestion {
    pub fn game_type(&self) -> GameType {
        match self {
            GameSuggestion::ScratchCard { .. } => GameType::ScratchCard,
            GameSuggestion::Wheel { .. } => GameType::Wheel,
            GameSuggestion::SlotMachine { .. } => GameType::SlotMachine,
        }
    }
}

/// Maps a prize count onto the game that presents it best.
///
/// | prizes | game |
/// | --- | --- |
/// | 1-3 | scratch card, 9 cells |
/// | 4-8 | wheel, two segments per prize (8-16) |
/// | 9-20 | slot machine, 3 reels, one symbol per prize |
pub fn suggest_game(number_of_prizes: i64) -> Result<GameSuggestion, GameSuggestionError> {
    match number_of_prizes {
        n if n <= 0 => Err(GameSuggestionError::NoPrizes),
        1..=3 => Ok(GameSuggestion::ScratchCard { cells: SCRATCH_CARD_CELLS }),
        n @ 4..=8 => Ok(GameSuggestion::Wheel { segments: WHEEL_SEGMENTS_PER_PRIZE * n as u32 }),
        n @ 9..=MAX_PRIZES => Ok(GameSuggestion::SlotMachine { reels: SLOT_MACHINE_REELS, symbols: n as u32 }),
        _ => Err(GameSuggestionError::TooManyPrizes { max: MAX_PRIZES }),
    }
}
