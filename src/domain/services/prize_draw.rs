//! Weighted prize selection.
//!
//! Probabilities are percentages. A roll lands uniformly in `[0, 100)` and is
//! matched against the cumulative bands of the *eligible* items only; whatever
//! is left over (the residual, or the share of items that ran out) is a no-win.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

use crate::domain::models::prize::PrizeItem;
use crate::error::AppError;

pub const TOTAL_PROBABILITY: f64 = 100.0;
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbabilityPolicy {
    /// Weights must add up to exactly 100.
    #[default]
    Exact,
    /// Weights may add up to less than 100; the remainder is the no-win share.
    AllowResidual,
}

impl ProbabilityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbabilityPolicy::Exact => "exact",
            ProbabilityPolicy::AllowResidual => "residual",
        }
    }
}

impl fmt::Display for ProbabilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown probability policy '{0}' (expected 'exact' or 'residual')")]
pub struct UnknownPolicyError(String);

impl FromStr for ProbabilityPolicy {
    type Err = UnknownPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(ProbabilityPolicy::Exact),
            "residual" | "allow_residual" => Ok(ProbabilityPolicy::AllowResidual),
            other => Err(UnknownPolicyError(other.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrizeSetError {
    #[error("A campaign needs at least one prize")]
    Empty,
    #[error("Prize '{0}' has an invalid probability")]
    InvalidWeight(String),
    #[error("Prize '{0}' is limited but has no units")]
    ZeroQuantity(String),
    #[error("Prize probabilities must add up to 100 (got {total})")]
    NotExact { total: f64 },
    #[error("Prize probabilities cannot exceed 100 (got {total})")]
    OverAllocated { total: f64 },
}

impl From<PrizeSetError> for AppError {
    fn from(e: PrizeSetError) -> Self {
        AppError::Validation(e.to_string())
    }
}

pub fn calculate_total_probability(items: &[PrizeItem]) -> f64 {
    items.iter().map(|item| item.probability).sum()
}

impl ProbabilityPolicy {
    /// Checks a prize set before a campaign goes live.
    pub fn validate(&self, items: &[PrizeItem]) -> Result<(), PrizeSetError> {
        if items.is_empty() {
            return Err(PrizeSetError::Empty);
        }
        for item in items {
            if !item.probability.is_finite() || item.probability < 0.0 {
                return Err(PrizeSetError::InvalidWeight(item.name.clone()));
            }
            if item.quantity == Some(0) {
                return Err(PrizeSetError::ZeroQuantity(item.name.clone()));
            }
        }

        let total = calculate_total_probability(items);
        match self {
            ProbabilityPolicy::Exact if (total - TOTAL_PROBABILITY).abs() > PROBABILITY_TOLERANCE => {
                Err(PrizeSetError::NotExact { total })
            }
            ProbabilityPolicy::AllowResidual if total > TOTAL_PROBABILITY + PROBABILITY_TOLERANCE => {
                Err(PrizeSetError::OverAllocated { total })
            }
            _ => Ok(()),
        }
    }
}

fn is_eligible(item: &PrizeItem) -> bool {
    item.is_available() && item.probability > 0.0
}

/// Picks the winning item for one play, or `None` for a no-win.
///
/// Exhausted items keep their band out of the walk, so their share falls to
/// the no-win side and the odds between the remaining items are unchanged.
pub fn draw_prize<'a, R: Rng + ?Sized>(items: &'a [PrizeItem], rng: &mut R) -> Option<&'a PrizeItem> {
    let roll = rng.gen_range(0.0..TOTAL_PROBABILITY);
    select_by_roll(items, roll)
}

pub(crate) fn select_by_roll(items: &[PrizeItem], roll: f64) -> Option<&PrizeItem> {
    let mut upper = 0.0;
    for item in items.iter().filter(|item| is_eligible(item)) {
        upper += item.probability;
        if roll < upper {
            return Some(item);
        }
    }
    None
}
