use alloy_primitives::{Address, TxHash, I256, U256};
use serde::{Deserialize, Serialize};

use common_errors::{InteractError, InteractResult};

/// Account data as returned by `LendingPool.getUserAccountData`.
/// Amounts are in ETH wei, `ltv` and the threshold in basis points,
/// `health_factor` in WAD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub total_collateral_eth: U256,
    pub total_debt_eth: U256,
    pub available_borrows_eth: U256,
    pub current_liquidation_threshold: U256,
    pub ltv: U256,
    pub health_factor: U256,
}

impl AccountSnapshot {
    pub fn has_collateral(&self) -> bool {
        !self.total_collateral_eth.is_zero()
    }

    pub fn can_borrow(&self) -> bool {
        !self.available_borrows_eth.is_zero()
    }

    /// Debt added since `earlier`; zero if the debt went down.
    pub fn debt_increase_since(&self, earlier: &AccountSnapshot) -> U256 {
        self.total_debt_eth.saturating_sub(earlier.total_debt_eth)
    }
}

/// One `latestRoundData` answer together with the feed it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRound {
    pub feed: Address,
    pub round_id: u128,
    pub answer: I256,
    pub decimals: u8,
    pub updated_at: u64,
    pub answered_in_round: u128,
}

impl PriceRound {
    /// The answer as an unsigned price. Aggregators may report zero or negative
    /// answers while a round is incomplete; those are never used for pricing.
    pub fn price(&self) -> InteractResult<U256> {
        if self.answer <= I256::ZERO {
            return Err(InteractError::InvalidPrice {
                feed: self.feed,
                answer: self.answer,
            });
        }
        Ok(self.answer.into_raw())
    }

    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.updated_at)
    }

    /// `max_age == 0` disables the check.
    pub fn ensure_fresh(&self, now: u64, max_age: u64) -> InteractResult<()> {
        if max_age == 0 || self.age(now) <= max_age {
            return Ok(());
        }
        Err(InteractError::StalePrice {
            feed: self.feed,
            updated_at: self.updated_at,
            now,
            max_age,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestRateMode {
    #[default]
    Stable,
    Variable,
}

impl InterestRateMode {
    /// Value of the `interestRateMode` argument of `LendingPool.borrow`.
    pub fn as_u256(self) -> U256 {
        match self {
            InterestRateMode::Stable => U256::from(1u64),
            InterestRateMode::Variable => U256::from(2u64),
        }
    }
}

/// A mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}
