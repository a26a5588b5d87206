#![allow(dead_code)]

use std::collections::HashMap;

use alloy::primitives::{address, Address, TxHash, I256, U256};
use borrow_interact::{BorrowSettings, LendingProtocol};
use common_constants::{BPS, WAD};
use common_errors::{InteractError, InteractResult};
use common_math::{mul_div_floor, token_units_to_eth};
use common_structs::{AccountSnapshot, InterestRateMode, PriceRound, TxOutcome};

pub const ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
/// Aave v2 mainnet pool proxy
pub const POOL: Address = address!("7d2768dE32b0b80b7a3454c06BdAc94A69DDc7A9");

pub const DAI_ETH_ANSWER: u64 = 500_000_000_000_000; // 0.0005 ETH
pub const WETH_LTV_BPS: u64 = 8_000;
pub const WETH_LIQUIDATION_THRESHOLD_BPS: u64 = 8_250;
pub const BLOCK_TIMESTAMP: u64 = 1_700_000_000;

pub fn eth(milli: u64) -> U256 {
    U256::from(milli) * U256::from(WAD / 1_000)
}

/// In-memory stand-in for WETH, the addresses provider, the pool and the price feed.
/// WETH collateral is valued 1:1 in ETH, borrows at the feed answer.
pub struct ProtocolMock {
    pub settings: BorrowSettings,
    pub account: Address,
    pub native: U256,
    pub weth: U256,
    pub borrowed_tokens: U256,
    pub allowances: HashMap<(Address, Address, Address), U256>,
    /// (token, spender, amount) of every approve sent
    pub approvals: Vec<(Address, Address, U256)>,
    pub collateral_eth: U256,
    pub debt_eth: U256,
    pub ltv_bps: u64,
    pub answer: I256,
    pub feed_decimals: u8,
    pub token_decimals: u8,
    pub token_symbol: String,
    pub updated_at: u64,
    pub block_timestamp: u64,
    pub price_feed_reverts: bool,
    /// Names of the transactions sent, in order
    pub sent: Vec<&'static str>,
}

impl ProtocolMock {
    pub fn new(settings: BorrowSettings) -> Self {
        ProtocolMock {
            settings,
            account: ACCOUNT,
            native: eth(10_000),
            weth: U256::ZERO,
            borrowed_tokens: U256::ZERO,
            allowances: HashMap::new(),
            approvals: Vec::new(),
            collateral_eth: U256::ZERO,
            debt_eth: U256::ZERO,
            ltv_bps: WETH_LTV_BPS,
            answer: I256::from_raw(U256::from(DAI_ETH_ANSWER)),
            feed_decimals: 18,
            token_decimals: 18,
            token_symbol: "DAI".to_string(),
            updated_at: BLOCK_TIMESTAMP - 600,
            block_timestamp: BLOCK_TIMESTAMP,
            price_feed_reverts: false,
            sent: Vec::new(),
        }
    }

    pub fn sent(&self, name: &str) -> usize {
        self.sent.iter().filter(|sent| **sent == name).count()
    }

    fn tx(&mut self, name: &'static str) -> TxOutcome {
        self.sent.push(name);
        TxOutcome {
            hash: TxHash::with_last_byte(self.sent.len() as u8),
            block_number: Some(self.sent.len() as u64),
            gas_used: 21_000,
        }
    }

    fn available_borrows(&self) -> U256 {
        mul_div_floor(
            self.collateral_eth,
            U256::from(self.ltv_bps),
            U256::from(BPS),
        )
        .unwrap_or_default()
        .saturating_sub(self.debt_eth)
    }

    fn price(&self) -> U256 {
        self.answer.into_raw()
    }
}

fn revert(call: &'static str, reason: &str) -> InteractError {
    InteractError::Reverted {
        call,
        reason: reason.to_string(),
    }
}

impl LendingProtocol for ProtocolMock {
    fn account(&self) -> Address {
        self.account
    }

    async fn native_balance(&self, account: Address) -> InteractResult<U256> {
        if account == self.account {
            Ok(self.native)
        } else {
            Ok(U256::ZERO)
        }
    }

    async fn wrap_native(&mut self, weth: Address, amount: U256) -> InteractResult<TxOutcome> {
        if weth != self.settings.weth {
            return Err(revert("deposit", "not a WETH contract"));
        }
        if self.native < amount {
            return Err(revert("deposit", "insufficient funds for transfer"));
        }
        self.native -= amount;
        self.weth += amount;
        Ok(self.tx("wrap"))
    }

    async fn token_balance(&self, token: Address, account: Address) -> InteractResult<U256> {
        if account != self.account {
            return Ok(U256::ZERO);
        }
        if token == self.settings.weth {
            Ok(self.weth)
        } else if token == self.settings.borrow_token {
            Ok(self.borrowed_tokens)
        } else {
            Err(revert("balanceOf", "unknown token"))
        }
    }

    async fn token_decimals(&self, token: Address) -> InteractResult<u8> {
        if token == self.settings.borrow_token {
            Ok(self.token_decimals)
        } else {
            Ok(18)
        }
    }

    async fn token_symbol(&self, token: Address) -> InteractResult<String> {
        if token == self.settings.borrow_token {
            Ok(self.token_symbol.clone())
        } else {
            Err(revert("symbol", "unknown token"))
        }
    }

    async fn approve(
        &mut self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> InteractResult<TxOutcome> {
        self.allowances.insert((token, self.account, spender), amount);
        self.approvals.push((token, spender, amount));
        Ok(self.tx("approve"))
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> InteractResult<U256> {
        Ok(self
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn lending_pool(&self, addresses_provider: Address) -> InteractResult<Address> {
        if addresses_provider == self.settings.addresses_provider {
            Ok(POOL)
        } else {
            Err(revert("getLendingPool", "not an addresses provider"))
        }
    }

    async fn deposit(
        &mut self,
        pool: Address,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
    ) -> InteractResult<TxOutcome> {
        if pool != POOL || asset != self.settings.weth || on_behalf_of != self.account {
            return Err(revert("deposit", "unexpected arguments"));
        }
        let key = (asset, self.account, pool);
        let allowance = self.allowances.get(&key).copied().unwrap_or_default();
        if allowance < amount || self.weth < amount {
            return Err(revert("deposit", "SafeERC20: low-level call failed"));
        }
        self.allowances.insert(key, allowance - amount);
        self.weth -= amount;
        self.collateral_eth += amount;
        Ok(self.tx("deposit"))
    }

    async fn user_account_data(
        &self,
        pool: Address,
        user: Address,
    ) -> InteractResult<AccountSnapshot> {
        if pool != POOL {
            return Err(revert("getUserAccountData", "not a pool"));
        }
        if user != self.account {
            return Ok(AccountSnapshot::default());
        }
        let health_factor = if self.debt_eth.is_zero() {
            U256::MAX
        } else {
            mul_div_floor(
                self.collateral_eth * U256::from(WETH_LIQUIDATION_THRESHOLD_BPS),
                U256::from(WAD),
                self.debt_eth * U256::from(BPS),
            )
            .unwrap_or_default()
        };
        Ok(AccountSnapshot {
            total_collateral_eth: self.collateral_eth,
            total_debt_eth: self.debt_eth,
            available_borrows_eth: self.available_borrows(),
            current_liquidation_threshold: U256::from(WETH_LIQUIDATION_THRESHOLD_BPS),
            ltv: U256::from(self.ltv_bps),
            health_factor,
        })
    }

    async fn latest_round(&self, feed: Address) -> InteractResult<PriceRound> {
        if self.price_feed_reverts || feed != self.settings.price_feed {
            return Err(revert("latestRoundData", "no data present"));
        }
        Ok(PriceRound {
            feed,
            round_id: 36_893_488_147_419_103_822,
            answer: self.answer,
            decimals: self.feed_decimals,
            updated_at: self.updated_at,
            answered_in_round: 36_893_488_147_419_103_822,
        })
    }

    async fn latest_block_timestamp(&self) -> InteractResult<u64> {
        Ok(self.block_timestamp)
    }

    async fn borrow(
        &mut self,
        pool: Address,
        asset: Address,
        amount: U256,
        mode: InterestRateMode,
        on_behalf_of: Address,
    ) -> InteractResult<TxOutcome> {
        if pool != POOL || asset != self.settings.borrow_token || on_behalf_of != self.account {
            return Err(revert("borrow", "unexpected arguments"));
        }
        if mode != self.settings.interest_rate_mode {
            return Err(revert("borrow", "unexpected rate mode"));
        }
        let value = token_units_to_eth(
            amount,
            self.price(),
            self.feed_decimals,
            self.token_decimals,
        )
        .ok_or_else(|| revert("borrow", "overflow"))?;
        // Aave v2 COLLATERAL_CANNOT_COVER_NEW_BORROW
        if value > self.available_borrows() {
            return Err(revert("borrow", "11"));
        }
        self.debt_eth += value;
        self.borrowed_tokens += amount;
        Ok(self.tx("borrow"))
    }
}
