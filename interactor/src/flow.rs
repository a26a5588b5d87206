use alloy::primitives::{Address, U256};
use common_constants::WAD_PRECISION;
use common_errors::{InteractError, InteractResult};
use common_math::{borrow_amount, format_token_amount};
use common_structs::{AccountSnapshot, PriceRound};
use log::info;

use crate::{config::BorrowSettings, protocol::LendingProtocol};

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct FlowReport {
    pub lending_pool: Address,
    pub deposited: U256,
    pub before_borrow: AccountSnapshot,
    pub price: PriceRound,
    pub borrowed: U256,
    pub after_borrow: AccountSnapshot,
}

/// Wrap, approve, deposit, price and borrow, one confirmed step after another.
/// Nothing is rolled back: a failure after the deposit leaves the collateral in the pool.
pub struct BorrowFlow<'a, P: LendingProtocol> {
    protocol: &'a mut P,
    settings: &'a BorrowSettings,
}

impl<'a, P: LendingProtocol> BorrowFlow<'a, P> {
    pub fn new(protocol: &'a mut P, settings: &'a BorrowSettings) -> Self {
        BorrowFlow { protocol, settings }
    }

    pub async fn run(&mut self) -> InteractResult<FlowReport> {
        let account = self.protocol.account();
        let amount = self.settings.deposit_amount;

        // the pool only takes tokens, so ETH goes in as WETH
        self.get_weth().await?;

        let lending_pool = self.lending_pool().await?;

        self.approve_erc20(self.settings.weth, lending_pool, amount)
            .await?;
        self.deposit(lending_pool, amount).await?;

        let before_borrow = self.user_borrow_data(lending_pool).await?;
        if !before_borrow.has_collateral() {
            return Err(InteractError::NoCollateral(account));
        }
        if !before_borrow.can_borrow() {
            return Err(InteractError::NoBorrowCapacity(account));
        }

        let price = self.borrow_token_price().await?;
        let borrowed = self.amount_to_borrow(&before_borrow, &price).await?;
        self.borrow(lending_pool, borrowed).await?;

        let after_borrow = self.user_borrow_data(lending_pool).await?;

        Ok(FlowReport {
            lending_pool,
            deposited: amount,
            before_borrow,
            price,
            borrowed,
            after_borrow,
        })
    }

    /// Wraps the configured deposit amount. Returns the resulting WETH balance.
    pub async fn get_weth(&mut self) -> InteractResult<U256> {
        let account = self.protocol.account();
        let amount = self.settings.deposit_amount;

        let available = self.protocol.native_balance(account).await?;
        if available < amount {
            return Err(InteractError::InsufficientNativeBalance {
                account,
                required: amount,
                available,
            });
        }

        let outcome = self.protocol.wrap_native(self.settings.weth, amount).await?;
        info!("wrapped {amount} wei in {}", outcome.hash);

        let balance = self
            .protocol
            .token_balance(self.settings.weth, account)
            .await?;
        println!("Got {} WETH", format_token_amount(balance, WAD_PRECISION));
        Ok(balance)
    }

    pub async fn lending_pool(&mut self) -> InteractResult<Address> {
        let lending_pool = self
            .protocol
            .lending_pool(self.settings.addresses_provider)
            .await?;
        println!("LendingPool address: {lending_pool}");
        Ok(lending_pool)
    }

    pub async fn approve_erc20(
        &mut self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> InteractResult<()> {
        let account = self.protocol.account();
        self.protocol.approve(token, spender, amount).await?;

        let allowance = self.protocol.allowance(token, account, spender).await?;
        if allowance < amount {
            return Err(InteractError::InsufficientAllowance {
                token,
                spender,
                allowance,
                required: amount,
            });
        }
        println!("Approved!");
        Ok(())
    }

    pub async fn deposit(&mut self, lending_pool: Address, amount: U256) -> InteractResult<()> {
        let account = self.protocol.account();
        println!("Depositing...");
        self.protocol
            .deposit(lending_pool, self.settings.weth, amount, account)
            .await?;
        println!("Deposited!");
        Ok(())
    }

    pub async fn user_borrow_data(
        &mut self,
        lending_pool: Address,
    ) -> InteractResult<AccountSnapshot> {
        let account = self.protocol.account();
        let snapshot = self
            .protocol
            .user_account_data(lending_pool, account)
            .await?;

        println!(
            "You have {} worth of ETH deposited.",
            snapshot.total_collateral_eth
        );
        println!("You have {} worth of ETH borrowed.", snapshot.total_debt_eth);
        println!(
            "You can borrow {} worth of ETH.",
            snapshot.available_borrows_eth
        );
        Ok(snapshot)
    }

    /// Latest feed round, rejected when the answer is not positive or older than
    /// `max_price_age_secs` relative to the latest block.
    pub async fn borrow_token_price(&mut self) -> InteractResult<PriceRound> {
        let round = self.protocol.latest_round(self.settings.price_feed).await?;
        let price = round.price()?;

        let now = self.protocol.latest_block_timestamp().await?;
        round.ensure_fresh(now, self.settings.max_price_age_secs)?;

        let symbol = self.borrow_token_symbol().await?;
        println!("The {symbol}/ETH price is {price}");
        info!(
            "round {} updated {}s ago",
            round.round_id,
            round.age(now)
        );
        Ok(round)
    }

    pub async fn amount_to_borrow(
        &mut self,
        snapshot: &AccountSnapshot,
        round: &PriceRound,
    ) -> InteractResult<U256> {
        let token_decimals = self
            .protocol
            .token_decimals(self.settings.borrow_token)
            .await?;
        let amount = borrow_amount(
            snapshot.available_borrows_eth,
            round.price()?,
            round.decimals,
            token_decimals,
            self.settings.borrow_ratio_bps,
        )?;

        let symbol = self.borrow_token_symbol().await?;
        println!(
            "You can borrow {} {symbol}",
            format_token_amount(amount, token_decimals)
        );
        Ok(amount)
    }

    /// Configured ticker, otherwise the token's own `symbol()`.
    pub async fn borrow_token_symbol(&mut self) -> InteractResult<String> {
        match &self.settings.borrow_token_symbol {
            Some(symbol) => Ok(symbol.clone()),
            None => {
                self.protocol
                    .token_symbol(self.settings.borrow_token)
                    .await
            }
        }
    }

    pub async fn borrow(&mut self, lending_pool: Address, amount: U256) -> InteractResult<()> {
        let account = self.protocol.account();
        self.protocol
            .borrow(
                lending_pool,
                self.settings.borrow_token,
                amount,
                self.settings.interest_rate_mode,
                account,
            )
            .await?;
        println!("You've borrowed!");
        Ok(())
    }
}
