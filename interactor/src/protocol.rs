use alloy::primitives::{Address, U256};
use common_errors::InteractResult;
use common_structs::{AccountSnapshot, InterestRateMode, PriceRound, TxOutcome};

/// The remote calls the borrow flow is made of.
///
/// Transactions take `&mut self`: implementations sign with a single account
/// and are expected to wait for confirmation before returning.
#[allow(async_fn_in_trait)]
pub trait LendingProtocol {
    /// Account that signs every transaction.
    fn account(&self) -> Address;

    async fn native_balance(&self, account: Address) -> InteractResult<U256>;

    /// Converts `amount` native currency into the wrapped token.
    async fn wrap_native(&mut self, weth: Address, amount: U256) -> InteractResult<TxOutcome>;

    async fn token_balance(&self, token: Address, account: Address) -> InteractResult<U256>;

    async fn token_decimals(&self, token: Address) -> InteractResult<u8>;

    async fn token_symbol(&self, token: Address) -> InteractResult<String>;

    async fn approve(
        &mut self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> InteractResult<TxOutcome>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> InteractResult<U256>;

    /// Current pool address from the addresses provider.
    async fn lending_pool(&self, addresses_provider: Address) -> InteractResult<Address>;

    async fn deposit(
        &mut self,
        pool: Address,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
    ) -> InteractResult<TxOutcome>;

    async fn user_account_data(&self, pool: Address, user: Address)
        -> InteractResult<AccountSnapshot>;

    async fn latest_round(&self, feed: Address) -> InteractResult<PriceRound>;

    async fn latest_block_timestamp(&self) -> InteractResult<u64>;

    async fn borrow(
        &mut self,
        pool: Address,
        asset: Address,
        amount: U256,
        mode: InterestRateMode,
        on_behalf_of: Address,
    ) -> InteractResult<TxOutcome>;
}
