use std::time::Duration;

use alloy::{
    eips::BlockNumberOrTag,
    network::{Ethereum, EthereumWallet},
    primitives::{Address, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
};
use common_constants::REFERRAL_CODE;
use common_errors::{InteractError, InteractResult};
use common_proxies::{
    AggregatorV3Interface, ILendingPool, ILendingPoolAddressesProvider, IWeth, IERC20,
};
use common_structs::{AccountSnapshot, InterestRateMode, PriceRound, TxOutcome};
use log::{debug, info};

use crate::{config::Config, protocol::LendingProtocol};

/// Talks to the deployed contracts over JSON-RPC, signing with one local key.
pub struct ContractInteract {
    provider: DynProvider,
    wallet_address: Address,
    confirmations: u64,
    confirmation_timeout: Duration,
}

impl ContractInteract {
    pub async fn new(config: &Config) -> InteractResult<Self> {
        let signer = config.signer()?;
        let wallet_address = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect(config.gateway_uri())
            .await?
            .erased();

        let chain_id = provider.get_chain_id().await?;
        info!(
            "connected to {} (chain id {chain_id}) as {wallet_address}",
            config.gateway_uri()
        );

        Ok(ContractInteract {
            provider,
            wallet_address,
            confirmations: config.confirmations,
            confirmation_timeout: config.confirmation_timeout(),
        })
    }

    /// Waits for the configured number of confirmations. A mined but reverted
    /// transaction is an error.
    async fn confirm(
        &self,
        step: &'static str,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> InteractResult<TxOutcome> {
        let hash = *pending.tx_hash();
        debug!("{step}: sent {hash}, waiting for {} confirmation(s)", self.confirmations);

        let receipt = tokio::time::timeout(
            self.confirmation_timeout,
            pending
                .with_required_confirmations(self.confirmations)
                .get_receipt(),
        )
        .await
        .map_err(|_| InteractError::ConfirmationTimeout {
            step,
            secs: self.confirmation_timeout.as_secs(),
        })??;

        if !receipt.status() {
            return Err(InteractError::TransactionFailed { step, hash });
        }

        info!(
            "{step}: {hash} mined in block {:?}, gas used {}",
            receipt.block_number, receipt.gas_used
        );
        Ok(TxOutcome {
            hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

impl LendingProtocol for ContractInteract {
    fn account(&self) -> Address {
        self.wallet_address
    }

    async fn native_balance(&self, account: Address) -> InteractResult<U256> {
        Ok(self.provider.get_balance(account).await?)
    }

    async fn wrap_native(&mut self, weth: Address, amount: U256) -> InteractResult<TxOutcome> {
        let pending = IWeth::new(weth, self.provider.clone())
            .deposit()
            .value(amount)
            .send()
            .await?;
        self.confirm("wrap", pending).await
    }

    async fn token_balance(&self, token: Address, account: Address) -> InteractResult<U256> {
        Ok(IERC20::new(token, self.provider.clone())
            .balanceOf(account)
            .call()
            .await?)
    }

    async fn token_decimals(&self, token: Address) -> InteractResult<u8> {
        Ok(IERC20::new(token, self.provider.clone())
            .decimals()
            .call()
            .await?)
    }

    async fn token_symbol(&self, token: Address) -> InteractResult<String> {
        Ok(IERC20::new(token, self.provider.clone())
            .symbol()
            .call()
            .await?)
    }

    async fn approve(
        &mut self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> InteractResult<TxOutcome> {
        let pending = IERC20::new(token, self.provider.clone())
            .approve(spender, amount)
            .send()
            .await?;
        self.confirm("approve", pending).await
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> InteractResult<U256> {
        Ok(IERC20::new(token, self.provider.clone())
            .allowance(owner, spender)
            .call()
            .await?)
    }

    async fn lending_pool(&self, addresses_provider: Address) -> InteractResult<Address> {
        Ok(
            ILendingPoolAddressesProvider::new(addresses_provider, self.provider.clone())
                .getLendingPool()
                .call()
                .await?,
        )
    }

    async fn deposit(
        &mut self,
        pool: Address,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
    ) -> InteractResult<TxOutcome> {
        let pending = ILendingPool::new(pool, self.provider.clone())
            .deposit(asset, amount, on_behalf_of, REFERRAL_CODE)
            .send()
            .await?;
        self.confirm("deposit", pending).await
    }

    async fn user_account_data(
        &self,
        pool: Address,
        user: Address,
    ) -> InteractResult<AccountSnapshot> {
        let data = ILendingPool::new(pool, self.provider.clone())
            .getUserAccountData(user)
            .call()
            .await?;

        Ok(AccountSnapshot {
            total_collateral_eth: data.totalCollateralETH,
            total_debt_eth: data.totalDebtETH,
            available_borrows_eth: data.availableBorrowsETH,
            current_liquidation_threshold: data.currentLiquidationThreshold,
            ltv: data.ltv,
            health_factor: data.healthFactor,
        })
    }

    async fn latest_round(&self, feed: Address) -> InteractResult<PriceRound> {
        let aggregator = AggregatorV3Interface::new(feed, self.provider.clone());
        let round = aggregator.latestRoundData().call().await?;
        let decimals = aggregator.decimals().call().await?;

        Ok(PriceRound {
            feed,
            round_id: round.roundId.to::<u128>(),
            answer: round.answer,
            decimals,
            updated_at: round.updatedAt.saturating_to::<u64>(),
            answered_in_round: round.answeredInRound.to::<u128>(),
        })
    }

    async fn latest_block_timestamp(&self) -> InteractResult<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or(InteractError::MissingLatestBlock)?;
        Ok(block.header.timestamp)
    }

    async fn borrow(
        &mut self,
        pool: Address,
        asset: Address,
        amount: U256,
        mode: InterestRateMode,
        on_behalf_of: Address,
    ) -> InteractResult<TxOutcome> {
        let pending = ILendingPool::new(pool, self.provider.clone())
            .borrow(asset, amount, mode.as_u256(), REFERRAL_CODE, on_behalf_of)
            .send()
            .await?;
        self.confirm("borrow", pending).await
    }
}
