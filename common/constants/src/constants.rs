use alloy_primitives::{address, Address};

/// Wrapped ether (WETH9) on Ethereum mainnet.
pub const WETH_ADDRESS: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// Aave v2 `LendingPoolAddressesProvider`, resolves the current pool after upgrades.
pub const LENDING_POOL_ADDRESSES_PROVIDER: Address =
    address!("B53C1a33016B2DC2fF3653530bfF1848a515c8c5");

/// Chainlink DAI/ETH aggregator.
pub const DAI_ETH_PRICE_FEED: Address = address!("773616E4d11A78F511299002da57A0a94577F1f4");

pub const DAI_ADDRESS: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");
pub const DAI_TICKER: &str = "DAI";

/// 0.02 ETH
pub const DEFAULT_DEPOSIT_AMOUNT: &str = "0.02";

pub const BPS: u64 = 10_000; // 100%
/// Share of the available borrows actually borrowed (95%)
pub const DEFAULT_BORROW_RATIO_BPS: u64 = 9_500;

/// Aave v2 reports account data in ETH wei
pub const WAD: u128 = 1_000_000_000_000_000_000;
pub const WAD_PRECISION: u8 = 18;
pub const BASE_CURRENCY_DECIMALS: u8 = WAD_PRECISION;

pub const REFERRAL_CODE: u16 = 0;

pub const DEFAULT_CONFIRMATIONS: u64 = 1;
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 120;
/// Chainlink DAI/ETH heartbeat is 24h, allow one missed update.
pub const DEFAULT_MAX_PRICE_AGE_SECS: u64 = 2 * 86_400;

pub const DEFAULT_GATEWAY_URI: &str = "http://127.0.0.1:8545";

/// Account #0 of the hardhat / anvil development mnemonic, funded on every local fork.
pub const DEV_ACCOUNT_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
