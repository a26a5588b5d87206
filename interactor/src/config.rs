use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use alloy::{
    primitives::{utils::parse_ether, Address, U256},
    signers::local::PrivateKeySigner,
};
use common_constants::{
    BPS, DAI_ADDRESS, DAI_ETH_PRICE_FEED, DAI_TICKER, DEFAULT_BORROW_RATIO_BPS,
    DEFAULT_CONFIRMATIONS, DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_DEPOSIT_AMOUNT,
    DEFAULT_GATEWAY_URI, DEFAULT_MAX_PRICE_AGE_SECS, DEV_ACCOUNT_PRIVATE_KEY,
    LENDING_POOL_ADDRESSES_PROVIDER, WETH_ADDRESS,
};
use common_errors::{InteractError, InteractResult};
use common_structs::InterestRateMode;
use serde::Deserialize;

/// Config file read from the working directory.
const CONFIG_FILE: &str = "config.toml";
/// Overrides `CONFIG_FILE`.
pub const CONFIG_FILE_ENV: &str = "BORROW_CONFIG";
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    Real,
    Fork,
}

/// Contract address overrides, mainnet deployments otherwise.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressesConfig {
    pub weth: Option<Address>,
    pub addresses_provider: Option<Address>,
    pub price_feed: Option<Address>,
    pub borrow_token: Option<Address>,
}

/// Interactor configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_gateway_uri")]
    pub gateway_uri: String,
    pub chain_type: ChainType,
    #[serde(default = "default_deposit_amount")]
    pub deposit_amount: String,
    #[serde(default = "default_borrow_ratio_bps")]
    pub borrow_ratio_bps: u64,
    #[serde(default)]
    pub interest_rate_mode: InterestRateMode,
    /// Label for the borrowed token. Unset with an overridden `borrow_token`
    /// means the token's own `symbol()`.
    #[serde(default)]
    pub borrow_token_symbol: Option<String>,
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    #[serde(default = "default_max_price_age_secs")]
    pub max_price_age_secs: u64,
    #[serde(default)]
    pub addresses: AddressesConfig,
}

fn default_gateway_uri() -> String {
    DEFAULT_GATEWAY_URI.to_string()
}

fn default_deposit_amount() -> String {
    DEFAULT_DEPOSIT_AMOUNT.to_string()
}

fn default_borrow_ratio_bps() -> u64 {
    DEFAULT_BORROW_RATIO_BPS
}

fn default_confirmations() -> u64 {
    DEFAULT_CONFIRMATIONS
}

fn default_confirmation_timeout_secs() -> u64 {
    DEFAULT_CONFIRMATION_TIMEOUT_SECS
}

fn default_max_price_age_secs() -> u64 {
    DEFAULT_MAX_PRICE_AGE_SECS
}

/// Everything the borrow flow needs, resolved and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowSettings {
    pub weth: Address,
    pub addresses_provider: Address,
    pub price_feed: Address,
    pub borrow_token: Address,
    /// `None` reads the symbol from the token contract.
    pub borrow_token_symbol: Option<String>,
    pub deposit_amount: U256,
    pub borrow_ratio_bps: u64,
    pub interest_rate_mode: InterestRateMode,
    pub max_price_age_secs: u64,
}

impl Default for BorrowSettings {
    fn default() -> Self {
        BorrowSettings {
            weth: WETH_ADDRESS,
            addresses_provider: LENDING_POOL_ADDRESSES_PROVIDER,
            price_feed: DAI_ETH_PRICE_FEED,
            borrow_token: DAI_ADDRESS,
            borrow_token_symbol: Some(DAI_TICKER.to_string()),
            // 0.02 ETH
            deposit_amount: U256::from(20_000_000_000_000_000u64),
            borrow_ratio_bps: DEFAULT_BORROW_RATIO_BPS,
            interest_rate_mode: InterestRateMode::Stable,
            max_price_age_secs: DEFAULT_MAX_PRICE_AGE_SECS,
        }
    }
}

impl Config {
    /// Reads the file named by `BORROW_CONFIG`, or `config.toml`.
    pub fn new() -> InteractResult<Self> {
        let path = std::env::var_os(CONFIG_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        Self::load(&path)
    }

    pub fn load(path: &Path) -> InteractResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| InteractError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> InteractResult<Self> {
        let config: Config =
            toml::from_str(content).map_err(|source| InteractError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> InteractResult<()> {
        if self.gateway_uri.trim().is_empty() {
            return Err(invalid("gateway_uri", "must not be empty"));
        }
        if self.borrow_ratio_bps == 0 || self.borrow_ratio_bps > BPS {
            return Err(invalid(
                "borrow_ratio_bps",
                format!("must be in 1..={BPS}, got {}", self.borrow_ratio_bps),
            ));
        }
        if self.confirmations == 0 {
            return Err(invalid("confirmations", "must be at least 1"));
        }
        if self.confirmation_timeout_secs == 0 {
            return Err(invalid("confirmation_timeout_secs", "must be at least 1"));
        }
        if let Some(symbol) = &self.borrow_token_symbol {
            if symbol.trim().is_empty() {
                return Err(invalid("borrow_token_symbol", "must not be empty"));
            }
        }
        self.deposit_amount_wei()?;
        Ok(())
    }

    pub fn gateway_uri(&self) -> &str {
        &self.gateway_uri
    }

    pub fn use_fork(&self) -> bool {
        self.chain_type == ChainType::Fork
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn deposit_amount_wei(&self) -> InteractResult<U256> {
        let value = self.deposit_amount.trim();
        // parse_ether accepts a sign and returns the absolute value
        if value.starts_with('-') {
            return Err(InteractError::InvalidAmount {
                value: self.deposit_amount.clone(),
                reason: "deposit must be greater than zero".to_string(),
            });
        }
        let amount = parse_ether(value).map_err(|err| {
            InteractError::InvalidAmount {
                value: self.deposit_amount.clone(),
                reason: err.to_string(),
            }
        })?;
        if amount.is_zero() {
            return Err(InteractError::InvalidAmount {
                value: self.deposit_amount.clone(),
                reason: "deposit must be greater than zero".to_string(),
            });
        }
        Ok(amount)
    }

    pub fn settings(&self) -> InteractResult<BorrowSettings> {
        let defaults = BorrowSettings::default();
        let borrow_token_symbol = match (&self.borrow_token_symbol, self.addresses.borrow_token) {
            (Some(symbol), _) => Some(symbol.trim().to_string()),
            (None, Some(_)) => None,
            (None, None) => defaults.borrow_token_symbol,
        };
        Ok(BorrowSettings {
            weth: self.addresses.weth.unwrap_or(defaults.weth),
            addresses_provider: self
                .addresses
                .addresses_provider
                .unwrap_or(defaults.addresses_provider),
            price_feed: self.addresses.price_feed.unwrap_or(defaults.price_feed),
            borrow_token: self.addresses.borrow_token.unwrap_or(defaults.borrow_token),
            borrow_token_symbol,
            deposit_amount: self.deposit_amount_wei()?,
            borrow_ratio_bps: self.borrow_ratio_bps,
            interest_rate_mode: self.interest_rate_mode,
            max_price_age_secs: self.max_price_age_secs,
        })
    }

    /// Signer from `PRIVATE_KEY`; a fork falls back to the dev node's first account.
    pub fn signer(&self) -> InteractResult<PrivateKeySigner> {
        self.signer_from(std::env::var(PRIVATE_KEY_ENV).ok())
    }

    pub fn signer_from(&self, private_key: Option<String>) -> InteractResult<PrivateKeySigner> {
        let key = match private_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => key,
            None if self.use_fork() => DEV_ACCOUNT_PRIVATE_KEY.to_string(),
            None => return Err(InteractError::MissingPrivateKey),
        };
        PrivateKeySigner::from_str(key.trim()).map_err(InteractError::InvalidPrivateKey)
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> InteractError {
    InteractError::InvalidConfig {
        key,
        reason: reason.into(),
    }
}
