use std::path::PathBuf;

use alloy::{
    contract::Error as ContractError,
    primitives::{Address, TxHash, I256, U256},
    providers::PendingTransactionError,
    transports::TransportError,
};

pub type InteractResult<T> = Result<T, InteractError>;

/// Every failure of a run. None of them is recovered: the first one ends the process.
#[derive(Debug, thiserror::Error)]
pub enum InteractError {
    #[error("Failed to read config file {path}.")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}.")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config value for `{key}`: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("PRIVATE_KEY must be set when chain_type is `real`.")]
    MissingPrivateKey,

    #[error("Invalid private key.")]
    InvalidPrivateKey(#[source] alloy::signers::local::LocalSignerError),

    #[error("Invalid address `{0}`.")]
    InvalidAddress(String),

    #[error("Invalid amount `{value}`: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("RPC request failed.")]
    Transport(#[from] TransportError),

    #[error("Contract call failed.")]
    Contract(#[from] ContractError),

    #[error("Failed to watch pending transaction.")]
    PendingTransaction(#[from] PendingTransactionError),

    /// Raised by protocol implementations that report a revert without an alloy error.
    #[error("{call} reverted: {reason}")]
    Reverted { call: &'static str, reason: String },

    #[error("{step}: no confirmation after {secs}s.")]
    ConfirmationTimeout { step: &'static str, secs: u64 },

    #[error("{step}: transaction {hash} failed on chain.")]
    TransactionFailed { step: &'static str, hash: TxHash },

    #[error("Not enough native balance on {account}: required {required}, available {available}.")]
    InsufficientNativeBalance {
        account: Address,
        required: U256,
        available: U256,
    },

    #[error("Allowance of {spender} on {token} is {allowance}, below the deposit of {required}.")]
    InsufficientAllowance {
        token: Address,
        spender: Address,
        allowance: U256,
        required: U256,
    },

    #[error("Latest block not available.")]
    MissingLatestBlock,

    #[error("No collateral recorded for {0} after deposit.")]
    NoCollateral(Address),

    #[error("No borrow capacity available for {0}.")]
    NoBorrowCapacity(Address),

    #[error("Price feed {feed} returned a non-positive answer {answer}.")]
    InvalidPrice { feed: Address, answer: I256 },

    #[error("Price feed {feed} is stale: updated at {updated_at}, now {now}, max age {max_age}s.")]
    StalePrice {
        feed: Address,
        updated_at: u64,
        now: u64,
        max_age: u64,
    },

    #[error("Computed borrow amount is zero.")]
    ZeroBorrowAmount,

    #[error("Arithmetic overflow in {0}.")]
    Overflow(&'static str),
}
