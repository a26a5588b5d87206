mod config;
mod contract_interact;
mod flow;
mod protocol;

pub use config::{
    AddressesConfig, BorrowSettings, ChainType, Config, CONFIG_FILE_ENV, PRIVATE_KEY_ENV,
};
pub use contract_interact::ContractInteract;
pub use flow::{BorrowFlow, FlowReport};
pub use protocol::LendingProtocol;

use std::{error::Error, process::ExitCode};

use clap::{Parser, Subcommand};
use common_errors::InteractResult;
use log::info;

/// Deposits WETH into the lending pool and borrows against it.
#[derive(Debug, Parser)]
#[command(name = "aave-borrow", version, about)]
pub struct InteractCli {
    /// Runs the whole flow when omitted.
    #[command(subcommand)]
    pub command: Option<InteractCliCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum InteractCliCommand {
    /// Wrap, approve, deposit and borrow
    Run,
    /// Wrap the deposit amount into WETH only
    GetWeth,
    /// Resolve the current lending pool address
    LendingPool,
    /// Print collateral, debt and borrow capacity of the account
    AccountData,
    /// Print the borrowed token's ETH price
    Price,
}

pub async fn borrow_cli() -> InteractResult<()> {
    let cli = InteractCli::parse();
    let config = Config::new()?;
    let settings = config.settings()?;

    let mut interact = ContractInteract::new(&config).await?;
    let mut flow = BorrowFlow::new(&mut interact, &settings);

    match cli.command.unwrap_or(InteractCliCommand::Run) {
        InteractCliCommand::Run => {
            let report = flow.run().await?;
            info!(
                "borrowed {} of {} against {} wei of WETH",
                report.borrowed, settings.borrow_token, report.deposited
            );
        }
        InteractCliCommand::GetWeth => {
            flow.get_weth().await?;
        }
        InteractCliCommand::LendingPool => {
            flow.lending_pool().await?;
        }
        InteractCliCommand::AccountData => {
            let lending_pool = flow.lending_pool().await?;
            flow.user_borrow_data(lending_pool).await?;
        }
        InteractCliCommand::Price => {
            flow.borrow_token_price().await?;
        }
    }
    Ok(())
}

/// 0 on success. Otherwise prints the error with its causes to stderr and returns 1.
pub fn exit_code(result: InteractResult<()>) -> ExitCode {
    let Err(err) = result else {
        return ExitCode::SUCCESS;
    };
    eprintln!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    ExitCode::from(1)
}
