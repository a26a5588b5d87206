//! Typed bindings for the deployed contracts the interactor talks to.
//! Only the functions actually called are declared.

#![allow(missing_docs)]

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IWeth {
        function deposit() external payable;
    }

    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }

    #[sol(rpc)]
    interface ILendingPoolAddressesProvider {
        function getLendingPool() external view returns (address);
    }

    #[sol(rpc)]
    interface ILendingPool {
        function deposit(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;

        function borrow(
            address asset,
            uint256 amount,
            uint256 interestRateMode,
            uint16 referralCode,
            address onBehalfOf
        ) external;

        function getUserAccountData(address user)
            external
            view
            returns (
                uint256 totalCollateralETH,
                uint256 totalDebtETH,
                uint256 availableBorrowsETH,
                uint256 currentLiquidationThreshold,
                uint256 ltv,
                uint256 healthFactor
            );
    }

    #[sol(rpc)]
    interface AggregatorV3Interface {
        function decimals() external view returns (uint8);

        function latestRoundData()
            external
            view
            returns (
                uint80 roundId,
                int256 answer,
                uint256 startedAt,
                uint256 updatedAt,
                uint80 answeredInRound
            );
    }
}
