//! Solidity interfaces for the router, its factory and ERC-20 tokens

use alloy_sol_types::sol;

// ============================================
// SOLIDITY INTERFACES
// ============================================

sol! {
    /// Minimal ERC-20 surface (tokens and pool-share tokens)
    #[derive(Debug)]
    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// Mute router on zkSync Era
    #[derive(Debug)]
    interface IMuteRouter {
        function factory() external view returns (address);

        function getAmountsOut(uint256 amountIn, address[] memory path)
            external view returns (uint256[] memory amounts);

        function swapExactTokensForTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline,
            bool[] calldata stable
        ) external returns (uint256[] memory amounts);

        function addLiquidity(
            address tokenA,
            address tokenB,
            uint256 amountADesired,
            uint256 amountBDesired,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline,
            uint256 feeType,
            bool stable
        ) external returns (uint256 amountA, uint256 amountB, uint256 liquidity);

        function removeLiquidity(
            address tokenA,
            address tokenB,
            uint256 liquidity,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline,
            bool stable
        ) external returns (uint256 amountA, uint256 amountB);
    }

    /// Pair registry behind the router
    #[derive(Debug)]
    interface IMuteFactory {
        function getPair(address tokenA, address tokenB, bool stable)
            external view returns (address pair);
    }
}
