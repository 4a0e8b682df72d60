//! Well-known addresses and constants
//!
//! This module centralizes the factory deployments and placeholder addresses
//! used throughout the pairscan crate.

use alloy_primitives::{address, Address, BlockNumber, ChainId};

/// SushiSwap V2 factory deployments
pub mod sushiswap_v2 {
    use super::*;

    /// Factory on Ethereum mainnet
    ///
    /// Contract: 0xC0AEe478e3658e2610c5F7A4A2E1777cE9e4f2Ac
    pub const MAINNET_FACTORY: Address = address!("c0aee478e3658e2610c5f7a4a2e1777ce9e4f2ac");

    /// Factory shared by most sidechains and L2s (same CREATE address)
    ///
    /// Contract: 0xc35DADB65012eC5796536bD9864eD8773aBc74C4
    pub const MULTICHAIN_FACTORY: Address = address!("c35dadb65012ec5796536bd9864ed8773abc74c4");

    /// Factory on Optimism
    ///
    /// Contract: 0xFbc12984689e5f15626Bad03Ad60160Fe98B303C
    pub const OPTIMISM_FACTORY: Address = address!("fbc12984689e5f15626bad03ad60160fe98b303c");

    /// Factory on Base
    ///
    /// Contract: 0x71524B4f93c58fcbF659783284E38825f0622859
    pub const BASE_FACTORY: Address = address!("71524b4f93c58fcbf659783284e38825f0622859");

    /// `(chain id, factory, deployment block)` for every supported chain
    pub const DEPLOYMENTS: &[(ChainId, Address, BlockNumber)] = &[
        (1, MAINNET_FACTORY, 10_794_229),
        (10, OPTIMISM_FACTORY, 110_882_086),
        (56, MULTICHAIN_FACTORY, 5_205_069),
        (100, MULTICHAIN_FACTORY, 14_735_904),
        (137, MULTICHAIN_FACTORY, 11_333_218),
        (250, MULTICHAIN_FACTORY, 2_457_879),
        (8453, BASE_FACTORY, 2_631_214),
        (42161, MULTICHAIN_FACTORY, 70),
    ];
}

/// Addresses that show up in pairs but are never real ERC20 tokens
pub mod ignored {
    use super::*;

    /// Placeholder used by aggregators and routers for the native coin
    ///
    /// Contract: 0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE
    pub const NATIVE_PLACEHOLDER: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

    /// The zero address
    pub const ZERO: Address = Address::ZERO;
}

/// Metadata-bag key prefix for the per-chain checkpoint
pub const CHECKPOINT_KEY_PREFIX: &str = "lastBlockSyncFor_";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_factory() {
        assert_eq!(
            sushiswap_v2::MAINNET_FACTORY,
            address!("c0aee478e3658e2610c5f7a4a2e1777ce9e4f2ac")
        );
    }

    #[test]
    fn test_deployments_are_unique_per_chain() {
        let mut chains: Vec<_> = sushiswap_v2::DEPLOYMENTS.iter().map(|d| d.0).collect();
        chains.sort_unstable();
        chains.dedup();
        assert_eq!(chains.len(), sushiswap_v2::DEPLOYMENTS.len());
    }
}
