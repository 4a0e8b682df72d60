// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP providers for the scanned chains
//!
//! Every chain is reached through a bare `RootProvider<AnyNetwork>`: discovery
//! only issues `eth_blockNumber`, `eth_getLogs` and ERC20 view calls, none of
//! which need network-specific types.
//!
//! Endpoints come from the environment, one variable per chain id:
//!
//! ```text
//! RPC_URI_FOR_1=https://eth.llamarpc.com
//! RPC_URI_FOR_42161=https://arb1.arbitrum.io/rpc
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use pairscan::provider::ProviderPool;
//!
//! let pool = ProviderPool::from_env([1, 137, 42161]);
//! let client = pool.client_for(1)?;
//! let head = client.current_head().await?;
//! ```

mod factory;
mod pool;

pub use factory::create_http_provider;
pub use pool::ProviderPool;

use alloy_network::AnyNetwork;
use alloy_primitives::ChainId;

/// Type alias for an HTTP provider using AnyNetwork
pub type AnyHttpProvider = alloy_provider::RootProvider<AnyNetwork>;

/// Environment variable holding the RPC endpoint of `chain_id`
pub fn rpc_url_env_var(chain_id: ChainId) -> String {
    format!("RPC_URI_FOR_{chain_id}")
}

/// RPC endpoint of `chain_id` from the environment, if set and non-empty
pub fn rpc_url_for_chain(chain_id: ChainId) -> Option<String> {
    dotenvy::var(rpc_url_env_var(chain_id))
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name() {
        assert_eq!(rpc_url_env_var(56), "RPC_URI_FOR_56");
    }

    #[test]
    fn test_unset_chain_has_no_url() {
        assert_eq!(rpc_url_for_chain(987_654_321), None);
    }
}
