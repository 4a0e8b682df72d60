// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain descriptors: which factories to scan on which chain

use alloy_chains::Chain;
use alloy_primitives::{Address, BlockNumber, ChainId};
use serde::{Deserialize, Serialize};

use crate::config::constants::sushiswap_v2;
use crate::config::DiscoveryConfig;
use crate::config_types::WindowSize;

/// A DEX factory contract and the block it was deployed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryDeployment {
    /// Factory contract address
    pub contract_address: Address,
    /// Block the factory was deployed at; nothing older needs scanning
    pub deployment_block: BlockNumber,
}

impl FactoryDeployment {
    /// Create a new factory deployment
    pub const fn new(contract_address: Address, deployment_block: BlockNumber) -> Self {
        Self {
            contract_address,
            deployment_block,
        }
    }

    /// First block to scan given the chain's checkpoint
    ///
    /// The checkpoint is the last block already scanned, so scanning resumes
    /// right after it, unless the factory was deployed later than that.
    ///
    /// ```
    /// use pairscan::FactoryDeployment;
    /// use alloy_primitives::Address;
    ///
    /// let factory = FactoryDeployment::new(Address::ZERO, 1_000);
    /// assert_eq!(factory.resume_block(None), 1_000);
    /// assert_eq!(factory.resume_block(Some(500)), 1_000);
    /// assert_eq!(factory.resume_block(Some(5_000)), 5_001);
    /// ```
    pub fn resume_block(&self, checkpoint: Option<BlockNumber>) -> BlockNumber {
        match checkpoint {
            Some(last_scanned) => last_scanned.saturating_add(1).max(self.deployment_block),
            None => self.deployment_block,
        }
    }
}

/// Everything the scanner needs to know about one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    /// EIP-155 chain id
    pub chain_id: ChainId,
    /// Factories scanned on this chain
    pub factories: Vec<FactoryDeployment>,
    /// Blocks per log query for this chain
    pub window_size: WindowSize,
}

impl ChainDescriptor {
    /// Create a descriptor with the default window size
    pub fn new(chain_id: ChainId, factories: Vec<FactoryDeployment>) -> Self {
        Self {
            chain_id,
            factories,
            window_size: WindowSize::DEFAULT,
        }
    }

    /// Set the window size
    pub fn with_window_size(mut self, window_size: WindowSize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Human-readable chain name for logs (`mainnet`, `bsc`, or the bare id)
    pub fn chain(&self) -> Chain {
        Chain::from_id(self.chain_id)
    }
}

/// Descriptors for every chain with a known SushiSwap V2 factory
///
/// Window sizes come from `config`, so chain overrides (e.g. BSC) apply.
pub fn sushiswap_v2_chains(config: &DiscoveryConfig) -> Vec<ChainDescriptor> {
    let mut chains: Vec<ChainDescriptor> = Vec::new();

    for &(chain_id, factory, deployment_block) in sushiswap_v2::DEPLOYMENTS {
        let deployment = FactoryDeployment::new(factory, deployment_block);
        match chains.iter_mut().find(|c| c.chain_id == chain_id) {
            Some(existing) => existing.factories.push(deployment),
            None => chains.push(
                ChainDescriptor::new(chain_id, vec![deployment])
                    .with_window_size(config.get_window_size(chain_id)),
            ),
        }
    }

    chains
}
