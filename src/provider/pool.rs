// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-chain provider pool
//!
//! The [`ProviderPool`] holds one provider per chain id and is built once at
//! startup. It resolves scan clients for the orchestrator through
//! [`ChainClients`] and hands the same providers to the metadata lookup, so
//! both phases share connections.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::ChainId;
use tracing::{debug, info, warn};

use super::{create_http_provider, rpc_url_env_var, rpc_url_for_chain, AnyHttpProvider};
use crate::errors::RpcError;
use crate::metadata::Erc20MetadataLookup;
use crate::rpc::{AlloyChainClient, ChainClients, ChainRpcClient};

/// A pool of providers indexed by chain id
#[derive(Debug, Default, Clone)]
pub struct ProviderPool {
    providers: HashMap<ChainId, AnyHttpProvider>,
}

impl ProviderPool {
    /// Create a new empty provider pool
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from `RPC_URI_FOR_<chainID>` variables
    ///
    /// Chains without a variable, or with an unparseable URL, are left out
    /// with a warning. The orchestrator later reports them as failed.
    pub fn from_env(chain_ids: impl IntoIterator<Item = ChainId>) -> Self {
        let mut pool = Self::new();
        for chain_id in chain_ids {
            let Some(url) = rpc_url_for_chain(chain_id) else {
                warn!(
                    chain_id,
                    env_var = rpc_url_env_var(chain_id),
                    "No RPC endpoint configured"
                );
                continue;
            };
            if let Err(e) = pool.add(chain_id, &url) {
                warn!(chain_id, error = %e, "Skipping chain with invalid RPC endpoint");
            }
        }
        pool
    }

    /// Add a provider for a specific chain
    ///
    /// If a provider already exists for this chain, it will be replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn add(&mut self, chain_id: ChainId, url: &str) -> Result<(), RpcError> {
        let provider = create_http_provider(url)?;

        if self.providers.insert(chain_id, provider).is_some() {
            debug!(chain_id, "Replacing existing provider");
        } else {
            info!(chain_id, "Added provider to pool");
        }
        Ok(())
    }

    /// Get a provider for a specific chain
    #[must_use]
    pub fn get(&self, chain_id: ChainId) -> Option<&AnyHttpProvider> {
        self.providers.get(&chain_id)
    }

    #[must_use]
    pub fn contains(&self, chain_id: ChainId) -> bool {
        self.providers.contains_key(&chain_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Configured chains, sorted
    #[must_use]
    pub fn chains(&self) -> Vec<ChainId> {
        let mut chains: Vec<_> = self.providers.keys().copied().collect();
        chains.sort_unstable();
        chains
    }

    /// Metadata lookup sharing this pool's providers
    pub fn metadata_lookup(&self) -> Erc20MetadataLookup<AnyHttpProvider> {
        self.providers
            .iter()
            .fold(Erc20MetadataLookup::new(), |lookup, (chain_id, provider)| {
                lookup.with_provider(*chain_id, provider.clone())
            })
    }
}

impl ChainClients for ProviderPool {
    fn client_for(&self, chain_id: ChainId) -> Result<Arc<dyn ChainRpcClient>, RpcError> {
        let provider = self
            .get(chain_id)
            .ok_or_else(|| RpcError::client_unavailable(chain_id))?;
        Ok(Arc::new(AlloyChainClient::new(provider.clone())))
    }
}
