// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain RPC client seam
//!
//! The scanner and orchestrator only need two things from a chain: its
//! current head and the `PairCreated` events a factory emitted over a block
//! range. [`ChainRpcClient`] captures exactly that, so discovery can run
//! against a real alloy provider ([`AlloyChainClient`]) or a scripted mock in
//! tests.
//!
//! [`ChainClients`] resolves the client for a chain. Resolution failure is a
//! chain-scoped error: the chain is reported as failed and the others continue.

mod alloy_client;

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{Address, BlockNumber, ChainId};
use async_trait::async_trait;

use crate::errors::RpcError;

pub use alloy_client::AlloyChainClient;

/// The two token addresses referenced by a newly created pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairCreatedEvent {
    /// Lower-sorted token of the pair
    pub token0: Address,
    /// Higher-sorted token of the pair
    pub token1: Address,
    /// The pair contract
    pub pair: Address,
}

/// Read access to one chain
#[async_trait]
pub trait ChainRpcClient: Send + Sync {
    /// Latest block number known to the provider
    async fn current_head(&self) -> Result<BlockNumber, RpcError>;

    /// Every `PairCreated` event emitted by `factory` in `[from_block, to_block]`
    ///
    /// Fails when the provider rejects the query (range too large, timeout,
    /// rate limit, ...). The scanner treats every failure as transient.
    async fn pair_created_events(
        &self,
        factory: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<PairCreatedEvent>, RpcError>;
}

/// Resolves the RPC client for a chain
pub trait ChainClients: Send + Sync {
    /// Client for `chain_id`, or [`RpcError::ClientUnavailable`]
    fn client_for(&self, chain_id: ChainId) -> Result<Arc<dyn ChainRpcClient>, RpcError>;
}

impl ChainClients for HashMap<ChainId, Arc<dyn ChainRpcClient>> {
    fn client_for(&self, chain_id: ChainId) -> Result<Arc<dyn ChainRpcClient>, RpcError> {
        self.get(&chain_id)
            .cloned()
            .ok_or_else(|| RpcError::client_unavailable(chain_id))
    }
}
