// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for pairscan integration tests
//!
//! Provides mock implementations of the RPC and metadata traits so discovery
//! can be exercised without real blockchain connections.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::{Address, BlockNumber, ChainId};
use async_trait::async_trait;
use pairscan::{
    ChainDescriptor, ChainRpcClient, FactoryDeployment, MetadataError, MetadataLookup,
    PairCreatedEvent, RpcError, TokenMetadata, WindowSize,
};

/// Factory address used by every mock chain
pub const FACTORY: Address = Address::repeat_byte(0xfa);

/// Token address from a single byte, for readable tests
pub fn token(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// Descriptor for a mock chain with one factory deployed at block 0
pub fn descriptor(chain_id: ChainId, window: u64) -> ChainDescriptor {
    ChainDescriptor::new(chain_id, vec![FactoryDeployment::new(FACTORY, 0)])
        .with_window_size(WindowSize::new(window))
}

/// Mock chain serving a fixed set of `PairCreated` events
///
/// # Example
///
/// ```rust,ignore
/// let client = MockChainClient::new(1_000)
///     .with_pair(10, token(1), token(2))
///     .with_max_range(50);
/// ```
#[derive(Default)]
pub struct MockChainClient {
    head: BlockNumber,
    pairs: BTreeMap<BlockNumber, Vec<PairCreatedEvent>>,
    max_range: Option<u64>,
    broken_from: Option<BlockNumber>,
    head_fails: bool,
    panics: bool,
    latency: Option<Duration>,
    queries: Mutex<Vec<(BlockNumber, BlockNumber)>>,
}

impl MockChainClient {
    pub fn new(head: BlockNumber) -> Self {
        Self {
            head,
            ..Default::default()
        }
    }

    /// A pair of `token0`/`token1` created at `block`
    pub fn with_pair(mut self, block: BlockNumber, token0: Address, token1: Address) -> Self {
        let pair = Address::with_last_byte((block % 251) as u8);
        self.pairs.entry(block).or_default().push(PairCreatedEvent {
            token0,
            token1,
            pair,
        });
        self
    }

    /// `count` pairs of `popular` with distinct partners, one per block from `first_block`
    pub fn with_pairs_of(
        mut self,
        popular: Address,
        count: u8,
        first_block: BlockNumber,
        partner_base: u8,
    ) -> Self {
        for i in 0..count {
            self = self.with_pair(
                first_block + u64::from(i),
                popular,
                token(partner_base.wrapping_add(i)),
            );
        }
        self
    }

    /// Reject log queries wider than `blocks`
    pub fn with_max_range(mut self, blocks: u64) -> Self {
        self.max_range = Some(blocks);
        self
    }

    /// Reject every log query starting at or after `block`
    pub fn broken_from(mut self, block: BlockNumber) -> Self {
        self.broken_from = Some(block);
        self
    }

    /// Fail `current_head`
    pub fn failing_head(mut self) -> Self {
        self.head_fails = true;
        self
    }

    /// Panic in `current_head`
    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    /// Sleep before answering every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every `(from, to)` log query received so far
    pub fn queries(&self) -> Vec<(BlockNumber, BlockNumber)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn into_arc(self) -> Arc<dyn ChainRpcClient> {
        Arc::new(self)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ChainRpcClient for MockChainClient {
    async fn current_head(&self) -> Result<BlockNumber, RpcError> {
        self.delay().await;
        if self.panics {
            panic!("mock chain client panicked");
        }
        if self.head_fails {
            return Err(RpcError::get_block_number_failed(std::io::Error::other(
                "connection refused",
            )));
        }
        Ok(self.head)
    }

    async fn pair_created_events(
        &self,
        _factory: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<PairCreatedEvent>, RpcError> {
        self.queries.lock().unwrap().push((from_block, to_block));
        self.delay().await;

        let too_wide = self
            .max_range
            .is_some_and(|max| to_block - from_block + 1 > max);
        let broken = self.broken_from.is_some_and(|b| from_block >= b);
        if too_wide || broken {
            return Err(RpcError::get_logs_failed(
                format!("PairCreated {from_block}-{to_block}"),
                std::io::Error::other("query returned more than 10000 results"),
            ));
        }

        Ok(self
            .pairs
            .range(from_block..=to_block)
            .flat_map(|(_, events)| events.iter().copied())
            .collect())
    }
}

/// Clients keyed by chain id
pub fn clients(
    entries: impl IntoIterator<Item = (ChainId, Arc<dyn ChainRpcClient>)>,
) -> Arc<HashMap<ChainId, Arc<dyn ChainRpcClient>>> {
    Arc::new(entries.into_iter().collect())
}

/// Metadata lookup backed by a fixed table
#[derive(Default)]
pub struct MockMetadataLookup {
    known: HashMap<(ChainId, Address), TokenMetadata>,
    failing_chains: Vec<ChainId>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl MockMetadataLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `address` on `chain_id` to a token called `symbol`
    pub fn with_token(mut self, chain_id: ChainId, address: Address, symbol: &str) -> Self {
        self.known.insert(
            (chain_id, address),
            TokenMetadata::new(format!("{symbol} Token"), symbol, 18),
        );
        self
    }

    /// Fail every batch for `chain_id`
    pub fn failing_for(mut self, chain_id: ChainId) -> Self {
        self.failing_chains.push(chain_id);
        self
    }

    /// Sleep before answering every batch
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of batches requested so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataLookup for MockMetadataLookup {
    async fn lookup(
        &self,
        chain_id: ChainId,
        addresses: &[Address],
    ) -> Result<HashMap<Address, TokenMetadata>, MetadataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing_chains.contains(&chain_id) {
            return Err(MetadataError::lookup_failed(chain_id, "multicall reverted"));
        }
        Ok(addresses
            .iter()
            .filter_map(|a| self.known.get(&(chain_id, *a)).map(|m| (*a, m.clone())))
            .collect())
    }
}
