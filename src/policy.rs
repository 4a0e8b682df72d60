//! Chain support and ignore-list predicates
//!
//! Both predicates are static lookup tables supplied by the caller. The
//! orchestrator consults [`TokenPolicy::is_chain_supported`] before spawning a
//! chain task and the threshold filter consults [`TokenPolicy::is_ignored`]
//! for every address that clears the occurrence threshold.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, ChainId};

use crate::config::constants::{ignored, sushiswap_v2};

/// Predicates deciding which chains are scanned and which tokens are dropped
pub trait TokenPolicy: Send + Sync {
    /// Whether discovery should run for this chain at all
    fn is_chain_supported(&self, chain_id: ChainId) -> bool;

    /// Whether `address` must never appear in the output for this chain
    fn is_ignored(&self, chain_id: ChainId, address: Address) -> bool;
}

/// Table-driven [`TokenPolicy`]
///
/// # Examples
///
/// ```
/// use pairscan::{StaticTokenPolicy, TokenPolicy};
/// use alloy_primitives::address;
///
/// let usdt = address!("dac17f958d2ee523a2206206994597c13d831ec7");
/// let policy = StaticTokenPolicy::new([1, 10])
///     .ignore(1, usdt);
///
/// assert!(policy.is_chain_supported(1));
/// assert!(!policy.is_chain_supported(56));
/// assert!(policy.is_ignored(1, usdt));
/// assert!(!policy.is_ignored(10, usdt));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticTokenPolicy {
    supported_chains: HashSet<ChainId>,
    ignored_everywhere: HashSet<Address>,
    ignored_per_chain: HashMap<ChainId, HashSet<Address>>,
}

impl StaticTokenPolicy {
    /// Policy supporting exactly `chains`, ignoring nothing
    pub fn new(chains: impl IntoIterator<Item = ChainId>) -> Self {
        Self {
            supported_chains: chains.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Policy for the SushiSwap V2 chains, ignoring the zero address and the
    /// native-coin placeholder everywhere
    pub fn sushiswap_v2() -> Self {
        Self::new(sushiswap_v2::DEPLOYMENTS.iter().map(|d| d.0))
            .ignore_everywhere(ignored::ZERO)
            .ignore_everywhere(ignored::NATIVE_PLACEHOLDER)
    }

    /// Ignore `address` on one chain
    pub fn ignore(mut self, chain_id: ChainId, address: Address) -> Self {
        self.ignored_per_chain
            .entry(chain_id)
            .or_default()
            .insert(address);
        self
    }

    /// Ignore `address` on every chain
    pub fn ignore_everywhere(mut self, address: Address) -> Self {
        self.ignored_everywhere.insert(address);
        self
    }
}

impl TokenPolicy for StaticTokenPolicy {
    fn is_chain_supported(&self, chain_id: ChainId) -> bool {
        self.supported_chains.contains(&chain_id)
    }

    fn is_ignored(&self, chain_id: ChainId, address: Address) -> bool {
        self.ignored_everywhere.contains(&address)
            || self
                .ignored_per_chain
                .get(&chain_id)
                .is_some_and(|set| set.contains(&address))
    }
}
