// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # pairscan
//!
//! Discovers actively traded ERC20 tokens by scanning DEX factory
//! `PairCreated` logs across many EVM chains.
//!
//! For every chain, the factory logs between the last checkpoint and the
//! chain head are read in block windows. Every pair created counts one
//! occurrence for each of its two tokens; tokens that appear in at least
//! [`MinOccurrences`] pairs and are not ignored become candidates, and
//! candidates with readable ERC20 metadata become [`TokenRecord`]s.
//!
//! ## Features
//!
//! - **Adaptive window scanning**: failed log queries shrink the window and
//!   back off instead of skipping blocks
//! - **Per-chain isolation**: chains run as independent tasks; one chain's
//!   RPC trouble never affects another's results
//! - **Resumable**: per-chain [`Checkpoints`] make repeated runs incremental
//! - **Pluggable**: RPC access, metadata lookup and token policy are traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pairscan::provider::ProviderPool;
//! use pairscan::{
//!     sushiswap_v2_chains, Checkpoints, DiscoveryConfig, PairDiscovery, StaticTokenPolicy,
//! };
//!
//! let config = DiscoveryConfig::with_common_defaults();
//! let chains = sushiswap_v2_chains(&config);
//! let pool = ProviderPool::from_env(chains.iter().map(|c| c.chain_id));
//!
//! let discovery = PairDiscovery::new(
//!     config,
//!     Arc::new(pool.clone()),
//!     Arc::new(pool.metadata_lookup()),
//!     Arc::new(StaticTokenPolicy::sushiswap_v2()),
//! );
//!
//! let report = discovery.run(&chains, &Checkpoints::new()).await;
//! for token in &report.tokens {
//!     println!("{} {} on chain {}", token.symbol, token.address, token.chain_id);
//! }
//! ```

pub mod bootstrap;
mod chains;
mod checkpoint;
pub mod config;
mod config_types;
mod discovery;
pub mod errors;
pub mod events;
mod metadata;
mod policy;
pub mod provider;
pub mod rpc;
mod spans;
pub mod tokenlist;
mod tokens;

pub use chains::{sushiswap_v2_chains, ChainDescriptor, FactoryDeployment};
pub use checkpoint::Checkpoints;
pub use config::{ChainConfig, DiscoveryConfig, DiscoveryConfigBuilder, WindowRetryPolicy};
pub use config_types::{MinOccurrences, WindowSize};
pub use discovery::{ChainReport, ChainStatus, DiscoveryReport, PairDiscovery};
pub use errors::{DiscoveryError, MetadataError, RpcError, ScanError, TokenListError};
pub use events::{PairCreated, PairCreatedFilterBuilder, ScanOutcome, WindowScanner};
pub use metadata::{enrich_candidates, Erc20MetadataLookup, MetadataLookup, TokenMetadata};
pub use policy::{StaticTokenPolicy, TokenPolicy};
pub use rpc::{AlloyChainClient, ChainClients, ChainRpcClient, PairCreatedEvent};
pub use tokenlist::{MergeSummary, SaveMode, TokenList, Version};
pub use tokens::{select_candidates, OccurrenceTable, TokenRecord, TokenSet};
