//! Error types for the pairscan library.
//!
//! This module provides strongly-typed errors for all public APIs in pairscan.
//! It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling (`ScanError`,
//!   `MetadataError`, etc.)
//! - **Unified error type** (`DiscoveryError`) for convenience when you don't need
//!   to distinguish between error sources
//!
//! # Architecture
//!
//! - [`RpcError`] - Failures talking to a chain's RPC endpoint
//! - [`ScanError`] - A factory scan that stalled before reaching the head
//! - [`MetadataError`] - A metadata batch that failed as a whole
//! - [`TokenListError`] - Loading or saving the token-list file
//!
//! None of these abort a discovery run. The orchestrator records them per chain
//! in the [`DiscoveryReport`](crate::DiscoveryReport) and keeps going.
//!
//! # Examples
//!
//! ```rust,ignore
//! use pairscan::{ChainStatus, DiscoveryError, RpcError};
//!
//! for chain in &report.chains {
//!     match &chain.status {
//!         ChainStatus::Failed(DiscoveryError::Rpc(RpcError::ClientUnavailable { chain_id })) => {
//!             eprintln!("no RPC for chain {chain_id}");
//!         }
//!         ChainStatus::Failed(e) => eprintln!("chain {} failed: {e}", chain.chain_id),
//!         _ => {}
//!     }
//! }
//! ```

mod metadata;
mod rpc;
mod scan;
mod tokenlist;

use alloy_primitives::ChainId;

pub use metadata::MetadataError;
pub use rpc::RpcError;
pub use scan::ScanError;
pub use tokenlist::TokenListError;

/// Unified error type for all pairscan operations.
///
/// All module-specific error types convert into `DiscoveryError` via `From`
/// implementations, so `?` propagates them naturally.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Error from an RPC call.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Error from window scanning.
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Error from metadata enrichment.
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Error from the token-list store.
    #[error("Token list error: {0}")]
    TokenList(#[from] TokenListError),

    /// A chain task panicked or was cancelled before it could report.
    #[error("Task for chain {chain_id} did not complete: {details}")]
    TaskFailed {
        /// The chain whose task failed
        chain_id: ChainId,
        /// Details from the join error
        details: String,
    },
}

impl DiscoveryError {
    /// Create a `TaskFailed` error for a chain.
    pub fn task_failed(chain_id: ChainId, details: impl Into<String>) -> Self {
        DiscoveryError::TaskFailed {
            chain_id,
            details: details.into(),
        }
    }
}
