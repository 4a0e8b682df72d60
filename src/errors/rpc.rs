//! Shared RPC error types for blockchain provider operations.
//!
//! This module provides error types for the RPC failures that can occur
//! while scanning factory logs or resolving the chain head.

use alloy_primitives::ChainId;

/// Errors that can occur during blockchain RPC operations.
///
/// Every variant is scoped to a single chain: the orchestrator logs it and
/// carries on with the remaining chains.
///
/// # Examples
///
/// ```rust
/// use pairscan::RpcError;
///
/// let error = RpcError::ClientUnavailable { chain_id: 250 };
/// assert_eq!(error.to_string(), "No RPC client configured for chain 250");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Failed to fetch logs from the blockchain.
    ///
    /// This can occur due to rate limiting, a block range the provider
    /// refuses to serve, network connectivity issues, or provider-side errors.
    #[error("Failed to fetch logs for {operation}")]
    GetLogsFailed {
        /// Description of the operation that failed (e.g., "PairCreated 100-200")
        operation: String,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to fetch block number from the blockchain.
    ///
    /// This typically indicates a connectivity issue or provider problem.
    #[error("Failed to get current block number")]
    GetBlockNumberFailed {
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No client is configured for the chain.
    #[error("No RPC client configured for chain {chain_id}")]
    ClientUnavailable {
        /// The chain that has no client
        chain_id: ChainId,
    },

    /// The RPC endpoint URL could not be parsed.
    #[error("Invalid provider URL: {0}")]
    ProviderUrlInvalid(String),
}

impl RpcError {
    /// Helper to create a `GetLogsFailed` error from any error type.
    pub fn get_logs_failed(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetLogsFailed {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetBlockNumberFailed` error from any error type.
    pub fn get_block_number_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        RpcError::GetBlockNumberFailed {
            source: Box::new(source),
        }
    }

    /// Helper to create a `ClientUnavailable` error.
    pub fn client_unavailable(chain_id: ChainId) -> Self {
        RpcError::ClientUnavailable { chain_id }
    }
}
