//! Error types for token metadata lookups.

use alloy_primitives::ChainId;

/// Errors returned by a [`MetadataLookup`](crate::MetadataLookup) for a whole batch.
///
/// Tokens that have no metadata are not errors; they are simply absent from
/// the lookup result. A provider failure on any token fails the batch.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// No provider is configured for the chain.
    #[error("No metadata provider configured for chain {chain_id}")]
    ProviderMissing {
        /// The chain that has no provider
        chain_id: ChainId,
    },

    /// The provider could not answer for at least one token.
    #[error("Metadata lookup failed on chain {chain_id}: {details}")]
    LookupFailed {
        /// The chain being enriched
        chain_id: ChainId,
        /// Details about the failure
        details: String,
    },
}

impl MetadataError {
    /// Create a `LookupFailed` error with details.
    pub fn lookup_failed(chain_id: ChainId, details: impl Into<String>) -> Self {
        MetadataError::LookupFailed {
            chain_id,
            details: details.into(),
        }
    }
}
