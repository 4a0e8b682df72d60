// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Metadata enrichment for candidate tokens
//!
//! Candidates become [`TokenRecord`]s once their ERC20 `name`, `symbol` and
//! `decimals` are known. Lookups are batched per chain through a
//! [`MetadataLookup`]. A token that has no metadata is dropped; a provider
//! that cannot answer fails the whole batch.
//!
//! # Example
//!
//! ```rust,ignore
//! use pairscan::{enrich_candidates, Erc20MetadataLookup};
//!
//! let lookup = Erc20MetadataLookup::new().with_provider(1, provider);
//! let records = enrich_candidates(1, &candidates, &lookup).await?;
//! ```

mod erc20;

use std::collections::HashMap;

use alloy_primitives::{Address, ChainId};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::MetadataError;
use crate::tokens::{TokenRecord, TokenSet};

pub use erc20::Erc20MetadataLookup;

/// ERC20 metadata as returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Batched token metadata source
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Metadata for as many of `addresses` as can be resolved
    ///
    /// Addresses with no metadata are absent from the map. An `Err` means the
    /// batch as a whole failed and should be retried later.
    async fn lookup(
        &self,
        chain_id: ChainId,
        addresses: &[Address],
    ) -> Result<HashMap<Address, TokenMetadata>, MetadataError>;
}

/// Turn a chain's candidates into token records
///
/// Issues one lookup for the whole set. Candidates missing from the result,
/// or with an empty name or symbol, are skipped. Records come back in address
/// order.
pub async fn enrich_candidates(
    chain_id: ChainId,
    candidates: &TokenSet,
    lookup: &dyn MetadataLookup,
) -> Result<Vec<TokenRecord>, MetadataError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let addresses = candidates.to_vec();
    let metadata = lookup.lookup(chain_id, &addresses).await?;

    let records: Vec<TokenRecord> = addresses
        .iter()
        .filter_map(|address| {
            let Some(meta) = metadata.get(address) else {
                debug!(chain_id, token = %address, "No metadata returned, skipping");
                return None;
            };
            let record =
                TokenRecord::try_new(*address, &meta.name, &meta.symbol, meta.decimals, chain_id);
            if record.is_none() {
                debug!(chain_id, token = %address, "Empty name or symbol, skipping");
            }
            record
        })
        .collect();

    info!(
        chain_id,
        candidates = addresses.len(),
        resolved = metadata.len(),
        records = records.len(),
        "Enriched candidate tokens"
    );

    Ok(records)
}
