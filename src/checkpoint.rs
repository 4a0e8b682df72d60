// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-chain scan checkpoints
//!
//! A checkpoint is the last block fully scanned on a chain. Inside the crate
//! it is a typed `chain id -> block number` map; only at the persistence
//! boundary is it converted to and from the token list's free-form metadata
//! bag, where each chain is stored as
//! `"lastBlockSyncFor_<chainID>": "<block number>"`.

use std::collections::BTreeMap;

use alloy_primitives::{BlockNumber, ChainId};
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::constants::CHECKPOINT_KEY_PREFIX;

/// Last fully scanned block per chain
///
/// # Examples
///
/// ```
/// use pairscan::Checkpoints;
///
/// let mut checkpoints = Checkpoints::new();
/// checkpoints.advance(1, 18_000_000);
/// checkpoints.advance(1, 17_000_000); // never moves backwards
///
/// assert_eq!(checkpoints.get(1), Some(18_000_000));
/// assert_eq!(checkpoints.get(10), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoints(BTreeMap<ChainId, BlockNumber>);

impl Checkpoints {
    /// Create an empty checkpoint map
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Last scanned block for `chain_id`, if any
    pub fn get(&self, chain_id: ChainId) -> Option<BlockNumber> {
        self.0.get(&chain_id).copied()
    }

    /// Record that `block` has been scanned on `chain_id`
    ///
    /// Checkpoints are monotonic: a lower block than the current one is ignored.
    /// Returns the resulting checkpoint.
    pub fn advance(&mut self, chain_id: ChainId, block: BlockNumber) -> BlockNumber {
        let entry = self.0.entry(chain_id).or_insert(block);
        *entry = (*entry).max(block);
        *entry
    }

    /// Number of chains with a checkpoint
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no chain has a checkpoint
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(chain id, block)` in chain id order
    pub fn iter(&self) -> impl Iterator<Item = (ChainId, BlockNumber)> + '_ {
        self.0.iter().map(|(chain, block)| (*chain, *block))
    }

    /// Metadata-bag key for a chain
    pub fn metadata_key(chain_id: ChainId) -> String {
        format!("{CHECKPOINT_KEY_PREFIX}{chain_id}")
    }

    /// Read checkpoints out of a token list's metadata bag
    ///
    /// Unrelated keys are skipped. Values may be decimal strings (the stored
    /// form) or bare JSON numbers; anything else is logged and skipped.
    pub fn from_metadata(metadata: &Map<String, Value>) -> Self {
        let mut checkpoints = Self::new();

        for (key, value) in metadata {
            let Some(chain_part) = key.strip_prefix(CHECKPOINT_KEY_PREFIX) else {
                continue;
            };
            let Ok(chain_id) = chain_part.parse::<ChainId>() else {
                warn!(key = %key, "Ignoring checkpoint with invalid chain id");
                continue;
            };
            let block = match value {
                Value::String(s) => s.parse::<BlockNumber>().ok(),
                Value::Number(n) => n.as_u64(),
                _ => None,
            };
            match block {
                Some(block) => {
                    checkpoints.advance(chain_id, block);
                }
                None => warn!(key = %key, value = %value, "Ignoring malformed checkpoint"),
            }
        }

        checkpoints
    }

    /// Write checkpoints into a metadata bag, overwriting existing entries
    pub fn write_to_metadata(&self, metadata: &mut Map<String, Value>) {
        for (chain_id, block) in self.iter() {
            metadata.insert(
                Self::metadata_key(chain_id),
                Value::String(block.to_string()),
            );
        }
    }
}

impl FromIterator<(ChainId, BlockNumber)> for Checkpoints {
    fn from_iter<T: IntoIterator<Item = (ChainId, BlockNumber)>>(iter: T) -> Self {
        let mut checkpoints = Self::new();
        for (chain_id, block) in iter {
            checkpoints.advance(chain_id, block);
        }
        checkpoints
    }
}
