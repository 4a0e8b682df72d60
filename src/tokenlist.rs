// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token-list file store
//!
//! Discovery itself never touches the disk. The binary persists its results
//! in a token-list JSON file:
//!
//! ```json
//! {
//!   "name": "SushiSwap Token Pairs",
//!   "timestamp": "2025-01-01T00:00:00Z",
//!   "version": { "major": 1, "minor": 4, "patch": 0 },
//!   "logoURI": "https://...",
//!   "keywords": [],
//!   "tokens": [ { "address": "0x...", "name": "...", "symbol": "...", "decimals": 18, "chainId": 1, "logoURI": "" } ],
//!   "metadata": { "lastBlockSyncFor_1": "21000000" }
//! }
//! ```
//!
//! The free-form `metadata` bag carries the per-chain checkpoints between runs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use alloy_primitives::{Address, ChainId};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::checkpoint::Checkpoints;
use crate::errors::TokenListError;
use crate::tokens::TokenRecord;

/// Token-list version, bumped on every merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Next version given what a merge changed
    ///
    /// Removing tokens is a major bump, adding tokens a minor one, anything
    /// else a patch.
    pub fn bump(self, added: usize, removed: usize) -> Self {
        if removed > 0 {
            Self::new(self.major + 1, 0, 0)
        } else if added > 0 {
            Self::new(self.major, self.minor + 1, 0)
        } else {
            Self::new(self.major, self.minor, self.patch + 1)
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// How freshly discovered tokens combine with the ones already in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// The new tokens replace the list
    Standard,
    /// The new tokens are added to the list; nothing is removed
    Append,
}

/// What a merge changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub removed: usize,
    pub total: usize,
}

/// A token list as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenList {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub version: Version,
    #[serde(rename = "logoURI", default)]
    pub logo_uri: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tokens: Vec<TokenRecord>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl TokenList {
    /// Create an empty list
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load a list from `path`
    ///
    /// A missing file yields an empty list, so the first run starts from
    /// every factory's deployment block.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TokenListError> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No token list found, starting from scratch");
                return Ok(Self::default());
            }
            Err(e) => return Err(TokenListError::io(path, e)),
        };

        let list: Self =
            serde_json::from_slice(&bytes).map_err(|e| TokenListError::json(path, e))?;
        debug!(
            path = %path.display(),
            tokens = list.tokens.len(),
            version = %list.version,
            "Loaded token list"
        );
        Ok(list)
    }

    /// Write the list to `path` as pretty-printed JSON
    ///
    /// Parent directories are created as needed.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), TokenListError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TokenListError::io(parent, e))?;
        }

        let json = serde_json::to_vec_pretty(self).map_err(|e| TokenListError::json(path, e))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| TokenListError::io(path, e))?;

        info!(
            path = %path.display(),
            tokens = self.tokens.len(),
            version = %self.version,
            "Saved token list"
        );
        Ok(())
    }

    /// Merge `tokens` into the list, bump the version and refresh the timestamp
    ///
    /// Tokens are deduplicated by `(chainId, address)`; on a duplicate the
    /// newest record wins. The resulting list is sorted by chain id then
    /// address.
    pub fn merge_tokens(&mut self, tokens: Vec<TokenRecord>, mode: SaveMode) -> MergeSummary {
        let previous: BTreeSet<(ChainId, Address)> =
            self.tokens.iter().map(TokenRecord::key).collect();

        let mut merged: BTreeMap<(ChainId, Address), TokenRecord> = match mode {
            SaveMode::Append => self.tokens.drain(..).map(|t| (t.key(), t)).collect(),
            SaveMode::Standard => BTreeMap::new(),
        };
        for token in tokens {
            merged.insert(token.key(), token);
        }

        let added = merged.keys().filter(|k| !previous.contains(k)).count();
        let removed = previous.iter().filter(|k| !merged.contains_key(k)).count();

        self.tokens = merged.into_values().collect();
        self.version = self.version.bump(added, removed);
        self.timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let summary = MergeSummary {
            added,
            removed,
            total: self.tokens.len(),
        };
        info!(
            added,
            removed,
            total = summary.total,
            version = %self.version,
            ?mode,
            "Merged tokens into list"
        );
        summary
    }

    /// Checkpoints stored in the metadata bag
    pub fn checkpoints(&self) -> Checkpoints {
        Checkpoints::from_metadata(&self.metadata)
    }

    /// Store `checkpoints` in the metadata bag, keeping unrelated entries
    pub fn record_checkpoints(&mut self, checkpoints: &Checkpoints) {
        checkpoints.write_to_metadata(&mut self.metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(chain_id: ChainId, byte: u8, symbol: &str) -> TokenRecord {
        TokenRecord::try_new(Address::repeat_byte(byte), symbol, symbol, 18, chain_id).unwrap()
    }

    #[test]
    fn test_version_bumps() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(0, 1), Version::new(2, 0, 0));
        assert_eq!(v.bump(5, 0), Version::new(1, 3, 0));
        assert_eq!(v.bump(0, 0), Version::new(1, 2, 4));
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_append_keeps_existing_tokens() {
        let mut list = TokenList::new("test");
        list.merge_tokens(vec![token(1, 1, "AAA")], SaveMode::Append);

        let summary = list.merge_tokens(vec![token(1, 2, "BBB")], SaveMode::Append);

        assert_eq!(summary, MergeSummary { added: 1, removed: 0, total: 2 });
        assert_eq!(list.version, Version::new(0, 2, 0));
    }

    #[test]
    fn test_standard_replaces_tokens() {
        let mut list = TokenList::new("test");
        list.merge_tokens(vec![token(1, 1, "AAA"), token(1, 2, "BBB")], SaveMode::Standard);

        let summary = list.merge_tokens(vec![token(1, 2, "BBB")], SaveMode::Standard);

        assert_eq!(summary.removed, 1);
        assert_eq!(list.tokens.len(), 1);
        assert_eq!(list.version.major, 1);
    }

    #[test]
    fn test_same_address_on_two_chains_is_two_tokens() {
        let mut list = TokenList::new("test");
        list.merge_tokens(
            vec![token(1, 7, "USDC"), token(137, 7, "USDC"), token(1, 7, "USDC")],
            SaveMode::Append,
        );

        assert_eq!(list.tokens.len(), 2);
        assert_eq!(list.tokens[0].chain_id, 1);
        assert_eq!(list.tokens[1].chain_id, 137);
    }

    #[test]
    fn test_unchanged_merge_is_patch() {
        let mut list = TokenList::new("test");
        list.merge_tokens(vec![token(10, 1, "OP")], SaveMode::Append);
        list.merge_tokens(vec![token(10, 1, "OP")], SaveMode::Append);

        assert_eq!(list.version, Version::new(0, 1, 1));
        assert!(!list.timestamp.is_empty());
    }

    #[test]
    fn test_checkpoints_round_trip_through_metadata() {
        let mut list = TokenList::new("test");
        list.metadata.insert("source".into(), Value::from("pairs"));

        let checkpoints: Checkpoints = [(1, 100), (56, 200)].into_iter().collect();
        list.record_checkpoints(&checkpoints);

        assert_eq!(list.checkpoints(), checkpoints);
        assert_eq!(list.metadata["source"], "pairs");
    }
}
