//! Candidate token set for one chain

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A deduplicated set of token addresses
///
/// Holds the candidates a chain produced after thresholding. Consumers must
/// treat it as a set; iteration happens to be address-ordered, which keeps
/// logs and test output stable, but nothing relies on that order.
///
/// # Examples
///
/// ```
/// use pairscan::TokenSet;
/// use alloy_primitives::address;
///
/// let mut tokens = TokenSet::new();
/// tokens.insert(address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")); // USDC
/// tokens.insert(address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"));
///
/// assert_eq!(tokens.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSet(BTreeSet<Address>);

impl TokenSet {
    /// Create a new empty token set
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Insert a token address into the set
    ///
    /// Returns `true` if the token was newly inserted, `false` if it was already present.
    pub fn insert(&mut self, token: Address) -> bool {
        self.0.insert(token)
    }

    /// Check if a token address is in the set
    pub fn contains(&self, token: &Address) -> bool {
        self.0.contains(token)
    }

    /// Get the number of unique tokens in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over token addresses in the set
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }

    /// Copy the addresses into a vector, e.g. for a batched lookup
    pub fn to_vec(&self) -> Vec<Address> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<Address> for TokenSet {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        Self(BTreeSet::from_iter(iter))
    }
}

impl IntoIterator for TokenSet {
    type Item = Address;
    type IntoIter = std::collections::btree_set::IntoIter<Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenSet {
    type Item = &'a Address;
    type IntoIter = std::collections::btree_set::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenSet({} tokens)", self.len())
    }
}
