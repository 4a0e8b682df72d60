//! Per-chain occurrence counting

use std::collections::HashMap;

use alloy_primitives::Address;

/// How many created pairs reference each token on one chain
///
/// Owned by the chain's scan task and discarded at the end of the run; only
/// the thresholded result is kept.
///
/// # Examples
///
/// ```
/// use pairscan::OccurrenceTable;
/// use alloy_primitives::Address;
///
/// let weth = Address::repeat_byte(1);
/// let mut table = OccurrenceTable::new();
/// table.record_pair(weth, Address::repeat_byte(2));
/// table.record_pair(weth, Address::repeat_byte(3));
///
/// assert_eq!(table.count(&weth), 2);
/// assert_eq!(table.count(&Address::repeat_byte(9)), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceTable {
    counts: HashMap<Address, u32>,
    pairs: u64,
}

impl OccurrenceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `token`
    pub fn record(&mut self, token: Address) {
        let count = self.counts.entry(token).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Count both sides of a newly created pair
    pub fn record_pair(&mut self, token0: Address, token1: Address) {
        self.record(token0);
        self.record(token1);
        self.pairs += 1;
    }

    /// Occurrences of `token` so far (zero if never seen)
    pub fn count(&self, token: &Address) -> u32 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens seen
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no token has been seen
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of pairs recorded through [`record_pair`](Self::record_pair)
    pub fn pairs_recorded(&self) -> u64 {
        self.pairs
    }

    /// Iterate over `(token, count)` in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&Address, u32)> {
        self.counts.iter().map(|(token, count)| (token, *count))
    }
}
