//! Threshold filter: occurrence table to candidate set

use alloy_primitives::ChainId;
use tracing::debug;

use crate::config_types::MinOccurrences;
use crate::policy::TokenPolicy;
use crate::tokens::occurrences::OccurrenceTable;
use crate::tokens::set::TokenSet;

/// Select the tokens of `table` that appear in at least `min` pairs and are
/// not ignored on `chain_id`
///
/// # Examples
///
/// ```
/// use pairscan::{select_candidates, MinOccurrences, OccurrenceTable, StaticTokenPolicy};
/// use alloy_primitives::Address;
///
/// let popular = Address::repeat_byte(1);
/// let mut table = OccurrenceTable::new();
/// for i in 2..5 {
///     table.record_pair(popular, Address::repeat_byte(i));
/// }
///
/// let policy = StaticTokenPolicy::new([1]);
/// let candidates = select_candidates(1, &table, &policy, MinOccurrences::new(3));
///
/// assert_eq!(candidates.len(), 1);
/// assert!(candidates.contains(&popular));
/// ```
pub fn select_candidates(
    chain_id: ChainId,
    table: &OccurrenceTable,
    policy: &dyn TokenPolicy,
    min: MinOccurrences,
) -> TokenSet {
    let mut ignored = 0usize;

    let candidates: TokenSet = table
        .iter()
        .filter(|&(_, count)| min.is_met_by(count))
        .filter_map(|(token, _)| {
            if policy.is_ignored(chain_id, *token) {
                ignored += 1;
                None
            } else {
                Some(*token)
            }
        })
        .collect();

    debug!(
        chain_id,
        tokens_seen = table.len(),
        candidates = candidates.len(),
        ignored,
        min_occurrences = min.as_u32(),
        "Selected candidate tokens"
    );

    candidates
}
