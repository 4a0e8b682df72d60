//! Token aggregation types
//!
//! ```text
//! PairCreatedEvent (token0, token1)
//!     |
//!     | record_pair
//!     ↓
//! OccurrenceTable (address -> count, per chain, per run)
//!     |
//!     | select_candidates(min, policy)
//!     ↓
//! TokenSet (candidates)
//!     |
//!     | enrich_candidates(metadata lookup)
//!     ↓
//! Vec<TokenRecord>
//! ```

mod filter;
mod occurrences;
mod record;
mod set;

pub use filter::select_candidates;
pub use occurrences::OccurrenceTable;
pub use record::TokenRecord;
pub use set::TokenSet;
