//! Semantic filter builder for factory `PairCreated` events
//!
//! Replaces raw topic juggling with named methods:
//!
//! ```rust,ignore
//! use pairscan::events::filter::PairCreatedFilterBuilder;
//!
//! // BEFORE
//! let filter = Filter::new()
//!     .address(factory)
//!     .event_signature(PairCreated::SIGNATURE_HASH)
//!     .from_block(start)
//!     .to_block(end);
//!
//! // AFTER
//! let filter = PairCreatedFilterBuilder::new(factory)
//!     .in_block_range(start, end)
//!     .build();
//! ```

use alloy_primitives::{Address, BlockNumber};
use alloy_rpc_types::Filter;
use alloy_sol_types::SolEvent;

use crate::events::definitions::PairCreated;

/// Builder for `PairCreated` log filters on a single factory
#[derive(Debug, Clone)]
pub struct PairCreatedFilterBuilder {
    factory: Address,
    from_block: Option<BlockNumber>,
    to_block: Option<BlockNumber>,
}

impl PairCreatedFilterBuilder {
    /// Filter for pairs created by `factory`
    pub fn new(factory: Address) -> Self {
        Self {
            factory,
            from_block: None,
            to_block: None,
        }
    }

    /// Restrict to `[from_block, to_block]` (inclusive)
    pub fn in_block_range(mut self, from_block: BlockNumber, to_block: BlockNumber) -> Self {
        self.from_block = Some(from_block);
        self.to_block = Some(to_block);
        self
    }

    /// Build the filter
    pub fn build(self) -> Filter {
        let mut filter = Filter::new()
            .address(self.factory)
            .event_signature(PairCreated::SIGNATURE_HASH);

        if let Some(from_block) = self.from_block {
            filter = filter.from_block(from_block);
        }
        if let Some(to_block) = self.to_block {
            filter = filter.to_block(to_block);
        }

        filter
    }
}
