//! Canonical Uniswap V2-style factory event definitions
//!
//! SushiSwap V2 and every other Uniswap V2 fork emit the same event when a new
//! pair is instantiated:
//!
//! - **PairCreated**: `PairCreated(address,address,address,uint256)`
//!
//! # Example: Decoding PairCreated events
//!
//! ```rust,ignore
//! use pairscan::PairCreated;
//! use alloy_sol_types::SolEvent;
//!
//! let logs = provider.get_logs(&filter).await?;
//!
//! for log in logs {
//!     match PairCreated::decode_log(&log.inner) {
//!         Ok(event) => println!("{} / {} -> {}", event.token0, event.token1, event.pair),
//!         Err(e) => eprintln!("Failed to decode: {}", e),
//!     }
//! }
//! ```

use std::fmt::Debug;

use alloy_sol_types::sol;

sol! {
    /// Uniswap V2 factory PairCreated event
    ///
    /// # Fields
    ///
    /// - `token0`: Lower-sorted token of the pair (indexed)
    /// - `token1`: Higher-sorted token of the pair (indexed)
    /// - `pair`: Address of the new pair contract
    /// - `allPairsLength`: Number of pairs created by the factory so far
    event PairCreated(address indexed token0, address indexed token1, address pair, uint256 allPairsLength);
}

impl Debug for PairCreated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PairCreated(token0: {}, token1: {}, pair: {})",
            self.token0, self.token1, self.pair
        )
    }
}
