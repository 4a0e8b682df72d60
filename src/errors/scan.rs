// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for window scanning.

use alloy_primitives::{Address, BlockNumber};

use super::RpcError;

/// Errors that stop a factory scan before it reaches the chain head.
///
/// A stalled scan is not fatal: everything up to the last fully scanned
/// window is kept and becomes the chain's checkpoint.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The same window start kept failing after the window shrank to its floor.
    #[error(
        "Gave up on factory {factory} at block {from_block} after {attempts} attempts (last window: {window} blocks)"
    )]
    RetriesExhausted {
        /// Factory contract being scanned
        factory: Address,
        /// First block of the window that could not be fetched
        from_block: BlockNumber,
        /// Number of consecutive failed attempts
        attempts: u32,
        /// Size of the last attempted window
        window: u64,
        /// The last RPC failure
        #[source]
        source: RpcError,
    },
}
