//! Span creation helpers for discovery operations.
//!
//! Telemetry is kept apart from business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a span helper here that the
//! caller attaches with [`tracing::Instrument`].
//!
//! Usage pattern:
//! ```rust,ignore
//! let span = spans::scan_chain(chain.chain(), candidates_hint);
//! async move { /* chain work */ }.instrument(span).await
//! ```

use alloy_chains::Chain;
use alloy_primitives::{Address, BlockNumber, ChainId};
use tracing::{Level, Span};

/// Create span for a whole discovery run.
///
/// Parent: None (root span for this operation)
/// Children: scan_chain and enrich_chain spans (one per chain)
#[inline]
pub(crate) fn discover_tokens(chains: usize) -> Span {
    tracing::span!(Level::INFO, "pairscan.discover_tokens", chains = chains)
}

/// Create span for the scan phase of one chain.
///
/// Parent: discover_tokens span
/// Children: scan_factory spans (one per factory)
#[inline]
pub(crate) fn scan_chain(chain: Chain, checkpoint: Option<BlockNumber>) -> Span {
    tracing::info_span!(
        "pairscan.scan_chain",
        chain = %chain,
        chain_id = chain.id(),
        checkpoint = ?checkpoint,
    )
}

/// Create span for scanning one factory on one chain.
///
/// Parent: scan_chain span
#[inline]
pub(crate) fn scan_factory(
    chain_id: ChainId,
    factory: Address,
    from_block: BlockNumber,
    to_block: BlockNumber,
) -> Span {
    tracing::debug_span!(
        "pairscan.scan_factory",
        chain_id = chain_id,
        factory = %factory,
        from_block = from_block,
        to_block = to_block,
    )
}

/// Create span for enriching one chain's candidates.
///
/// Parent: discover_tokens span
#[inline]
pub(crate) fn enrich_chain(chain: Chain, candidates: usize) -> Span {
    tracing::info_span!(
        "pairscan.enrich_chain",
        chain = %chain,
        chain_id = chain.id(),
        candidates = candidates,
    )
}
