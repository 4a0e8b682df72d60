// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Window scanner for factory `PairCreated` logs
//!
//! Walks `[start, head]` in consecutive windows, strictly in increasing block
//! order, and hands every event to a caller-supplied sink as soon as its window
//! succeeds. Only one window's events are held in memory at a time.
//!
//! # Failure handling
//!
//! Each window is a small state machine:
//!
//! ```text
//!            query ok
//! Pending ──────────────▶ advance to next window (size grows back ×2)
//!    │
//!    │ query failed
//!    ▼
//! Failed{attempt} ──▶ same start, size halved (≥ floor), backoff, query again
//!    │
//!    │ attempt > max_retries
//!    ▼
//! stalled: stop, report last fully scanned block
//! ```
//!
//! Every block of the range is queried exactly once on the success path, so
//! the set of events does not depend on the window size.
//!
//! # Examples
//!
//! ```rust,ignore
//! use pairscan::{OccurrenceTable, WindowScanner, WindowRetryPolicy, WindowSize};
//!
//! let retry = WindowRetryPolicy::default();
//! let scanner = WindowScanner::new(client.as_ref(), 1, WindowSize::DEFAULT, &retry);
//!
//! let mut table = OccurrenceTable::new();
//! let outcome = scanner
//!     .scan(factory, 10_794_229, head, |event| table.record_pair(event.token0, event.token1))
//!     .await;
//!
//! println!("scanned up to {:?}", outcome.last_scanned);
//! ```

use std::time::Duration;

use alloy_primitives::{Address, BlockNumber, ChainId};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::WindowRetryPolicy;
use crate::config_types::WindowSize;
use crate::errors::ScanError;
use crate::rpc::{ChainRpcClient, PairCreatedEvent};

/// State of the window currently being queried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowState {
    /// Not queried yet
    Pending,
    /// Queried `attempt` times in a row without success
    Failed { attempt: u32 },
}

impl WindowState {
    fn next_attempt(self) -> u32 {
        match self {
            WindowState::Pending => 1,
            WindowState::Failed { attempt } => attempt.saturating_add(1),
        }
    }
}

/// Result of scanning one factory
#[derive(Debug)]
pub struct ScanOutcome {
    /// Factory that was scanned
    pub factory: Address,
    /// First block of the requested range
    pub start: BlockNumber,
    /// Last block of the requested range (chain head)
    pub head: BlockNumber,
    /// Highest block `b` such that `[start, b]` was fully scanned
    pub last_scanned: Option<BlockNumber>,
    /// Windows that succeeded
    pub windows_scanned: u64,
    /// Windows that failed and were retried
    pub windows_failed: u64,
    /// Events handed to the sink
    pub events_seen: u64,
    /// Why the scan stopped before `head`, if it did
    pub stalled: Option<ScanError>,
}

impl ScanOutcome {
    fn new(factory: Address, start: BlockNumber, head: BlockNumber) -> Self {
        Self {
            factory,
            start,
            head,
            last_scanned: None,
            windows_scanned: 0,
            windows_failed: 0,
            events_seen: 0,
            stalled: None,
        }
    }

    /// Whether the whole `[start, head]` range was scanned
    pub fn is_complete(&self) -> bool {
        self.stalled.is_none()
    }
}

/// Scans one chain's factories window by window
///
/// The scanner borrows its client and retry policy; create one per chain task.
pub struct WindowScanner<'a> {
    client: &'a dyn ChainRpcClient,
    chain_id: ChainId,
    window_size: WindowSize,
    retry: &'a WindowRetryPolicy,
    rate_limit: Option<Duration>,
}

impl<'a> WindowScanner<'a> {
    /// Create a new scanner
    ///
    /// # Arguments
    ///
    /// * `client` - RPC client of the chain being scanned
    /// * `chain_id` - Chain id, used for logging
    /// * `window_size` - Blocks per query when nothing is failing
    /// * `retry` - How failed windows shrink and back off
    pub fn new(
        client: &'a dyn ChainRpcClient,
        chain_id: ChainId,
        window_size: WindowSize,
        retry: &'a WindowRetryPolicy,
    ) -> Self {
        Self {
            client,
            chain_id,
            window_size,
            retry,
            rate_limit: None,
        }
    }

    /// Wait `delay` between consecutive windows
    pub fn with_rate_limit(mut self, delay: Option<Duration>) -> Self {
        self.rate_limit = delay;
        self
    }

    /// Scan `[start, head]` of `factory`, calling `on_event` for every pair created
    ///
    /// Never fails: a window that keeps failing stops the scan and is reported
    /// in [`ScanOutcome::stalled`], with everything before it kept.
    pub async fn scan<F>(
        &self,
        factory: Address,
        start: BlockNumber,
        head: BlockNumber,
        mut on_event: F,
    ) -> ScanOutcome
    where
        F: FnMut(&PairCreatedEvent),
    {
        let mut outcome = ScanOutcome::new(factory, start, head);
        if start > head {
            debug!(chain_id = self.chain_id, factory = %factory, start, head, "Nothing to scan");
            return outcome;
        }

        info!(
            chain_id = self.chain_id,
            factory = %factory,
            start_block = start,
            end_block = head,
            window_size = %self.window_size,
            windows = self.window_size.windows_needed(start, head),
            "Starting factory scan"
        );

        // Never let the floor exceed the configured window.
        let floor = self.retry.min_window.min(self.window_size);
        let mut size = self.window_size;
        let mut state = WindowState::Pending;
        let mut cursor = start;

        loop {
            let window_end = size.window_end(cursor, head);

            match self
                .client
                .pair_created_events(factory, cursor, window_end)
                .await
            {
                Ok(events) => {
                    for event in &events {
                        on_event(event);
                    }
                    outcome.windows_scanned += 1;
                    outcome.events_seen += events.len() as u64;
                    outcome.last_scanned = Some(window_end);

                    info!(
                        chain_id = self.chain_id,
                        start = cursor,
                        end = window_end,
                        events = events.len(),
                        total_events = outcome.events_seen,
                        head,
                        "Scanned window"
                    );

                    if window_end >= head {
                        break;
                    }
                    cursor = window_end + 1;
                    size = size.doubled(self.window_size);
                    state = WindowState::Pending;

                    if let Some(delay) = self.rate_limit {
                        sleep(delay).await;
                    }
                }
                Err(error) => {
                    let attempt = state.next_attempt();
                    outcome.windows_failed += 1;

                    if attempt > self.retry.max_retries {
                        warn!(
                            chain_id = self.chain_id,
                            factory = %factory,
                            from_block = cursor,
                            attempts = attempt,
                            last_scanned = ?outcome.last_scanned,
                            error = %error,
                            "Giving up on window"
                        );
                        outcome.stalled = Some(ScanError::RetriesExhausted {
                            factory,
                            from_block: cursor,
                            attempts: attempt,
                            window: size.as_u64(),
                            source: error,
                        });
                        break;
                    }

                    let shrunk = size.halved(floor);
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        chain_id = self.chain_id,
                        start = cursor,
                        end = window_end,
                        attempt,
                        next_window = shrunk.as_u64(),
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Window query failed, retrying with a smaller window"
                    );

                    size = shrunk;
                    state = WindowState::Failed { attempt };
                    if !delay.is_zero() {
                        sleep(delay).await;
                    }
                }
            }
        }

        info!(
            chain_id = self.chain_id,
            factory = %factory,
            windows = outcome.windows_scanned,
            failed_windows = outcome.windows_failed,
            events = outcome.events_seen,
            complete = outcome.is_complete(),
            "Finished factory scan"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RpcError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Chain with one pair per block; fails any query wider than `max_range`
    /// and any query starting inside `broken`.
    struct ScriptedChain {
        head: BlockNumber,
        max_range: u64,
        broken: Option<std::ops::RangeInclusive<BlockNumber>>,
        queries: Mutex<Vec<(BlockNumber, BlockNumber)>>,
    }

    impl ScriptedChain {
        fn new(head: BlockNumber, max_range: u64) -> Self {
            Self {
                head,
                max_range,
                broken: None,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<(BlockNumber, BlockNumber)> {
            self.queries.lock().unwrap().clone()
        }
    }

    fn pair_at(block: BlockNumber) -> PairCreatedEvent {
        PairCreatedEvent {
            token0: Address::with_last_byte((block % 256) as u8),
            token1: Address::repeat_byte(0xff),
            pair: Address::ZERO,
        }
    }

    #[async_trait]
    impl ChainRpcClient for ScriptedChain {
        async fn current_head(&self) -> Result<BlockNumber, RpcError> {
            Ok(self.head)
        }

        async fn pair_created_events(
            &self,
            _factory: Address,
            from_block: BlockNumber,
            to_block: BlockNumber,
        ) -> Result<Vec<PairCreatedEvent>, RpcError> {
            self.queries.lock().unwrap().push((from_block, to_block));
            let too_wide = to_block - from_block + 1 > self.max_range;
            let broken = self
                .broken
                .as_ref()
                .is_some_and(|range| range.contains(&from_block));
            if too_wide || broken {
                return Err(RpcError::get_logs_failed(
                    "scripted",
                    std::io::Error::other("range rejected"),
                ));
            }
            Ok((from_block..=to_block).map(pair_at).collect())
        }
    }

    fn immediate(max_retries: u32) -> WindowRetryPolicy {
        WindowRetryPolicy::immediate(max_retries, WindowSize::new(1))
    }

    #[tokio::test]
    async fn test_windows_are_contiguous_and_capped_at_head() {
        let chain = ScriptedChain::new(250, u64::MAX);
        let retry = immediate(3);
        let scanner = WindowScanner::new(&chain, 1, WindowSize::new(100), &retry);

        let mut seen = 0u64;
        let outcome = scanner.scan(Address::ZERO, 10, 250, |_| seen += 1).await;

        assert_eq!(chain.queries(), vec![(10, 109), (110, 209), (210, 250)]);
        assert_eq!(seen, 241);
        assert_eq!(outcome.last_scanned, Some(250));
        assert_eq!(outcome.windows_scanned, 3);
        assert!(outcome.is_complete());
    }

    #[tokio::test]
    async fn test_failed_window_halves_without_advancing() {
        // Provider accepts at most 30 blocks per query.
        let chain = ScriptedChain::new(99, 30);
        let retry = immediate(5);
        let scanner = WindowScanner::new(&chain, 56, WindowSize::new(100), &retry);

        let mut blocks = Vec::new();
        let outcome = scanner
            .scan(Address::ZERO, 0, 99, |event| blocks.push(event.token0))
            .await;

        let queries = chain.queries();
        // 100 fails, 50 fails, 25 succeeds from the same start.
        assert_eq!(&queries[..3], &[(0, 99), (0, 49), (0, 24)]);
        assert_eq!(blocks.len(), 100);
        assert_eq!(outcome.last_scanned, Some(99));
        assert!(outcome.windows_failed >= 2);
        assert!(outcome.is_complete());
    }

    #[tokio::test]
    async fn test_exhausted_retries_stall_at_last_good_block() {
        let mut chain = ScriptedChain::new(1_000, u64::MAX);
        chain.broken = Some(300..=1_000);
        let retry = immediate(4);
        let scanner = WindowScanner::new(&chain, 1, WindowSize::new(100), &retry);

        let outcome = scanner.scan(Address::ZERO, 0, 1_000, |_| {}).await;

        assert_eq!(outcome.last_scanned, Some(299));
        assert_eq!(outcome.events_seen, 300);
        match outcome.stalled {
            Some(ScanError::RetriesExhausted {
                from_block,
                attempts,
                ..
            }) => {
                assert_eq!(from_block, 300);
                assert_eq!(attempts, 5);
            }
            other => panic!("expected stalled scan, got {other:?}"),
        }
        // 3 good windows + 5 attempts at block 300, then stop.
        assert_eq!(chain.queries().len(), 8);
    }

    #[tokio::test]
    async fn test_first_window_failure_reports_nothing_scanned() {
        let mut chain = ScriptedChain::new(50, u64::MAX);
        chain.broken = Some(0..=50);
        let retry = immediate(2);
        let scanner = WindowScanner::new(&chain, 1, WindowSize::new(10), &retry);

        let outcome = scanner.scan(Address::ZERO, 0, 50, |_| {}).await;

        assert_eq!(outcome.last_scanned, None);
        assert!(!outcome.is_complete());
    }

    #[tokio::test]
    async fn test_start_after_head_scans_nothing() {
        let chain = ScriptedChain::new(100, u64::MAX);
        let retry = immediate(1);
        let scanner = WindowScanner::new(&chain, 1, WindowSize::new(10), &retry);

        let outcome = scanner.scan(Address::ZERO, 101, 100, |_| {}).await;

        assert!(chain.queries().is_empty());
        assert_eq!(outcome.windows_scanned, 0);
        assert_eq!(outcome.last_scanned, None);
        assert!(outcome.is_complete());
    }

    #[tokio::test]
    async fn test_window_grows_back_after_success() {
        let chain = ScriptedChain::new(199, 40);
        let retry = immediate(5);
        let scanner = WindowScanner::new(&chain, 1, WindowSize::new(80), &retry);

        scanner.scan(Address::ZERO, 0, 199, |_| {}).await;

        // 80 fails, 40 ok, grows to 80 again which fails, ...
        let queries = chain.queries();
        assert_eq!(&queries[..3], &[(0, 79), (0, 39), (40, 119)]);
    }

    #[test]
    fn test_window_state_attempts() {
        assert_eq!(WindowState::Pending.next_attempt(), 1);
        assert_eq!(WindowState::Failed { attempt: 3 }.next_attempt(), 4);
    }
}
