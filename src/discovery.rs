// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Multi-chain token discovery
//!
//! [`PairDiscovery`] runs the whole pipeline for a set of chains:
//!
//! ```text
//! phase 1 (one task per chain, all joined)
//!     head ─▶ WindowScanner per factory ─▶ OccurrenceTable ─▶ select_candidates
//!
//! phase 2 (one task per chain with candidates, all joined)
//!     enrich_candidates ─▶ Vec<TokenRecord>
//!
//! merge (input chain order) ─▶ DiscoveryReport
//! ```
//!
//! Chains never share mutable state. A chain that fails, stalls or runs past
//! its deadline is reported on its own [`ChainReport`] and keeps its previous
//! checkpoint; every other chain is unaffected.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{BlockNumber, ChainId};
use futures::future::join_all;
use tokio::task::JoinError;
use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn, Instrument};

use crate::chains::ChainDescriptor;
use crate::checkpoint::Checkpoints;
use crate::config::DiscoveryConfig;
use crate::errors::{DiscoveryError, ScanError};
use crate::events::scanner::{ScanOutcome, WindowScanner};
use crate::metadata::{enrich_candidates, MetadataLookup};
use crate::policy::TokenPolicy;
use crate::rpc::ChainClients;
use crate::spans;
use crate::tokens::{select_candidates, OccurrenceTable, TokenRecord, TokenSet};

/// How a chain's run ended
#[derive(Debug)]
pub enum ChainStatus {
    /// Scanned to the head and enriched
    Completed,
    /// A factory scan stalled; everything before the stall was kept
    Partial(ScanError),
    /// The chain produced nothing usable
    Failed(DiscoveryError),
    /// The chain ran past the configured deadline; its results were discarded
    TimedOut,
    /// The token policy does not cover this chain
    Unsupported,
}

impl ChainStatus {
    /// Whether the chain's results made it into the report
    pub fn is_success(&self) -> bool {
        matches!(self, ChainStatus::Completed | ChainStatus::Partial(_))
    }
}

impl fmt::Display for ChainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainStatus::Completed => write!(f, "completed"),
            ChainStatus::Partial(e) => write!(f, "partial ({e})"),
            ChainStatus::Failed(e) => write!(f, "failed ({e})"),
            ChainStatus::TimedOut => write!(f, "timed out"),
            ChainStatus::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Per-chain summary of a discovery run
#[derive(Debug)]
pub struct ChainReport {
    pub chain_id: ChainId,
    /// Tokens that passed the threshold and ignore list
    pub candidates: usize,
    /// Candidates that were enriched into records
    pub tokens: usize,
    pub windows_scanned: u64,
    pub events_seen: u64,
    /// Checkpoint after this run (unchanged on failure)
    pub checkpoint: Option<BlockNumber>,
    pub status: ChainStatus,
}

impl ChainReport {
    fn empty(chain_id: ChainId, checkpoint: Option<BlockNumber>, status: ChainStatus) -> Self {
        Self {
            chain_id,
            candidates: 0,
            tokens: 0,
            windows_scanned: 0,
            events_seen: 0,
            checkpoint,
            status,
        }
    }
}

/// Result of [`PairDiscovery::run`]
#[derive(Debug)]
pub struct DiscoveryReport {
    /// Enriched tokens of every successful chain, in input chain order
    pub tokens: Vec<TokenRecord>,
    /// Input checkpoints advanced for every successful chain
    pub checkpoints: Checkpoints,
    /// One entry per input chain, in input order
    pub chains: Vec<ChainReport>,
}

impl DiscoveryReport {
    /// Report of `chain_id`, if it was part of the run
    pub fn chain(&self, chain_id: ChainId) -> Option<&ChainReport> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// Chains whose results were discarded
    pub fn failed_chains(&self) -> impl Iterator<Item = &ChainReport> {
        self.chains.iter().filter(|c| !c.status.is_success())
    }
}

/// Outcome of the scan phase of one chain
#[derive(Debug)]
struct ChainScan {
    candidates: TokenSet,
    /// Highest block covered by every factory, before merging with the prior checkpoint
    reached: Option<BlockNumber>,
    windows_scanned: u64,
    events_seen: u64,
    stalled: Option<ScanError>,
}

/// What a chain task handed back at a join point
enum PhaseResult<T> {
    Done(T),
    Failed(DiscoveryError),
    TimedOut,
}

impl<T> PhaseResult<T> {
    fn from_join(chain_id: ChainId, joined: Result<PhaseResult<T>, JoinError>) -> Self {
        joined.unwrap_or_else(|e| {
            error!(chain_id, error = %e, "Chain task did not complete");
            PhaseResult::Failed(DiscoveryError::task_failed(chain_id, e.to_string()))
        })
    }
}

/// Highest block covered by one factory's scan
///
/// A complete scan covers everything up to the head, including the case where
/// there was nothing left to scan.
fn factory_reach(outcome: &ScanOutcome) -> Option<BlockNumber> {
    if outcome.is_complete() {
        Some(outcome.head)
    } else {
        outcome.last_scanned
    }
}

/// Combine factory reaches into a chain checkpoint
///
/// The chain is only as far along as its slowest factory. `None` if any
/// factory covered nothing or the chain has no factories.
fn chain_reach(reaches: &[Option<BlockNumber>]) -> Option<BlockNumber> {
    if reaches.is_empty() {
        return None;
    }
    reaches
        .iter()
        .copied()
        .collect::<Option<Vec<_>>>()
        .and_then(|blocks| blocks.into_iter().min())
}

/// Concurrent discovery over many chains
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use pairscan::{
///     sushiswap_v2_chains, Checkpoints, DiscoveryConfig, PairDiscovery, StaticTokenPolicy,
/// };
/// use pairscan::provider::ProviderPool;
///
/// let config = DiscoveryConfig::with_common_defaults();
/// let chains = sushiswap_v2_chains(&config);
/// let pool = ProviderPool::from_env(chains.iter().map(|c| c.chain_id));
///
/// let discovery = PairDiscovery::new(
///     config,
///     Arc::new(pool.clone()),
///     Arc::new(pool.metadata_lookup()),
///     Arc::new(StaticTokenPolicy::sushiswap_v2()),
/// );
///
/// let report = discovery.run(&chains, &Checkpoints::new()).await;
/// println!("discovered {} tokens", report.tokens.len());
/// ```
#[derive(Clone)]
pub struct PairDiscovery {
    config: Arc<DiscoveryConfig>,
    clients: Arc<dyn ChainClients>,
    metadata: Arc<dyn MetadataLookup>,
    policy: Arc<dyn TokenPolicy>,
}

impl PairDiscovery {
    pub fn new(
        config: DiscoveryConfig,
        clients: Arc<dyn ChainClients>,
        metadata: Arc<dyn MetadataLookup>,
        policy: Arc<dyn TokenPolicy>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            clients,
            metadata,
            policy,
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Discover tokens on every chain in `chains`, resuming from `checkpoints`
    ///
    /// Never fails as a whole: per-chain problems are reported in
    /// [`DiscoveryReport::chains`]. Running again with the returned checkpoints
    /// only scans blocks produced since.
    pub async fn run(&self, chains: &[ChainDescriptor], checkpoints: &Checkpoints) -> DiscoveryReport {
        let span = spans::discover_tokens(chains.len());
        self.run_inner(chains, checkpoints).instrument(span).await
    }

    async fn run_inner(
        &self,
        chains: &[ChainDescriptor],
        checkpoints: &Checkpoints,
    ) -> DiscoveryReport {
        let deadline = self.config.chain_deadline.map(|d| Instant::now() + d);

        let (supported, unsupported): (Vec<&ChainDescriptor>, Vec<&ChainDescriptor>) = chains
            .iter()
            .partition(|c| self.policy.is_chain_supported(c.chain_id));

        for chain in &unsupported {
            warn!(chain = %chain.chain(), "Skipping unsupported chain");
        }

        info!(
            chains = supported.len(),
            skipped = unsupported.len(),
            deadline_secs = ?self.config.chain_deadline.map(|d| d.as_secs()),
            "Starting token discovery"
        );

        // Phase 1: scan, aggregate and filter every chain in parallel.
        let scan_handles: Vec<_> = supported
            .iter()
            .map(|descriptor| {
                let this = self.clone();
                let descriptor = (*descriptor).clone();
                let prior = checkpoints.get(descriptor.chain_id);
                let span = spans::scan_chain(descriptor.chain(), prior);
                tokio::spawn(
                    async move {
                        let work = this.scan_chain(&descriptor, prior);
                        match deadline {
                            Some(at) => match timeout_at(at, work).await {
                                Ok(result) => result,
                                Err(_) => PhaseResult::TimedOut,
                            },
                            None => work.await,
                        }
                    }
                    .instrument(span),
                )
            })
            .collect();

        let scans: Vec<PhaseResult<ChainScan>> = join_all(scan_handles)
            .await
            .into_iter()
            .zip(&supported)
            .map(|(joined, descriptor)| PhaseResult::from_join(descriptor.chain_id, joined))
            .collect();

        // Phase 2: enrich every chain that produced candidates.
        let enrich_handles: Vec<_> = scans
            .iter()
            .zip(&supported)
            .map(|(scan, descriptor)| match scan {
                PhaseResult::Done(scan) if !scan.candidates.is_empty() => {
                    let metadata = Arc::clone(&self.metadata);
                    let chain_id = descriptor.chain_id;
                    let candidates = scan.candidates.clone();
                    let span = spans::enrich_chain(descriptor.chain(), candidates.len());
                    Some(tokio::spawn(
                        async move {
                            let work = enrich_candidates(chain_id, &candidates, metadata.as_ref());
                            let result = match deadline {
                                Some(at) => match timeout_at(at, work).await {
                                    Ok(result) => result,
                                    Err(_) => return PhaseResult::TimedOut,
                                },
                                None => work.await,
                            };
                            match result {
                                Ok(records) => PhaseResult::Done(records),
                                Err(e) => PhaseResult::Failed(e.into()),
                            }
                        }
                        .instrument(span),
                    ))
                }
                _ => None,
            })
            .collect();

        let mut enriched: Vec<Option<PhaseResult<Vec<TokenRecord>>>> = Vec::new();
        for (handle, descriptor) in enrich_handles.into_iter().zip(&supported) {
            let result = match handle {
                Some(handle) => Some(PhaseResult::from_join(descriptor.chain_id, handle.await)),
                None => None,
            };
            enriched.push(result);
        }

        // Merge in input order.
        let mut report = DiscoveryReport {
            tokens: Vec::new(),
            checkpoints: checkpoints.clone(),
            chains: Vec::with_capacity(chains.len()),
        };

        let mut phase_results = supported
            .iter()
            .map(|c| c.chain_id)
            .zip(scans.into_iter().zip(enriched));

        for descriptor in chains {
            let chain_id = descriptor.chain_id;
            let prior = checkpoints.get(chain_id);

            if !self.policy.is_chain_supported(chain_id) {
                report
                    .chains
                    .push(ChainReport::empty(chain_id, prior, ChainStatus::Unsupported));
                continue;
            }

            let Some((_, (scan, enrichment))) = phase_results.next() else {
                break;
            };

            let chain_report = match scan {
                PhaseResult::TimedOut => {
                    warn!(chain_id, "Chain exceeded its deadline, discarding results");
                    ChainReport::empty(chain_id, prior, ChainStatus::TimedOut)
                }
                PhaseResult::Failed(e) => {
                    error!(chain_id, error = %e, "Chain scan failed");
                    ChainReport::empty(chain_id, prior, ChainStatus::Failed(e))
                }
                PhaseResult::Done(scan) => {
                    self.merge_chain(chain_id, scan, enrichment, &mut report)
                }
            };

            report.chains.push(chain_report);
        }

        info!(
            tokens = report.tokens.len(),
            chains = report.chains.len(),
            failed = report.failed_chains().count(),
            "Token discovery finished"
        );

        report
    }

    /// Fold one scanned chain into the report
    fn merge_chain(
        &self,
        chain_id: ChainId,
        scan: ChainScan,
        enrichment: Option<PhaseResult<Vec<TokenRecord>>>,
        report: &mut DiscoveryReport,
    ) -> ChainReport {
        let prior = report.checkpoints.get(chain_id);
        let mut chain_report = ChainReport {
            chain_id,
            candidates: scan.candidates.len(),
            tokens: 0,
            windows_scanned: scan.windows_scanned,
            events_seen: scan.events_seen,
            checkpoint: prior,
            status: ChainStatus::Completed,
        };

        let records = match enrichment {
            None => Vec::new(),
            Some(PhaseResult::Done(records)) => records,
            Some(PhaseResult::TimedOut) => {
                warn!(chain_id, "Enrichment exceeded the chain deadline, discarding results");
                chain_report.status = ChainStatus::TimedOut;
                return chain_report;
            }
            Some(PhaseResult::Failed(e)) => {
                // Keep the old checkpoint so the candidates are found again next run.
                error!(chain_id, error = %e, "Metadata enrichment failed");
                chain_report.status = ChainStatus::Failed(e);
                return chain_report;
            }
        };

        if let Some(reached) = scan.reached {
            chain_report.checkpoint = Some(report.checkpoints.advance(chain_id, reached));
        }
        chain_report.tokens = records.len();
        report.tokens.extend(records);

        if let Some(stall) = scan.stalled {
            chain_report.status = ChainStatus::Partial(stall);
        }

        info!(
            chain_id,
            candidates = chain_report.candidates,
            tokens = chain_report.tokens,
            checkpoint = ?chain_report.checkpoint,
            status = %chain_report.status,
            "Chain finished"
        );

        chain_report
    }

    /// Phase 1 for one chain: head, scans, aggregation and threshold filter
    async fn scan_chain(
        &self,
        descriptor: &ChainDescriptor,
        prior: Option<BlockNumber>,
    ) -> PhaseResult<ChainScan> {
        let chain_id = descriptor.chain_id;

        let client = match self.clients.client_for(chain_id) {
            Ok(client) => client,
            Err(e) => return PhaseResult::Failed(e.into()),
        };
        let head = match client.current_head().await {
            Ok(head) => head,
            Err(e) => return PhaseResult::Failed(e.into()),
        };

        let mut table = OccurrenceTable::new();
        let mut reaches = Vec::with_capacity(descriptor.factories.len());
        let mut scan = ChainScan {
            candidates: TokenSet::new(),
            reached: None,
            windows_scanned: 0,
            events_seen: 0,
            stalled: None,
        };

        let scanner = WindowScanner::new(
            client.as_ref(),
            chain_id,
            descriptor.window_size,
            &self.config.retry,
        )
        .with_rate_limit(self.config.get_rate_limit_delay(chain_id));

        for factory in &descriptor.factories {
            let start = factory.resume_block(prior);
            let span = spans::scan_factory(chain_id, factory.contract_address, start, head);
            let outcome = scanner
                .scan(factory.contract_address, start, head, |event| {
                    table.record_pair(event.token0, event.token1)
                })
                .instrument(span)
                .await;

            reaches.push(factory_reach(&outcome));
            scan.windows_scanned += outcome.windows_scanned;
            scan.events_seen += outcome.events_seen;
            if scan.stalled.is_none() {
                scan.stalled = outcome.stalled;
            }
        }

        scan.reached = chain_reach(&reaches);
        scan.candidates = select_candidates(
            chain_id,
            &table,
            self.policy.as_ref(),
            self.config.get_min_occurrences(chain_id),
        );

        info!(
            chain_id,
            head,
            pairs = table.pairs_recorded(),
            tokens_seen = table.len(),
            candidates = scan.candidates.len(),
            reached = ?scan.reached,
            "Chain scan finished"
        );

        PhaseResult::Done(scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    fn outcome(head: BlockNumber, last_scanned: Option<BlockNumber>, stalled: bool) -> ScanOutcome {
        let mut outcome = ScanOutcome {
            factory: Address::ZERO,
            start: 0,
            head,
            last_scanned,
            windows_scanned: 0,
            windows_failed: 0,
            events_seen: 0,
            stalled: None,
        };
        if stalled {
            outcome.stalled = Some(ScanError::RetriesExhausted {
                factory: Address::ZERO,
                from_block: last_scanned.map_or(0, |b| b + 1),
                attempts: 1,
                window: 1,
                source: crate::errors::RpcError::client_unavailable(1),
            });
        }
        outcome
    }

    #[test]
    fn test_complete_scan_reaches_head() {
        assert_eq!(factory_reach(&outcome(500, Some(500), false)), Some(500));
        // Nothing to scan still counts as caught up.
        assert_eq!(factory_reach(&outcome(500, None, false)), Some(500));
    }

    #[test]
    fn test_stalled_scan_reaches_last_window() {
        assert_eq!(factory_reach(&outcome(500, Some(299), true)), Some(299));
        assert_eq!(factory_reach(&outcome(500, None, true)), None);
    }

    #[test]
    fn test_chain_reach_is_slowest_factory() {
        assert_eq!(chain_reach(&[Some(500), Some(299)]), Some(299));
        assert_eq!(chain_reach(&[Some(500), None]), None);
        assert_eq!(chain_reach(&[]), None);
    }

    #[test]
    fn test_status_success() {
        assert!(ChainStatus::Completed.is_success());
        assert!(!ChainStatus::TimedOut.is_success());
        assert!(!ChainStatus::Unsupported.is_success());
    }
}
