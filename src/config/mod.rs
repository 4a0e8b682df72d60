//! Configuration for discovery runs
//!
//! This module provides a flexible configuration system for controlling
//! pairscan's RPC behavior: log window sizes, retry policy, rate limiting,
//! occurrence thresholds and per-chain deadlines.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use pairscan::DiscoveryConfig;
//!
//! // 100k-block windows everywhere except BSC (5k)
//! let config = DiscoveryConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use pairscan::DiscoveryConfigBuilder;
//! use std::time::Duration;
//!
//! let config = DiscoveryConfigBuilder::with_defaults()
//!     .window_size(20_000)
//!     .chain_rate_limit(8453, Duration::from_millis(100))
//!     .chain_min_occurrences(1, 5)
//!     .build();
//! ```

use std::collections::HashMap;
use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_primitives::ChainId;

use crate::config_types::{MinOccurrences, WindowSize};

pub mod constants;

/// Configuration for discovery runs
///
/// Use [`DiscoveryConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Blocks per log query before any shrinking
    /// Default: 100 000
    pub window_size: WindowSize,

    /// Minimum pair count for a token to become a candidate
    /// Default: 3
    pub min_occurrences: MinOccurrences,

    /// Delay between consecutive window queries
    /// Default: None (no delay)
    pub rate_limit_delay: Option<Duration>,

    /// How failed windows are retried
    pub retry: WindowRetryPolicy,

    /// Upper bound on how long a single chain may take, scan and enrichment together
    /// Default: None (no deadline)
    pub chain_deadline: Option<Duration>,

    /// Chain-specific overrides
    pub chain_overrides: HashMap<ChainId, ChainConfig>,
}

/// Chain-specific configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    /// Override window size for this chain
    pub window_size: Option<WindowSize>,

    /// Override occurrence threshold for this chain
    pub min_occurrences: Option<MinOccurrences>,

    /// Override rate limit delay for this chain
    pub rate_limit_delay: Option<Duration>,
}

/// Retry policy for a window query that failed
///
/// Each failure halves the window (down to `min_window`) and waits
/// `base_delay * 2^(attempt - 1)`, capped at `max_delay`, before retrying the
/// same start block. After `max_retries` consecutive failures the factory scan
/// stops at the last fully scanned block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRetryPolicy {
    /// Maximum consecutive failures tolerated at one start block
    pub max_retries: u32,
    /// Smallest window the scanner shrinks to
    pub min_window: WindowSize,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound on the delay between retries
    pub max_delay: Duration,
}

impl Default for WindowRetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 12,
            min_window: WindowSize::FLOOR,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl WindowRetryPolicy {
    /// Policy without delays between retries
    pub fn immediate(max_retries: u32, min_window: WindowSize) -> Self {
        Self {
            max_retries,
            min_window,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay to wait before retry number `attempt` (1-based)
    ///
    /// ```rust
    /// use pairscan::WindowRetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = WindowRetryPolicy::default();
    /// assert_eq!(policy.backoff(1), Duration::from_millis(250));
    /// assert_eq!(policy.backoff(3), Duration::from_millis(1000));
    /// assert_eq!(policy.backoff(40), Duration::from_secs(30));
    /// ```
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self::with_common_defaults()
    }
}

impl DiscoveryConfig {
    /// Create config with defaults that work against public RPC endpoints
    ///
    /// BSC endpoints reject wide `eth_getLogs` ranges, so BSC gets 5 000-block
    /// windows instead of 100 000.
    pub fn with_common_defaults() -> Self {
        let mut config = Self::minimal();

        config.set_chain_override(
            NamedChain::BinanceSmartChain as ChainId,
            ChainConfig {
                window_size: Some(WindowSize::STRICT),
                ..Default::default()
            },
        );

        config
    }

    /// Create minimal config with no chain overrides and no delays
    ///
    /// Suitable for testing or premium RPC endpoints with generous limits.
    pub fn minimal() -> Self {
        Self {
            window_size: WindowSize::DEFAULT,
            min_occurrences: MinOccurrences::DEFAULT,
            rate_limit_delay: None,
            retry: WindowRetryPolicy::default(),
            chain_deadline: None,
            chain_overrides: HashMap::new(),
        }
    }

    /// Get effective window size for a specific chain
    ///
    /// # Example
    ///
    /// ```rust
    /// use pairscan::{DiscoveryConfig, WindowSize};
    ///
    /// let config = DiscoveryConfig::default();
    /// assert_eq!(config.get_window_size(56), WindowSize::STRICT);
    /// assert_eq!(config.get_window_size(1), WindowSize::DEFAULT);
    /// ```
    pub fn get_window_size(&self, chain_id: ChainId) -> WindowSize {
        self.chain_overrides
            .get(&chain_id)
            .and_then(|c| c.window_size)
            .unwrap_or(self.window_size)
    }

    /// Get effective occurrence threshold for a specific chain
    pub fn get_min_occurrences(&self, chain_id: ChainId) -> MinOccurrences {
        self.chain_overrides
            .get(&chain_id)
            .and_then(|c| c.min_occurrences)
            .unwrap_or(self.min_occurrences)
    }

    /// Get effective rate limit delay for a specific chain
    pub fn get_rate_limit_delay(&self, chain_id: ChainId) -> Option<Duration> {
        self.chain_overrides
            .get(&chain_id)
            .and_then(|c| c.rate_limit_delay)
            .or(self.rate_limit_delay)
    }

    /// Set chain-specific override
    pub fn set_chain_override(&mut self, chain_id: ChainId, config: ChainConfig) {
        self.chain_overrides.insert(chain_id, config);
    }
}

/// Builder for [`DiscoveryConfig`]
///
/// # Example
///
/// ```rust
/// use pairscan::DiscoveryConfigBuilder;
/// use std::time::Duration;
///
/// let config = DiscoveryConfigBuilder::new()
///     .window_size(10_000)
///     .min_occurrences(2)
///     .chain_deadline(Duration::from_secs(600))
///     .build();
/// ```
pub struct DiscoveryConfigBuilder {
    config: DiscoveryConfig,
}

impl Default for DiscoveryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: DiscoveryConfig::minimal(),
        }
    }

    /// Start with common defaults
    ///
    /// Initializes the builder with the same defaults as [`DiscoveryConfig::with_common_defaults`].
    pub fn with_defaults() -> Self {
        Self {
            config: DiscoveryConfig::with_common_defaults(),
        }
    }

    /// Set global window size
    pub fn window_size(mut self, blocks: u64) -> Self {
        self.config.window_size = WindowSize::new(blocks);
        self
    }

    /// Set global occurrence threshold
    pub fn min_occurrences(mut self, count: u32) -> Self {
        self.config.min_occurrences = MinOccurrences::new(count);
        self
    }

    /// Set global rate limit delay
    pub fn rate_limit_delay(mut self, delay: Duration) -> Self {
        self.config.rate_limit_delay = Some(delay);
        self
    }

    /// Set the retry policy for failed windows
    pub fn retry_policy(mut self, retry: WindowRetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Set a per-chain deadline covering both the scan and the enrichment of a chain
    pub fn chain_deadline(mut self, deadline: Duration) -> Self {
        self.config.chain_deadline = Some(deadline);
        self
    }

    /// Add chain-specific configuration
    pub fn chain_config(mut self, chain_id: ChainId, config: ChainConfig) -> Self {
        self.config.set_chain_override(chain_id, config);
        self
    }

    /// Convenience: set window size for a specific chain
    pub fn chain_window_size(mut self, chain_id: ChainId, blocks: u64) -> Self {
        self.override_entry(chain_id).window_size = Some(WindowSize::new(blocks));
        self
    }

    /// Convenience: set occurrence threshold for a specific chain
    pub fn chain_min_occurrences(mut self, chain_id: ChainId, count: u32) -> Self {
        self.override_entry(chain_id).min_occurrences = Some(MinOccurrences::new(count));
        self
    }

    /// Convenience: set rate limit delay for a specific chain
    pub fn chain_rate_limit(mut self, chain_id: ChainId, delay: Duration) -> Self {
        self.override_entry(chain_id).rate_limit_delay = Some(delay);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> DiscoveryConfig {
        self.config
    }

    fn override_entry(&mut self, chain_id: ChainId) -> &mut ChainConfig {
        self.config.chain_overrides.entry(chain_id).or_default()
    }
}
