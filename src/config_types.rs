//! Strong types for configuration values
//!
//! These types ensure configuration values are not confused with
//! blockchain values (block numbers, occurrence counts, etc.).

use serde::{Deserialize, Serialize};

/// Number of blocks covered by a single `eth_getLogs` query
///
/// Some providers reject log queries spanning too many blocks, and some
/// chains (BSC in particular) are much stricter than others. The scanner
/// starts every factory at the configured window and shrinks it on failure.
///
/// A window is never empty: values below one are raised to one, including
/// when deserialized.
///
/// # Examples
///
/// ```
/// use pairscan::WindowSize;
///
/// let window = WindowSize::new(1000);
/// assert_eq!(window.as_u64(), 1000);
/// assert_eq!(window.windows_needed(0, 2500), 3); // 0-999, 1000-1999, 2000-2500
///
/// assert_eq!(WindowSize::new(0).as_u64(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct WindowSize(u64);

impl WindowSize {
    /// Default window for most chains
    pub const DEFAULT: Self = Self(100_000);

    /// Window for chains whose providers cap log ranges aggressively (e.g., BSC)
    pub const STRICT: Self = Self(5_000);

    /// Smallest window the scanner shrinks to by default
    pub const FLOOR: Self = Self(16);

    /// Create a new window size
    pub const fn new(blocks: u64) -> Self {
        if blocks == 0 {
            Self(1)
        } else {
            Self(blocks)
        }
    }

    /// Get the inner u64 value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Half of this window, never going below `floor`
    ///
    /// ```
    /// use pairscan::WindowSize;
    ///
    /// let floor = WindowSize::new(100);
    /// assert_eq!(WindowSize::new(1000).halved(floor), WindowSize::new(500));
    /// assert_eq!(WindowSize::new(150).halved(floor), WindowSize::new(100));
    /// ```
    pub fn halved(self, floor: WindowSize) -> Self {
        Self::new(self.0 / 2).max(floor)
    }

    /// Double this window, never going above `ceiling`
    pub fn doubled(self, ceiling: WindowSize) -> Self {
        Self::new(self.0.saturating_mul(2)).min(ceiling)
    }

    /// Last block of the window starting at `start`, capped at `head`
    pub fn window_end(&self, start: u64, head: u64) -> u64 {
        start.saturating_add(self.0 - 1).min(head)
    }

    /// Number of full-size windows needed to cover `[start, end]`
    pub fn windows_needed(&self, start: u64, end: u64) -> u64 {
        if end < start {
            return 0;
        }
        (end - start).saturating_add(1).div_ceil(self.0)
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u64> for WindowSize {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<WindowSize> for u64 {
    fn from(value: WindowSize) -> Self {
        value.0
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} blocks", self.0)
    }
}

/// Minimum number of distinct pairs a token must appear in to be kept
///
/// # Examples
///
/// ```
/// use pairscan::MinOccurrences;
///
/// let min = MinOccurrences::DEFAULT;
/// assert!(min.is_met_by(3));
/// assert!(!min.is_met_by(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinOccurrences(u32);

impl MinOccurrences {
    /// A token must be part of at least three pairs
    pub const DEFAULT: Self = Self(3);

    /// Create a new threshold
    pub const fn new(count: u32) -> Self {
        Self(count)
    }

    /// Get the inner u32 value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Whether `count` clears the threshold (inclusive)
    pub const fn is_met_by(&self, count: u32) -> bool {
        count >= self.0
    }
}

impl Default for MinOccurrences {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for MinOccurrences {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for MinOccurrences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pairs", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_size_never_zero() {
        assert_eq!(WindowSize::new(0), WindowSize::new(1));
        assert_eq!(WindowSize::from(0), WindowSize::new(1));
    }

    #[test]
    fn test_halved_respects_floor() {
        let floor = WindowSize::new(10);
        let mut window = WindowSize::new(100);

        window = window.halved(floor);
        assert_eq!(window, WindowSize::new(50));
        window = window.halved(floor);
        assert_eq!(window, WindowSize::new(25));
        window = window.halved(floor);
        assert_eq!(window, WindowSize::new(12));
        window = window.halved(floor);
        assert_eq!(window, floor);
        window = window.halved(floor);
        assert_eq!(window, floor);
    }

    #[test]
    fn test_halved_to_one() {
        let floor = WindowSize::new(1);
        assert_eq!(WindowSize::new(1).halved(floor), WindowSize::new(1));
        assert_eq!(WindowSize::new(3).halved(floor), WindowSize::new(1));
    }

    #[test]
    fn test_doubled_respects_ceiling() {
        let ceiling = WindowSize::new(100);
        assert_eq!(WindowSize::new(30).doubled(ceiling), WindowSize::new(60));
        assert_eq!(WindowSize::new(60).doubled(ceiling), ceiling);
        assert_eq!(WindowSize::new(u64::MAX).doubled(WindowSize::new(u64::MAX)).as_u64(), u64::MAX);
    }

    #[test]
    fn test_window_end() {
        let window = WindowSize::new(100);
        assert_eq!(window.window_end(0, 1000), 99);
        assert_eq!(window.window_end(950, 1000), 1000);
        assert_eq!(window.window_end(1000, 1000), 1000);
        assert_eq!(window.window_end(u64::MAX - 5, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_windows_needed() {
        let window = WindowSize::new(1000);
        assert_eq!(window.windows_needed(0, 999), 1);
        assert_eq!(window.windows_needed(0, 1000), 2);
        assert_eq!(window.windows_needed(10, 5), 0);
        assert_eq!(window.windows_needed(7, 7), 1);
    }

    #[test]
    fn test_min_occurrences_boundary() {
        let min = MinOccurrences::new(5);
        assert!(min.is_met_by(5));
        assert!(min.is_met_by(6));
        assert!(!min.is_met_by(4));
        assert!(MinOccurrences::new(0).is_met_by(0));
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&WindowSize::new(5000)).unwrap();
        assert_eq!(json, "5000");
        let min: MinOccurrences = serde_json::from_str("7").unwrap();
        assert_eq!(min, MinOccurrences::new(7));
    }

    #[test]
    fn test_deserialized_zero_window_is_raised_to_one() {
        let window: WindowSize = serde_json::from_str("0").unwrap();

        assert_eq!(window, WindowSize::new(1));
        assert_eq!(window.window_end(10, 100), 10);
        assert_eq!(window.windows_needed(10, 12), 3);
    }
}
