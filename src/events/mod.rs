// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Factory event processing.
//!
//! This module handles:
//! - The `PairCreated` event definition
//! - Semantic filter builders for factory log queries
//! - Window scanning with adaptive window size, retries and rate limiting

pub mod definitions;
pub mod filter;
pub mod scanner;

pub use definitions::PairCreated;
pub use filter::PairCreatedFilterBuilder;
pub use scanner::{ScanOutcome, WindowScanner};
