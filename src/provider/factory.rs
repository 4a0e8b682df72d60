// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider factory functions

use alloy_network::AnyNetwork;
use alloy_provider::ProviderBuilder;
use tracing::warn;

use super::AnyHttpProvider;
use crate::errors::RpcError;

/// Create an HTTP provider for `url`
///
/// Returns a bare `RootProvider` without fillers; discovery never sends
/// transactions.
///
/// # Examples
///
/// ```rust,ignore
/// use pairscan::provider::create_http_provider;
///
/// let provider = create_http_provider("https://eth.llamarpc.com")?;
/// ```
///
/// # Errors
///
/// Returns [`RpcError::ProviderUrlInvalid`] if the URL cannot be parsed.
pub fn create_http_provider(url: &str) -> Result<AnyHttpProvider, RpcError> {
    let parsed: url::Url = url.parse().map_err(|e| {
        warn!(url, error = ?e, "Invalid provider URL");
        RpcError::ProviderUrlInvalid(format!("{url}: {e}"))
    })?;

    Ok(ProviderBuilder::new()
        .disable_recommended_fillers()
        .network::<AnyNetwork>()
        .connect_http(parsed))
}
