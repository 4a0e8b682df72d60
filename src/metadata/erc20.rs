// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! On-chain ERC20 metadata lookup
//!
//! Reads `name()`, `symbol()` and `decimals()` for every requested token, at
//! most `MAX_CONCURRENT_TOKENS` tokens at a time.
//!
//! A call that reverts or returns data that does not decode means the token
//! has no usable metadata: it is left out of the result. Anything else
//! (connection errors, rate limits, empty responses) fails the whole batch so
//! the chain is retried on the next run.

use std::collections::HashMap;

use alloy_contract::Error as ContractError;
use alloy_erc20_full::LazyToken;
use alloy_network::AnyNetwork;
use alloy_primitives::{Address, ChainId};
use alloy_provider::Provider;
use alloy_transport::RpcError;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use super::{MetadataLookup, TokenMetadata};
use crate::errors::MetadataError;

/// Tokens whose metadata is fetched concurrently
const MAX_CONCURRENT_TOKENS: usize = 16;

/// [`MetadataLookup`] that calls the token contracts directly
#[derive(Debug, Clone)]
pub struct Erc20MetadataLookup<P> {
    providers: HashMap<ChainId, P>,
}

impl<P> Default for Erc20MetadataLookup<P> {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }
}

impl<P> Erc20MetadataLookup<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `provider` for lookups on `chain_id`
    pub fn with_provider(mut self, chain_id: ChainId, provider: P) -> Self {
        self.providers.insert(chain_id, provider);
        self
    }
}

/// Whether a failed call says something about the token or about the provider
fn is_token_failure(error: &ContractError) -> bool {
    match error {
        ContractError::TransportError(RpcError::ErrorResp(payload)) => !payload.is_retry_err(),
        ContractError::TransportError(_) | ContractError::PendingTransactionError(_) => false,
        _ => true,
    }
}

/// Resolve one call, turning provider failures into a batch error
fn settle<T>(
    chain_id: ChainId,
    token_address: Address,
    field: &str,
    result: Result<T, ContractError>,
) -> Result<Option<T>, MetadataError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_token_failure(&e) => {
            debug!(chain_id, ?token_address, field, error = %e, "Token has no usable metadata");
            Ok(None)
        }
        Err(e) => {
            warn!(chain_id, ?token_address, field, error = %e, "Metadata call failed");
            Err(MetadataError::lookup_failed(
                chain_id,
                format!("{field} of {token_address}: {e}"),
            ))
        }
    }
}

async fn fetch_metadata<P>(
    chain_id: ChainId,
    token_address: Address,
    provider: P,
) -> Result<Option<(Address, TokenMetadata)>, MetadataError>
where
    P: Provider<AnyNetwork> + Clone,
{
    let token = LazyToken::new(token_address, provider);

    let name = token.name().await.map(|name| name.to_string());
    let Some(name) = settle(chain_id, token_address, "name", name)? else {
        return Ok(None);
    };
    let symbol = token.symbol().await.map(|symbol| symbol.to_string());
    let Some(symbol) = settle(chain_id, token_address, "symbol", symbol)? else {
        return Ok(None);
    };
    let decimals = token.decimals().await.map(|decimals| decimals.to_owned());
    let Some(decimals) = settle(chain_id, token_address, "decimals", decimals)? else {
        return Ok(None);
    };

    Ok(Some((token_address, TokenMetadata::new(name, symbol, decimals))))
}

#[async_trait]
impl<P> MetadataLookup for Erc20MetadataLookup<P>
where
    P: Provider<AnyNetwork> + Clone + Send + Sync + 'static,
{
    async fn lookup(
        &self,
        chain_id: ChainId,
        addresses: &[Address],
    ) -> Result<HashMap<Address, TokenMetadata>, MetadataError> {
        let provider = self
            .providers
            .get(&chain_id)
            .ok_or(MetadataError::ProviderMissing { chain_id })?;

        if addresses.is_empty() {
            return Ok(HashMap::new());
        }

        info!(chain_id, count = addresses.len(), "Batch fetching token metadata");

        let found: Vec<Option<(Address, TokenMetadata)>> = stream::iter(addresses.iter().copied())
            .map(|token_address| fetch_metadata(chain_id, token_address, provider.clone()))
            .buffer_unordered(MAX_CONCURRENT_TOKENS)
            .try_collect()
            .await?;

        Ok(found.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{create_http_provider, AnyHttpProvider};
    use alloy_json_rpc::ErrorPayload;
    use alloy_transport::TransportErrorKind;

    #[tokio::test]
    async fn test_missing_provider_fails_batch() {
        let lookup: Erc20MetadataLookup<AnyHttpProvider> = Erc20MetadataLookup::new();

        let result = lookup.lookup(42161, &[Address::ZERO]).await;

        assert!(matches!(
            result,
            Err(MetadataError::ProviderMissing { chain_id: 42161 })
        ));
    }

    #[tokio::test]
    async fn test_empty_batch_does_not_touch_provider() {
        // Nothing listens on this port; any RPC call would fail.
        let provider = create_http_provider("http://127.0.0.1:1").unwrap();
        let lookup = Erc20MetadataLookup::new().with_provider(1, provider);

        let result = lookup.lookup(1, &[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_provider_fails_batch() {
        let provider = create_http_provider("http://127.0.0.1:1").unwrap();
        let lookup = Erc20MetadataLookup::new().with_provider(1, provider);

        let result = lookup.lookup(1, &[Address::repeat_byte(7)]).await;

        assert!(matches!(
            result,
            Err(MetadataError::LookupFailed { chain_id: 1, .. })
        ));
    }

    #[test]
    fn test_revert_is_a_token_failure() {
        let reverted = ErrorPayload {
            code: 3,
            message: "execution reverted".into(),
            data: None,
        };
        let error = ContractError::TransportError(RpcError::ErrorResp(reverted));

        assert!(is_token_failure(&error));
    }

    #[test]
    fn test_undecodable_result_is_a_token_failure() {
        let error = ContractError::from(alloy_sol_types::Error::Overrun);

        assert!(is_token_failure(&error));
    }

    #[test]
    fn test_rate_limit_response_is_not_a_token_failure() {
        let limited = ErrorPayload {
            code: 429,
            message: "Too Many Requests".into(),
            data: None,
        };
        let error = ContractError::TransportError(RpcError::ErrorResp(limited));

        assert!(!is_token_failure(&error));
    }

    #[test]
    fn test_transport_error_is_not_a_token_failure() {
        let refused = ContractError::TransportError(TransportErrorKind::custom_str(
            "connection refused",
        ));
        let busy = ContractError::TransportError(TransportErrorKind::http_error(
            503,
            String::new(),
        ));

        assert!(!is_token_failure(&refused));
        assert!(!is_token_failure(&busy));
    }

    #[test]
    fn test_settle_reports_provider_failure_for_the_batch() {
        let error = ContractError::TransportError(RpcError::NullResp);

        let settled = settle::<u8>(10, Address::ZERO, "decimals", Err(error));

        assert!(matches!(
            settled,
            Err(MetadataError::LookupFailed { chain_id: 10, .. })
        ));
        assert!(matches!(settle(10, Address::ZERO, "decimals", Ok(18u8)), Ok(Some(18))));
    }
}
