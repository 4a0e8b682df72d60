// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`ChainRpcClient`] backed by an alloy provider

use alloy_network::AnyNetwork;
use alloy_primitives::{Address, BlockNumber};
use alloy_provider::Provider;
use alloy_rpc_types::Log;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::{ChainRpcClient, PairCreatedEvent};
use crate::errors::RpcError;
use crate::events::definitions::PairCreated;
use crate::events::filter::PairCreatedFilterBuilder;

/// Chain client that issues `eth_blockNumber` and `eth_getLogs` through alloy
///
/// # Example
///
/// ```rust,ignore
/// use pairscan::provider::create_http_provider;
/// use pairscan::AlloyChainClient;
///
/// let provider = create_http_provider("https://arb1.arbitrum.io/rpc")?;
/// let client = AlloyChainClient::new(provider);
/// let head = client.current_head().await?;
/// ```
#[derive(Debug, Clone)]
pub struct AlloyChainClient<P> {
    provider: P,
}

impl<P> AlloyChainClient<P> {
    /// Wrap a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> ChainRpcClient for AlloyChainClient<P>
where
    P: Provider<AnyNetwork> + Send + Sync,
{
    async fn current_head(&self) -> Result<BlockNumber, RpcError> {
        self.provider
            .get_block_number()
            .await
            .map_err(RpcError::get_block_number_failed)
    }

    async fn pair_created_events(
        &self,
        factory: Address,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<PairCreatedEvent>, RpcError> {
        let filter = PairCreatedFilterBuilder::new(factory)
            .in_block_range(from_block, to_block)
            .build();

        let logs = self.provider.get_logs(&filter).await.map_err(|e| {
            RpcError::get_logs_failed(format!("PairCreated {from_block}-{to_block}"), e)
        })?;

        debug!(
            factory = %factory,
            logs_count = logs.len(),
            from_block,
            to_block,
            "Fetched PairCreated logs"
        );

        Ok(decode_pair_created_logs(&logs))
    }
}

/// Decode `PairCreated` logs, skipping any that don't match the event layout
pub(crate) fn decode_pair_created_logs(logs: &[Log]) -> Vec<PairCreatedEvent> {
    logs.iter()
        .filter_map(|log| match PairCreated::decode_log(&log.inner) {
            Ok(event) => Some(PairCreatedEvent {
                token0: event.token0,
                token1: event.token1,
                pair: event.pair,
            }),
            Err(e) => {
                // Non-standard forks occasionally emit a different layout.
                warn!(error = ?e, block = ?log.block_number, "Failed to decode PairCreated log");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, LogData, B256, U256};

    fn log_with(data: LogData) -> Log {
        Log {
            inner: alloy_primitives::Log {
                address: address!("c0aee478e3658e2610c5f7a4a2e1777ce9e4f2ac"),
                data,
            },
            block_hash: Some(B256::ZERO),
            block_number: Some(1000),
            block_timestamp: None,
            transaction_hash: Some(B256::ZERO),
            transaction_index: Some(0),
            log_index: Some(0),
            removed: false,
        }
    }

    #[test]
    fn test_decode_skips_foreign_logs() {
        let token0 = address!("1111111111111111111111111111111111111111");
        let token1 = address!("2222222222222222222222222222222222222222");
        let pair = address!("3333333333333333333333333333333333333333");

        let good = log_with(
            PairCreated {
                token0,
                token1,
                pair,
                allPairsLength: U256::from(1),
            }
            .encode_log_data(),
        );
        let foreign = log_with(LogData::new_unchecked(vec![B256::ZERO], Default::default()));

        let events = decode_pair_created_logs(&[good, foreign]);

        assert_eq!(
            events,
            vec![PairCreatedEvent {
                token0,
                token1,
                pair
            }]
        );
    }
}
