use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{info, warn};

use crate::{
    chains::sushiswap_v2_chains,
    config::DiscoveryConfig,
    discovery::PairDiscovery,
    policy::StaticTokenPolicy,
    provider::ProviderPool,
    tokenlist::{SaveMode, TokenList},
};

const DEFAULT_TOKEN_LIST_PATH: &str = "tokenlists/sushiswap-pairs.json";
const TOKEN_LIST_NAME: &str = "SushiSwap Token Pairs";
const TOKEN_LIST_LOGO: &str =
    "https://raw.githubusercontent.com/sushiswap/art/master/sushi/logo-256x256.png";

/// Main entry point for the application.
///
/// Loads the stored list, discovers tokens created since its checkpoints on
/// every SushiSwap V2 chain, appends them and saves the list back.
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let path =
        dotenvy::var("TOKEN_LIST_PATH").unwrap_or_else(|_| DEFAULT_TOKEN_LIST_PATH.to_string());

    let config = DiscoveryConfig::with_common_defaults();
    let chains = sushiswap_v2_chains(&config);
    let pool = ProviderPool::from_env(chains.iter().map(|c| c.chain_id));

    let mut list = TokenList::load(&path).await?;
    list.name = TOKEN_LIST_NAME.to_string();
    list.logo_uri = TOKEN_LIST_LOGO.to_string();
    let checkpoints = list.checkpoints();

    info!(
        path = %path,
        chains = chains.len(),
        configured = pool.len(),
        checkpoints = checkpoints.len(),
        "Starting SushiSwap pair discovery"
    );

    let discovery = PairDiscovery::new(
        config,
        Arc::new(pool.clone()),
        Arc::new(pool.metadata_lookup()),
        Arc::new(StaticTokenPolicy::sushiswap_v2()),
    );
    let report = discovery.run(&chains, &checkpoints).await;

    for chain in report.failed_chains() {
        warn!(chain_id = chain.chain_id, status = %chain.status, "Chain produced no tokens");
    }

    list.merge_tokens(report.tokens, SaveMode::Append);
    list.record_checkpoints(&report.checkpoints);
    list.save(&path).await?;

    Ok(())
}
