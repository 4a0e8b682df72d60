//! Token records: the enriched output unit of a discovery run

use alloy_primitives::{Address, ChainId};
use serde::{Deserialize, Serialize};

/// A discovered token in token-list form
///
/// Serializes with the token-list field names (`chainId`, `logoURI`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Token contract address
    pub address: Address,
    /// ERC20 `name()`
    pub name: String,
    /// ERC20 `symbol()`
    pub symbol: String,
    /// ERC20 `decimals()`
    pub decimals: u8,
    /// Chain the token lives on
    pub chain_id: ChainId,
    /// Logo URI; empty for tokens discovered from pair events
    #[serde(rename = "logoURI", default)]
    pub logo_uri: String,
}

impl TokenRecord {
    /// Build a record, rejecting tokens without a usable name or symbol
    ///
    /// Name and symbol are trimmed. Returns `None` when either ends up empty.
    ///
    /// ```
    /// use pairscan::TokenRecord;
    /// use alloy_primitives::Address;
    ///
    /// assert!(TokenRecord::try_new(Address::ZERO, " Wrapped Ether ", "WETH", 18, 1).is_some());
    /// assert!(TokenRecord::try_new(Address::ZERO, "", "WETH", 18, 1).is_none());
    /// ```
    pub fn try_new(
        address: Address,
        name: &str,
        symbol: &str,
        decimals: u8,
        chain_id: ChainId,
    ) -> Option<Self> {
        let name = name.trim();
        let symbol = symbol.trim();
        if name.is_empty() || symbol.is_empty() {
            return None;
        }

        Some(Self {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            chain_id,
            logo_uri: String::new(),
        })
    }

    /// Identity of a token across lists: `(chain id, address)`
    pub fn key(&self) -> (ChainId, Address) {
        (self.chain_id, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use serde_json::json;

    #[test]
    fn test_serializes_token_list_field_names() {
        let token = TokenRecord::try_new(
            address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
            "USD Coin",
            "USDC",
            6,
            1,
        )
        .unwrap();

        let mut value = serde_json::to_value(&token).unwrap();
        let address = value["address"].as_str().unwrap().to_lowercase();
        value["address"] = json!(address);
        assert_eq!(
            value,
            json!({
                "address": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
                "name": "USD Coin",
                "symbol": "USDC",
                "decimals": 6,
                "chainId": 1,
                "logoURI": "",
            })
        );
    }

    #[test]
    fn test_deserializes_without_logo() {
        let token: TokenRecord = serde_json::from_value(json!({
            "address": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            "name": "USD Coin",
            "symbol": "USDC",
            "decimals": 6,
            "chainId": 1,
        }))
        .unwrap();

        assert!(token.logo_uri.is_empty());
        assert_eq!(token.key().0, 1);
    }

    #[test]
    fn test_whitespace_symbol_rejected() {
        assert!(TokenRecord::try_new(Address::ZERO, "Token", "   ", 18, 1).is_none());
    }
}
