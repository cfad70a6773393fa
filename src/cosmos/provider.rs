//! Chain query provider
//!
//! [`WasmProvider`] is the narrow read-only interface the adapters consume:
//! smart-contract queries, native bank balances, and transaction lookup.
//! [`LcdProvider`] implements it over a chain's LCD REST API.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use cosmwasm_std::Uint128;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::AdapterError;

/// Default HTTP timeout for LCD requests
const LCD_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only chain access used by adapters and the type resolver.
#[async_trait]
pub trait WasmProvider: Send + Sync {
    /// Issue a smart-contract query and return the decoded response document.
    async fn query_contract(&self, contract: &str, query: &Value) -> Result<Value, AdapterError>;

    /// Native bank balance of `address` in `denom`.
    async fn native_balance(&self, address: &str, denom: &str) -> Result<Uint128, AdapterError>;

    /// Look up a transaction by hash. `None` while not yet indexed.
    async fn tx_by_hash(&self, hash: &str) -> Result<Option<TxReceipt>, AdapterError>;
}

/// Final state of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub hash: String,
    /// Chain status code; 0 means success.
    pub code: u32,
    pub height: Option<u64>,
    pub raw_log: Option<String>,
}

impl TxReceipt {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Parse a `tx_response` document into a receipt.
///
/// Tolerates `code` and `height` arriving as either JSON numbers or strings;
/// different LCD versions disagree.
pub fn parse_tx_response(body: &Value) -> Option<TxReceipt> {
    let tx_response = body.get("tx_response")?;

    let hash = tx_response
        .get("txhash")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let code = tx_response
        .get("code")
        .map(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
                .unwrap_or(0)
        })
        .unwrap_or(0) as u32;

    let height = tx_response.get("height").and_then(|v| {
        v.as_u64()
            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
    });

    let raw_log = tx_response
        .get("raw_log")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Some(TxReceipt {
        hash,
        code,
        height,
        raw_log,
    })
}

/// LCD REST implementation of [`WasmProvider`].
pub struct LcdProvider {
    lcd_url: String,
    client: Client,
}

impl LcdProvider {
    pub fn new(lcd_url: &str) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .timeout(LCD_TIMEOUT)
            .build()
            .map_err(AdapterError::query)?;

        Ok(Self {
            lcd_url: lcd_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn lcd_url(&self) -> &str {
        &self.lcd_url
    }

    async fn get_json(&self, url: &str) -> Result<Value, AdapterError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AdapterError::query)?;

        if !response.status().is_success() {
            return Err(AdapterError::Query {
                reason: format!(
                    "{} - {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                ),
            });
        }

        response.json().await.map_err(AdapterError::query)
    }
}

#[async_trait]
impl WasmProvider for LcdProvider {
    async fn query_contract(&self, contract: &str, query: &Value) -> Result<Value, AdapterError> {
        let query_json = serde_json::to_string(query).map_err(AdapterError::query)?;
        let query_b64 = base64::engine::general_purpose::STANDARD.encode(query_json);

        let url = format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.lcd_url, contract, query_b64
        );

        debug!(contract = contract, "Smart contract query");

        let data: Value = self.get_json(&url).await?;

        data.get("data").cloned().ok_or_else(|| AdapterError::Query {
            reason: "missing 'data' field in query response".to_string(),
        })
    }

    async fn native_balance(&self, address: &str, denom: &str) -> Result<Uint128, AdapterError> {
        let url = format!(
            "{}/cosmos/bank/v1beta1/balances/{}/by_denom?denom={}",
            self.lcd_url, address, denom
        );

        let data: Value = self.get_json(&url).await?;

        let amount = data
            .get("balance")
            .and_then(|b| b.get("amount"))
            .and_then(|a| a.as_str())
            .unwrap_or("0");

        amount.parse().map_err(|e| AdapterError::Query {
            reason: format!("failed to parse balance '{}': {}", amount, e),
        })
    }

    async fn tx_by_hash(&self, hash: &str) -> Result<Option<TxReceipt>, AdapterError> {
        let url = format!("{}/cosmos/tx/v1beta1/txs/{}", self.lcd_url, hash);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(AdapterError::query)?;

        // Not yet indexed
        if response.status().as_u16() == 404 {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(AdapterError::Query {
                reason: format!("tx query failed: {}", response.status()),
            });
        }

        let body: Value = response.json().await.map_err(AdapterError::query)?;
        Ok(parse_tx_response(&body))
    }
}
