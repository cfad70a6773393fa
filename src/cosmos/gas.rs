//! Interchain gas quoting
//!
//! Routes ship constant per-(origin, destination) interchain fee quotes in
//! their config options; [`StaticFeeSchedule`] serves those. Anything
//! smarter (on-chain IGP quoting) plugs in behind the same trait.

use async_trait::async_trait;
use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// Fee quote for delivering one transfer to a remote domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchainGasQuote {
    /// Denomination the fee is paid in. Absent on malformed quotes;
    /// transfer construction rejects those.
    pub denom: Option<String>,
    pub amount: Uint128,
}

/// Source of interchain gas quotes.
#[async_trait]
pub trait GasQuoter: Send + Sync {
    async fn quote_gas_payment(
        &self,
        origin: &str,
        destination_domain: u32,
    ) -> Result<InterchainGasQuote, AdapterError>;
}

/// One constant fee entry from route config options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterchainFeeConstant {
    pub origin: String,
    pub destination_domain: u32,
    #[serde(rename = "addressOrDenom")]
    pub address_or_denom: String,
    pub amount: Uint128,
}

/// Constant fee schedule loaded from route config.
#[derive(Debug, Clone, Default)]
pub struct StaticFeeSchedule {
    entries: Vec<InterchainFeeConstant>,
}

impl StaticFeeSchedule {
    pub fn new(entries: Vec<InterchainFeeConstant>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl GasQuoter for StaticFeeSchedule {
    async fn quote_gas_payment(
        &self,
        origin: &str,
        destination_domain: u32,
    ) -> Result<InterchainGasQuote, AdapterError> {
        self.entries
            .iter()
            .find(|e| e.origin == origin && e.destination_domain == destination_domain)
            .map(|e| InterchainGasQuote {
                denom: Some(e.address_or_denom.clone()),
                amount: e.amount,
            })
            .ok_or_else(|| AdapterError::Query {
                reason: format!(
                    "no interchain fee constant for {} -> domain {}",
                    origin, destination_domain
                ),
            })
    }
}
