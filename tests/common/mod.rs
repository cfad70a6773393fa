//! Shared mocks for integration tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cosmwasm_std::Uint128;
use serde_json::Value;

use warp_collateral_rs::cosmos::{ExecuteInstruction, SigningClient, TxReceipt, WasmProvider};
use warp_collateral_rs::AdapterError;

/// Provider scripted with smart-query responses keyed by
/// (contract, top-level query key).
pub struct ScriptedProvider {
    responses: Mutex<HashMap<(String, String), Result<Value, String>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
        }
    }

    pub fn respond(self, contract: &str, key: &str, value: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((contract.to_string(), key.to_string()), Ok(value));
        self
    }

    pub fn fail(self, contract: &str, key: &str, reason: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (contract.to_string(), key.to_string()),
            Err(reason.to_string()),
        );
        self
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WasmProvider for ScriptedProvider {
    async fn query_contract(&self, contract: &str, query: &Value) -> Result<Value, AdapterError> {
        let key = query
            .as_object()
            .and_then(|o| o.keys().next().cloned())
            .unwrap_or_default();

        match self
            .responses
            .lock()
            .unwrap()
            .get(&(contract.to_string(), key.clone()))
        {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(reason)) => Err(AdapterError::Query {
                reason: reason.clone(),
            }),
            None => Err(AdapterError::Query {
                reason: format!("no scripted response for {} {}", contract, key),
            }),
        }
    }

    async fn native_balance(&self, _address: &str, _denom: &str) -> Result<Uint128, AdapterError> {
        Ok(Uint128::zero())
    }

    async fn tx_by_hash(&self, _hash: &str) -> Result<Option<TxReceipt>, AdapterError> {
        Ok(None)
    }
}

/// Signing client that records every multi-execute call.
pub struct RecordingSigner {
    pub calls: Mutex<Vec<Vec<ExecuteInstruction>>>,
    pub receipt: Mutex<Option<TxReceipt>>,
}

impl RecordingSigner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            receipt: Mutex::new(Some(TxReceipt {
                hash: "CAFEBABE".to_string(),
                code: 0,
                height: Some(42),
                raw_log: None,
            })),
        })
    }

    pub fn set_receipt(&self, receipt: TxReceipt) {
        *self.receipt.lock().unwrap() = Some(receipt);
    }
}

#[async_trait]
impl SigningClient for RecordingSigner {
    fn sender(&self) -> &str {
        "terra1sender"
    }

    async fn execute_multiple(
        &self,
        instructions: &[ExecuteInstruction],
    ) -> Result<String, AdapterError> {
        self.calls.lock().unwrap().push(instructions.to_vec());
        Ok("CAFEBABE".to_string())
    }

    async fn tx_by_hash(&self, _hash: &str) -> Result<Option<TxReceipt>, AdapterError> {
        Ok(self.receipt.lock().unwrap().clone())
    }
}
