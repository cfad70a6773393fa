//! Operation value objects
//!
//! Adapters emit [`Operation`]s; the executor lowers them to
//! [`ExecuteInstruction`]s for submission. Operations are immutable once
//! built and carry the funds they require at submission time.

use cosmwasm_std::{Coin, Uint128};
use serde::{Deserialize, Serialize};

use crate::address::bytes32_to_hex;
use crate::cosmos::msgs::{Cw20ExecuteMsg, Expiration, RouterExecuteMsg};
use crate::error::AdapterError;

/// One contract call ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteInstruction {
    pub contract_addr: String,
    pub msg: serde_json::Value,
    pub funds: Vec<Coin>,
}

/// An allowance grant on a CW20 collateral contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalOperation {
    /// CW20 collateral contract
    pub token: String,
    /// Warp router being granted the allowance
    pub spender: String,
    pub amount: Uint128,
}

/// A remote dispatch on the warp router.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRemoteOperation {
    /// Warp router contract
    pub router: String,
    pub destination_domain: u32,
    /// Normalized 32-byte recipient on the destination chain
    pub recipient: [u8; 32],
    pub amount: Uint128,
    /// Funds attached at submission: collateral + gas for native collateral,
    /// gas only for contract-fungible collateral.
    pub funds: Vec<Coin>,
}

/// Tagged operation emitted by a collateral adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Approval(ApprovalOperation),
    TransferRemote(TransferRemoteOperation),
}

impl Operation {
    /// Funds this operation requires at submission.
    pub fn funds(&self) -> &[Coin] {
        match self {
            // Allowance grants never attach funds
            Operation::Approval(_) => &[],
            Operation::TransferRemote(op) => &op.funds,
        }
    }

    /// Contract this operation executes against.
    pub fn contract_addr(&self) -> &str {
        match self {
            Operation::Approval(op) => &op.token,
            Operation::TransferRemote(op) => &op.router,
        }
    }

    /// Lower to the submission form.
    pub fn to_instruction(&self) -> Result<ExecuteInstruction, AdapterError> {
        match self {
            Operation::Approval(op) => {
                let msg = Cw20ExecuteMsg::IncreaseAllowance {
                    spender: op.spender.clone(),
                    amount: op.amount,
                    expires: Some(Expiration::Never {}),
                };
                Ok(ExecuteInstruction {
                    contract_addr: op.token.clone(),
                    msg: serde_json::to_value(&msg).map_err(AdapterError::query)?,
                    funds: vec![],
                })
            }
            Operation::TransferRemote(op) => {
                let msg = RouterExecuteMsg::TransferRemote {
                    dest_domain: op.destination_domain,
                    recipient: bytes32_to_hex(&op.recipient),
                    amount: op.amount,
                };
                Ok(ExecuteInstruction {
                    contract_addr: op.router.clone(),
                    msg: serde_json::to_value(&msg).map_err(AdapterError::query)?,
                    funds: op.funds.clone(),
                })
            }
        }
    }
}

/// Combine fund entries with equal denoms; the chain rejects duplicate
/// denoms in a single message's funds list.
pub fn merge_funds(entries: Vec<Coin>) -> Vec<Coin> {
    let mut merged: Vec<Coin> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged.iter_mut().find(|c| c.denom == entry.denom) {
            Some(existing) => existing.amount += entry.amount,
            None => merged.push(entry),
        }
    }
    merged
}
