//! CW20 and warp router message definitions
//!
//! Execute and query messages exchanged with CW20 collateral contracts and
//! the warp router, plus their response shapes.

use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};

// ============================================================================
// CW20 Messages
// ============================================================================

/// CW20 execute messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20ExecuteMsg {
    /// Transfer tokens to another address
    Transfer { recipient: String, amount: Uint128 },
    /// Send tokens to a contract (with embedded message)
    Send {
        contract: String,
        amount: Uint128,
        msg: String,
    },
    /// Grant `spender` an additional allowance
    IncreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    /// Revoke part of `spender`'s allowance
    DecreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
}

/// CW20 query messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20QueryMsg {
    /// Get token balance of an address
    Balance { address: String },
    /// Get token metadata
    TokenInfo {},
    /// Get the allowance granted by `owner` to `spender`
    Allowance { owner: String, spender: String },
}

/// Allowance expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiration {
    AtHeight(u64),
    AtTime(String),
    Never {},
}

/// CW20 balance response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: Uint128,
}

/// CW20 token info response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfoResponse {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Uint128,
}

/// CW20 allowance response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowanceResponse {
    pub allowance: Uint128,
    pub expires: Expiration,
}

// ============================================================================
// Warp Router Messages
// ============================================================================

/// Execute messages for the warp router contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterExecuteMsg {
    /// Dispatch the collateral to a remote domain
    TransferRemote {
        /// Destination domain identifier
        dest_domain: u32,
        /// 32-byte recipient, hex-encoded without prefix
        recipient: String,
        /// Amount in the token's smallest unit
        amount: Uint128,
    },
}

/// Query messages for the warp router contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterQueryMsg {
    /// Token-level queries answered by every router
    TokenDefault(TokenDefaultQueryMsg),
}

/// Token-level query variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenDefaultQueryMsg {
    /// Ask the router which collateral representation it wraps
    TokenType {},
}
