//! Error types for collateral adapters and transaction submission
//!
//! The taxonomy separates transient query failures (which read-only paths may
//! default around) from errors that abort transaction construction outright.

use thiserror::Error;

/// Errors produced by adapter resolution, operation construction, and
/// transaction submission.
#[derive(Error, Debug)]
pub enum AdapterError {
    // ========================================================================
    // Query Errors (transient, network-level)
    // ========================================================================
    /// A remote query could not be answered (network error, timeout,
    /// non-success HTTP status, or unparseable body).
    #[error("Query failed: {reason}")]
    Query { reason: String },

    /// The token-type descriptor returned by the router matched no
    /// recognized shape.
    #[error("Unsupported token type descriptor: {raw}")]
    UnsupportedTokenType { raw: String },

    // ========================================================================
    // Construction Errors (surfaced, transaction not attempted)
    // ========================================================================
    /// The requested operation does not exist for this adapter variant or
    /// execution context.
    #[error("Operation not supported: {what}")]
    NotSupported { what: String },

    /// The interchain gas quote carries no fee denomination.
    #[error("Interchain gas quote is missing a fee denom for destination domain {domain}")]
    MissingFeeDenom { domain: u32 },

    /// A token violates the route config invariants.
    #[error("Invalid token {token}: {reason}")]
    InvalidToken { token: String, reason: String },

    /// An empty operation list was submitted as a bundle.
    #[error("Transaction bundle must contain at least one operation")]
    EmptyBundle,

    // ========================================================================
    // Submission Errors
    // ========================================================================
    /// No active signing session exists for the target chain.
    #[error("No active signing session for chain {chain}")]
    SignerUnavailable { chain: String },

    /// The chain rejected or reverted the transaction.
    #[error("Transaction {hash} failed (code {code}): {raw_log}")]
    TransactionFailed {
        hash: String,
        code: u32,
        raw_log: String,
    },
}

impl AdapterError {
    /// Build a [`AdapterError::Query`] from any displayable cause.
    pub fn query(reason: impl std::fmt::Display) -> Self {
        AdapterError::Query {
            reason: reason.to_string(),
        }
    }
}
