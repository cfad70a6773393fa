//! Atomic transaction submission
//!
//! Bundles one or more operations into a single multi-message transaction.
//! An approval followed by a transfer must be indivisible: a transaction
//! that only approves but never transfers leaves a durable allowance on
//! chain with no compensating action.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::cosmos::ops::{ExecuteInstruction, Operation};
use crate::cosmos::provider::TxReceipt;
use crate::error::AdapterError;

/// Confirmation polling: LCD indexing lags block inclusion by a few blocks.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);
const CONFIRM_INITIAL_DELAY: Duration = Duration::from_millis(500);
const CONFIRM_MAX_DELAY: Duration = Duration::from_secs(3);

// ============================================================================
// Signing Interface
// ============================================================================

/// Handle to an active signing session for one chain.
///
/// Signing, key management, and nonce ordering live behind this trait; this
/// layer only decides what to submit and how to confirm it.
#[async_trait]
pub trait SigningClient: Send + Sync {
    /// Sender address of the active session.
    fn sender(&self) -> &str;

    /// Whether the chain's execution model commits several contract calls
    /// as one atomic transaction.
    fn supports_batching(&self) -> bool {
        true
    }

    /// Sign and broadcast all instructions as one transaction, returning
    /// the transaction hash.
    async fn execute_multiple(
        &self,
        instructions: &[ExecuteInstruction],
    ) -> Result<String, AdapterError>;

    /// Look up a transaction by hash. `None` while not yet indexed.
    async fn tx_by_hash(&self, hash: &str) -> Result<Option<TxReceipt>, AdapterError>;
}

/// Per-chain lookup of active signing sessions.
pub trait SessionRegistry: Send + Sync {
    fn signing_client(&self, chain: &str) -> Option<Arc<dyn SigningClient>>;
}

impl SessionRegistry for HashMap<String, Arc<dyn SigningClient>> {
    fn signing_client(&self, chain: &str) -> Option<Arc<dyn SigningClient>> {
        self.get(chain).cloned()
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Submits operation bundles through the chain's multi-execute primitive.
pub struct AtomicExecutor {
    sessions: Arc<dyn SessionRegistry>,
}

impl AtomicExecutor {
    pub fn new(sessions: Arc<dyn SessionRegistry>) -> Self {
        Self { sessions }
    }

    /// Submit `operations` as one atomic transaction on `chain`.
    ///
    /// Submission is not retried here: transactions are not idempotent, and
    /// resubmission could double-spend or double-approve. Retry policy
    /// belongs to the caller.
    pub async fn submit(
        &self,
        chain: &str,
        operations: &[Operation],
    ) -> Result<PendingTransaction, AdapterError> {
        // Fail fast before any message construction
        let client = self
            .sessions
            .signing_client(chain)
            .ok_or_else(|| AdapterError::SignerUnavailable {
                chain: chain.to_string(),
            })?;

        if operations.is_empty() {
            return Err(AdapterError::EmptyBundle);
        }

        if operations.len() > 1 && !client.supports_batching() {
            // Never silently split an atomic bundle into separate
            // transactions
            return Err(AdapterError::NotSupported {
                what: format!("multi-message bundles on chain {}", chain),
            });
        }

        let instructions = operations
            .iter()
            .map(Operation::to_instruction)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            chain = chain,
            sender = client.sender(),
            messages = instructions.len(),
            "Submitting transaction"
        );

        let hash = client.execute_multiple(&instructions).await?;

        info!(chain = chain, hash = %hash, "Transaction broadcast");

        Ok(PendingTransaction { hash, client })
    }
}

// ============================================================================
// Confirmation
// ============================================================================

/// A broadcast transaction awaiting confirmation.
pub struct PendingTransaction {
    hash: String,
    client: Arc<dyn SigningClient>,
}

impl PendingTransaction {
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Re-query the transaction until it lands in a block.
    ///
    /// Read-only and safe to call repeatedly. Fails with
    /// [`AdapterError::TransactionFailed`] when the chain reports a
    /// non-success code; a confirmation timeout surfaces as a query error
    /// since the transaction may still be included later.
    pub async fn confirm(&self) -> Result<TxReceipt, AdapterError> {
        let start = tokio::time::Instant::now();
        let mut delay = CONFIRM_INITIAL_DELAY;

        while start.elapsed() < CONFIRM_TIMEOUT {
            match self.client.tx_by_hash(&self.hash).await {
                Ok(Some(receipt)) => {
                    if receipt.is_success() {
                        debug!(hash = %self.hash, height = ?receipt.height, "Transaction confirmed");
                        return Ok(receipt);
                    }
                    return Err(AdapterError::TransactionFailed {
                        hash: self.hash.clone(),
                        code: receipt.code,
                        raw_log: receipt.raw_log.unwrap_or_default(),
                    });
                }
                Ok(None) => {
                    debug!(hash = %self.hash, "Transaction not yet indexed, waiting");
                }
                Err(e) => {
                    warn!(hash = %self.hash, error = %e, "Error querying transaction status");
                }
            }

            tokio::time::sleep(delay).await;
            delay = std::cmp::min(delay * 2, CONFIRM_MAX_DELAY);
        }

        Err(AdapterError::Query {
            reason: format!("timeout waiting for transaction {} to confirm", self.hash),
        })
    }
}
