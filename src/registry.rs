//! Adapter factory and token-set overlay
//!
//! Upstream route loading constructs every token with the generic
//! native-denom adapter. The factory installs the correct adapter at
//! construction time; the overlay retrofits token sets built elsewhere by
//! swapping the adapter in place, leaving every other token attribute
//! untouched. Adapter selection is an explicit standard-to-constructor
//! lookup, not a mutation of a live instance.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cosmos::adapter::{CollateralAdapter, Cw20CollateralAdapter, NativeCollateralAdapter};
use crate::cosmos::gas::GasQuoter;
use crate::cosmos::provider::WasmProvider;
use crate::error::AdapterError;
use crate::types::{Token, TokenStandard};

/// Per-chain collaborators adapters are built over.
#[derive(Clone)]
pub struct ChainContext {
    pub provider: Arc<dyn WasmProvider>,
    pub quoter: Arc<dyn GasQuoter>,
}

/// A token paired with its collateral adapter.
///
/// The token itself is immutable; adapter substitution is the only mutation
/// the overlay performs.
pub struct WarpToken {
    token: Token,
    adapter: Arc<dyn CollateralAdapter>,
}

impl WarpToken {
    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn adapter(&self) -> Arc<dyn CollateralAdapter> {
        self.adapter.clone()
    }

    fn set_adapter(&mut self, adapter: Arc<dyn CollateralAdapter>) {
        self.adapter = adapter;
    }
}

/// Outcome of one overlay pass.
#[derive(Debug, Default)]
pub struct OverlayReport {
    /// Tokens whose adapter was replaced in this pass
    pub patched: usize,
    /// Tokens already carrying a contract-collateral-aware adapter
    pub skipped: usize,
    /// Per-token failures; the rest of the batch is unaffected
    pub errors: Vec<(String, AdapterError)>,
}

/// Builds tokens with the correct adapter and retrofits token sets that
/// were constructed with the generic one.
pub struct AdapterFactory {
    contexts: HashMap<String, ChainContext>,
}

impl AdapterFactory {
    pub fn new() -> Self {
        Self {
            contexts: HashMap::new(),
        }
    }

    pub fn with_chain(mut self, chain: &str, context: ChainContext) -> Self {
        self.contexts.insert(chain.to_string(), context);
        self
    }

    fn context(&self, chain: &str) -> Result<&ChainContext, AdapterError> {
        self.contexts
            .get(chain)
            .ok_or_else(|| AdapterError::NotSupported {
                what: format!("no chain context registered for {}", chain),
            })
    }

    /// Select and construct the adapter for `token`.
    ///
    /// Collateral-backed tokens with a named collateral asset get the
    /// contract-collateral-aware adapter; every other standard keeps the
    /// generic native adapter over its own denom.
    pub fn resolve_adapter(
        &self,
        token: &Token,
    ) -> Result<Arc<dyn CollateralAdapter>, AdapterError> {
        token.validate()?;
        let context = self.context(&token.chain_name)?;

        let adapter: Arc<dyn CollateralAdapter> = match token.standard {
            TokenStandard::Collateral => {
                // validate() guarantees the collateral asset is present
                let collateral = token
                    .collateral_address_or_denom
                    .as_deref()
                    .unwrap_or_default();
                debug!(
                    token = %token.id(),
                    collateral = collateral,
                    "Installing contract-collateral-aware adapter"
                );
                Arc::new(Cw20CollateralAdapter::new(
                    &token.chain_name,
                    &token.address_or_denom,
                    collateral,
                    context.provider.clone(),
                    context.quoter.clone(),
                ))
            }
            TokenStandard::Native | TokenStandard::Synthetic => {
                Arc::new(NativeCollateralAdapter::new(
                    &token.chain_name,
                    &token.address_or_denom,
                    &token.address_or_denom,
                    context.provider.clone(),
                    context.quoter.clone(),
                ))
            }
        };

        Ok(adapter)
    }

    /// Factory mode: construct a token with the correct adapter installed.
    pub fn create_token(&self, token: Token) -> Result<WarpToken, AdapterError> {
        let adapter = self.resolve_adapter(&token)?;
        Ok(WarpToken { token, adapter })
    }

    /// Construct a token carrying the generic native adapter regardless of
    /// standard, as upstream route loading does. Overlay input for tests
    /// and for callers that mirror the upstream construction path.
    pub fn create_token_generic(&self, token: Token) -> Result<WarpToken, AdapterError> {
        let context = self.context(&token.chain_name)?;
        let denom = token
            .collateral_address_or_denom
            .clone()
            .unwrap_or_else(|| token.address_or_denom.clone());
        let adapter = Arc::new(NativeCollateralAdapter::new(
            &token.chain_name,
            &token.address_or_denom,
            &denom,
            context.provider.clone(),
            context.quoter.clone(),
        ));
        Ok(WarpToken { token, adapter })
    }

    /// Overlay mode: replace the adapter of every collateral-backed token
    /// whose current adapter cannot drive contract collateral.
    ///
    /// Idempotent: a second pass over the same set patches nothing. One
    /// malformed token never discards the rest of the route's token list.
    pub fn overlay(&self, tokens: &mut [WarpToken]) -> OverlayReport {
        let mut report = OverlayReport::default();

        for warp_token in tokens.iter_mut() {
            if warp_token.token.standard != TokenStandard::Collateral {
                continue;
            }

            if warp_token.adapter.handles_contract_collateral() {
                // Already overlaid; re-application is a no-op
                report.skipped += 1;
                continue;
            }

            match self.resolve_adapter(&warp_token.token) {
                Ok(adapter) => {
                    info!(
                        token = %warp_token.token.id(),
                        "Applied contract-collateral adapter override"
                    );
                    warp_token.set_adapter(adapter);
                    report.patched += 1;
                }
                Err(e) => {
                    warn!(
                        token = %warp_token.token.id(),
                        error = %e,
                        "Failed to install adapter, leaving token unchanged"
                    );
                    report.errors.push((warp_token.token.id(), e));
                }
            }
        }

        if report.patched > 0 {
            info!(patched = report.patched, "Adapter overlay applied");
        }

        report
    }
}

impl Default for AdapterFactory {
    fn default() -> Self {
        Self::new()
    }
}
