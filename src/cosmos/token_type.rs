//! Collateral token-type resolution
//!
//! Routers report which collateral representation they wrap through a
//! loosely-typed descriptor document. Deployed router generations disagree on
//! the spelling of the contract-fungible case (`c_w20` vs `cw20`) and on
//! where the contract address nests, so the descriptor is parsed through a
//! single tagged union with an explicit unrecognized arm.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::cosmos::msgs::{RouterQueryMsg, TokenDefaultQueryMsg};
use crate::cosmos::provider::WasmProvider;
use crate::error::AdapterError;

// ============================================================================
// Resolved Type
// ============================================================================

/// Collateral representation wrapped by a warp router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenType {
    /// Chain-native currency unit
    NativeCurrency { denom: String },
    /// CW20 contract with approve/allowance + transfer semantics
    ContractFungible { contract: String },
    /// Descriptor matched no recognized shape
    Unknown,
}

impl TokenType {
    /// The denom for native collateral; the contract address for
    /// contract-fungible collateral (a logical identifier, never a fund).
    pub fn denom_or_contract(&self) -> Option<&str> {
        match self {
            TokenType::NativeCurrency { denom } => Some(denom),
            TokenType::ContractFungible { contract } => Some(contract),
            TokenType::Unknown => None,
        }
    }

    pub fn is_contract_fungible(&self) -> bool {
        matches!(self, TokenType::ContractFungible { .. })
    }
}

// ============================================================================
// Descriptor Parsing
// ============================================================================

/// Raw descriptor shapes observed on chain, one arm per spelling.
#[derive(Debug, Clone, PartialEq)]
enum Descriptor {
    /// `{"native": {"fungible": {"denom": D}}}`
    Native { denom: String },
    /// `{"c_w20": {"contract": C}}` — underscore spelling, address under
    /// `contract`
    Cw20Underscore { contract: Option<String> },
    /// `{"cw20": {"address": A}}` or `{"cw20": {"contract": C}}`
    Cw20 {
        contract: Option<String>,
        address: Option<String>,
    },
    Unrecognized,
}

fn string_field(obj: &Value, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Classify a descriptor document into one of the known shapes.
///
/// Accepts the descriptor either bare or wrapped in a `type` envelope.
fn parse_descriptor(raw: &Value) -> Descriptor {
    let body = raw.get("type").unwrap_or(raw);

    if let Some(native) = body.get("native") {
        if let Some(denom) = native
            .get("fungible")
            .and_then(|f| f.get("denom"))
            .and_then(|d| d.as_str())
        {
            return Descriptor::Native {
                denom: denom.to_string(),
            };
        }
        return Descriptor::Unrecognized;
    }

    if let Some(cw20) = body.get("c_w20") {
        return Descriptor::Cw20Underscore {
            contract: string_field(cw20, "contract"),
        };
    }

    if let Some(cw20) = body.get("cw20") {
        return Descriptor::Cw20 {
            contract: string_field(cw20, "contract"),
            address: string_field(cw20, "address"),
        };
    }

    Descriptor::Unrecognized
}

/// Resolve a descriptor document into a [`TokenType`].
///
/// `primary` is the token's own collateral address, used when a
/// contract-fungible descriptor carries no embedded address.
pub fn parse_token_type(raw: &Value, primary: &str) -> TokenType {
    match parse_descriptor(raw) {
        Descriptor::Native { denom } => TokenType::NativeCurrency { denom },
        Descriptor::Cw20Underscore { contract } => TokenType::ContractFungible {
            contract: contract.unwrap_or_else(|| primary.to_string()),
        },
        Descriptor::Cw20 { contract, address } => TokenType::ContractFungible {
            contract: contract
                .or(address)
                .unwrap_or_else(|| primary.to_string()),
        },
        Descriptor::Unrecognized => TokenType::Unknown,
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Lazily resolves and caches the collateral type of one router.
///
/// Successful resolutions are cached for the lifetime of the owning adapter.
/// Failures are never cached, so a transient outage does not pin a fallback
/// answer for the rest of the session.
pub struct TokenTypeResolver {
    provider: Arc<dyn WasmProvider>,
    /// Warp router contract the descriptor query targets
    router: String,
    /// Token's own collateral address, the embedded-address fallback
    primary: String,
    cache: OnceCell<TokenType>,
}

impl TokenTypeResolver {
    pub fn new(provider: Arc<dyn WasmProvider>, router: &str, primary: &str) -> Self {
        Self {
            provider,
            router: router.to_string(),
            primary: primary.to_string(),
            cache: OnceCell::new(),
        }
    }

    /// Strict resolution: query failures and unrecognized descriptors are
    /// surfaced as errors.
    pub async fn resolve(&self) -> Result<TokenType, AdapterError> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached.clone());
        }

        let query = serde_json::to_value(RouterQueryMsg::TokenDefault(
            TokenDefaultQueryMsg::TokenType {},
        ))
        .map_err(AdapterError::query)?;

        let response = self.provider.query_contract(&self.router, &query).await?;

        match parse_token_type(&response, &self.primary) {
            TokenType::Unknown => Err(AdapterError::UnsupportedTokenType {
                raw: response.to_string(),
            }),
            resolved => {
                debug!(router = %self.router, token_type = ?resolved, "Resolved collateral type");
                let _ = self.cache.set(resolved.clone());
                Ok(resolved)
            }
        }
    }

    /// Resolution with the documented fallback policy applied: any failure
    /// yields `ContractFungible` over the token's own collateral address.
    ///
    /// The permissive default errs toward the approval-required path; an
    /// upstream transfer flow must not abort on a transient metadata query
    /// failure.
    pub async fn resolve_or_default(&self) -> TokenType {
        match self.resolve().await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(
                    router = %self.router,
                    fallback = %self.primary,
                    error = %e,
                    "Token type resolution failed, defaulting to contract-fungible"
                );
                TokenType::ContractFungible {
                    contract: self.primary.clone(),
                }
            }
        }
    }
}
