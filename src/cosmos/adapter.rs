//! Collateral adapters
//!
//! One capability interface over two collateral representations. A generic
//! bridge that always folds the collateral denom into transaction funds
//! builds economically wrong transactions when the collateral is a CW20
//! contract: the contract address is not a spendable denom, and the asset
//! moves through the router call against the caller's allowance, not through
//! attached funds. The two paths are kept structurally distinct here instead
//! of branching one fund-construction routine on a runtime flag.

use std::sync::Arc;

use async_trait::async_trait;
use cosmwasm_std::{Coin, Uint128};
use tracing::{debug, warn};

use crate::address::recipient_to_bytes32;
use crate::cosmos::gas::{GasQuoter, InterchainGasQuote};
use crate::cosmos::msgs::{AllowanceResponse, BalanceResponse, Cw20QueryMsg};
use crate::cosmos::ops::{merge_funds, ApprovalOperation, Operation, TransferRemoteOperation};
use crate::cosmos::provider::WasmProvider;
use crate::cosmos::token_type::{TokenType, TokenTypeResolver};
use crate::error::AdapterError;

// ============================================================================
// Capability Interface
// ============================================================================

/// Uniform interface over both collateral representations.
#[async_trait]
pub trait CollateralAdapter: Send + Sync {
    /// Chain this adapter operates on.
    fn chain(&self) -> &str;

    /// Whether this adapter can drive CW20 contract collateral. The overlay
    /// uses this to decide which tokens still carry the generic adapter.
    fn handles_contract_collateral(&self) -> bool;

    /// The collateral denom, or the contract address for contract-fungible
    /// collateral (a downstream accounting identifier, never spent as a
    /// fund).
    async fn denom(&self) -> String;

    /// Collateral balance of `address`.
    async fn balance_of(&self, address: &str) -> Result<Uint128, AdapterError>;

    /// Whether a transfer of `amount` needs an allowance grant first.
    ///
    /// Callers probe this with partial parameters during quoting; without
    /// all three there is nothing to check and the answer is `false`.
    async fn is_approve_required(
        &self,
        owner: Option<&str>,
        spender: Option<&str>,
        amount: Option<Uint128>,
    ) -> bool;

    /// Build an allowance grant for `spender`.
    async fn build_approval(
        &self,
        spender: &str,
        amount: Uint128,
    ) -> Result<Operation, AdapterError>;

    /// Build a remote transfer of `amount` to `recipient` on
    /// `destination_domain`. Fetches a gas quote when none is supplied.
    async fn build_transfer_remote(
        &self,
        destination_domain: u32,
        recipient: &str,
        amount: Uint128,
        interchain_gas: Option<InterchainGasQuote>,
    ) -> Result<Operation, AdapterError>;
}

/// Reject quotes that carry no denomination before any value math happens.
fn require_fee_denom(
    quote: &InterchainGasQuote,
    destination_domain: u32,
) -> Result<String, AdapterError> {
    quote
        .denom
        .clone()
        .filter(|d| !d.is_empty())
        .ok_or(AdapterError::MissingFeeDenom {
            domain: destination_domain,
        })
}

// ============================================================================
// Native Collateral
// ============================================================================

/// Adapter for routers whose collateral is the chain-native denom.
///
/// This is the generic adapter upstream token construction installs for
/// every collateral token; the overlay swaps it out where the collateral is
/// actually a CW20 contract.
pub struct NativeCollateralAdapter {
    chain: String,
    router: String,
    denom: String,
    provider: Arc<dyn WasmProvider>,
    quoter: Arc<dyn GasQuoter>,
}

impl NativeCollateralAdapter {
    pub fn new(
        chain: &str,
        router: &str,
        denom: &str,
        provider: Arc<dyn WasmProvider>,
        quoter: Arc<dyn GasQuoter>,
    ) -> Self {
        Self {
            chain: chain.to_string(),
            router: router.to_string(),
            denom: denom.to_string(),
            provider,
            quoter,
        }
    }

    pub fn router(&self) -> &str {
        &self.router
    }
}

#[async_trait]
impl CollateralAdapter for NativeCollateralAdapter {
    fn chain(&self) -> &str {
        &self.chain
    }

    fn handles_contract_collateral(&self) -> bool {
        false
    }

    async fn denom(&self) -> String {
        self.denom.clone()
    }

    async fn balance_of(&self, address: &str) -> Result<Uint128, AdapterError> {
        self.provider.native_balance(address, &self.denom).await
    }

    async fn is_approve_required(
        &self,
        _owner: Option<&str>,
        _spender: Option<&str>,
        _amount: Option<Uint128>,
    ) -> bool {
        // Native transfers have no allowance concept
        false
    }

    async fn build_approval(
        &self,
        _spender: &str,
        _amount: Uint128,
    ) -> Result<Operation, AdapterError> {
        Err(AdapterError::NotSupported {
            what: "allowance grants on native collateral".to_string(),
        })
    }

    async fn build_transfer_remote(
        &self,
        destination_domain: u32,
        recipient: &str,
        amount: Uint128,
        interchain_gas: Option<InterchainGasQuote>,
    ) -> Result<Operation, AdapterError> {
        let quote = match interchain_gas {
            Some(quote) => quote,
            None => {
                self.quoter
                    .quote_gas_payment(&self.chain, destination_domain)
                    .await?
            }
        };
        let fee_denom = require_fee_denom(&quote, destination_domain)?;

        // Collateral moves as attached funds; gas rides along. Equal denoms
        // collapse into one entry or the chain rejects the message.
        let funds = merge_funds(vec![
            Coin {
                denom: self.denom.clone(),
                amount,
            },
            Coin {
                denom: fee_denom,
                amount: quote.amount,
            },
        ]);

        Ok(Operation::TransferRemote(TransferRemoteOperation {
            router: self.router.clone(),
            destination_domain,
            recipient: recipient_to_bytes32(recipient)?,
            amount,
            funds,
        }))
    }
}

// ============================================================================
// CW20-aware Collateral
// ============================================================================

/// Adapter for collateral routers whose backing asset may be a CW20
/// contract.
///
/// The actual representation is resolved lazily from the router and cached;
/// when it turns out to be native currency, behavior matches
/// [`NativeCollateralAdapter`] with the resolved denom.
pub struct Cw20CollateralAdapter {
    chain: String,
    router: String,
    /// Collateral contract address from route config
    token: String,
    provider: Arc<dyn WasmProvider>,
    quoter: Arc<dyn GasQuoter>,
    resolver: TokenTypeResolver,
}

impl Cw20CollateralAdapter {
    pub fn new(
        chain: &str,
        router: &str,
        token: &str,
        provider: Arc<dyn WasmProvider>,
        quoter: Arc<dyn GasQuoter>,
    ) -> Self {
        let resolver = TokenTypeResolver::new(provider.clone(), router, token);
        Self {
            chain: chain.to_string(),
            router: router.to_string(),
            token: token.to_string(),
            provider,
            quoter,
            resolver,
        }
    }

    pub fn router(&self) -> &str {
        &self.router
    }

    /// CW20 balance query against the collateral contract.
    async fn cw20_balance(&self, contract: &str, address: &str) -> Result<Uint128, AdapterError> {
        let query = serde_json::to_value(Cw20QueryMsg::Balance {
            address: address.to_string(),
        })
        .map_err(AdapterError::query)?;

        let response = self.provider.query_contract(contract, &query).await?;

        // Absent balance means zero, not an error
        match serde_json::from_value::<BalanceResponse>(response.clone()) {
            Ok(parsed) => Ok(parsed.balance),
            Err(_) if response.get("balance").is_none() => Ok(Uint128::zero()),
            Err(e) => Err(AdapterError::query(e)),
        }
    }

    /// Current allowance of `spender` over `owner`'s holdings.
    async fn cw20_allowance(
        &self,
        contract: &str,
        owner: &str,
        spender: &str,
    ) -> Result<Uint128, AdapterError> {
        let query = serde_json::to_value(Cw20QueryMsg::Allowance {
            owner: owner.to_string(),
            spender: spender.to_string(),
        })
        .map_err(AdapterError::query)?;

        let response = self.provider.query_contract(contract, &query).await?;

        serde_json::from_value::<AllowanceResponse>(response)
            .map(|parsed| parsed.allowance)
            .map_err(AdapterError::query)
    }
}

#[async_trait]
impl CollateralAdapter for Cw20CollateralAdapter {
    fn chain(&self) -> &str {
        &self.chain
    }

    fn handles_contract_collateral(&self) -> bool {
        true
    }

    async fn denom(&self) -> String {
        match self.resolver.resolve_or_default().await {
            TokenType::NativeCurrency { denom } => denom,
            TokenType::ContractFungible { contract } => contract,
            // resolve_or_default never yields Unknown
            TokenType::Unknown => self.token.clone(),
        }
    }

    async fn balance_of(&self, address: &str) -> Result<Uint128, AdapterError> {
        match self.resolver.resolve_or_default().await {
            TokenType::NativeCurrency { denom } => {
                self.provider.native_balance(address, &denom).await
            }
            TokenType::ContractFungible { contract } => {
                match self.cw20_balance(&contract, address).await {
                    Ok(balance) => Ok(balance),
                    Err(e) => {
                        // Keep balance display alive through transient
                        // contract query failures
                        warn!(
                            token = %self.token,
                            address = address,
                            error = %e,
                            "CW20 balance query failed, falling back to native balance"
                        );
                        self.provider.native_balance(address, &contract).await
                    }
                }
            }
            TokenType::Unknown => Ok(Uint128::zero()),
        }
    }

    async fn is_approve_required(
        &self,
        owner: Option<&str>,
        spender: Option<&str>,
        amount: Option<Uint128>,
    ) -> bool {
        let (owner, spender, amount) = match (owner, spender, amount) {
            (Some(o), Some(s), Some(a)) => (o, s, a),
            // A caller probing without a concrete amount cannot know yet
            // whether approval is needed
            _ => return false,
        };

        let contract = match self.resolver.resolve_or_default().await {
            TokenType::ContractFungible { contract } => contract,
            _ => return false,
        };

        match self.cw20_allowance(&contract, owner, spender).await {
            Ok(current) => {
                debug!(
                    owner = owner,
                    spender = spender,
                    current = %current,
                    requested = %amount,
                    "Checked CW20 allowance"
                );
                current < amount
            }
            Err(e) => {
                // Fail safe: an under-approved transfer is worse than a
                // redundant grant
                warn!(
                    token = %self.token,
                    error = %e,
                    "Allowance query failed, assuming approval required"
                );
                true
            }
        }
    }

    async fn build_approval(
        &self,
        spender: &str,
        amount: Uint128,
    ) -> Result<Operation, AdapterError> {
        match self.resolver.resolve_or_default().await {
            TokenType::NativeCurrency { .. } => Err(AdapterError::NotSupported {
                what: "allowance grants on native collateral".to_string(),
            }),
            TokenType::ContractFungible { contract } => {
                Ok(Operation::Approval(ApprovalOperation {
                    token: contract,
                    spender: spender.to_string(),
                    amount,
                }))
            }
            TokenType::Unknown => Err(AdapterError::NotSupported {
                what: "allowance grants on unresolved collateral".to_string(),
            }),
        }
    }

    async fn build_transfer_remote(
        &self,
        destination_domain: u32,
        recipient: &str,
        amount: Uint128,
        interchain_gas: Option<InterchainGasQuote>,
    ) -> Result<Operation, AdapterError> {
        let quote = match interchain_gas {
            Some(quote) => quote,
            None => {
                self.quoter
                    .quote_gas_payment(&self.chain, destination_domain)
                    .await?
            }
        };
        let fee_denom = require_fee_denom(&quote, destination_domain)?;

        let funds = match self.resolver.resolve_or_default().await {
            TokenType::NativeCurrency { denom } => merge_funds(vec![
                Coin { denom, amount },
                Coin {
                    denom: fee_denom,
                    amount: quote.amount,
                },
            ]),
            // The collateral contract address is not a spendable denom and
            // must never appear in funds; the asset moves through the router
            // call against the caller's allowance.
            _ => vec![Coin {
                denom: fee_denom,
                amount: quote.amount,
            }],
        };

        debug!(
            router = %self.router,
            destination_domain = destination_domain,
            funds = ?funds,
            "Built transfer-remote operation"
        );

        Ok(Operation::TransferRemote(TransferRemoteOperation {
            router: self.router.clone(),
            destination_domain,
            recipient: recipient_to_bytes32(recipient)?,
            amount,
            funds,
        }))
    }
}
