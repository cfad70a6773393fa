//! Warp-Collateral-RS: Collateral-Aware Adapters for Warp Bridging
//!
//! This crate reconciles the two ways a CosmWasm chain represents bridge
//! collateral — a chain-native denom or a CW20 contract — behind one adapter
//! interface, and submits the resulting contract calls atomically:
//!
//! - **Token Type Resolution** - Classify a router's collateral from its
//!   on-chain descriptor, tolerating the spellings deployed router
//!   generations disagree on
//! - **Collateral Adapters** - Balance, allowance, approval, and
//!   transfer-remote construction, correct for either representation
//! - **Factory / Overlay** - Install the right adapter at construction time,
//!   or retrofit token sets built upstream with the generic one
//! - **Atomic Execution** - Submit approval + transfer as one indivisible
//!   multi-message transaction and confirm the receipt
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! warp-collateral-rs = { path = "../warp-collateral-rs" }
//! ```

// Core modules
pub mod address;
pub mod error;
pub mod registry;
pub mod types;

// Chain-specific module
pub mod cosmos;

// Re-export commonly used items at the crate root
pub use cosmos::{
    AtomicExecutor, CollateralAdapter, Cw20CollateralAdapter, GasQuoter, InterchainGasQuote,
    LcdProvider, NativeCollateralAdapter, Operation, PendingTransaction, SessionRegistry,
    SigningClient, TokenType, TokenTypeResolver, WasmProvider,
};
pub use error::AdapterError;
pub use registry::{AdapterFactory, ChainContext, OverlayReport, WarpToken};
pub use types::{Protocol, Token, TokenConnection, TokenStandard};
