//! CosmWasm Chain Support Module
//!
//! Everything specific to contract-calling Cosmos chains: queries, message
//! construction, collateral adapters, and transaction submission.
//!
//! ## Submodules
//!
//! - `provider` - Read-only chain access trait and LCD REST implementation
//! - `msgs` - CW20 and warp router message/response types
//! - `token_type` - Collateral type resolution with multi-shape parsing
//! - `gas` - Interchain gas quoting
//! - `ops` - Operation value objects and their submission form
//! - `adapter` - Collateral adapters, one per representation
//! - `executor` - Atomic multi-message submission and confirmation

pub mod adapter;
pub mod executor;
pub mod gas;
pub mod msgs;
pub mod ops;
pub mod provider;
pub mod token_type;

// Re-export commonly used items
pub use adapter::{CollateralAdapter, Cw20CollateralAdapter, NativeCollateralAdapter};
pub use executor::{AtomicExecutor, PendingTransaction, SessionRegistry, SigningClient};
pub use gas::{GasQuoter, InterchainFeeConstant, InterchainGasQuote, StaticFeeSchedule};
pub use ops::{ApprovalOperation, ExecuteInstruction, Operation, TransferRemoteOperation};
pub use provider::{LcdProvider, TxReceipt, WasmProvider};
pub use token_type::{TokenType, TokenTypeResolver};
