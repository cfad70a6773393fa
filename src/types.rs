//! Token and route data model
//!
//! Mirrors the wire form of warp route config documents: tokens are written
//! in camelCase and connections as `protocol|chain|address` triples.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

// ============================================================================
// Protocol
// ============================================================================

/// Protocol family of a chain referenced by a token connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ethereum,
    Sealevel,
    Cosmos,
    CosmosNative,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Ethereum => "ethereum",
            Protocol::Sealevel => "sealevel",
            Protocol::Cosmos => "cosmos",
            Protocol::CosmosNative => "cosmosnative",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ethereum" => Ok(Protocol::Ethereum),
            "sealevel" => Ok(Protocol::Sealevel),
            "cosmos" => Ok(Protocol::Cosmos),
            "cosmosnative" => Ok(Protocol::CosmosNative),
            other => Err(AdapterError::InvalidToken {
                token: String::new(),
                reason: format!("unknown protocol '{}'", other),
            }),
        }
    }
}

// ============================================================================
// Token Standard
// ============================================================================

/// How a token participates in a warp route on its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStandard {
    /// Router wraps the chain-native denom directly.
    Native,
    /// Router locks a separate collateral asset (denom or CW20 contract).
    Collateral,
    /// Router mints/burns a synthetic representation.
    Synthetic,
}

// ============================================================================
// Token Connection
// ============================================================================

/// A destination mirror of a token: (protocol, chain, remote token id).
///
/// Serialized as `{"token": "protocol|chain|address"}` per the route config
/// wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConnection", into = "RawConnection")]
pub struct TokenConnection {
    pub protocol: Protocol,
    pub chain: String,
    pub address_or_denom: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawConnection {
    token: String,
}

impl FromStr for TokenConnection {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '|');
        let (protocol, chain, address) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(c), Some(a)) if !c.is_empty() && !a.is_empty() => (p, c, a),
            _ => {
                return Err(AdapterError::InvalidToken {
                    token: s.to_string(),
                    reason: "connection must be 'protocol|chain|address'".to_string(),
                })
            }
        };

        Ok(TokenConnection {
            protocol: protocol.parse()?,
            chain: chain.to_string(),
            address_or_denom: address.to_string(),
        })
    }
}

impl fmt::Display for TokenConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.protocol, self.chain, self.address_or_denom
        )
    }
}

impl TryFrom<RawConnection> for TokenConnection {
    type Error = AdapterError;

    fn try_from(raw: RawConnection) -> Result<Self, Self::Error> {
        raw.token.parse()
    }
}

impl From<TokenConnection> for RawConnection {
    fn from(conn: TokenConnection) -> Self {
        RawConnection {
            token: conn.to_string(),
        }
    }
}

// ============================================================================
// Token
// ============================================================================

/// A bridgeable asset on one chain.
///
/// Immutable after construction; the only mutation the bridge performs is
/// adapter substitution on the owning [`crate::registry::WarpToken`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Chain this token lives on.
    pub chain_name: String,
    /// Route participation kind.
    pub standard: TokenStandard,
    /// Router contract address, or the denom itself for pure native tokens.
    pub address_or_denom: String,
    /// Collateral asset backing a [`TokenStandard::Collateral`] router:
    /// a native denom or a CW20 contract address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_address_or_denom: Option<String>,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(
        default,
        rename = "logoURI",
        skip_serializing_if = "Option::is_none"
    )]
    pub logo_uri: Option<String>,
    /// Remote mirrors of this token, in route order.
    #[serde(default)]
    pub connections: Vec<TokenConnection>,
}

impl Token {
    /// Check the route config invariants for this token.
    ///
    /// Collateral-backed tokens must name their collateral asset.
    pub fn validate(&self) -> Result<(), AdapterError> {
        if self.standard == TokenStandard::Collateral
            && self
                .collateral_address_or_denom
                .as_deref()
                .map_or(true, str::is_empty)
        {
            return Err(AdapterError::InvalidToken {
                token: format!("{}@{}", self.symbol, self.chain_name),
                reason: "collateralAddressOrDenom required for collateral-backed tokens"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Short identifier used in logs and per-token error reports.
    pub fn id(&self) -> String {
        format!("{}@{}", self.symbol, self.chain_name)
    }
}
