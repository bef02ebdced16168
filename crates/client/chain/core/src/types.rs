//! Common types for chain interactions.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 20-byte account or contract address, displayed as `0x`-prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|err| format!("invalid address hex: {err}"))?;
        if bytes.len() != 20 {
            return Err(format!(
                "invalid address length: expected 20 bytes, got {}",
                bytes.len()
            ));
        }
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&bytes);
        Ok(Address(addr))
    }
}

/// Transaction hash as reported by the wallet/relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One verified score as stored by the ledger contract.
///
/// The contract keeps at most one record per player and maintains the
/// canonical ranking; clients reproduce the ordering rule for verification
/// but never silently reorder what the ledger returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub player: Address,
    pub timestamp: u64,
    pub blocks_destroyed: u64,
    pub time_elapsed: u64,
}

impl ScoreRecord {
    /// Canonical ranking rule: more blocks first, faster time breaks ties.
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .blocks_destroyed
            .cmp(&self.blocks_destroyed)
            .then(self.time_elapsed.cmp(&other.time_elapsed))
    }

    /// Whether this record outranks `other` under the canonical rule.
    pub fn outranks(&self, other: &Self) -> bool {
        self.ranking_cmp(other) == Ordering::Less
    }
}

/// A single contract invocation, ready for batching into a wallet call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub calldata: Vec<u8>,
}

/// Fee-sponsorship capabilities advertised by the wallet, keyed by chain id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletCapabilities {
    paymaster: HashMap<u64, bool>,
}

impl WalletCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paymaster(mut self, chain_id: u64) -> Self {
        self.paymaster.insert(chain_id, true);
        self
    }

    pub fn set_paymaster(&mut self, chain_id: u64, supported: bool) {
        self.paymaster.insert(chain_id, supported);
    }

    pub fn paymaster_supported(&self, chain_id: u64) -> bool {
        self.paymaster.get(&chain_id).copied().unwrap_or(false)
    }
}

/// Sponsorship configuration attached to one outgoing batch call.
///
/// Derived per dispatch from the wallet's advertised capabilities and the
/// configured sponsorship endpoint; absent when either side does not support
/// sponsorship, in which case the connected account pays gas directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionCapabilities {
    pub paymaster_service_url: Option<String>,
}

impl SubmissionCapabilities {
    pub fn sponsored(url: impl Into<String>) -> Self {
        Self {
            paymaster_service_url: Some(url.into()),
        }
    }

    pub fn is_sponsored(&self) -> bool {
        self.paymaster_service_url.is_some()
    }
}
