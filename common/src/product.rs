use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Ledger-assigned product identifier. The deployed registry numbers from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw stored status code for a product in circulation.
pub const STATUS_IN_CIRCULATION: u8 = 0;
/// Raw stored status code for a sold product.
pub const STATUS_SOLD: u8 = 1;

/// A product record as held by the registry contract.
///
/// Optional text fields are `None` when the contract holds an empty string;
/// optional dates are `None` when the contract holds `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    /// Unix seconds.
    pub manufacture_date: Option<u64>,
    /// Unix seconds.
    pub expiry_date: Option<u64>,
    /// Price in the smallest on-chain unit, unscaled.
    pub price: u64,
    pub owner: Address,
    /// Raw status code; see [`crate::status::classify`] for what is displayed.
    pub status: u8,
    /// Unix seconds, set once at creation.
    pub created_at: u64,
}

impl Product {
    /// Expiry timestamp if one is set and non-zero.
    pub fn expiry(&self) -> Option<u64> {
        self.expiry_date.filter(|ts| *ts > 0)
    }

    /// Whether `addr` currently holds this product.
    pub fn is_owned_by(&self, addr: &Address) -> bool {
        self.owner == *addr
    }
}

/// Map the contract's "empty means unset" text convention onto `Option`.
pub fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Map the contract's "zero means unset" timestamp convention onto `Option`.
pub fn non_zero(ts: u64) -> Option<u64> {
    if ts == 0 {
        None
    } else {
        Some(ts)
    }
}
