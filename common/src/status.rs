use std::fmt;

use serde::{Deserialize, Serialize};

use crate::product::{Product, STATUS_IN_CIRCULATION, STATUS_SOLD};

/// What the dashboard shows for a product. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayStatus {
    InCirculation,
    Sold,
    Expired,
    Stopped,
}

impl DisplayStatus {
    pub fn all() -> &'static [DisplayStatus] {
        &[
            DisplayStatus::InCirculation,
            DisplayStatus::Sold,
            DisplayStatus::Expired,
            DisplayStatus::Stopped,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayStatus::InCirculation => "In circulation",
            DisplayStatus::Sold => "Sold",
            DisplayStatus::Expired => "Expired",
            DisplayStatus::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a product against a caller-supplied clock.
///
/// First match wins:
/// 1. expiry set, non-zero and strictly before `now_secs` → `Expired`
/// 2. stored status 0 → `InCirculation`
/// 3. stored status 1 → `Sold`
/// 4. anything else → `Stopped`
pub fn classify(product: &Product, now_secs: u64) -> DisplayStatus {
    classify_fields(product.status, product.expiry_date, now_secs)
}

/// [`classify`] over the two fields it reads.
pub fn classify_fields(status: u8, expiry_date: Option<u64>, now_secs: u64) -> DisplayStatus {
    match expiry_date {
        Some(expiry) if expiry > 0 && expiry < now_secs => DisplayStatus::Expired,
        _ => match status {
            STATUS_IN_CIRCULATION => DisplayStatus::InCirculation,
            STATUS_SOLD => DisplayStatus::Sold,
            _ => DisplayStatus::Stopped,
        },
    }
}

/// Classify against the system clock.
#[cfg(feature = "std")]
pub fn classify_now(product: &Product) -> DisplayStatus {
    classify(product, now_secs())
}

/// Current Unix time in seconds.
#[cfg(feature = "std")]
pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
