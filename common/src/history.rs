use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Kind of step recorded in a product's on-chain history.
///
/// Codes follow the registry's `uint8` action enum in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryAction {
    Created,
    Manufactured,
    QualityChecked,
    Packaged,
    Shipped,
    Received,
    OwnershipTransferred,
    Sold,
    Verified,
    Expired,
    Unknown(u8),
}

impl HistoryAction {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => HistoryAction::Created,
            1 => HistoryAction::Manufactured,
            2 => HistoryAction::QualityChecked,
            3 => HistoryAction::Packaged,
            4 => HistoryAction::Shipped,
            5 => HistoryAction::Received,
            6 => HistoryAction::OwnershipTransferred,
            7 => HistoryAction::Sold,
            8 => HistoryAction::Verified,
            9 => HistoryAction::Expired,
            other => HistoryAction::Unknown(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            HistoryAction::Created => 0,
            HistoryAction::Manufactured => 1,
            HistoryAction::QualityChecked => 2,
            HistoryAction::Packaged => 3,
            HistoryAction::Shipped => 4,
            HistoryAction::Received => 5,
            HistoryAction::OwnershipTransferred => 6,
            HistoryAction::Sold => 7,
            HistoryAction::Verified => 8,
            HistoryAction::Expired => 9,
            HistoryAction::Unknown(code) => *code,
        }
    }

    /// Human-readable title used on the timeline.
    pub fn title(&self) -> String {
        match self {
            HistoryAction::Created => "Product created".into(),
            HistoryAction::Manufactured => "Manufactured".into(),
            HistoryAction::QualityChecked => "Quality checked".into(),
            HistoryAction::Packaged => "Packaged".into(),
            HistoryAction::Shipped => "Shipped".into(),
            HistoryAction::Received => "Received".into(),
            HistoryAction::OwnershipTransferred => "Ownership transferred".into(),
            HistoryAction::Sold => "Sold".into(),
            HistoryAction::Verified => "Verified".into(),
            HistoryAction::Expired => "Expired".into(),
            HistoryAction::Unknown(code) => format!("Action {code}"),
        }
    }
}

/// One entry of `getProductHistory(id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub action: HistoryAction,
    pub actor: Address,
    pub location: Option<String>,
    pub note: Option<String>,
    /// Unix seconds; `0` when the contract did not record one.
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_known_actions() {
        for code in 0..=9u8 {
            let action = HistoryAction::from_code(code);
            assert!(!matches!(action, HistoryAction::Unknown(_)));
            assert_eq!(action.code(), code);
        }
    }

    #[test]
    fn unknown_code_keeps_value() {
        let action = HistoryAction::from_code(42);
        assert_eq!(action, HistoryAction::Unknown(42));
        assert_eq!(action.title(), "Action 42");
    }
}
