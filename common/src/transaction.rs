use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dashboard transaction entry. Held locally only; never read from or
/// written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub title: String,
    pub amount: u64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Local transaction list with select/delete semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionBook {
    entries: Vec<Transaction>,
}

impl TransactionBook {
    pub fn new(entries: Vec<Transaction>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.entries.iter().find(|t| t.id == id)
    }

    /// Newest entries go first, as on the dashboard.
    pub fn add(&mut self, tx: Transaction) {
        self.entries.insert(0, tx);
    }

    /// Returns the removed entry, if any.
    pub fn remove(&mut self, id: &str) -> Option<Transaction> {
        let pos = self.entries.iter().position(|t| t.id == id)?;
        Some(self.entries.remove(pos))
    }

    pub fn total_amount(&self) -> u64 {
        self.entries.iter().map(|t| t.amount).sum()
    }
}
