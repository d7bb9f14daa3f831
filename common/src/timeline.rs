use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::history::HistoryEvent;
use crate::product::{non_zero, Product};

/// One row of a product's traceability timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub title: String,
    pub timestamp: Option<u64>,
    pub by: Option<Address>,
    pub note: Option<String>,
}

impl TimelineEntry {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            timestamp: None,
            by: None,
            note: None,
        }
    }

    fn at(mut self, ts: u64) -> Self {
        self.timestamp = Some(ts);
        self
    }

    fn by(mut self, addr: Address) -> Self {
        self.by = Some(addr);
        self
    }
}

/// Reconstruct the timeline for a product.
///
/// When the ledger returned history events they are used as-is, in order.
/// Otherwise the timeline is derived from the product's own dated fields.
pub fn build_timeline(product: &Product, history: &[HistoryEvent]) -> Vec<TimelineEntry> {
    if !history.is_empty() {
        return history.iter().map(entry_from_event).collect();
    }

    let mut entries = Vec::new();
    if product.created_at > 0 {
        entries.push(
            TimelineEntry::new("Product created")
                .at(product.created_at)
                .by(product.owner),
        );
    }
    if let Some(ts) = product.manufacture_date.and_then(non_zero) {
        entries.push(TimelineEntry::new("Manufactured").at(ts));
    }
    entries.push(TimelineEntry::new("Current owner").by(product.owner));
    if let Some(ts) = product.expiry() {
        entries.push(TimelineEntry::new("Expiry").at(ts));
    }
    entries
}

fn entry_from_event(event: &HistoryEvent) -> TimelineEntry {
    let note = match (&event.location, &event.note) {
        (Some(location), Some(note)) => Some(format!("{location}: {note}")),
        (Some(location), None) => Some(location.clone()),
        (None, note) => note.clone(),
    };
    TimelineEntry {
        title: event.action.title(),
        timestamp: non_zero(event.timestamp),
        by: Some(event.actor),
        note,
    }
}
