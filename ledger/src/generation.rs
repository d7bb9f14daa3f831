use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::FetchError;

/// Issues fetch tickets. Beginning a fetch makes every earlier ticket stale.
#[derive(Debug, Clone, Default)]
pub struct FetchGeneration {
    current: Arc<AtomicU64>,
}

/// Handle carried by one fetch; checked between remote calls.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl FetchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> FetchTicket {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket {
            generation,
            current: Arc::clone(&self.current),
        }
    }

    /// Make every outstanding ticket stale without starting a new fetch.
    pub fn cancel_all(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    pub fn check(&self) -> Result<(), FetchError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(FetchError::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes() {
        let generation = FetchGeneration::new();
        let first = generation.begin();
        assert!(first.is_current());
        assert_eq!(first.generation(), 1);

        let second = generation.begin();
        assert!(!first.is_current());
        assert_eq!(first.check(), Err(FetchError::Cancelled));
        assert!(second.is_current());
    }

    #[test]
    fn cancel_all_makes_every_ticket_stale() {
        let generation = FetchGeneration::new();
        let ticket = generation.begin();
        generation.cancel_all();
        assert!(!ticket.is_current());
        assert_eq!(generation.current(), 2);
    }
}
