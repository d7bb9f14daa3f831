use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::status::{classify, DisplayStatus};

/// Dashboard counters. Each product lands in exactly one bucket.
///
/// Buckets follow [`classify`], so an expired product with stored status 0
/// counts as expired only. The original dashboard counted "status 0" and
/// "expired" independently and could count one product twice; these
/// counters deliberately do not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub in_circulation: usize,
    pub sold: usize,
    pub expired: usize,
    pub stopped: usize,
}

impl DashboardSummary {
    pub fn compute(products: &[Product], now_secs: u64) -> Self {
        products
            .iter()
            .fold(Self::default(), |mut acc, product| {
                acc.total += 1;
                match classify(product, now_secs) {
                    DisplayStatus::InCirculation => acc.in_circulation += 1,
                    DisplayStatus::Sold => acc.sold += 1,
                    DisplayStatus::Expired => acc.expired += 1,
                    DisplayStatus::Stopped => acc.stopped += 1,
                }
                acc
            })
    }

    pub fn count(&self, status: DisplayStatus) -> usize {
        match status {
            DisplayStatus::InCirculation => self.in_circulation,
            DisplayStatus::Sold => self.sold,
            DisplayStatus::Expired => self.expired,
            DisplayStatus::Stopped => self.stopped,
        }
    }
}
