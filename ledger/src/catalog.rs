use tracechain_common::product::{Product, ProductId};
use tracechain_common::summary::DashboardSummary;
use tracechain_common::transfer::{apply_transfer, TransferError, TransferRequest};
use tracing::warn;

use crate::error::FetchError;
use crate::generation::FetchTicket;
use crate::reader::LedgerReader;
use crate::source::ProductSource;

/// The product snapshot a dashboard renders from.
///
/// A fetch result only lands if its ticket is still current, so a slow,
/// superseded fetch can never overwrite a newer one. Local edits (delete,
/// transfer) change this snapshot only and are lost on the next refresh.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    generation: Option<u64>,
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the fetch the snapshot came from, if any.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Install a fetch result. Returns `false` and keeps the current snapshot
    /// when the ticket has been superseded.
    pub fn replace(&mut self, ticket: &FetchTicket, products: Vec<Product>) -> bool {
        if !ticket.is_current() {
            warn!(
                generation = ticket.generation(),
                "dropping stale product snapshot"
            );
            return false;
        }
        self.generation = Some(ticket.generation());
        self.products = products;
        true
    }

    /// Fetch everything through `reader` and install it.
    pub async fn refresh<S: ProductSource>(
        &mut self,
        reader: &LedgerReader<S>,
    ) -> Result<bool, FetchError> {
        let ticket = reader.begin_fetch();
        let products = reader.fetch_all_products_with(&ticket).await?;
        Ok(self.replace(&ticket, products))
    }

    /// Drop a product from the local snapshot.
    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        let pos = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(pos))
    }

    pub fn apply_transfer(&mut self, request: &TransferRequest) -> Result<(), TransferError> {
        apply_transfer(&mut self.products, request)
    }

    pub fn summary(&self, now_secs: u64) -> DashboardSummary {
        DashboardSummary::compute(&self.products, now_secs)
    }
}
