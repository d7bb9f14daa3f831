use std::future::Future;
use std::time::Duration;

use futures::{stream, StreamExt};
use tracechain_common::history::HistoryEvent;
use tracechain_common::product::{Product, ProductId};
use tracing::{debug, info};

use crate::config::{LedgerConfig, Numbering, DEFAULT_TIMEOUT_SECS};
use crate::error::{FetchError, SourceError};
use crate::generation::{FetchGeneration, FetchTicket};
use crate::schema::{decode_history_event, decode_product};
use crate::source::ProductSource;

/// Upper bound on the up-front allocation for a fetch; the counter is remote input.
const MAX_PREALLOCATED: usize = 1024;

/// Reads and decodes product records from a [`ProductSource`].
///
/// Every fetch is a full, independent read: nothing is cached between calls.
pub struct LedgerReader<S> {
    source: S,
    numbering: Numbering,
    concurrency: usize,
    timeout: Duration,
    generation: FetchGeneration,
}

impl<S: ProductSource> LedgerReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            numbering: Numbering::default(),
            concurrency: 1,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            generation: FetchGeneration::new(),
        }
    }

    pub fn from_config(source: S, config: &LedgerConfig) -> Self {
        Self::new(source)
            .with_numbering(config.numbering)
            .with_concurrency(config.concurrency)
            .with_timeout(config.request_timeout())
    }

    pub fn with_numbering(mut self, numbering: Numbering) -> Self {
        self.numbering = numbering;
        self
    }

    /// Record calls allowed in flight at once; clamped to at least 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Share a generation counter, e.g. with whoever owns the snapshot.
    pub fn with_generation(mut self, generation: FetchGeneration) -> Self {
        self.generation = generation;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn generation(&self) -> &FetchGeneration {
        &self.generation
    }

    /// Start a new fetch generation, superseding any fetch still running.
    pub fn begin_fetch(&self) -> FetchTicket {
        self.generation.begin()
    }

    /// Fetch every product in ascending index order.
    pub async fn fetch_all_products(&self) -> Result<Vec<Product>, FetchError> {
        let ticket = self.begin_fetch();
        self.fetch_all_products_with(&ticket).await
    }

    /// Fetch every product under an existing ticket. Fails fast on the first
    /// error and stops with [`FetchError::Cancelled`] once the ticket is stale.
    pub async fn fetch_all_products_with(
        &self,
        ticket: &FetchTicket,
    ) -> Result<Vec<Product>, FetchError> {
        ticket.check()?;
        let count = self
            .call(self.source.count())
            .await
            .map_err(|source| FetchError::CountUnavailable { source })?;
        info!(
            source = self.source.source_name(),
            count,
            generation = ticket.generation(),
            "fetching products"
        );

        let capacity = usize::try_from(count).unwrap_or(0).min(MAX_PREALLOCATED);
        let mut products = Vec::with_capacity(capacity);
        let mut records = stream::iter(self.numbering.indices(count))
            .map(|index| self.fetch_record(index, ticket))
            .buffered(self.concurrency);
        while let Some(record) = records.next().await {
            products.push(record?);
        }

        info!(
            fetched = products.len(),
            generation = ticket.generation(),
            "products fetched"
        );
        Ok(products)
    }

    /// Fetch one product by its ledger id.
    ///
    /// The contract answers unassigned ids with an all-zero record instead of
    /// reverting; that, or a record carrying a different id, is `NotFound`.
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, FetchError> {
        let tuple = self
            .call(self.source.record_at(id.0))
            .await
            .map_err(|source| FetchError::from_record(id.0, source))?;
        let product = decode_product(&tuple).map_err(|source| FetchError::DecodeMismatch {
            index: id.0,
            source,
        })?;
        if product.id != id || is_vacant(&product) {
            debug!(requested = id.0, found = product.id.0, "no product at id");
            return Err(FetchError::NotFound { id: id.0 });
        }
        Ok(product)
    }

    /// Fetch a product's recorded history. Sources without history support
    /// yield an empty list.
    pub async fn fetch_history(&self, id: ProductId) -> Result<Vec<HistoryEvent>, FetchError> {
        let tuples = match self.call(self.source.history_at(id.0)).await {
            Ok(tuples) => tuples,
            Err(SourceError::Unsupported(what)) => {
                debug!(id = id.0, what, "history not supported by source");
                return Ok(Vec::new());
            }
            Err(source) => return Err(FetchError::from_record(id.0, source)),
        };
        tuples
            .iter()
            .map(|tuple| {
                decode_history_event(tuple).map_err(|source| FetchError::DecodeMismatch {
                    index: id.0,
                    source,
                })
            })
            .collect()
    }

    async fn fetch_record(&self, index: u64, ticket: &FetchTicket) -> Result<Product, FetchError> {
        ticket.check()?;
        let tuple = self
            .call(self.source.record_at(index))
            .await
            .map_err(|source| FetchError::from_record(index, source))?;
        let product = decode_product(&tuple)
            .map_err(|source| FetchError::DecodeMismatch { index, source })?;
        debug!(index, id = product.id.0, "decoded product");
        Ok(product)
    }

    async fn call<T>(
        &self,
        call: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<T, SourceError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| SourceError::Timeout(self.timeout))?
    }
}

fn is_vacant(product: &Product) -> bool {
    product.created_at == 0 && product.owner.is_zero() && product.name.is_empty()
}
