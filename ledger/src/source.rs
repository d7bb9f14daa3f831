use crate::error::SourceError;
use crate::schema::RecordTuple;

/// Read-only view of the registry contract.
///
/// Implementations are passed explicitly into the reader, so tests can swap
/// in an in-memory source without any process-wide connection state.
#[allow(async_fn_in_trait)]
pub trait ProductSource {
    /// Total number of records (`productCounter()`).
    async fn count(&self) -> Result<u64, SourceError>;

    /// The raw record at `index` (`products(index)`).
    async fn record_at(&self, index: u64) -> Result<RecordTuple, SourceError>;

    /// History entries for product `id` (`getProductHistory(id)`), oldest first.
    async fn history_at(&self, id: u64) -> Result<Vec<RecordTuple>, SourceError> {
        let _ = id;
        Err(SourceError::Unsupported("getProductHistory"))
    }

    /// Short name for logs (e.g. "json-rpc").
    fn source_name(&self) -> &str;
}
