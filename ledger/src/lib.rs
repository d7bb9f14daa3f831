//! Read side of the product registry contract.
//!
//! [`LedgerReader`] pulls every record from a [`ProductSource`], decodes the
//! fixed 10-field tuple into a [`Product`](tracechain_common::product::Product)
//! and returns the collection in index order. [`JsonRpcSource`] is the
//! production source; tests plug in their own.

pub mod abi;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generation;
pub mod reader;
pub mod rpc;
pub mod schema;
pub mod source;

pub use catalog::Catalog;
pub use config::{LedgerConfig, Numbering};
pub use error::{ConfigError, DecodeError, FetchError, SourceError};
pub use generation::{FetchGeneration, FetchTicket};
pub use reader::LedgerReader;
pub use rpc::JsonRpcSource;
pub use schema::RecordTuple;
pub use source::ProductSource;
