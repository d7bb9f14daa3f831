pub mod address;
pub mod filter;
pub mod format;
pub mod history;
pub mod product;
pub mod role;
pub mod scan;
pub mod status;
pub mod summary;
pub mod timeline;
pub mod transaction;
pub mod transfer;
