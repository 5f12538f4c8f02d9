mod dedupe;
pub mod import;
pub mod ingest;

pub use dedupe::DedupeStore;
pub use import::{ImportReport, import_directory};
pub use ingest::{Fetcher, IngestionReport};
