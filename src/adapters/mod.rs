// Adapters layer: concrete implementations of the storage and catalog ports.

pub mod catalog;
pub mod storage;

pub use catalog::LoggingCatalog;
pub use storage::LocalStorage;

#[cfg(feature = "lambda")]
pub use catalog::GlueCatalog;
#[cfg(feature = "lambda")]
pub use storage::S3Storage;
