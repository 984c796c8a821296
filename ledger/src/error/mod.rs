use crate::core::client::table::TableError;
use crate::provision::ProvisionError;
use thiserror::Error;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error types for the ledger
///
/// Provisioning failures and storage failures stay distinguishable: an
/// operation that failed before its main request carries a
/// [`ProvisionError`], one that failed on the put/delete/scan itself
/// carries the underlying [`TableError`]. Nothing is retried here; a
/// caller seeing a transient storage failure retries the whole operation.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Provisioning error: {0}")]
    ProvisionError(#[from] ProvisionError),

    #[error("Storage error: {0}")]
    StorageError(#[from] TableError),

    #[error("Invalid migration name: {0}")]
    InvalidMigrationName(String),
}
