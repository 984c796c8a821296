pub mod dynamodb;
pub mod error;

use crate::types::migration::MigrationRecord;
use crate::types::table::TableExistence;
use async_trait::async_trait;
pub use error::TableError;

/// Trait defining the key-value table operations the ledger consumes.
///
/// The table-level calls (describe/create/update) exist for provisioning;
/// the item-level calls carry the actual ledger traffic. `put_item` is an
/// upsert: it inserts if absent and overwrites if present, it never fails on
/// a duplicate key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableClient: Send + Sync {
    /// describe_table - Look the table up by name. Genuine absence is
    /// `Ok(TableExistence::NotFound)`; any other failure is an error.
    async fn describe_table(&self, table: &str) -> Result<TableExistence, TableError>;

    /// create_table - Create the migrations table schema. A concurrent
    /// creation surfaces as [`TableError::TableAlreadyExists`] so callers
    /// can treat a lost create race as success.
    async fn create_table(&self, table: &str) -> Result<(), TableError>;

    /// update_table - No-op-tolerant definition sync for an existing table.
    /// The service rejecting the update because nothing changed is the
    /// expected steady-state answer and maps to `Ok`.
    async fn update_table(&self, table: &str) -> Result<(), TableError>;

    /// put_item - Upsert one record.
    async fn put_item(&self, table: &str, record: &MigrationRecord) -> Result<(), TableError>;

    /// delete_item - Delete by key; deleting an absent key succeeds.
    async fn delete_item(&self, table: &str, name: &str) -> Result<(), TableError>;

    /// scan_items - Scan the whole table for executed records, following
    /// pagination until exhausted. Never returns a partial page set.
    async fn scan_items(&self, table: &str) -> Result<Vec<MigrationRecord>, TableError>;
}
