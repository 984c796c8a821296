use crate::core::client::table::TableError;
use thiserror::Error;

/// Errors from the ensure-table-ready protocol, tagged by the phase that
/// failed so callers can tell a refused create from a flaky describe.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Failed to describe table: {0}")]
    DescribeTable(#[source] TableError),

    #[error("Failed to create table: {0}")]
    CreateTable(#[source] TableError),

    #[error("Failed to poll table status: {0}")]
    StatusPoll(#[source] TableError),

    #[error("Table '{0}' did not become ACTIVE before the configured deadline")]
    ReadinessDeadline(String),
}
