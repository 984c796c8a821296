use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the ledger: a migration and whether it has been executed.
///
/// `name` is the partition key and uniquely identifies a record. Writing the
/// same name twice overwrites the whole row (upsert semantics), timestamps
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub name: String,
    /// Defaults to `false`; every record written by this crate sets it to
    /// `true`.
    #[serde(default)]
    pub executed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl MigrationRecord {
    /// Build the record `log_migration` writes: executed, stamped now.
    pub fn executed(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self { name: name.into(), executed: true, created_at: now, updated_at: now }
    }
}
