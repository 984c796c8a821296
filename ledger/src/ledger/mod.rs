use crate::core::client::table::TableClient;
use crate::core::client::DynamoTable;
use crate::core::cloud::CloudProvider;
use crate::error::{LedgerError, LedgerResult};
use crate::provision::TableProvisioner;
use crate::types::migration::MigrationRecord;
use crate::types::params::{PollArgs, TableArgs};
use std::sync::Arc;

/// The persisted set of executed migrations.
///
/// Consumed by a migration runner that decides what to apply and in which
/// order; this type only keeps the ledger of completed work. Every
/// operation re-verifies table readiness before its request. There is no
/// in-process cache and no client-side locking; concurrent callers are
/// serialized only by the backing service (last write wins on the same
/// key).
pub struct MigrationLedger {
    client: Arc<dyn TableClient>,
    provisioner: TableProvisioner,
    args: TableArgs,
}

impl MigrationLedger {
    /// Build a ledger over an injected table client. The default
    /// [`TableArgs`] point at the `"migrations"` table.
    pub fn new(client: Arc<dyn TableClient>, args: TableArgs) -> Self {
        Self::with_probe(client, args, PollArgs::default())
    }

    /// Same as [`new`], with control over the readiness probe (poll
    /// interval and optional deadline).
    ///
    /// [`new`]: MigrationLedger::new
    pub fn with_probe(client: Arc<dyn TableClient>, args: TableArgs, probe: PollArgs) -> Self {
        let provisioner = TableProvisioner::with_probe(client.clone(), args.clone(), probe);
        Self { client, provisioner, args }
    }

    /// Build a ledger backed by DynamoDB for the given cloud provider.
    pub fn connect(provider: &CloudProvider, args: TableArgs) -> Self {
        let client = Arc::new(DynamoTable::from_provider(provider));
        Self::new(client, args)
    }

    pub fn table_name(&self) -> &str {
        &self.args.table_name
    }

    /// log_migration - Record `name` as executed.
    ///
    /// Upserts `{name, executed: true}` with fresh timestamps; calling it
    /// twice for the same name overwrites and is otherwise a no-op.
    #[tracing::instrument(skip(self), fields(function_type = "ledger_call"), err)]
    pub async fn log_migration(&self, name: &str) -> LedgerResult<()> {
        validate_name(name)?;
        self.provisioner.ensure_ready().await?;

        let record = MigrationRecord::executed(name);
        self.client.put_item(&self.args.table_name, &record).await?;
        tracing::debug!(migration = %name, category = "ledger_call", "Logged migration");
        Ok(())
    }

    /// unlog_migration - Remove the record for `name`.
    ///
    /// Deleting a name that was never logged is not an error.
    #[tracing::instrument(skip(self), fields(function_type = "ledger_call"), err)]
    pub async fn unlog_migration(&self, name: &str) -> LedgerResult<()> {
        validate_name(name)?;
        self.provisioner.ensure_ready().await?;

        self.client.delete_item(&self.args.table_name, name).await?;
        tracing::debug!(migration = %name, category = "ledger_call", "Unlogged migration");
        Ok(())
    }

    /// executed - List all executed migration names, sorted
    /// lexicographically ascending.
    ///
    /// The scan follows pagination to the end before returning; callers
    /// never see a partial result set.
    #[tracing::instrument(skip(self), fields(function_type = "ledger_call"), err)]
    pub async fn executed(&self) -> LedgerResult<Vec<String>> {
        self.provisioner.ensure_ready().await?;

        let records = self.client.scan_items(&self.args.table_name).await?;
        let mut names: Vec<String> = records
            .into_iter()
            .filter(|record| record.executed)
            .map(|record| record.name)
            .collect();
        names.sort();
        tracing::debug!(executed = names.len(), category = "ledger_call", "Listed executed migrations");
        Ok(names)
    }
}

fn validate_name(name: &str) -> LedgerResult<()> {
    if name.is_empty() {
        return Err(LedgerError::InvalidMigrationName("name must be a non-empty string".to_string()));
    }
    Ok(())
}
