pub mod error;

use crate::core::client::table::{TableClient, TableError};
use crate::core::client::DynamoTable;
use crate::core::cloud::CloudProvider;
use crate::core::traits::resource::Resource;
use crate::types::params::{PollArgs, TableArgs};
use crate::types::table::{TableExistence, TableState};
use async_trait::async_trait;
pub use error::ProvisionError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Guarantees the backing table exists and is ACTIVE before the ledger
/// touches it.
///
/// Every public ledger operation funnels through [`ensure_ready`]. On a
/// healthy table that is one describe plus one no-op definition sync.
/// Concurrent callers against an absent table race their creates; exactly
/// one wins, the losers accept the already-exists answer and move on to
/// polling.
///
/// [`ensure_ready`]: TableProvisioner::ensure_ready
pub struct TableProvisioner {
    client: Arc<dyn TableClient>,
    args: TableArgs,
    probe: PollArgs,
}

impl TableProvisioner {
    pub fn new(client: Arc<dyn TableClient>, args: TableArgs) -> Self {
        Self::with_probe(client, args, PollArgs::default())
    }

    pub fn with_probe(client: Arc<dyn TableClient>, args: TableArgs, probe: PollArgs) -> Self {
        Self { client, args, probe }
    }

    pub fn table_name(&self) -> &str {
        &self.args.table_name
    }

    /// ensure_ready - declare the table (create-or-sync) and wait until the
    /// service reports it ACTIVE. Blocks for as long as the configured
    /// probe allows; the default probe waits indefinitely.
    pub async fn ensure_ready(&self) -> Result<(), ProvisionError> {
        self.setup(&self.args).await?;
        if !self.poll(&self.args, self.probe.interval, self.probe.deadline).await? {
            return Err(ProvisionError::ReadinessDeadline(self.args.table_name.clone()));
        }
        Ok(())
    }

    /// Create the table, accepting the already-exists answer as success:
    /// that is a concurrent caller having won the create race, not a fault.
    async fn create_if_absent(&self, args: &TableArgs) -> Result<(), ProvisionError> {
        match self.client.create_table(&args.table_name).await {
            Ok(()) => {
                info!(table = %args.table_name, "Table creation requested");
                Ok(())
            }
            Err(TableError::TableAlreadyExists(_)) => {
                debug!(table = %args.table_name, "Table already exists, skipping creation");
                Ok(())
            }
            Err(err) => Err(ProvisionError::CreateTable(err)),
        }
    }
}

#[async_trait]
impl Resource for TableProvisioner {
    type SetupResult = ();
    type SetupArgs = TableArgs;
    type CheckArgs = TableArgs;
    type Error = ProvisionError;

    async fn create_setup(provider: Arc<CloudProvider>) -> Result<Self, ProvisionError> {
        let client = Arc::new(DynamoTable::from_provider(provider.as_ref()));
        Ok(Self::new(client, TableArgs::default()))
    }

    /// Declare the table. A found table gets the no-op-tolerant definition
    /// sync; if that sync fails anyway, fall back to the create path rather
    /// than giving up (the table may have vanished between the calls). A
    /// transient describe failure surfaces as an error and never triggers a
    /// create: only genuine absence does.
    async fn setup(&self, args: &TableArgs) -> Result<(), ProvisionError> {
        match self.client.describe_table(&args.table_name).await {
            Ok(TableExistence::Found(descriptor)) => {
                debug!(table = %args.table_name, state = %descriptor.state, "Table already declared, syncing definition");
                match self.client.update_table(&args.table_name).await {
                    Ok(()) => Ok(()),
                    Err(err) => {
                        warn!(table = %args.table_name, error = %err, "Definition sync failed, falling back to create");
                        self.create_if_absent(args).await
                    }
                }
            }
            Ok(TableExistence::NotFound) => self.create_if_absent(args).await,
            Err(err) => Err(ProvisionError::DescribeTable(err)),
        }
    }

    async fn check_if_exists(&self, args: &TableArgs) -> Result<bool, ProvisionError> {
        let existence = self
            .client
            .describe_table(&args.table_name)
            .await
            .map_err(ProvisionError::DescribeTable)?;
        Ok(matches!(existence, TableExistence::Found(_)))
    }

    async fn is_ready_to_use(&self, args: &TableArgs) -> Result<bool, ProvisionError> {
        let existence = self
            .client
            .describe_table(&args.table_name)
            .await
            .map_err(ProvisionError::StatusPoll)?;
        match existence {
            TableExistence::Found(descriptor) => Ok(descriptor.state == TableState::Active),
            // Absence during the readiness wait is "not yet": the create we
            // just issued may not be visible to describe yet.
            TableExistence::NotFound => Ok(false),
        }
    }
}
